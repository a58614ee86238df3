use chrono::{DateTime, Utc};

const UNITS: [(&str, i64); 4] = [("day", 86_400), ("hour", 3_600), ("minute", 60), ("second", 1)];

/// Seconds as the two most significant units, e.g. `2 days 3 hours`.
pub fn timespan(seconds: f64) -> String {
    let sign = if seconds < 0.0 { "-" } else { "" };
    let total = seconds.abs().round() as i64;

    let Some(first) = UNITS.iter().position(|(_, size)| total >= *size) else {
        return format!("{sign}0 seconds");
    };

    let mut rest = total;
    let mut parts = Vec::with_capacity(2);
    for (name, size) in UNITS.iter().skip(first).take(2) {
        let n = rest / size;
        rest %= size;
        parts.push(plural(n, name));
    }
    format!("{sign}{}", parts.join(" "))
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("{n} {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

pub fn datetime(t: &DateTime<Utc>) -> String {
    t.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// Byte counts in binary units, e.g. `3.50 GiB`.
pub fn bytes(value: f64) -> String {
    const STEPS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut v = value;
    let mut unit = 0;
    while v.abs() >= 1024.0 && unit < STEPS.len() - 1 {
        v /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{v:.0} {}", STEPS[0])
    } else {
        format!("{v:.2} {}", STEPS[unit])
    }
}
