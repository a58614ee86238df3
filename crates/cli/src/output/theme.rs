use colored::Colorize;
use nsxcheck_common::Severity;
use nsxcheck_engine::Levels;

use super::severity_label;

pub fn print_title(title: &str) {
    println!("{}", title.bold().underline());
}

pub fn print_setting(label: &str, value: &str) {
    println!("  {} {}", format!("{label:<18}").dimmed(), value);
}

pub fn levels_text(levels: Option<Levels>) -> String {
    match levels {
        Some(l) => format!("warn {} / crit {}", l.warn, l.crit),
        None => "no conditions".to_string(),
    }
}

pub fn print_levels(label: &str, levels: Option<Levels>) {
    let text = levels_text(levels);
    let styled = match levels {
        Some(_) => text.bright_white(),
        None => text.dimmed(),
    };
    print_setting(label, &styled.to_string());
}

/// Trailing line under a report table.
pub fn print_summary(services: usize, worst: Option<Severity>) {
    match worst {
        Some(w) => println!("{} services, worst state {}", services, severity_label(w)),
        None => println!("{}", "No services found.".dimmed()),
    }
}

pub fn print_note(msg: &str) {
    println!("{}", msg.dimmed());
}
