use colored::{ColoredString, Colorize};
use nsxcheck_common::Severity;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}

pub fn print_warning(msg: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), msg.yellow());
}

pub fn severity_label(severity: Severity) -> ColoredString {
    let s = severity.as_str();
    match severity {
        Severity::Ok => s.green(),
        Severity::Warn => s.yellow().bold(),
        Severity::Crit => s.red().bold(),
        Severity::Unknown => s.magenta(),
    }
}
