use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use nsxcheck_common::Severity;
use nsxcheck_engine::ServiceReport;

fn table_with(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    let cells: Vec<Cell> = headers
        .iter()
        .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
        .collect();
    table.set_header(cells);
    table
}

pub fn severity_cell(severity: Severity) -> Cell {
    let color = match severity {
        Severity::Ok => Color::Green,
        Severity::Warn => Color::Yellow,
        Severity::Crit => Color::Red,
        Severity::Unknown => Color::Magenta,
    };
    let cell = Cell::new(severity.as_str()).fg(color);
    if severity == Severity::Ok {
        cell
    } else {
        cell.add_attribute(Attribute::Bold)
    }
}

/// One row per service; each finding on its own line, colored by its grade.
pub fn report_table(reports: &[ServiceReport]) -> Table {
    let mut table = table_with(&["Service", "State", "Findings"]);
    for r in reports {
        let findings: Vec<String> = r
            .findings
            .findings()
            .iter()
            .map(|f| format!("[{}] {}", f.severity.as_str(), f.summary))
            .collect();
        table.add_row(vec![
            Cell::new(&r.service),
            severity_cell(r.state),
            Cell::new(findings.join("\n")),
        ]);
    }
    table
}

/// `(kind, item, service)` rows of a discovery run.
pub fn discovery_table<'a>(rows: impl IntoIterator<Item = (&'a str, &'a str, &'a str)>) -> Table {
    let mut table = table_with(&["Kind", "Item", "Service"]);
    for (kind, item, service) in rows {
        table.add_row(vec![kind, item, service]);
    }
    table
}
