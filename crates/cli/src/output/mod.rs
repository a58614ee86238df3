mod format;
mod table;
pub mod theme;

pub use format::{print_error, print_json, print_success, print_warning, severity_label, OutputMode};
pub use table::{discovery_table, report_table, severity_cell};
