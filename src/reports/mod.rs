//! Human-readable rendering of store listings.
//!
//! Two formats are provided:
//! - Console: fixed-width columns with a heading underline
//! - CSV: quoted fields for spreadsheet import

mod console;
mod csv;
mod output;
mod types;

pub use console::{ConsoleReporter, DEFAULT_COLUMN_WIDTH};
pub use csv::CsvReporter;
pub use output::{write_output, OutputTarget};
pub use types::OutputFormat;

use crate::model::{AuditEntry, Entries, ModuleRow};

/// Trait for table renderers
pub trait ReportGenerator {
    /// Render a heading row followed by data rows.
    fn generate(&self, headings: &[&str], rows: &[Vec<String>]) -> String;

    /// Get the output format
    fn format(&self) -> OutputFormat;
}

/// Create a report generator for the given format.
pub fn create_reporter(format: OutputFormat, width: usize) -> Box<dyn ReportGenerator> {
    match format {
        OutputFormat::Console => Box::new(ConsoleReporter::new(width)),
        OutputFormat::Csv => Box::new(CsvReporter::new()),
    }
}

/// Render a `list` result.
pub fn render_entries(reporter: &dyn ReportGenerator, entries: &Entries) -> String {
    reporter.generate(&entries.headings(), &entries.to_table())
}

/// Render `find` results.
pub fn render_modules(reporter: &dyn ReportGenerator, rows: &[ModuleRow]) -> String {
    render_entries(reporter, &Entries::Module(rows.to_vec()))
}

/// Render the audit trail.
pub fn render_audit(reporter: &dyn ReportGenerator, entries: &[AuditEntry]) -> String {
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|entry| {
            vec![
                entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                entry.command.clone(),
            ]
        })
        .collect();
    reporter.generate(&["Timestamp", "Command"], &rows)
}
