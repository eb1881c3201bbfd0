//! CSV report generator.
//!
//! One header line, then one line per row. Every field is quoted.

use super::{OutputFormat, ReportGenerator};

/// CSV report generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvReporter;

impl CsvReporter {
    pub const fn new() -> Self {
        Self
    }
}

impl ReportGenerator for CsvReporter {
    fn generate(&self, headings: &[&str], rows: &[Vec<String>]) -> String {
        let mut content = String::new();

        content.push_str(&csv_line(headings.iter().copied()));
        for row in rows {
            content.push_str(&csv_line(row.iter().map(String::as_str)));
        }

        content
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Csv
    }
}

fn csv_line<'a>(fields: impl Iterator<Item = &'a str>) -> String {
    let fields: Vec<String> = fields
        .map(|field| format!("\"{}\"", escape_csv(field)))
        .collect();
    format!("{}\n", fields.join(","))
}

/// Double embedded quotes; fold line breaks into spaces.
fn escape_csv(s: &str) -> String {
    s.replace('"', "\"\"").replace(['\r', '\n'], " ")
}
