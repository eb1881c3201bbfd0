//! Fixed-width console tables.

use super::{OutputFormat, ReportGenerator};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Default column width in display cells.
pub const DEFAULT_COLUMN_WIDTH: usize = 15;

const ELLIPSIS: &str = "...";

/// Console table generator.
///
/// Each cell is padded to `width` display columns followed by one space.
/// Longer values keep their first `width - 3` columns and gain `...`.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleReporter {
    width: usize,
}

impl ConsoleReporter {
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(ELLIPSIS.len() + 1),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    fn format_element(&self, element: &str) -> String {
        if element.width() <= self.width {
            return element.to_string();
        }

        let budget = self.width - ELLIPSIS.len();
        let mut used = 0;
        let mut truncated = String::new();
        for c in element.chars() {
            let w = c.width().unwrap_or(0);
            if used + w > budget {
                break;
            }
            used += w;
            truncated.push(c);
        }
        truncated.push_str(ELLIPSIS);
        truncated
    }

    fn format_row<'a>(&self, cells: impl Iterator<Item = &'a str>) -> String {
        let mut line = String::new();
        for cell in cells {
            let element = self.format_element(cell);
            let padding = self.width.saturating_sub(element.width());
            line.push_str(&element);
            line.push_str(&" ".repeat(padding + 1));
        }
        line
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new(DEFAULT_COLUMN_WIDTH)
    }
}

impl ReportGenerator for ConsoleReporter {
    fn generate(&self, headings: &[&str], rows: &[Vec<String>]) -> String {
        let mut content = String::new();

        if !headings.is_empty() {
            let header = self.format_row(headings.iter().copied());
            content.push_str(&header);
            content.push('\n');
            content.push_str(&"=".repeat(header.width()));
            content.push('\n');
        }

        for row in rows {
            content.push_str(&self.format_row(row.iter().map(String::as_str)));
            content.push('\n');
        }

        content
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncates_wide_values() {
        let reporter = ConsoleReporter::default();
        assert_eq!(reporter.format_element("short"), "short");
        assert_eq!(reporter.format_element("exactly-fifteen"), "exactly-fifteen");
        assert_eq!(
            reporter.format_element("a-very-long-product-name"),
            "a-very-long-..."
        );
    }

    #[test]
    fn test_truncation_counts_display_width() {
        let reporter = ConsoleReporter::new(6);
        // Each CJK character is two columns wide.
        assert_eq!(reporter.format_element("日本語の名前"), "日...");
    }

    #[test]
    fn test_header_underline() {
        let reporter = ConsoleReporter::new(5);
        let output = reporter.generate(&["Name", "Ver"], &[vec!["zlib".into(), "1.3".into()]]);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "Name  Ver   ");
        assert_eq!(lines[1], "============");
        assert_eq!(lines[2], "zlib  1.3   ");
    }
}
