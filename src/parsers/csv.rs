//! Three-column CSV normalizer: `vendor,product,version` per line.

use crate::error::Result;
use crate::model::CanonicalRecord;
use crate::parsers::traits::{RecordCollector, SbomNormalizer};

/// Normalizer for simple `vendor,product,version` listings.
///
/// No quoting is supported; a line is split on every comma and used only if
/// it has exactly three fields. Lines starting with `#` are comments.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvParser;

impl CsvParser {
    pub const fn new() -> Self {
        Self
    }
}

impl SbomNormalizer for CsvParser {
    fn normalize_str(&self, content: &str) -> Result<Vec<CanonicalRecord>> {
        let mut collector = RecordCollector::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            match fields.as_slice() {
                [vendor, product, version] => {
                    collector.offer(CanonicalRecord::new(*vendor, *product, *version, ""));
                }
                _ => collector.skip(format!("expected 3 fields, found {}", fields.len())),
            }
        }

        Ok(collector.finish(self.format_name()))
    }

    fn format_name(&self) -> &str {
        "CSV"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_lines_ignored() {
        let records = CsvParser::new()
            .normalize_str("acme,widget,1.2\n#comment\nacme,sprocket,2.0\n")
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], CanonicalRecord::new("acme", "widget", "1.2", ""));
        assert_eq!(records[1].product, "sprocket");
    }

    #[test]
    fn test_fields_are_trimmed() {
        let records = CsvParser::new()
            .normalize_str("  Acme , Widget ,  1.2  \r\n")
            .unwrap();
        assert_eq!(records[0].vendor, "Acme");
        assert_eq!(records[0].product, "Widget");
        assert_eq!(records[0].version, "1.2");
    }

    #[test]
    fn test_wrong_column_count_skipped() {
        let content = "vendor,product\nacme,widget,1.0,extra\n\n,lonely,\nacme,gear,3\n";
        let records = CsvParser::new().normalize_str(content).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].product, "gear");
    }

    #[test]
    fn test_empty_vendor_allowed() {
        let records = CsvParser::new().normalize_str(",zlib,1.3").unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].vendor.is_empty());
    }
}
