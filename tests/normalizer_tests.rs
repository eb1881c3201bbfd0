//! Normalizer tests against fixture documents.
//!
//! Every supported format is read from disk through the same entry point the
//! CLI uses, with both the declared type and `auto`.

use sbom_manager::{
    normalize_file,
    parsers::{detect_format, read_document},
    CanonicalRecord, SbomFormat, SbomManagerError,
};
use std::path::{Path, PathBuf};

// ============================================================================
// Test Fixtures
// ============================================================================

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> PathBuf {
    Path::new(FIXTURES_DIR).join(name)
}

fn pairs(records: &[CanonicalRecord]) -> Vec<(&str, &str)> {
    records
        .iter()
        .map(|r| (r.product.as_str(), r.version.as_str()))
        .collect()
}

// ============================================================================
// Per-format Tests
// ============================================================================

mod spdx {
    use super::*;

    #[test]
    fn test_tag_value_fixture() {
        let records = normalize_file(&fixture_path("spdx/router.spdx"), "spdx").unwrap();
        assert_eq!(
            pairs(&records),
            vec![("BusyBox", "1.36.1"), ("OpenSSL", "3.0.13"), ("zlib", "1.3")]
        );
        assert_eq!(records[0].license, "GPL-2.0-only");
        assert!(records[2].license.is_empty());
    }

    #[test]
    fn test_json_selected_by_extension() {
        let path = fixture_path("spdx/webapp.spdx.json");
        assert_eq!(SbomFormat::resolve("spdx", &path).unwrap(), SbomFormat::SpdxJson);

        let records = normalize_file(&path, "spdx").unwrap();
        assert_eq!(pairs(&records), vec![("lodash", "4.17.21"), ("express", "4.18.2")]);
        assert_eq!(records[0].license, "MIT");
    }
}

mod cyclonedx {
    use super::*;

    #[test]
    fn test_xml_top_level_components_only() {
        let records =
            normalize_file(&fixture_path("cyclonedx/gateway.cdx.xml"), "cyclonedx").unwrap();
        assert_eq!(pairs(&records), vec![("curl", "8.5.0"), ("dropbear", "2022.83")]);
        assert_eq!(records[0].license, "curl");
        assert_eq!(records[1].license, "MIT");
    }

    #[test]
    fn test_json_component_types() {
        let records =
            normalize_file(&fixture_path("cyclonedx/service.cdx.json"), "cyclonedx").unwrap();
        assert_eq!(pairs(&records), vec![("serde", "1.0.197"), ("nginx", "1.25.4")]);
        assert_eq!(records[0].license, "MIT OR Apache-2.0");
        assert_eq!(records[1].license, "BSD-2-Clause");
    }
}

mod plain_text {
    use super::*;

    #[test]
    fn test_csv_fixture_skips_short_rows() {
        let records = normalize_file(&fixture_path("csv/components.csv"), "csv").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].vendor, "Acme");
        assert_eq!(records[0].product, "Widget");
        assert_eq!(records[1].version, "2.0");
    }

    #[test]
    fn test_inventory_fixture_dedups() {
        let records = normalize_file(&fixture_path("inventory/rootfs.txt"), "dir").unwrap();
        assert_eq!(pairs(&records), vec![("libfoo", "2.3.1"), ("libbar", "1.0")]);
        assert!(records.iter().all(|r| r.vendor.is_empty()));
    }
}

// ============================================================================
// Detection
// ============================================================================

mod detection {
    use super::*;

    #[test]
    fn test_auto_detects_every_fixture() {
        let cases = [
            ("spdx/router.spdx", SbomFormat::Spdx),
            ("spdx/webapp.spdx.json", SbomFormat::SpdxJson),
            ("cyclonedx/gateway.cdx.xml", SbomFormat::CycloneDx),
            ("cyclonedx/service.cdx.json", SbomFormat::CycloneDxJson),
            ("inventory/rootfs.txt", SbomFormat::Dir),
        ];
        for (name, expected) in cases {
            let path = fixture_path(name);
            let content = read_document(&path).unwrap();
            assert_eq!(detect_format(&content, &path), Some(expected), "{name}");
            assert_eq!(SbomFormat::resolve("auto", &path).unwrap(), expected, "{name}");
        }
    }

    #[test]
    fn test_auto_and_declared_agree() {
        let path = fixture_path("cyclonedx/service.cdx.json");
        assert_eq!(
            normalize_file(&path, "auto").unwrap(),
            normalize_file(&path, "cyclonedx").unwrap()
        );
    }
}

// ============================================================================
// Error Paths
// ============================================================================

mod errors {
    use super::*;

    #[test]
    fn test_missing_document_is_unreadable() {
        let err = normalize_file(&fixture_path("spdx/missing.spdx"), "spdx").unwrap_err();
        assert!(matches!(err, SbomManagerError::UnreadableDocument { .. }));
    }

    #[test]
    fn test_unknown_type_is_unsupported() {
        let err = normalize_file(&fixture_path("csv/components.csv"), "swid").unwrap_err();
        assert!(matches!(err, SbomManagerError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_json_declared_for_tag_value_is_parse_error() {
        let err = SbomFormat::SpdxJson
            .normalize(&fixture_path("spdx/router.spdx"))
            .unwrap_err();
        assert!(matches!(err, SbomManagerError::Parse { .. }));
    }
}
