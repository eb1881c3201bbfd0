//! Content sniffing for the `auto` document type.
//!
//! Detection looks for structural markers only; it does not validate the
//! document. The path is consulted solely to tell a filename inventory from
//! other plain-text listings.

use super::SbomFormat;
use std::path::Path;

/// Number of leading bytes inspected for markers.
const PEEK_LEN: usize = 4096;

/// Detect the format of `content`.
///
/// Returns `None` when nothing matches; the caller reports that as an
/// unsupported format.
pub fn detect_format(content: &str, path: &Path) -> Option<SbomFormat> {
    let peek = peek(content);
    let first = peek.trim_start().chars().next();

    let detected = match first {
        Some('{') => detect_json(peek),
        Some('<') => has_bom_root(peek).then_some(SbomFormat::CycloneDx),
        Some(_) => detect_text(content, path),
        None => None,
    };

    match detected {
        Some(format) => tracing::debug!("Detected {format} for {}", path.display()),
        None => tracing::debug!("Could not detect format of {}", path.display()),
    }
    detected
}

fn peek(content: &str) -> &str {
    if content.len() <= PEEK_LEN {
        return content;
    }
    let mut end = PEEK_LEN;
    while !content.is_char_boundary(end) {
        end -= 1;
    }
    &content[..end]
}

/// Whether the first element, ignoring any namespace prefix, is `bom`.
fn has_bom_root(peek: &str) -> bool {
    let mut rest = peek;
    while let Some(start) = rest.find('<') {
        rest = &rest[start + 1..];
        if rest.starts_with('?') || rest.starts_with('!') {
            continue;
        }
        let name = rest
            .split(|c: char| c.is_whitespace() || c == '>' || c == '/')
            .next()
            .unwrap_or_default();
        let local = name.rsplit_once(':').map_or(name, |(_, local)| local);
        return local == "bom";
    }
    false
}

fn detect_json(peek: &str) -> Option<SbomFormat> {
    if peek.contains("\"bomFormat\"") {
        Some(SbomFormat::CycloneDxJson)
    } else if peek.contains("\"spdxVersion\"") {
        Some(SbomFormat::SpdxJson)
    } else {
        None
    }
}

fn detect_text(content: &str, path: &Path) -> Option<SbomFormat> {
    let mut lines = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .peekable();

    let first = lines.peek()?;
    if first.starts_with("SPDXVersion:") {
        return Some(SbomFormat::Spdx);
    }

    if lines.all(|line| line.split(',').count() == 3) {
        return Some(SbomFormat::Csv);
    }

    let is_listing = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt") || ext.eq_ignore_ascii_case("lst"));
    is_listing.then_some(SbomFormat::Dir)
}
