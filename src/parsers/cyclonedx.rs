//! CycloneDX normalizer.
//!
//! XML documents are walked with the `quick-xml` event reader so that
//! namespace prefixes and unknown elements are ignored; JSON documents are
//! decoded component by component with `serde_json`.

use crate::error::{ParseErrorKind, Result, SbomManagerError};
use crate::model::CanonicalRecord;
use crate::parsers::traits::{RecordCollector, SbomNormalizer};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Deserialize;

/// Component types ingested from XML documents.
const XML_COMPONENT_TYPES: &[&str] = &["library", "application", "operating-system"];

/// Component types ingested from JSON documents.
const JSON_COMPONENT_TYPES: &[&str] = &["application", "library"];

/// CycloneDX document encodings understood by [`CycloneDxParser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycloneDxEncoding {
    Xml,
    Json,
}

/// Normalizer for CycloneDX BOMs
#[derive(Debug, Clone, Copy)]
pub struct CycloneDxParser {
    encoding: CycloneDxEncoding,
}

impl CycloneDxParser {
    /// Parser for XML BOMs
    pub const fn xml() -> Self {
        Self {
            encoding: CycloneDxEncoding::Xml,
        }
    }

    /// Parser for JSON BOMs
    pub const fn json() -> Self {
        Self {
            encoding: CycloneDxEncoding::Json,
        }
    }

    pub const fn encoding(&self) -> CycloneDxEncoding {
        self.encoding
    }

    /// Parse a CycloneDX BOM from XML.
    ///
    /// Only direct children of the top-level `components` element are
    /// considered; nested sub-components are not flattened.
    fn parse_xml(&self, content: &str) -> Result<Vec<CanonicalRecord>> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(true);

        let mut collector = RecordCollector::new();
        let mut stack: Vec<String> = Vec::new();
        let mut current: Option<XmlComponent> = None;
        let mut seen_root = false;

        loop {
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(e) => {
                    let position = reader.buffer_position();
                    return Err(invalid_xml(format!("at byte {position}: {e}")));
                }
            };

            match event {
                Event::Start(ref e) => {
                    seen_root = true;
                    stack.push(element_name(e));
                    if is_top_level_component(&stack) {
                        current = Some(XmlComponent::from_start(e));
                    }
                }
                Event::Empty(ref e) => {
                    seen_root = true;
                    stack.push(element_name(e));
                    if is_top_level_component(&stack) {
                        let component = XmlComponent::from_start(e);
                        if component.is_included() {
                            collector.offer(component.into_record());
                        }
                    }
                    stack.pop();
                }
                Event::Text(ref e) => {
                    if let Some(component) = current.as_mut() {
                        let text = e
                            .unescape()
                            .map_err(|err| invalid_xml(err.to_string()))?;
                        let path = stack.get(3..).unwrap_or_default();
                        component.set_field(path, text.trim());
                    }
                }
                Event::CData(ref e) => {
                    if let Some(component) = current.as_mut() {
                        let text = String::from_utf8_lossy(e);
                        let path = stack.get(3..).unwrap_or_default();
                        component.set_field(path, text.trim());
                    }
                }
                Event::End(_) => {
                    if is_top_level_component(&stack) {
                        if let Some(component) = current.take() {
                            if component.is_included() {
                                collector.offer(component.into_record());
                            }
                        }
                    }
                    stack.pop();
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !seen_root {
            return Err(invalid_xml("document has no root element"));
        }

        Ok(collector.finish(self.format_name()))
    }

    /// Parse a CycloneDX BOM from JSON.
    fn parse_json(&self, content: &str) -> Result<Vec<CanonicalRecord>> {
        let bom: CycloneDxBom = serde_json::from_str(content)?;
        let mut collector = RecordCollector::new();

        for value in bom.components.unwrap_or_default() {
            let component = match serde_json::from_value::<CdxComponent>(value) {
                Ok(component) => component,
                Err(e) => {
                    collector.skip(e.to_string());
                    continue;
                }
            };

            let component_type = component.component_type.as_deref().unwrap_or_default();
            if !JSON_COMPONENT_TYPES.contains(&component_type) {
                continue;
            }

            let license = component.license().unwrap_or_default();
            collector.offer(CanonicalRecord::new(
                String::new(),
                component.name.unwrap_or_default(),
                component.version.unwrap_or_default(),
                license,
            ));
        }

        Ok(collector.finish(self.format_name()))
    }
}

impl Default for CycloneDxParser {
    fn default() -> Self {
        Self::xml()
    }
}

impl SbomNormalizer for CycloneDxParser {
    fn normalize_str(&self, content: &str) -> Result<Vec<CanonicalRecord>> {
        match self.encoding {
            CycloneDxEncoding::Xml => self.parse_xml(content),
            CycloneDxEncoding::Json => self.parse_json(content),
        }
    }

    fn format_name(&self) -> &str {
        match self.encoding {
            CycloneDxEncoding::Xml => "CycloneDX XML",
            CycloneDxEncoding::Json => "CycloneDX JSON",
        }
    }
}

fn invalid_xml(message: impl Into<String>) -> SbomManagerError {
    SbomManagerError::parse(
        "CycloneDX XML",
        ParseErrorKind::InvalidXml(message.into()),
    )
}

/// Local part of an element name, with any namespace prefix removed.
fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().rposition(|&b| b == b':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

fn element_name(e: &BytesStart<'_>) -> String {
    let name = e.name();
    String::from_utf8_lossy(local_name(name.as_ref())).into_owned()
}

/// `bom/components/component`
fn is_top_level_component(stack: &[String]) -> bool {
    stack.len() == 3 && stack[1] == "components" && stack[2] == "component"
}

// =============================================================================
// XML component accumulator
// =============================================================================

/// License lookup paths below a component, in order of preference.
const XML_LICENSE_PATHS: [&[&str]; 4] = [
    &["licenses", "license", "id"],
    &["licenses", "license", "name"],
    &["licenses", "license", "expression"],
    &["licenses", "expression"],
];

#[derive(Debug, Default)]
struct XmlComponent {
    component_type: String,
    name: Option<String>,
    version: Option<String>,
    licenses: [Option<String>; 4],
}

impl XmlComponent {
    fn from_start(e: &BytesStart<'_>) -> Self {
        let component_type = e
            .attributes()
            .flatten()
            .find(|attr| local_name(attr.key.as_ref()) == b"type")
            .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
            .unwrap_or_default();

        Self {
            component_type,
            ..Self::default()
        }
    }

    /// Store text found at `path` (relative to the component element).
    /// Only the first occurrence of each field is kept.
    fn set_field(&mut self, path: &[String], text: &str) {
        match path {
            [field] if field == "name" => {
                self.name.get_or_insert_with(|| text.to_string());
            }
            [field] if field == "version" => {
                self.version.get_or_insert_with(|| text.to_string());
            }
            _ => {
                if let Some(slot) = XML_LICENSE_PATHS
                    .iter()
                    .position(|candidate| candidate.iter().eq(path.iter()))
                {
                    self.licenses[slot].get_or_insert_with(|| text.to_string());
                }
            }
        }
    }

    fn is_included(&self) -> bool {
        XML_COMPONENT_TYPES.contains(&self.component_type.as_str())
    }

    fn into_record(self) -> CanonicalRecord {
        let license = self
            .licenses
            .into_iter()
            .flatten()
            .next()
            .unwrap_or_default();
        CanonicalRecord::new(
            String::new(),
            self.name.unwrap_or_default(),
            self.version.unwrap_or_default(),
            license,
        )
    }
}

// =============================================================================
// CycloneDX JSON structures for deserialization
// =============================================================================

#[derive(Debug, Deserialize)]
struct CycloneDxBom {
    components: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct CdxComponent {
    #[serde(rename = "type")]
    component_type: Option<String>,
    name: Option<String>,
    version: Option<String>,
    licenses: Option<Vec<CdxLicenseChoice>>,
    evidence: Option<CdxEvidence>,
}

impl CdxComponent {
    /// First declared license, falling back to license evidence.
    fn license(&self) -> Option<String> {
        first_license(self.licenses.as_deref()).or_else(|| {
            self.evidence
                .as_ref()
                .and_then(|evidence| first_license(evidence.licenses.as_deref()))
        })
    }
}

fn first_license(choices: Option<&[CdxLicenseChoice]>) -> Option<String> {
    let choice = choices?.first()?;
    choice
        .license
        .as_ref()
        .and_then(|license| license.id.clone().or_else(|| license.name.clone()))
        .or_else(|| choice.expression.clone())
}

#[derive(Debug, Deserialize)]
struct CdxLicenseChoice {
    license: Option<CdxLicense>,
    expression: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CdxLicense {
    id: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CdxEvidence {
    licenses: Option<Vec<CdxLicenseChoice>>,
}
