//! The canonical component record.

use serde::{Deserialize, Serialize};

/// License value stored when a document does not state one.
pub const NO_ASSERTION: &str = "NOASSERTION";

/// A single component, reduced to the fields every format can provide.
///
/// Normalizers fill these in exactly as the source document spells them.
/// Casing and the license sentinel are applied later by
/// [`CanonicalRecord::canonicalize`], just before persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// Supplier or vendor name, may be empty
    pub vendor: String,
    /// Component name, never empty once a normalizer emits the record
    pub product: String,
    /// Component version, never empty once a normalizer emits the record
    pub version: String,
    /// License expression as stated in the document, may be empty
    pub license: String,
}

impl CanonicalRecord {
    /// Create a record from its four fields.
    pub fn new(
        vendor: impl Into<String>,
        product: impl Into<String>,
        version: impl Into<String>,
        license: impl Into<String>,
    ) -> Self {
        Self {
            vendor: vendor.into(),
            product: product.into(),
            version: version.into(),
            license: license.into(),
        }
    }

    /// Create a record with no vendor and no license.
    pub fn product(product: impl Into<String>, version: impl Into<String>) -> Self {
        Self::new(String::new(), product, version, String::new())
    }

    /// Builder-style license setter.
    #[must_use]
    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = license.into();
        self
    }

    /// A record is usable only if both product and version are present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.product.trim().is_empty() && !self.version.trim().is_empty()
    }

    /// Key used for de-duplication: (vendor, product, version), lower-cased.
    #[must_use]
    pub fn dedup_key(&self) -> (String, String, String) {
        (
            self.vendor.to_lowercase(),
            self.product.to_lowercase(),
            self.version.to_lowercase(),
        )
    }

    /// The persisted form of this record.
    ///
    /// Vendor, product and version are lower-cased; an empty license becomes
    /// [`NO_ASSERTION`]. Applying it twice yields the same record.
    #[must_use]
    pub fn canonicalize(&self) -> Self {
        let license = self.license.trim();
        Self {
            vendor: self.vendor.trim().to_lowercase(),
            product: self.product.trim().to_lowercase(),
            version: self.version.trim().to_lowercase(),
            license: if license.is_empty() {
                NO_ASSERTION.to_string()
            } else {
                license.to_string()
            },
        }
    }
}
