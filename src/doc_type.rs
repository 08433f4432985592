//! Document types a page can be analysed as.
//!
//! The set is closed: every variant has a wire tag (the `docType` string sent
//! to the analysis endpoint) and a display label for the per-page menu. Unknown
//! tags are not representable here; the endpoint maps them to a fallback text
//! on its side.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A document-type tag selecting which analysis to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocType {
    #[default]
    RawText,
    ArabicTranslate,
    Summary,
    Research,
    DataFields,
    Invoice,
    Contract,
    Certificate,
    Official,
}

impl DocType {
    /// Every variant, in menu order.
    pub const ALL: [DocType; 9] = [
        DocType::RawText,
        DocType::ArabicTranslate,
        DocType::Summary,
        DocType::Research,
        DocType::DataFields,
        DocType::Invoice,
        DocType::Contract,
        DocType::Certificate,
        DocType::Official,
    ];

    /// The `docType` string used on the wire.
    pub fn tag(self) -> &'static str {
        match self {
            DocType::RawText => "rawText",
            DocType::ArabicTranslate => "arabicTranslate",
            DocType::Summary => "summary",
            DocType::Research => "research",
            DocType::DataFields => "dataFields",
            DocType::Invoice => "invoice",
            DocType::Contract => "contract",
            DocType::Certificate => "certificate",
            DocType::Official => "official",
        }
    }

    /// Menu label.
    pub fn label(self) -> &'static str {
        match self {
            DocType::RawText => "Extract Raw Text",
            DocType::ArabicTranslate => "Arabic Translation",
            DocType::Summary => "Text Summary",
            DocType::Research => "Research Paper Analysis",
            DocType::DataFields => "General Data Fields",
            DocType::Invoice => "Invoice Analysis",
            DocType::Contract => "Contract Analysis",
            DocType::Certificate => "Certificate Details",
            DocType::Official => "Official Document",
        }
    }

    /// Look a variant up by wire tag. Case-sensitive, like the endpoint.
    pub fn from_tag(tag: &str) -> Option<DocType> {
        DocType::ALL.into_iter().find(|d| d.tag() == tag)
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Error returned when parsing an unknown doc-type tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown document type '{0}'")]
pub struct UnknownDocType(pub String);

impl FromStr for DocType {
    type Err = UnknownDocType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocType::from_tag(s).ok_or_else(|| UnknownDocType(s.to_string()))
    }
}
