//! Classification result types.

use serde::{Deserialize, Serialize};

/// Which form of `#include` a directive uses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum IncludeKind {
    /// `#include "path"`, inlined by the expander.
    Local,
    /// `#include <path>`, passed through untouched.
    System,
}

impl IncludeKind {
    /// Select the kind from an opening delimiter byte.
    pub fn from_opening(byte: u8) -> Option<Self> {
        match byte {
            b'"' => Some(IncludeKind::Local),
            b'<' => Some(IncludeKind::System),
            _ => None,
        }
    }

    /// The byte that terminates the path.
    pub fn closing(&self) -> u8 {
        match self {
            IncludeKind::Local => b'"',
            IncludeKind::System => b'>',
        }
    }
}

/// A recognized include directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeDirective {
    pub kind: IncludeKind,
    /// Exact bytes between the delimiters, no trimming, unescaping or decoding.
    pub path: Vec<u8>,
}

/// Outcome of classifying a single line.
///
/// Paths are raw bytes; they serialize as (lossily decoded) strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "path")]
pub enum Classification {
    #[serde(rename = "NOT_A_DIRECTIVE")]
    NotADirective,

    #[serde(rename = "SYSTEM_INCLUDE")]
    SystemInclude(#[serde(with = "lossy_bytes")] Vec<u8>),

    #[serde(rename = "LOCAL_INCLUDE")]
    LocalInclude(#[serde(with = "lossy_bytes")] Vec<u8>),
}

impl Classification {
    /// The referenced path, if the line is an include of either kind.
    pub fn path(&self) -> Option<&[u8]> {
        match self {
            Classification::NotADirective => None,
            Classification::SystemInclude(p) | Classification::LocalInclude(p) => Some(p),
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Classification::LocalInclude(_))
    }

    /// Take ownership of the target path of a local include.
    pub fn into_local_path(self) -> Option<Vec<u8>> {
        match self {
            Classification::LocalInclude(p) => Some(p),
            _ => None,
        }
    }
}

impl From<IncludeDirective> for Classification {
    fn from(directive: IncludeDirective) -> Self {
        match directive.kind {
            IncludeKind::Local => Classification::LocalInclude(directive.path),
            IncludeKind::System => Classification::SystemInclude(directive.path),
        }
    }
}

mod lossy_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&String::from_utf8_lossy(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        String::deserialize(deserializer).map(String::into_bytes)
    }
}

/// Why a line was not recognized as an include directive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, thiserror::Error)]
#[serde(tag = "type", content = "detail")]
pub enum NotDirectiveReason {
    /// First non-space byte is not `#`.
    #[serde(rename = "NO_HASH")]
    #[error("line does not start with '#'")]
    NoHash,

    /// A preprocessor line other than `#include`.
    #[serde(rename = "NOT_INCLUDE")]
    #[error("directive is not 'include'")]
    NotInclude,

    /// Line ends right after the `include` keyword.
    #[serde(rename = "MISSING_DELIMITER")]
    #[error("no path after 'include'")]
    MissingDelimiter,

    /// Path opens with something other than `"` or `<`.
    #[serde(rename = "UNKNOWN_DELIMITER")]
    #[error("unexpected path delimiter {}", display_byte(.0))]
    UnknownDelimiter(u8),

    /// Closing delimiter never found before end of line.
    #[serde(rename = "UNTERMINATED")]
    #[error("path is missing its closing {}", display_byte(.0))]
    Unterminated(u8),
}

fn display_byte(byte: &u8) -> String {
    if byte.is_ascii_graphic() {
        format!("'{}'", *byte as char)
    } else {
        format!("'\\x{:02x}'", byte)
    }
}
