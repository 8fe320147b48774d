//! Directive classifier for `#include` lines.
//!
//! Decides, one line at a time, whether a line is a local include
//! (`#include "path"`), a system include (`#include <path>`), or ordinary
//! text. This is a line heuristic, not a preprocessor: an `#include` inside
//! a multi-line comment or string literal is still classified by its text.

mod parser;
mod result;

pub use parser::parse_include;
pub use result::{Classification, IncludeDirective, IncludeKind, NotDirectiveReason};

use serde::{Deserialize, Serialize};

/// Classify a single line.
///
/// The line is only borrowed; classifying has no effect on it, so calling
/// this twice on the same line gives the same answer.
pub fn classify(line: &[u8]) -> Classification {
    match parse_include(line) {
        Ok(directive) => directive.into(),
        Err(_) => Classification::NotADirective,
    }
}

/// Classification of a line together with the reason it was rejected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Explanation {
    /// The classified line (lossily decoded).
    pub line: String,

    pub classification: Classification,

    /// Why the line is not a directive. None when it is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<NotDirectiveReason>,
}

impl Explanation {
    /// Whether the line looked like a preprocessor line at all.
    pub fn is_candidate(&self) -> bool {
        self.reason != Some(NotDirectiveReason::NoHash)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_human(&self) -> String {
        match (&self.classification, &self.reason) {
            (Classification::LocalInclude(p), _) => {
                format!("{}\n  -> local include \"{}\"", self.line, String::from_utf8_lossy(p))
            }
            (Classification::SystemInclude(p), _) => {
                format!("{}\n  -> system include <{}>", self.line, String::from_utf8_lossy(p))
            }
            (Classification::NotADirective, Some(reason)) => {
                format!("{}\n  -> not a directive: {}", self.line, reason)
            }
            (Classification::NotADirective, None) => format!("{}\n  -> not a directive", self.line),
        }
    }
}

/// Classify a line and keep the reason for a rejection.
pub fn explain(line: &[u8]) -> Explanation {
    let (classification, reason) = match parse_include(line) {
        Ok(directive) => (directive.into(), None),
        Err(reason) => (Classification::NotADirective, Some(reason)),
    };

    Explanation {
        line: String::from_utf8_lossy(line).into_owned(),
        classification,
        reason,
    }
}
