//! Validation verdicts.

use serde::{Deserialize, Serialize};

pub const UNAVAILABLE_REASON: &str = "validation unavailable";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationVerdict {
    pub is_valid: bool,
    pub reason: String,
}

impl ValidationVerdict {
    pub fn valid(reason: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            reason: reason.into(),
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            reason: reason.into(),
        }
    }

    /// Fail-open verdict used when the remote check cannot run.
    pub fn unavailable() -> Self {
        Self::valid(UNAVAILABLE_REASON)
    }
}
