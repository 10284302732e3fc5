//! Client-facing error vocabulary.
//!
//! The submit/fetch contract reports problems with a small, fixed set of
//! codes. Transport layers map them onto their own status conventions using
//! [`ApiErrorCode::http_status`].
//!
//! | Code                     | Raised when                                         |
//! |--------------------------|-----------------------------------------------------|
//! | `missing_required_field` | submit without a usable city or sector              |
//! | `id_not_found`           | fetch for an id that was never submitted            |
//! | `invalid_input`          | the record ended in `invalid_input`                 |
//! | `needs_clarification`    | the record ended in `needs_clarification`           |
//! | `internal_fallback_used` | the record is `done` but carries a fallback analysis |
//!
//! ## Example
//!
//! ```rust
//! use market_potential::error_code::ApiErrorCode;
//!
//! let code = ApiErrorCode::from_name("id_not_found").unwrap();
//! assert_eq!(code.http_status(), 404);
//! assert!(code.is_client_error());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorCode {
    MissingRequiredField,
    IdNotFound,
    InvalidInput,
    NeedsClarification,
    InternalFallbackUsed,
}

impl ApiErrorCode {
    /// Returns the stable wire name (e.g., `"id_not_found"`).
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::MissingRequiredField => "missing_required_field",
            Self::IdNotFound => "id_not_found",
            Self::InvalidInput => "invalid_input",
            Self::NeedsClarification => "needs_clarification",
            Self::InternalFallbackUsed => "internal_fallback_used",
        }
    }

    /// Default human-readable message for this code.
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingRequiredField => "city and sector are required",
            Self::IdNotFound => "no request exists with this id",
            Self::InvalidInput => "the city or sector does not look like a real place name",
            Self::NeedsClarification => "the sector exists in several cities; resubmit with one of the suggested cities",
            Self::InternalFallbackUsed => "the analysis service was unavailable; a fallback estimate was returned",
        }
    }

    /// Suggested HTTP status for transports that need one.
    ///
    /// Terminal-state codes are informational and travel with a 200: the
    /// caller always receives a terminal record.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::MissingRequiredField => 400,
            Self::IdNotFound => 404,
            Self::InvalidInput | Self::NeedsClarification | Self::InternalFallbackUsed => 200,
        }
    }

    /// Errors raised before a request enters the store.
    #[inline]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MissingRequiredField | Self::IdNotFound)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let code = match name {
            "missing_required_field" => Self::MissingRequiredField,
            "id_not_found" => Self::IdNotFound,
            "invalid_input" => Self::InvalidInput,
            "needs_clarification" => Self::NeedsClarification,
            "internal_fallback_used" => Self::InternalFallbackUsed,
            _ => return None,
        };
        Some(code)
    }
}

impl fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
