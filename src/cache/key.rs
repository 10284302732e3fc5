//! Request key normalization and deterministic seeding.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Separator between the normalized city and sector.
pub const KEY_SEPARATOR: &str = "::";

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Canonical `city::sector` lookup key.
///
/// Both halves are trimmed and lower-cased, so inputs that differ only by
/// case or surrounding whitespace share one key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestKey(String);

impl RequestKey {
    pub fn new(city: &str, sector: &str) -> Self {
        Self(format!(
            "{}{}{}",
            city.trim().to_lowercase(),
            KEY_SEPARATOR,
            sector.trim().to_lowercase()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Stable record id: lowercase hex SHA-256 of the key.
    pub fn request_id(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.0.as_bytes());
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }

    /// 32-bit FNV-1a over `"<purpose>::<key>"`.
    pub fn seed(&self, purpose: Purpose) -> u32 {
        fnv1a_32(format!("{}{}{}", purpose.as_str(), KEY_SEPARATOR, self.0).as_bytes())
    }
}

impl std::fmt::Display for RequestKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why a generation call is being made. Each purpose gets its own seed
/// stream for the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Purpose {
    Validation,
    Ambiguity,
    Analysis,
    Fallback,
}

impl Purpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Purpose::Validation => "validation",
            Purpose::Ambiguity => "ambiguity",
            Purpose::Analysis => "analysis",
            Purpose::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for Purpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn fnv1a_32(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, b| {
        (hash ^ u32::from(*b)).wrapping_mul(FNV_PRIME)
    })
}
