//! JSON extraction from model responses.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static JSON_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"```json\s*([\s\S]*?)\s*```",
        r"```\s*([\s\S]*?)\s*```",
        r"\{[\s\S]*\}",
        r"\[[\s\S]*\]",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

/// Raw model text plus the JSON recovered from it, if any.
#[derive(Debug, Clone)]
pub struct StructuredOutput {
    pub raw: String,
    pub parsed: Option<Value>,
}

impl StructuredOutput {
    pub fn from_response(content: impl Into<String>) -> Self {
        let raw = content.into();
        let parsed = Self::parse_json(raw.trim());
        Self { raw, parsed }
    }

    pub fn parsed(&self) -> Option<&Value> {
        self.parsed.as_ref()
    }

    pub fn into_parsed(self) -> Option<Value> {
        self.parsed
    }

    /// Parse JSON from text, with support for markdown code blocks.
    ///
    /// Extracts JSON from common formats:
    /// - Raw JSON object
    /// - ```json ... ``` code blocks
    /// - ``` ... ``` code blocks
    /// - Text containing JSON objects/arrays
    fn parse_json(text: &str) -> Option<Value> {
        if let Ok(parsed) = serde_json::from_str::<Value>(text) {
            return Some(parsed);
        }

        for re in JSON_PATTERNS.iter() {
            if let Some(captures) = re.captures(text) {
                let candidate = match captures.get(1) {
                    Some(inner) => inner.as_str(),
                    None => captures.get(0).map(|c| c.as_str()).unwrap_or(text),
                };

                if let Ok(parsed) = serde_json::from_str::<Value>(candidate.trim()) {
                    return Some(parsed);
                }
            }
        }

        None
    }
}
