//! Local input rules.
//!
//! Each rule inspects one trimmed field value and names the problem it found.
//! None of them call out to the generation service.

use once_cell::sync::Lazy;
use regex::Regex;

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]{5,}").expect("valid regex"));
static ALLOWED_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9 ,.'\-]+$").expect("valid regex"));

pub const MIN_FIELD_CHARS: usize = 2;
pub const MAX_REPEATED_LETTERS: usize = 3;
pub const MAX_VOWELLESS_LETTERS: usize = 4;

/// A local check over a single field.
pub trait InputRule: Send + Sync {
    /// Reason fragment when `value` breaks the rule.
    fn check(&self, value: &str) -> Option<String>;
    fn name(&self) -> &'static str;
}

pub struct MinLengthRule;

impl InputRule for MinLengthRule {
    fn check(&self, value: &str) -> Option<String> {
        if value.is_empty() {
            Some("is empty".into())
        } else if value.chars().count() < MIN_FIELD_CHARS {
            Some(format!("is shorter than {} characters", MIN_FIELD_CHARS))
        } else {
            None
        }
    }
    fn name(&self) -> &'static str {
        "min_length"
    }
}

pub struct CharsetRule;

impl InputRule for CharsetRule {
    fn check(&self, value: &str) -> Option<String> {
        (!ALLOWED_CHARS.is_match(value)).then(|| "contains unsupported characters".to_string())
    }
    fn name(&self) -> &'static str {
        "charset"
    }
}

pub struct DigitRunRule;

impl InputRule for DigitRunRule {
    fn check(&self, value: &str) -> Option<String> {
        DIGIT_RUN
            .is_match(value)
            .then(|| "contains a run of 5 or more digits".to_string())
    }
    fn name(&self) -> &'static str {
        "digit_run"
    }
}

/// The same letter four or more times in a row ("aaaa"), case-insensitive.
pub struct RepeatedLetterRule;

impl InputRule for RepeatedLetterRule {
    fn check(&self, value: &str) -> Option<String> {
        let mut previous = None;
        let mut run = 0usize;
        for c in value.chars().map(|c| c.to_ascii_lowercase()) {
            if c.is_ascii_alphabetic() && Some(c) == previous {
                run += 1;
            } else {
                run = 1;
            }
            previous = Some(c);
            if c.is_ascii_alphabetic() && run > MAX_REPEATED_LETTERS {
                return Some(format!(
                    "repeats the letter '{}' {} or more times",
                    c,
                    MAX_REPEATED_LETTERS + 1
                ));
            }
        }
        None
    }
    fn name(&self) -> &'static str {
        "repeated_letter"
    }
}

/// Letters only (spaces ignored), longer than four, and no vowel at all.
pub struct VowellessRule;

impl InputRule for VowellessRule {
    fn check(&self, value: &str) -> Option<String> {
        let letters: String = value.chars().filter(|c| *c != ' ').collect();
        if letters.len() <= MAX_VOWELLESS_LETTERS
            || !letters.chars().all(|c| c.is_ascii_alphabetic())
        {
            return None;
        }
        let has_vowel = letters
            .chars()
            .any(|c| matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u'));
        (!has_vowel).then(|| "has no vowels".to_string())
    }
    fn name(&self) -> &'static str {
        "vowelless"
    }
}

/// Rules in evaluation order; the first failure wins.
pub fn default_rules() -> Vec<Box<dyn InputRule>> {
    vec![
        Box::new(MinLengthRule),
        Box::new(CharsetRule),
        Box::new(DigitRunRule),
        Box::new(RepeatedLetterRule),
        Box::new(VowellessRule),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_length() {
        assert!(MinLengthRule.check("").is_some());
        assert!(MinLengthRule.check("a").is_some());
        assert!(MinLengthRule.check("Ab").is_none());
    }

    #[test]
    fn test_charset() {
        assert!(CharsetRule.check("Sector 62, Noida").is_none());
        assert!(CharsetRule.check("D'Souza Colony").is_none());
        assert!(CharsetRule.check("Koregaon-Park.").is_none());
        assert!(CharsetRule.check("Baner!").is_some());
        assert!(CharsetRule.check("<script>").is_some());
    }

    #[test]
    fn test_digit_run() {
        assert!(DigitRunRule.check("asdkjasdkj12345").is_some());
        assert!(DigitRunRule.check("Sector 1234").is_none());
        assert!(DigitRunRule.check("Phase 2 411045").is_some());
    }

    #[test]
    fn test_repeated_letters() {
        assert!(RepeatedLetterRule.check("Baaaaner").is_some());
        assert!(RepeatedLetterRule.check("BaAAAAner").is_some());
        assert!(RepeatedLetterRule.check("Baaaaner").unwrap().contains("'a'"));
        assert!(RepeatedLetterRule.check("Shahhh").is_none());
        assert!(RepeatedLetterRule.check("Sector 1111").is_none());
    }

    #[test]
    fn test_vowelless() {
        assert!(VowellessRule.check("xkcdqz").is_some());
        assert!(VowellessRule.check("bcd fgh").is_some());
        assert!(VowellessRule.check("Pune").is_none());
        assert!(VowellessRule.check("NCR").is_none());
        assert!(VowellessRule.check("DLF Ph 2").is_none());
    }
}
