//! Analysis result types.

use serde::{Deserialize, Serialize};

/// Ordered quality tiers, derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    Emerging,
    Good,
    #[serde(rename = "High Growth")]
    HighGrowth,
    Excellent,
}

impl Label {
    /// Fixed thresholds: 90 / 82 / 74.
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Label::Excellent
        } else if score >= 82.0 {
            Label::HighGrowth
        } else if score >= 74.0 {
            Label::Good
        } else {
            Label::Emerging
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Excellent => "Excellent",
            Label::HighGrowth => "High Growth",
            Label::Good => "Good",
            Label::Emerging => "Emerging",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Metro,
    Hospital,
    School,
    Mall,
    Park,
    Office,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Metro,
        Category::Hospital,
        Category::School,
        Category::Mall,
        Category::Park,
        Category::Office,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Metro => "Metro",
            Category::Hospital => "Hospital",
            Category::School => "School",
            Category::Mall => "Mall",
            Category::Park => "Park",
            Category::Office => "Office",
        }
    }

    /// Map free-text categories onto the closed vocabulary. Unrecognized
    /// text becomes `Office`.
    pub fn coerce(raw: &str) -> Self {
        let lower = raw.trim().to_lowercase();
        if let Some(exact) = Self::ALL.iter().find(|c| c.as_str().to_lowercase() == lower) {
            return *exact;
        }
        const KEYWORDS: &[(&str, Category)] = &[
            ("metro", Category::Metro),
            ("rail", Category::Metro),
            ("station", Category::Metro),
            ("transit", Category::Metro),
            ("hospital", Category::Hospital),
            ("clinic", Category::Hospital),
            ("medical", Category::Hospital),
            ("health", Category::Hospital),
            ("school", Category::School),
            ("college", Category::School),
            ("university", Category::School),
            ("education", Category::School),
            ("mall", Category::Mall),
            ("shopping", Category::Mall),
            ("market", Category::Mall),
            ("retail", Category::Mall),
            ("park", Category::Park),
            ("garden", Category::Park),
            ("lake", Category::Park),
        ];
        KEYWORDS
            .iter()
            .find(|(kw, _)| lower.contains(kw))
            .map(|(_, c)| *c)
            .unwrap_or(Category::Office)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five weighted sub-scores, each in [0, 100] with one decimal.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Breakdown {
    pub connectivity: f64,
    pub healthcare: f64,
    pub education: f64,
    pub retail: f64,
    pub employment: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfrastructureItem {
    pub name: String,
    pub category: Category,
    /// Kilometres, two decimals.
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub city: String,
    pub sector: String,
    pub overall_score: f64,
    pub label: Label,
    pub breakdown: Breakdown,
    pub infrastructure: Vec<InfrastructureItem>,
    pub summary: String,
}
