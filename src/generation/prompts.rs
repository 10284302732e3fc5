//! Per-purpose prompts and response schemas.
//!
//! Prompts are built from the user's city and sector only, so the same
//! request key always produces the same prompt text.

use crate::analysis::{Category, MAX_INFRASTRUCTURE, MIN_INFRASTRUCTURE};
use crate::structured::{schema_from_type_name, SchemaGenerator};
use serde_json::{json, Value};

pub fn validation_prompt(city: &str, sector: &str) -> String {
    format!(
        "You check user input for a real-estate analysis tool covering Indian cities.\n\
         City: \"{city}\"\n\
         Locality/sector: \"{sector}\"\n\
         Decide whether both look like plausible real place names. Tolerate minor \
         misspellings, abbreviations and unusual capitalisation. Reject clear gibberish, \
         keyboard mashing, or text that is obviously not a place.\n\
         Respond with JSON: {{\"isValid\": boolean, \"reason\": string}}."
    )
}

pub fn validation_schema() -> Value {
    SchemaGenerator::new()
        .require("isValid", schema_from_type_name("boolean"))
        .require("reason", schema_from_type_name("string"))
        .build()
}

pub fn ambiguity_prompt(city: &str, sector: &str) -> String {
    format!(
        "A user asked about the locality \"{sector}\" in \"{city}\", India.\n\
         Is a locality, sector or neighbourhood with this exact name well known to exist \
         in more than one Indian city? If so, list every city where it exists.\n\
         Respond with JSON: {{\"isAmbiguous\": boolean, \"suggestedCities\": string[]}}. \
         Use an empty list when the name is not ambiguous."
    )
}

pub fn ambiguity_schema() -> Value {
    SchemaGenerator::new()
        .require("isAmbiguous", schema_from_type_name("boolean"))
        .require("suggestedCities", schema_from_type_name("array"))
        .build()
}

pub fn analysis_prompt(city: &str, sector: &str) -> String {
    let categories = Category::ALL
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "You are a real-estate market analyst. Assess the market potential of the \
         locality \"{sector}\" in \"{city}\", India.\n\
         Score each dimension from 0 to 100: connectivity, healthcare, education, retail, \
         employment.\n\
         List between {MIN_INFRASTRUCTURE} and {MAX_INFRASTRUCTURE} real, named infrastructure \
         landmarks near the locality. Each needs a specific proper name (not a generic \
         label), a category from [{categories}], and the distance in kilometres.\n\
         Finish with a two or three sentence summary of the locality's growth outlook.\n\
         Respond with JSON matching the provided schema."
    )
}

pub fn analysis_schema() -> Value {
    let score = || schema_from_type_name("number");
    let breakdown = SchemaGenerator::new()
        .require("connectivity", score())
        .require("healthcare", score())
        .require("education", score())
        .require("retail", score())
        .require("employment", score())
        .build();
    let item = SchemaGenerator::new()
        .require("name", schema_from_type_name("string"))
        .require(
            "category",
            json!({
                "type": "STRING",
                "enum": Category::ALL.iter().map(|c| c.as_str()).collect::<Vec<_>>(),
            }),
        )
        .require("distance", schema_from_type_name("number"))
        .build();
    SchemaGenerator::new()
        .add_property("overallScore", score())
        .require("breakdown", breakdown)
        .require("infrastructure", json!({"type": "ARRAY", "items": item}))
        .require("summary", schema_from_type_name("string"))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_embed_inputs_verbatim() {
        assert!(validation_prompt("Pune", "Baner").contains("\"Baner\""));
        assert!(ambiguity_prompt("Pune", "Baner").contains("\"Baner\" in \"Pune\""));
        let analysis = analysis_prompt("Pune", "Baner");
        assert!(analysis.contains("between 5 and 8"));
        assert!(analysis.contains("Metro, Hospital, School, Mall, Park, Office"));
    }

    #[test]
    fn test_analysis_schema_shape() {
        let schema = analysis_schema();
        assert_eq!(
            schema["properties"]["breakdown"]["required"],
            json!(["connectivity", "healthcare", "education", "retail", "employment"])
        );
        assert_eq!(
            schema["properties"]["infrastructure"]["items"]["properties"]["category"]["enum"][0],
            "Metro"
        );
        assert_eq!(
            schema["required"],
            json!(["breakdown", "infrastructure", "summary"])
        );
    }

    #[test]
    fn test_small_schemas() {
        assert_eq!(validation_schema()["properties"]["isValid"]["type"], "BOOLEAN");
        assert_eq!(
            ambiguity_schema()["properties"]["suggestedCities"]["type"],
            "ARRAY"
        );
    }
}
