//! Structured output helpers.
//!
//! - [`SchemaGenerator`]: build response schemas in the generation service's
//!   OpenAPI-subset dialect
//! - [`StructuredOutput`]: parse model text into JSON, tolerating markdown
//!   fences and surrounding prose
//!
//! # Examples
//!
//! ```
//! use market_potential::structured::StructuredOutput;
//!
//! let output = StructuredOutput::from_response("```json\n{\"isValid\": true}\n```");
//! assert_eq!(output.parsed().unwrap()["isValid"], true);
//! ```

pub mod json_mode;
pub mod schema;

pub use json_mode::StructuredOutput;
pub use schema::{schema_from_type_name, SchemaGenerator};
