//! # market-potential
//!
//! 房产"市场潜力"评分的请求去重与缓存门面。
//!
//! Request-dedup and caching façade for generated real-estate market
//! potential scores.
//!
//! ## Overview
//!
//! A caller submits a `(city, sector)` pair and later fetches the outcome by
//! id. Identical pairs (ignoring case and surrounding whitespace) share one
//! id and one record. The first fetch of a pending record runs validation,
//! an ambiguity check and the analysis itself; every later fetch returns the
//! stored terminal record unchanged.
//!
//! - **Deterministic**: ids are hashes of the normalized key, and every
//!   generation call is seeded from the key and its purpose.
//! - **Cached**: verdicts and analyses live in a two-tier TTL cache with a
//!   pluggable durable store.
//! - **Always terminal**: upstream faults degrade to a fallback estimate, never
//!   to a stuck `pending` record.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use market_potential::{AppConfig, OrchestratorBuilder};
//!
//! #[tokio::main]
//! async fn main() -> market_potential::Result<()> {
//!     let config = AppConfig::from_env()?;
//!     let orchestrator = OrchestratorBuilder::from_config(&config)?.build().await?;
//!
//!     let submitted = orchestrator.submit("Pune", "Baner")?;
//!     let record = orchestrator.fetch(&submitted.id).await?;
//!     println!("{}", serde_json::to_string_pretty(&record)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`orchestrator`] | Submit/fetch state machine and request store |
//! | [`guardrails`] | Local and remote input validation |
//! | [`ambiguity`] | Locality-in-several-cities check |
//! | [`analysis`] | Result types, normalization and fallback |
//! | [`cache`] | Key normalization and two-tier TTL cache |
//! | [`generation`] | Model-candidate fallback and deterministic sampling |
//! | [`drivers`] | Concrete generation services (Gemini) |
//! | [`config`] | YAML and environment configuration |

pub mod ambiguity;
pub mod analysis;
pub mod cache;
pub mod config;
pub mod drivers;
pub mod error_code;
pub mod generation;
pub mod guardrails;
pub mod orchestrator;
pub mod structured;
pub mod transport;

// Re-export main types for convenience
pub use analysis::{AnalysisResult, Label};
pub use cache::RequestKey;
pub use config::AppConfig;
pub use error_code::ApiErrorCode;
pub use orchestrator::{
    HealthStatus, Orchestrator, OrchestratorBuilder, RequestRecord, RequestStatus, SubmitResponse,
};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
