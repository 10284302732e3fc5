//! Concrete generation service drivers.
//!
//! Each driver implements [`GenerationBackend`](crate::generation::GenerationBackend)
//! and is responsible for telling "model not found" apart from every other
//! upstream failure.

mod gemini;

pub use gemini::GeminiBackend;

/// Standard error class for an HTTP status, used in `Error::Remote`.
pub(crate) fn error_class_for_status(status: u16) -> &'static str {
    match status {
        400 => "invalid_request",
        401 => "authentication",
        403 => "permission_denied",
        404 => "not_found",
        408 | 504 => "timeout",
        409 => "conflict",
        413 => "request_too_large",
        429 => "rate_limited",
        500 => "server_error",
        503 | 529 => "overloaded",
        _ => "http_error",
    }
}
