//! HTTP plumbing shared by generation drivers.

mod http;

pub use http::{HttpReply, HttpTransport};
