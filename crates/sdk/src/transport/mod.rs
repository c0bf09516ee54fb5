//! Transport layer for the Jobpilot SDK.

pub mod http;

pub use http::{HttpMethod, HttpTransport};
