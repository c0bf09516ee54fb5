//! # Jobpilot SDK
//!
//! Clients for the two remote services Jobpilot orchestrates: the Go-Job
//! scheduling REST API and the DashScope text-generation service.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use jobpilot_sdk::{SchedulerClient, SdkResult};
//! use jobpilot_sdk::api::JobListQuery;
//!
//! #[tokio::main]
//! async fn main() -> SdkResult<()> {
//!     let client = SchedulerClient::builder()
//!         .base_url("http://localhost:8080/api/v1")
//!         .auth_token("token")
//!         .build()?;
//!
//!     let jobs = client.jobs().list(&JobListQuery::with_limit(10)).await?;
//!     println!("Found {} jobs", jobs.len());
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod reasoning;
pub mod transport;

// Re-export main clients
pub use client::{SchedulerClient, SchedulerClientBuilder};
pub use config::{ClientConfig, ReasoningConfig};
pub use error::{SdkError, SdkResult};
pub use reasoning::{DashScopeClient, Reasoner};
pub use transport::HttpMethod;

// Re-export core types for convenience
pub use jobpilot_core::types::{AnalysisContext, Execution, Job, JobId};
