// Core types and local analysis for the Jobpilot scheduling assistant

pub mod advisory;
pub mod metrics;
pub mod types;

pub use metrics::{ExecutionMetrics, JobSummary, MetricsError};
pub use types::*;
