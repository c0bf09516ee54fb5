//! Scheduling tools exposed over the protocol channel.

mod insights;
mod jobs;
mod registry;
mod schedule;

pub use insights::{GetRecommendationsTool, PredictResourceUsageTool};
pub use jobs::{AnalyzeJobPerformanceTool, ListJobsTool};
pub use registry::{Tool, ToolRegistry};
pub use schedule::{CreateSmartScheduleTool, OptimizeScheduleTool};

use anyhow::{Context, Result};
use jobpilot_core::types::AnalysisContext;
use jobpilot_sdk::{Reasoner, SchedulerClient};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Remote services shared by every tool.
#[derive(Clone)]
pub struct ToolServices {
    pub api: SchedulerClient,
    pub reasoner: Arc<dyn Reasoner>,
}

impl ToolServices {
    pub fn new(api: SchedulerClient, reasoner: Arc<dyn Reasoner>) -> Self {
        Self { api, reasoner }
    }
}

/// The six scheduling tools, in the order `tools/list` reports them.
pub fn default_registry(services: ToolServices) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(ListJobsTool::new(services.clone())));
    registry.register(Arc::new(AnalyzeJobPerformanceTool::new(services.clone())));
    registry.register(Arc::new(OptimizeScheduleTool::new(services.clone())));
    registry.register(Arc::new(PredictResourceUsageTool::new(services.clone())));
    registry.register(Arc::new(GetRecommendationsTool::new(services.clone())));
    registry.register(Arc::new(CreateSmartScheduleTool::new(services)));
    registry
}

pub(crate) fn parse_args<T: DeserializeOwned>(tool: &str, arguments: Map<String, Value>) -> Result<T> {
    serde_json::from_value(Value::Object(arguments))
        .with_context(|| format!("Invalid arguments for {}", tool))
}

pub(crate) fn context<const N: usize>(entries: [(&str, Value); N]) -> AnalysisContext {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}
