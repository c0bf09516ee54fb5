// Job listing and per-job performance analysis

use super::{context, parse_args, Tool, ToolServices};
use crate::protocol::{ParamType, ToolDefinition, ToolResponse};
use anyhow::{Context, Result};
use jobpilot_core::advisory::performance_recommendations;
use jobpilot_core::types::JobId;
use jobpilot_core::{ExecutionMetrics, JobSummary};
use jobpilot_sdk::api::{ExecutionQuery, JobListQuery};
use serde::Deserialize;
use serde_json::{json, Map, Value};

const DEFAULT_LIST_LIMIT: u32 = 10;
const DEFAULT_ANALYSIS_DAYS: u32 = 7;
const RECENT_EXECUTIONS: usize = 10;

/// Tool: list_jobs
pub struct ListJobsTool {
    services: ToolServices,
}

impl ListJobsTool {
    pub fn new(services: ToolServices) -> Self {
        Self { services }
    }
}

#[derive(Debug, Deserialize)]
struct ListJobsArgs {
    #[serde(default)]
    department_id: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    limit: Option<u32>,
}

#[async_trait::async_trait]
impl Tool for ListJobsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new("list_jobs", "List the jobs known to the scheduling system")
            .param("department_id", ParamType::String, "Department ID (optional)")
            .param("status", ParamType::String, "Job status (optional)")
            .param("limit", ParamType::Integer, "Maximum number of jobs to return (default 10)")
    }

    async fn execute(&self, arguments: Map<String, Value>) -> Result<ToolResponse> {
        let args: ListJobsArgs = parse_args("list_jobs", arguments)?;
        let query = JobListQuery {
            department_id: args.department_id.filter(|d| !d.is_empty()),
            status: args.status.filter(|s| !s.is_empty()),
            limit: Some(args.limit.unwrap_or(DEFAULT_LIST_LIMIT)),
        };

        let jobs = self
            .services
            .api
            .jobs()
            .list(&query)
            .await
            .context("Failed to list jobs")?;
        let summary = JobSummary::from_jobs(&jobs);

        Ok(ToolResponse::success(json!({
            "jobs": jobs,
            "summary": summary,
        })))
    }
}

/// Tool: analyze_job_performance
pub struct AnalyzeJobPerformanceTool {
    services: ToolServices,
}

impl AnalyzeJobPerformanceTool {
    pub fn new(services: ToolServices) -> Self {
        Self { services }
    }
}

#[derive(Debug, Deserialize)]
struct AnalyzeArgs {
    #[serde(default)]
    job_id: Option<JobId>,
    #[serde(default)]
    days: Option<u32>,
    #[serde(default)]
    metric: Option<String>,
}

#[async_trait::async_trait]
impl Tool for AnalyzeJobPerformanceTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "analyze_job_performance",
            "Analyze the execution performance of a job",
        )
        .required_param("job_id", ParamType::String, "Job ID")
        .param("days", ParamType::Integer, "Days of history to analyze (default 7)")
        .param("metric", ParamType::String, "Metric to focus on (default all)")
    }

    async fn execute(&self, arguments: Map<String, Value>) -> Result<ToolResponse> {
        let args: AnalyzeArgs = parse_args("analyze_job_performance", arguments)?;
        let job_id = match args.job_id.filter(|id| !id.is_empty()) {
            Some(job_id) => job_id,
            None => return Ok(ToolResponse::failure("job_id is required")),
        };
        let days = args.days.unwrap_or(DEFAULT_ANALYSIS_DAYS);
        let metric = args.metric.unwrap_or_else(|| "all".to_string());

        let jobs = self.services.api.jobs();
        let job = jobs
            .get(&job_id)
            .await
            .with_context(|| format!("Failed to fetch job {}", job_id))?;
        let executions = jobs
            .executions(
                &job_id,
                &ExecutionQuery {
                    days: Some(days),
                    limit: None,
                },
            )
            .await
            .with_context(|| format!("Failed to fetch executions of job {}", job_id))?;

        let metrics = ExecutionMetrics::from_executions(&executions)?;
        let recent: Vec<_> = executions.iter().take(RECENT_EXECUTIONS).collect();

        let analysis_context = context([
            ("job_info", serde_json::to_value(&job)?),
            ("performance_metrics", serde_json::to_value(&metrics)?),
            ("recent_executions", serde_json::to_value(&recent)?),
        ]);

        let prompt = format!(
            "Analyze this scheduled job's performance over the past {} days and provide \
             optimization recommendations. Focus on the {} metrics.",
            days, metric
        );
        let ai_analysis = self
            .services
            .reasoner
            .analyze(&prompt, Some(&analysis_context))
            .await;

        Ok(ToolResponse::success(json!({
            "job_id": job_id,
            "analysis_period_days": days,
            "metrics": metrics,
            "ai_analysis": ai_analysis,
            "recommendations": performance_recommendations(&metrics),
        })))
    }
}
