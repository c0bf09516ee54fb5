// Schedule review and smart schedule planning

use super::{context, parse_args, Tool, ToolServices};
use crate::protocol::{ParamType, ToolDefinition, ToolResponse};
use anyhow::{Context, Result};
use chrono::Utc;
use jobpilot_core::advisory::{implementation_steps, schedule_suggestions};
use jobpilot_core::types::JobId;
use jobpilot_sdk::api::JobListQuery;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::warn;

const DEFAULT_GOAL: &str = "load_balance";

/// Tool: optimize_schedule
pub struct OptimizeScheduleTool {
    services: ToolServices,
}

impl OptimizeScheduleTool {
    pub fn new(services: ToolServices) -> Self {
        Self { services }
    }
}

#[derive(Debug, Deserialize)]
struct OptimizeArgs {
    #[serde(default)]
    job_ids: Option<Vec<JobId>>,
    #[serde(default)]
    goal: Option<String>,
}

#[async_trait::async_trait]
impl Tool for OptimizeScheduleTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new("optimize_schedule", "Review and optimize the schedules of jobs")
            .required_param("job_ids", ParamType::Array, "IDs of the jobs to optimize")
            .param(
                "goal",
                ParamType::String,
                "Optimization goal: load_balance, performance or cost (default load_balance)",
            )
    }

    async fn execute(&self, arguments: Map<String, Value>) -> Result<ToolResponse> {
        let args: OptimizeArgs = parse_args("optimize_schedule", arguments)?;
        let job_ids: Vec<JobId> = args
            .job_ids
            .unwrap_or_default()
            .into_iter()
            .filter(|id| !id.is_empty())
            .collect();
        if job_ids.is_empty() {
            return Ok(ToolResponse::failure("job_ids is required"));
        }
        let goal = args.goal.unwrap_or_else(|| DEFAULT_GOAL.to_string());

        let api = self.services.api.jobs();
        let mut jobs = Vec::with_capacity(job_ids.len());
        for job_id in &job_ids {
            match api.get(job_id).await {
                Ok(job) => jobs.push(job),
                Err(e) => warn!(job_id = %job_id, error = %e, "Skipping job that could not be fetched"),
            }
        }

        if jobs.is_empty() {
            return Ok(ToolResponse::failure("No valid jobs found"));
        }

        let system_stats = self
            .services
            .api
            .stats()
            .dashboard()
            .await
            .context("Failed to fetch dashboard stats")?;

        let now = Utc::now();
        let optimization_context = context([
            ("jobs", serde_json::to_value(&jobs)?),
            ("optimization_goal", Value::String(goal.clone())),
            ("system_stats", system_stats),
            ("current_time", Value::String(now.to_rfc3339())),
        ]);

        let prompt = format!(
            "Create an optimal schedule for these jobs with the goal of {}. Consider system load, \
             job dependencies, and execution time distribution.",
            goal
        );
        let ai_recommendations = self
            .services
            .reasoner
            .analyze(&prompt, Some(&optimization_context))
            .await;

        Ok(ToolResponse::success(json!({
            "optimization_goal": goal,
            "analyzed_jobs": jobs.len(),
            "ai_recommendations": ai_recommendations,
            "suggested_schedules": schedule_suggestions(&jobs, &goal, now),
        })))
    }
}

/// Tool: create_smart_schedule
pub struct CreateSmartScheduleTool {
    services: ToolServices,
}

impl CreateSmartScheduleTool {
    pub fn new(services: ToolServices) -> Self {
        Self { services }
    }
}

#[derive(Debug, Deserialize)]
struct SmartScheduleArgs {
    #[serde(default)]
    requirements: Option<Map<String, Value>>,
    #[serde(default)]
    constraints: Option<Map<String, Value>>,
}

#[async_trait::async_trait]
impl Tool for CreateSmartScheduleTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "create_smart_schedule",
            "Create a scheduling plan from requirements and constraints",
        )
        .param("requirements", ParamType::Object, "Job requirements")
        .param("constraints", ParamType::Object, "Scheduling constraints")
    }

    async fn execute(&self, arguments: Map<String, Value>) -> Result<ToolResponse> {
        let args: SmartScheduleArgs = parse_args("create_smart_schedule", arguments)?;

        let system_state = self
            .services
            .api
            .stats()
            .dashboard()
            .await
            .context("Failed to fetch dashboard stats")?;
        let existing_jobs = self
            .services
            .api
            .jobs()
            .list(&JobListQuery::default())
            .await
            .context("Failed to list jobs")?;

        let schedule_context = context([
            ("requirements", Value::Object(args.requirements.unwrap_or_default())),
            ("constraints", Value::Object(args.constraints.unwrap_or_default())),
            ("system_state", system_state),
            ("existing_jobs", serde_json::to_value(&existing_jobs)?),
        ]);

        let ai_generated_schedule = self
            .services
            .reasoner
            .analyze(
                "Based on the current system state and the requirements and constraints, \
                 create an intelligent job scheduling plan.",
                Some(&schedule_context),
            )
            .await;

        Ok(ToolResponse::success(json!({
            "schedule_context": schedule_context,
            "ai_generated_schedule": ai_generated_schedule,
            "implementation_steps": implementation_steps(),
        })))
    }
}
