// Resource forecasts and optimization recommendations

use super::{context, parse_args, Tool, ToolServices};
use crate::protocol::{ParamType, ToolDefinition, ToolResponse};
use anyhow::{Context, Result};
use chrono::Utc;
use jobpilot_core::advisory::{extract_actionable_items, ResourceTrends};
use jobpilot_core::types::{AnalysisContext, JobId};
use jobpilot_sdk::api::{ExecutionQuery, JobListQuery};
use serde::Deserialize;
use serde_json::{json, Map, Value};

const DEFAULT_PREDICTION_HOURS: u32 = 24;
const SINGLE_JOB_EXECUTION_LIMIT: u32 = 20;
const SYSTEM_JOB_LIMIT: u32 = 100;

/// Tool: predict_resource_usage
pub struct PredictResourceUsageTool {
    services: ToolServices,
}

impl PredictResourceUsageTool {
    pub fn new(services: ToolServices) -> Self {
        Self { services }
    }
}

#[derive(Debug, Deserialize)]
struct PredictArgs {
    #[serde(default)]
    hours: Option<u32>,
    #[serde(default)]
    granularity: Option<String>,
}

#[async_trait::async_trait]
impl Tool for PredictResourceUsageTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new("predict_resource_usage", "Predict system resource usage")
            .param("hours", ParamType::Integer, "Hours to predict ahead (default 24)")
            .param("granularity", ParamType::String, "Prediction granularity: hour or day (default hour)")
    }

    async fn execute(&self, arguments: Map<String, Value>) -> Result<ToolResponse> {
        let args: PredictArgs = parse_args("predict_resource_usage", arguments)?;
        let hours = args.hours.unwrap_or(DEFAULT_PREDICTION_HOURS);
        let granularity = args.granularity.unwrap_or_else(|| "hour".to_string());

        let stats = self.services.api.stats();
        let current_stats = stats
            .dashboard()
            .await
            .context("Failed to fetch dashboard stats")?;
        let worker_stats = stats.workers().await.context("Failed to fetch worker stats")?;
        let job_stats = stats.jobs().await.context("Failed to fetch job stats")?;

        let prediction_context = context([
            ("prediction_period_hours", json!(hours)),
            ("granularity", Value::String(granularity.clone())),
            ("current_stats", current_stats),
            ("worker_stats", worker_stats),
            ("job_stats", job_stats),
            ("timestamp", Value::String(Utc::now().to_rfc3339())),
        ]);

        let prompt = format!(
            "Based on historical data, predict system resource usage for the next {} hours \
             at {} granularity.",
            hours, granularity
        );
        let ai_prediction = self
            .services
            .reasoner
            .analyze(&prompt, Some(&prediction_context))
            .await;

        Ok(ToolResponse::success(json!({
            "prediction_period_hours": hours,
            "granularity": granularity,
            "ai_prediction": ai_prediction,
            "resource_trends": ResourceTrends::placeholder(),
        })))
    }
}

/// Tool: get_recommendations
pub struct GetRecommendationsTool {
    services: ToolServices,
}

impl GetRecommendationsTool {
    pub fn new(services: ToolServices) -> Self {
        Self { services }
    }

    async fn single_job_context(&self, job_id: &JobId, kind: &str) -> Result<AnalysisContext> {
        let jobs = self.services.api.jobs();
        let job = jobs
            .get(job_id)
            .await
            .with_context(|| format!("Failed to fetch job {}", job_id))?;
        let executions = jobs
            .executions(
                job_id,
                &ExecutionQuery {
                    days: None,
                    limit: Some(SINGLE_JOB_EXECUTION_LIMIT),
                },
            )
            .await
            .with_context(|| format!("Failed to fetch executions of job {}", job_id))?;

        Ok(context([
            ("job", serde_json::to_value(&job)?),
            ("recent_executions", serde_json::to_value(&executions)?),
            ("recommendation_type", Value::String(kind.to_string())),
        ]))
    }

    async fn system_context(&self, kind: &str) -> Result<AnalysisContext> {
        let jobs = self
            .services
            .api
            .jobs()
            .list(&JobListQuery::with_limit(SYSTEM_JOB_LIMIT))
            .await
            .context("Failed to list jobs")?;
        let system_stats = self
            .services
            .api
            .stats()
            .dashboard()
            .await
            .context("Failed to fetch dashboard stats")?;

        Ok(context([
            ("jobs", serde_json::to_value(&jobs)?),
            ("system_stats", system_stats),
            ("recommendation_type", Value::String(kind.to_string())),
        ]))
    }
}

#[derive(Debug, Deserialize)]
struct RecommendationArgs {
    #[serde(default)]
    job_id: Option<JobId>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

#[async_trait::async_trait]
impl Tool for GetRecommendationsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new("get_recommendations", "Get job optimization recommendations")
            .param("job_id", ParamType::String, "Job ID (optional; omit for system-wide advice)")
            .param(
                "type",
                ParamType::String,
                "Recommendation type: performance, reliability, cost or all (default all)",
            )
    }

    async fn execute(&self, arguments: Map<String, Value>) -> Result<ToolResponse> {
        let args: RecommendationArgs = parse_args("get_recommendations", arguments)?;
        let kind = args.kind.unwrap_or_else(|| "all".to_string());
        let job_id = args.job_id.filter(|id| !id.is_empty());

        let (target, recommendation_context) = match &job_id {
            Some(job_id) => ("single_job", self.single_job_context(job_id, &kind).await?),
            None => ("system", self.system_context(&kind).await?),
        };

        let prompt = format!(
            "Provide {} job optimization recommendations, focusing on performance, reliability, \
             and cost optimization.",
            kind
        );
        let ai_recommendations = self
            .services
            .reasoner
            .analyze(&prompt, Some(&recommendation_context))
            .await;
        let actionable_items = extract_actionable_items(&ai_recommendations);

        Ok(ToolResponse::success(json!({
            "recommendation_type": kind,
            "target": target,
            "ai_recommendations": ai_recommendations,
            "actionable_items": actionable_items,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{args, services_for, CANNED_REPLY};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_stats(server: &MockServer, endpoint: &str, data: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/stats/{}", endpoint)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": data})))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_predict_uses_all_stats() {
        let server = MockServer::start().await;
        mount_stats(&server, "dashboard", json!({"cpu": 40})).await;
        mount_stats(&server, "workers", json!({"online": 3})).await;
        mount_stats(&server, "jobs", json!({"total": 12})).await;

        let (services, reasoner) = services_for(&server);
        let response = PredictResourceUsageTool::new(services)
            .execute(args(json!({"hours": 48, "granularity": "day"})))
            .await
            .unwrap();

        let data = response.data.unwrap();
        assert_eq!(data["prediction_period_hours"], 48);
        assert_eq!(data["granularity"], "day");
        assert_eq!(data["ai_prediction"], CANNED_REPLY);
        assert_eq!(
            data["resource_trends"],
            json!({
                "cpu_trend": "stable",
                "memory_trend": "increasing",
                "worker_utilization": "moderate",
                "predicted_bottlenecks": []
            })
        );

        let calls = reasoner.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].0.contains("next 48 hours"));

        let context = calls[0].1.as_ref().unwrap();
        assert_eq!(context["current_stats"], json!({"cpu": 40}));
        assert_eq!(context["worker_stats"], json!({"online": 3}));
        assert_eq!(context["job_stats"], json!({"total": 12}));
    }

    #[tokio::test]
    async fn test_predict_defaults() {
        let server = MockServer::start().await;
        mount_stats(&server, "dashboard", json!({})).await;
        mount_stats(&server, "workers", json!({})).await;
        mount_stats(&server, "jobs", json!({})).await;

        let (services, _) = services_for(&server);
        let response = PredictResourceUsageTool::new(services)
            .execute(Map::new())
            .await
            .unwrap();

        let data = response.data.unwrap();
        assert_eq!(data["prediction_period_hours"], 24);
        assert_eq!(data["granularity"], "hour");
    }

    #[tokio::test]
    async fn test_recommendations_for_single_job() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/jobs/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": 7}})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/jobs/7/executions"))
            .and(query_param("limit", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"executions": [{"status": "success"}]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (services, reasoner) = services_for(&server);
        let response = GetRecommendationsTool::new(services)
            .execute(args(json!({"job_id": "7", "type": "reliability"})))
            .await
            .unwrap();

        let data = response.data.unwrap();
        assert_eq!(data["target"], "single_job");
        assert_eq!(data["recommendation_type"], "reliability");
        assert_eq!(
            data["actionable_items"],
            json!([
                "We recommend moving the run to 03:00.",
                "You should raise the timeout to 10 minutes."
            ])
        );

        let calls = reasoner.calls();
        assert_eq!(calls.len(), 1);
        let context = calls[0].1.as_ref().unwrap();
        assert_eq!(context["job"], json!({"id": 7}));
        assert_eq!(context["recent_executions"], json!([{"status": "success"}]));
    }

    #[tokio::test]
    async fn test_recommendations_for_system() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/jobs"))
            .and(query_param("limit", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jobs": [{"id": 1}]})))
            .expect(1)
            .mount(&server)
            .await;
        mount_stats(&server, "dashboard", json!({"running": 1})).await;

        let (services, reasoner) = services_for(&server);
        let response = GetRecommendationsTool::new(services)
            .execute(Map::new())
            .await
            .unwrap();

        let data = response.data.unwrap();
        assert_eq!(data["target"], "system");
        assert_eq!(data["recommendation_type"], "all");

        let context = reasoner.calls()[0].1.clone().unwrap();
        assert_eq!(context["jobs"], json!([{"id": 1}]));
        assert_eq!(context["system_stats"], json!({"running": 1}));
        assert_eq!(context["recommendation_type"], "all");
    }

    #[tokio::test]
    async fn test_recommendations_fail_when_job_lookup_fails() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/jobs/9"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "job not found"})))
            .mount(&server)
            .await;

        let (services, reasoner) = services_for(&server);
        let err = GetRecommendationsTool::new(services)
            .execute(args(json!({"job_id": 9})))
            .await
            .unwrap_err();

        assert!(format!("{err:#}").contains("job not found"));
        assert!(reasoner.calls().is_empty());
    }
}
