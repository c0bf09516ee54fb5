//! Jobs API endpoints.

use super::{ensure_no_error, list_member, unwrap_envelope};
use crate::client::SchedulerClient;
use crate::error::{SdkError, SdkResult};
use crate::transport::HttpMethod;
use jobpilot_core::types::{Execution, Job, JobId};
use serde::{Deserialize, Serialize};

/// Jobs API for reading jobs and their execution history.
pub struct JobsApi<'a> {
    client: &'a SchedulerClient,
}

impl<'a> JobsApi<'a> {
    pub(crate) fn new(client: &'a SchedulerClient) -> Self {
        Self { client }
    }

    /// List jobs matching the query.
    pub async fn list(&self, query: &JobListQuery) -> SdkResult<Vec<Job>> {
        let params = serde_json::to_value(query)?;
        let body = self
            .client
            .request(HttpMethod::Get, "/jobs", Some(&params))
            .await?;
        ensure_no_error(&body)?;
        list_member(body, "jobs")
    }

    /// Get a single job.
    pub async fn get(&self, id: &JobId) -> SdkResult<Job> {
        let body = self
            .client
            .request(HttpMethod::Get, &format!("/jobs/{}", id), None)
            .await?;
        ensure_no_error(&body)?;

        let job = unwrap_envelope(body);
        if !job.is_object() {
            return Err(SdkError::UnexpectedResponse(format!(
                "job {} is not a JSON object",
                id
            )));
        }
        Ok(serde_json::from_value(job)?)
    }

    /// Get the execution history of a job.
    pub async fn executions(&self, id: &JobId, query: &ExecutionQuery) -> SdkResult<Vec<Execution>> {
        let params = serde_json::to_value(query)?;
        let body = self
            .client
            .request(HttpMethod::Get, &format!("/jobs/{}/executions", id), Some(&params))
            .await?;
        ensure_no_error(&body)?;
        list_member(body, "executions")
    }
}

/// Filters for listing jobs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl JobListQuery {
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Default::default()
        }
    }
}

/// Window for an execution history query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}
