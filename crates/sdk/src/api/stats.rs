//! Stats API endpoints.

use super::{data_member, ensure_no_error};
use crate::client::SchedulerClient;
use crate::error::SdkResult;
use crate::transport::HttpMethod;
use serde_json::Value;

/// Stats API. Payloads are passed through untyped.
pub struct StatsApi<'a> {
    client: &'a SchedulerClient,
}

impl<'a> StatsApi<'a> {
    pub(crate) fn new(client: &'a SchedulerClient) -> Self {
        Self { client }
    }

    /// Dashboard-level system statistics.
    pub async fn dashboard(&self) -> SdkResult<Value> {
        self.fetch("/stats/dashboard").await
    }

    /// Worker statistics.
    pub async fn workers(&self) -> SdkResult<Value> {
        self.fetch("/stats/workers").await
    }

    /// Per-job statistics.
    pub async fn jobs(&self) -> SdkResult<Value> {
        self.fetch("/stats/jobs").await
    }

    async fn fetch(&self, endpoint: &str) -> SdkResult<Value> {
        let body = self.client.request(HttpMethod::Get, endpoint, None).await?;
        ensure_no_error(&body)?;
        Ok(data_member(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_dashboard_returns_data_member() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/stats/dashboard"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"total_jobs": 12, "running": 3}
            })))
            .mount(&server)
            .await;

        let client = SchedulerClient::builder().base_url(server.uri()).build().unwrap();
        let stats = client.stats().dashboard().await.unwrap();
        assert_eq!(stats, json!({"total_jobs": 12, "running": 3}));
    }

    #[tokio::test]
    async fn test_stub_endpoint_reads_as_empty() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/stats/workers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "GetWorkerStats - to be implemented"
            })))
            .mount(&server)
            .await;

        let client = SchedulerClient::builder().base_url(server.uri()).build().unwrap();
        assert_eq!(client.stats().workers().await.unwrap(), json!({}));
    }
}
