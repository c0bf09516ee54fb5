// Execution metrics derived from a job's execution history

use crate::types::{Execution, ExecutionStatus, Job};
use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Errors raised while aggregating execution records
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("invalid timestamp '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Aggregated performance metrics for a set of executions.
///
/// Never persisted; recomputed on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionMetrics {
    pub total_executions: usize,
    /// Percentage of successful executions (0-100), rounded to 2 decimals
    pub success_rate: f64,
    pub failed_count: usize,
    pub timeout_count: usize,
    /// Mean wall-clock duration over executions that have both timestamps
    pub avg_duration_seconds: f64,
}

impl ExecutionMetrics {
    pub fn from_executions(executions: &[Execution]) -> Result<Self, MetricsError> {
        let total_executions = executions.len();
        let mut success_count = 0usize;
        let mut failed_count = 0usize;
        let mut timeout_count = 0usize;
        let mut durations = Vec::new();

        for execution in executions {
            match execution.status() {
                ExecutionStatus::Success => success_count += 1,
                ExecutionStatus::Failed => failed_count += 1,
                ExecutionStatus::Timeout => timeout_count += 1,
                ExecutionStatus::Other(_) | ExecutionStatus::Unknown => {}
            }

            if let Some((started, finished)) = execution.time_span() {
                let started = parse_timestamp(started)?;
                let finished = parse_timestamp(finished)?;
                durations.push(duration_seconds(started, finished));
            }
        }

        let success_rate = if total_executions > 0 {
            round2(success_count as f64 / total_executions as f64 * 100.0)
        } else {
            0.0
        };

        let avg_duration_seconds = if durations.is_empty() {
            0.0
        } else {
            round2(durations.iter().sum::<f64>() / durations.len() as f64)
        };

        Ok(Self {
            total_executions,
            success_rate,
            failed_count,
            timeout_count,
            avg_duration_seconds,
        })
    }
}

/// Headline numbers for a list of jobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub total_jobs: usize,
    pub active_jobs: usize,
    /// Distinct department ids, in first-seen order
    pub departments: Vec<Value>,
}

impl JobSummary {
    pub fn from_jobs(jobs: &[Job]) -> Self {
        let mut departments: Vec<Value> = Vec::new();
        for department in jobs.iter().filter_map(Job::department) {
            if !departments.contains(department) {
                departments.push(department.clone());
            }
        }

        Self {
            total_jobs: jobs.len(),
            active_jobs: jobs.iter().filter(|job| job.is_active()).count(),
            departments,
        }
    }
}

/// Parse an ISO-8601 timestamp as emitted by the scheduling service.
///
/// A trailing `Z` is rewritten to `+00:00`; values without any offset are
/// taken to be UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, MetricsError> {
    let trimmed = raw.trim();
    let normalized = match trimmed.strip_suffix('Z').or_else(|| trimmed.strip_suffix('z')) {
        Some(stripped) => format!("{}+00:00", stripped),
        None => trimmed.to_string(),
    };

    match DateTime::parse_from_rfc3339(&normalized) {
        Ok(parsed) => Ok(parsed),
        Err(rfc_err) => {
            let naive = NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f")
                .or_else(|_| NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%d %H:%M:%S%.f"))
                .map_err(|_| MetricsError::InvalidTimestamp {
                    value: raw.to_string(),
                    source: rfc_err,
                })?;
            Ok(naive.and_utc().fixed_offset())
        }
    }
}

fn duration_seconds(started: DateTime<FixedOffset>, finished: DateTime<FixedOffset>) -> f64 {
    let elapsed = finished.with_timezone(&Utc) - started.with_timezone(&Utc);
    match elapsed.num_microseconds() {
        Some(micros) => micros as f64 / 1_000_000.0,
        None => elapsed.num_milliseconds() as f64 / 1000.0,
    }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn execution(status: &str, started: Option<&str>, finished: Option<&str>) -> Execution {
        serde_json::from_value(json!({
            "status": status,
            "started_at": started,
            "finished_at": finished,
        }))
        .unwrap()
    }

    #[test]
    fn test_empty_history_has_zero_rates() {
        let metrics = ExecutionMetrics::from_executions(&[]).unwrap();

        assert_eq!(metrics.total_executions, 0);
        assert_eq!(metrics.success_rate, 0.0);
        assert_eq!(metrics.avg_duration_seconds, 0.0);
        assert_eq!(metrics.failed_count, 0);
        assert_eq!(metrics.timeout_count, 0);
    }

    #[test]
    fn test_success_rate_rounds_to_two_decimals() {
        let executions = vec![
            execution("success", None, None),
            execution("failed", None, None),
            execution("timeout", None, None),
        ];

        let metrics = ExecutionMetrics::from_executions(&executions).unwrap();
        assert_eq!(metrics.total_executions, 3);
        assert_eq!(metrics.success_rate, 33.33);
        assert_eq!(metrics.failed_count, 1);
        assert_eq!(metrics.timeout_count, 1);
    }

    #[test]
    fn test_average_duration_only_counts_complete_spans() {
        let executions = vec![
            execution("success", Some("2024-05-01T10:00:00Z"), Some("2024-05-01T10:01:00Z")),
            execution("success", Some("2024-05-01T11:00:00+00:00"), Some("2024-05-01T11:02:00+00:00")),
            execution("running", Some("2024-05-01T12:00:00Z"), None),
        ];

        let metrics = ExecutionMetrics::from_executions(&executions).unwrap();
        assert_eq!(metrics.avg_duration_seconds, 90.0);
        assert_eq!(metrics.success_rate, 66.67);
    }

    #[test]
    fn test_job_summary() {
        let jobs: Vec<Job> = serde_json::from_value(json!([
            {"id": "1", "department_id": "ops", "enabled": true},
            {"id": "2", "department_id": "ops", "enabled": false},
            {"id": "3", "department_id": "data"},
            {"id": "4", "department_id": ""}
        ]))
        .unwrap();

        let summary = JobSummary::from_jobs(&jobs);
        assert_eq!(summary.total_jobs, 4);
        assert_eq!(summary.active_jobs, 3);
        assert_eq!(summary.departments, vec![json!("ops"), json!("data")]);
    }

    #[test]
    fn test_duration_keeps_sub_millisecond_precision() {
        let started = parse_timestamp("2024-05-01T10:00:00.000000Z").unwrap();
        let finished = parse_timestamp("2024-05-01T10:00:00.001500Z").unwrap();
        assert_eq!(duration_seconds(started, finished), 0.0015);

        let finished = parse_timestamp("2024-05-01T10:00:02.250250Z").unwrap();
        assert_eq!(duration_seconds(started, finished), 2.25025);
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let zulu = parse_timestamp("2024-05-01T10:00:00Z").unwrap();
        let offset = parse_timestamp("2024-05-01T12:00:00+02:00").unwrap();
        let naive = parse_timestamp("2024-05-01T10:00:00.250").unwrap();

        assert_eq!(zulu, offset);
        assert_eq!((naive - zulu).num_milliseconds(), 250);
    }

    #[test]
    fn test_invalid_timestamp_is_an_error() {
        let executions = vec![execution("success", Some("yesterday"), Some("today"))];

        let err = ExecutionMetrics::from_executions(&executions).unwrap_err();
        assert!(err.to_string().contains("yesterday"));
    }
}
