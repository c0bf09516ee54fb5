// Structured advice derived locally alongside the free-text analysis

use crate::metrics::ExecutionMetrics;
use crate::types::Job;
use chrono::{DateTime, Utc};
use cron::Schedule;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Success rate (percent) below which a job is flagged
pub const SUCCESS_RATE_THRESHOLD: f64 = 95.0;

/// Average duration (seconds) above which a job is flagged
pub const SLOW_DURATION_THRESHOLD_SECS: f64 = 300.0;

/// Maximum number of actionable items pulled out of a reasoning reply
pub const MAX_ACTIONABLE_ITEMS: usize = 5;

/// Lines containing any of these are treated as advice.
/// English entries are matched case-insensitively.
pub const ADVISORY_KEYWORDS: &[&str] = &[
    "recommend",
    "should",
    "consider",
    "need",
    "建议",
    "应该",
    "可以",
    "需要",
];

pub const IMPLEMENTATION_STEPS: [&str; 5] = [
    "1. Back up the current schedule configuration",
    "2. Validate the new schedule in a test environment",
    "3. Roll out the new schedule settings gradually",
    "4. Monitor system performance after the change",
    "5. Fine-tune based on observed results",
];

/// Threshold checks over a job's execution metrics.
pub fn performance_recommendations(metrics: &ExecutionMetrics) -> Vec<String> {
    let mut recommendations = Vec::new();

    if metrics.success_rate < SUCCESS_RATE_THRESHOLD {
        recommendations.push(
            "Success rate is low; check the job's execution environment and error handling"
                .to_string(),
        );
    }

    if metrics.avg_duration_seconds > SLOW_DURATION_THRESHOLD_SECS {
        recommendations.push(
            "Average execution time is long; optimize the job logic or raise its timeout"
                .to_string(),
        );
    }

    if metrics.timeout_count > 0 {
        recommendations.push(
            "Some executions timed out; adjust the timeout or improve job performance".to_string(),
        );
    }

    recommendations
}

/// Pull advice-looking lines out of free text, in order, capped at
/// [`MAX_ACTIONABLE_ITEMS`].
pub fn extract_actionable_items(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| contains_advisory_keyword(line))
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .take(MAX_ACTIONABLE_ITEMS)
        .collect()
}

fn contains_advisory_keyword(line: &str) -> bool {
    let lowered = line.to_lowercase();
    ADVISORY_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}

/// Suggested schedule for one job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSuggestion {
    pub job_id: Option<Value>,
    pub current_cron: Option<Value>,
    pub suggested_cron: Option<Value>,
    pub reason: String,
    /// Next firing time of the current expression, when it parses
    pub next_run_at: Option<DateTime<Utc>>,
}

/// One suggestion per job. The schedule itself is passed through unchanged.
pub fn schedule_suggestions(jobs: &[Job], goal: &str, now: DateTime<Utc>) -> Vec<ScheduleSuggestion> {
    jobs.iter()
        .map(|job| ScheduleSuggestion {
            job_id: job.id.clone(),
            current_cron: job.cron.clone(),
            suggested_cron: job.cron.clone(),
            reason: format!("Schedule reviewed against the '{}' optimization goal", goal),
            next_run_at: job.cron_expr().and_then(|expr| next_run_after(expr, now)),
        })
        .collect()
}

/// Next firing time of a cron expression after `after`.
///
/// Accepts both the classic 5-field form and the 6/7-field form with seconds.
pub fn next_run_after(expr: &str, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let fields = expr.split_whitespace().count();
    let normalized = if fields == 5 {
        format!("0 {}", expr.trim())
    } else {
        expr.trim().to_string()
    };

    match Schedule::from_str(&normalized) {
        Ok(schedule) => schedule.after(&after).next(),
        Err(e) => {
            tracing::debug!(cron = expr, error = %e, "Unparseable cron expression");
            None
        }
    }
}

/// Coarse resource outlook. These labels are fixed, not computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTrends {
    pub cpu_trend: String,
    pub memory_trend: String,
    pub worker_utilization: String,
    pub predicted_bottlenecks: Vec<String>,
}

impl ResourceTrends {
    pub fn placeholder() -> Self {
        Self {
            cpu_trend: "stable".to_string(),
            memory_trend: "increasing".to_string(),
            worker_utilization: "moderate".to_string(),
            predicted_bottlenecks: Vec::new(),
        }
    }
}

/// Generic rollout checklist, independent of the generated plan.
pub fn implementation_steps() -> Vec<String> {
    IMPLEMENTATION_STEPS.iter().map(|s| s.to_string()).collect()
}
