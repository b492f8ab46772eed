//! System metrics samples and health grading.

use crate::{
    core::stats::mean,
    errors::Result,
    models::SystemMetrics,
    storage::{DocumentStore, MetricsPatch},
};
use serde::Serialize;
use std::fmt;
use tracing::{debug, instrument};

/// Load time budget in milliseconds.
pub const LOAD_TIME_THRESHOLD_MS: f64 = 300.0;
/// Response time budget in milliseconds.
pub const RESPONSE_TIME_THRESHOLD_MS: f64 = 200.0;
/// Error rate budget in percent.
pub const ERROR_RATE_THRESHOLD: f64 = 5.0;

/// Action-count key under which failed actions are tallied.
pub const FAILED_ACTION_KEY: &str = "failed";

/// How a measured value compares to its budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum HealthGrade {
    /// At most half the budget
    Excellent,
    /// At most 80% of the budget
    Good,
    /// Within budget
    Fair,
    /// Over budget
    Poor,
}

impl HealthGrade {
    /// Grades `value` against `threshold`.
    #[must_use]
    pub fn grade(value: f64, threshold: f64) -> Self {
        if value <= threshold * 0.5 {
            Self::Excellent
        } else if value <= threshold * 0.8 {
            Self::Good
        } else if value <= threshold {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

impl fmt::Display for HealthGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        };
        f.write_str(label)
    }
}

/// Averaged samples with their grades.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    /// Mean load time (ms), 0 without samples
    pub average_load_time: f64,
    /// Grade against [`LOAD_TIME_THRESHOLD_MS`]
    pub load_grade: HealthGrade,
    /// Mean response time (ms), 0 without samples
    pub average_response_time: f64,
    /// Grade against [`RESPONSE_TIME_THRESHOLD_MS`]
    pub response_grade: HealthGrade,
    /// Failed actions in percent
    pub error_rate: f64,
    /// Grade against [`ERROR_RATE_THRESHOLD`]
    pub error_grade: HealthGrade,
}

/// Grades the stored metrics.
pub async fn system_health(store: &DocumentStore) -> Result<HealthReport> {
    Ok(health_of(&store.get_system_metrics().await?))
}

/// Grades `metrics` without touching storage.
#[must_use]
pub fn health_of(metrics: &SystemMetrics) -> HealthReport {
    let performance = &metrics.performance_metrics;
    let average_load_time = mean(performance.load_time.iter().copied());
    let average_response_time = mean(performance.response_time.iter().copied());

    HealthReport {
        average_load_time,
        load_grade: HealthGrade::grade(average_load_time, LOAD_TIME_THRESHOLD_MS),
        average_response_time,
        response_grade: HealthGrade::grade(average_response_time, RESPONSE_TIME_THRESHOLD_MS),
        error_rate: performance.error_rate,
        error_grade: HealthGrade::grade(performance.error_rate, ERROR_RATE_THRESHOLD),
    }
}

fn push_bounded(samples: &mut Vec<f64>, value: f64, window: usize) {
    samples.push(value);
    if samples.len() > window {
        let excess = samples.len() - window;
        samples.drain(..excess);
    }
}

/// Appends latency samples, keeping only the newest `window` of each series.
#[instrument(skip(store))]
pub async fn record_performance_sample(
    store: &DocumentStore,
    load_time_ms: f64,
    response_time_ms: f64,
    window: usize,
) -> Result<SystemMetrics> {
    let mut performance = store.get_system_metrics().await?.performance_metrics;
    push_bounded(&mut performance.load_time, load_time_ms, window);
    push_bounded(&mut performance.response_time, response_time_ms, window);

    store
        .update_system_metrics(MetricsPatch {
            performance_metrics: Some(performance),
            user_metrics: None,
        })
        .await
}

/// Counts one invocation of `action` and refreshes the error rate.
///
/// Failures are also tallied under [`FAILED_ACTION_KEY`]; the error rate is
/// failures as a percentage of all other counted actions.
#[instrument(skip(store))]
pub async fn record_action(
    store: &DocumentStore,
    action: &str,
    succeeded: bool,
) -> Result<SystemMetrics> {
    let mut metrics = store.get_system_metrics().await?;
    let counts = &mut metrics.user_metrics.action_counts;

    *counts.entry(action.to_string()).or_insert(0) += 1;
    if !succeeded {
        *counts.entry(FAILED_ACTION_KEY.to_string()).or_insert(0) += 1;
    }

    let failed = counts.get(FAILED_ACTION_KEY).copied().unwrap_or(0);
    let total: u64 = counts
        .iter()
        .filter(|(key, _)| key.as_str() != FAILED_ACTION_KEY)
        .map(|(_, count)| *count)
        .sum();
    #[allow(clippy::cast_precision_loss)]
    let error_rate = if total == 0 {
        0.0
    } else {
        failed as f64 / total as f64 * 100.0
    };
    metrics.performance_metrics.error_rate = error_rate;
    debug!("Action '{action}' recorded, error rate now {error_rate:.2}%");

    store
        .update_system_metrics(MetricsPatch {
            performance_metrics: Some(metrics.performance_metrics),
            user_metrics: Some(metrics.user_metrics),
        })
        .await
}

/// Appends a session duration (seconds), keeping the newest `window`.
pub async fn record_session(
    store: &DocumentStore,
    duration_secs: f64,
    window: usize,
) -> Result<SystemMetrics> {
    let mut user_metrics = store.get_system_metrics().await?.user_metrics;
    push_bounded(&mut user_metrics.session_duration, duration_secs, window);
    user_metrics.active_users = store
        .get_users()
        .await?
        .iter()
        .filter(|u| u.is_active)
        .count() as u64;

    store
        .update_system_metrics(MetricsPatch {
            performance_metrics: None,
            user_metrics: Some(user_metrics),
        })
        .await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::sample_user;

    #[test]
    fn test_grade_boundaries() {
        assert_eq!(HealthGrade::grade(150.0, 300.0), HealthGrade::Excellent);
        assert_eq!(HealthGrade::grade(150.1, 300.0), HealthGrade::Good);
        assert_eq!(HealthGrade::grade(240.0, 300.0), HealthGrade::Good);
        assert_eq!(HealthGrade::grade(300.0, 300.0), HealthGrade::Fair);
        assert_eq!(HealthGrade::grade(300.5, 300.0), HealthGrade::Poor);
    }

    #[tokio::test]
    async fn test_health_without_samples_is_excellent() -> Result<()> {
        let report = system_health(&DocumentStore::in_memory()).await?;
        assert_eq!(report.average_load_time, 0.0);
        assert_eq!(report.load_grade, HealthGrade::Excellent);
        assert_eq!(report.error_grade, HealthGrade::Excellent);
        Ok(())
    }

    #[tokio::test]
    async fn test_samples_roll_over_window() -> Result<()> {
        let store = DocumentStore::in_memory();
        for i in 1..=5 {
            record_performance_sample(&store, f64::from(i) * 100.0, 50.0, 3).await?;
        }

        let metrics = store.get_system_metrics().await?;
        assert_eq!(
            metrics.performance_metrics.load_time,
            vec![300.0, 400.0, 500.0]
        );
        assert_eq!(metrics.performance_metrics.response_time.len(), 3);

        let report = system_health(&store).await?;
        assert_eq!(report.average_load_time, 400.0);
        assert_eq!(report.load_grade, HealthGrade::Poor);
        assert_eq!(report.response_grade, HealthGrade::Excellent);
        Ok(())
    }

    #[tokio::test]
    async fn test_record_action_tracks_error_rate() -> Result<()> {
        let store = DocumentStore::in_memory();
        record_action(&store, "login", true).await?;
        record_action(&store, "login", true).await?;
        record_action(&store, "request", true).await?;
        let metrics = record_action(&store, "request", false).await?;

        let counts = &metrics.user_metrics.action_counts;
        assert_eq!(counts.get("login"), Some(&2));
        assert_eq!(counts.get("request"), Some(&2));
        assert_eq!(counts.get(FAILED_ACTION_KEY), Some(&1));
        assert_eq!(metrics.performance_metrics.error_rate, 25.0);
        assert_eq!(health_of(&metrics).error_grade, HealthGrade::Poor);
        Ok(())
    }

    #[tokio::test]
    async fn test_record_session_keeps_samples_apart() -> Result<()> {
        let store = DocumentStore::in_memory();
        store.save_user(sample_user("u1", "priya", "pw")).await?;
        record_performance_sample(&store, 120.0, 80.0, 20).await?;
        let metrics = record_session(&store, 42.0, 20).await?;

        assert_eq!(metrics.user_metrics.session_duration, vec![42.0]);
        assert_eq!(metrics.user_metrics.active_users, 1);
        // The performance section survives a user-section update
        assert_eq!(metrics.performance_metrics.load_time, vec![120.0]);
        Ok(())
    }
}
