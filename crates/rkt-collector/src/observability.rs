//! Structured event logging for pod collection
//!
//! Every significant step of a collection run is emitted as a tracing event
//! with a stable `event` field, so JSON logs can be filtered per run.

use crate::error::Error;
use crate::models::PodState;
use tracing::{debug, info, warn};

/// Structured logger for collector events
#[derive(Clone)]
pub struct StructuredLogger {
    runtime: String,
}

impl StructuredLogger {
    pub fn new(runtime: impl Into<String>) -> Self {
        Self {
            runtime: runtime.into(),
        }
    }

    /// Log the start of a collection run
    pub fn log_collection_started(&self, endpoint: &str, danger: bool) {
        info!(
            event = "collection_started",
            runtime = %self.runtime,
            endpoint = %endpoint,
            danger = danger,
            "Collecting pod state"
        );
    }

    /// Log that sensitive pod logs will be included
    pub fn log_danger_mode(&self) {
        warn!(
            event = "danger_mode_enabled",
            runtime = %self.runtime,
            "Danger mode activated. Dump will include pod logs, which may contain sensitive information."
        );
    }

    /// Log a single pod picked up for the archive
    pub fn log_pod_collected(&self, pod_id: &str, state: PodState) {
        debug!(
            event = "pod_collected",
            runtime = %self.runtime,
            pod_id = %pod_id,
            state = ?state,
            "Collected pod"
        );
    }

    /// Log a finished collection run
    pub fn log_collection_complete(&self, pods: usize, log_commands: usize, elapsed_ms: u64) {
        info!(
            event = "collection_complete",
            runtime = %self.runtime,
            pods = pods,
            log_commands = log_commands,
            elapsed_ms = elapsed_ms,
            "Pod collection complete"
        );
    }

    /// Log a collection run that produced nothing
    pub fn log_collection_failed(&self, error: &Error) {
        warn!(
            event = "collection_failed",
            runtime = %self.runtime,
            class = error.class(),
            error = %error,
            "Pod collection failed"
        );
    }

    /// Log a cleanup failure that is deliberately not propagated
    pub fn log_stop_failed(&self, error: &dyn std::error::Error) {
        warn!(
            event = "api_service_stop_failed",
            runtime = %self.runtime,
            error = %error,
            "Failed to stop api-service"
        );
    }
}
