//! Pod collection orchestration
//!
//! A run starts the api-service, lists pods, and always stops the service
//! again before returning. Pods become archive artifacts in the order the
//! runtime reported them. In danger mode, every running pod also gets a
//! journal collection command.

#[cfg(test)]
mod tests;

use crate::artifact::PodArtifact;
use crate::config::CollectorConfig;
use crate::error::Result;
use crate::models::{LogCollectionCommand, PodRecord};
use crate::observability::StructuredLogger;
use crate::service::{
    ApiService, ApiServiceSupervisor, PodQueryClient, PodSource, DEFAULT_API_ENDPOINT,
};
use std::time::Instant;

/// Output of a successful collection run
#[derive(Debug, Default)]
pub struct Collection {
    /// One artifact per pod, in runtime order
    pub artifacts: Vec<PodArtifact>,
    /// Journal commands for running pods (danger mode only)
    pub log_commands: Vec<LogCollectionCommand>,
}

/// Drives one start-list-stop cycle against the runtime
pub struct RktCollector {
    service: Box<dyn ApiService>,
    source: Box<dyn PodSource>,
    danger: bool,
    endpoint: String,
    logger: StructuredLogger,
}

impl RktCollector {
    pub fn new(service: Box<dyn ApiService>, source: Box<dyn PodSource>, danger: bool) -> Self {
        Self {
            service,
            source,
            danger,
            endpoint: DEFAULT_API_ENDPOINT.to_string(),
            logger: StructuredLogger::new("rkt"),
        }
    }

    /// Wire the real supervisor and gRPC client from configuration
    pub fn from_config(config: &CollectorConfig) -> Self {
        let supervisor = ApiServiceSupervisor::new(config.supervisor_config());
        let client = PodQueryClient::new(config.client_config());
        let mut collector = Self::new(Box::new(supervisor), Box::new(client), config.danger);
        collector.endpoint = config.api_endpoint.clone();
        collector
    }

    pub fn danger(&self) -> bool {
        self.danger
    }

    /// Run one collection
    ///
    /// The api-service is stopped exactly once whatever happens. A stop
    /// failure is logged and never replaces the run's own result.
    pub async fn collect(&mut self) -> Result<Collection> {
        let started = Instant::now();
        self.logger.log_collection_started(&self.endpoint, self.danger);

        let listed = match self.service.start().await {
            Ok(()) => self.source.list_pods().await,
            Err(e) => Err(e),
        };

        if let Err(e) = self.service.stop().await {
            self.logger.log_stop_failed(&e);
        }

        let pods = match listed {
            Ok(pods) => pods,
            Err(e) => {
                self.logger.log_collection_failed(&e);
                return Err(e);
            }
        };

        let log_commands = if self.danger {
            self.logger.log_danger_mode();
            log_commands_for(&pods)
        } else {
            Vec::new()
        };

        let artifacts: Vec<PodArtifact> = pods
            .into_iter()
            .map(|pod| {
                self.logger.log_pod_collected(&pod.id, pod.state);
                PodArtifact::new(pod)
            })
            .collect();

        self.logger.log_collection_complete(
            artifacts.len(),
            log_commands.len(),
            started.elapsed().as_millis() as u64,
        );

        Ok(Collection {
            artifacts,
            log_commands,
        })
    }
}

/// Journal commands for every running pod, in input order
pub fn log_commands_for(pods: &[PodRecord]) -> Vec<LogCollectionCommand> {
    pods.iter()
        .filter(|pod| pod.is_running())
        .map(|pod| LogCollectionCommand::for_pod(&pod.id))
        .collect()
}
