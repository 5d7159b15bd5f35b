//! The rkt api-service and its gRPC surface
//!
//! This module provides:
//! - A supervisor that launches `rkt api-service` and decides whether it
//!   came up, then kills it when collection is done
//! - A plaintext gRPC client that lists pods from the running service

mod client;
mod supervisor;


pub use client::{
    ClientConfig, PodQueryClient, PodQueryClientBuilder, DEFAULT_API_ENDPOINT, DEFAULT_RPC_TIMEOUT,
};
pub use supervisor::{
    ApiServiceSupervisor, SupervisorConfig, SupervisorState, API_SERVICE_ARG, DEFAULT_GRACE_PERIOD,
    DEFAULT_PROGRAM,
};

use crate::error::Result;
use crate::models::PodRecord;

pub use async_trait::async_trait;

/// Lifecycle of the runtime's API endpoint
#[async_trait]
pub trait ApiService: Send {
    /// Bring the endpoint up
    async fn start(&mut self) -> Result<()>;

    /// Tear the endpoint down. Safe to call whether or not `start` succeeded.
    async fn stop(&mut self) -> Result<()>;
}

/// Source of pod records
#[async_trait]
pub trait PodSource: Send + Sync {
    /// List every pod known to the runtime, in the order reported
    async fn list_pods(&self) -> Result<Vec<PodRecord>>;
}

#[async_trait]
impl ApiService for ApiServiceSupervisor {
    async fn start(&mut self) -> Result<()> {
        ApiServiceSupervisor::start(self).await
    }

    async fn stop(&mut self) -> Result<()> {
        ApiServiceSupervisor::stop(self).await
    }
}

#[async_trait]
impl PodSource for PodQueryClient {
    async fn list_pods(&self) -> Result<Vec<PodRecord>> {
        PodQueryClient::list_pods(self).await
    }
}
