//! gRPC client for the local rkt api-service
//!
//! The api-service listens on loopback without TLS, so the channel is
//! plaintext and unauthenticated. Each listing opens its own channel and
//! drops it before returning.

use crate::error::{Error, Result};
use crate::models::PodRecord;
use crate::proto::{ListPodsRequest, PublicApiClient};
use std::time::Duration;
use tonic::transport::{Channel, Endpoint};
use tracing::debug;

/// Well-known address of `rkt api-service`
pub const DEFAULT_API_ENDPOINT: &str = "http://localhost:15441";

/// Connect and call timeout
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for the pod query client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API endpoint URL
    pub endpoint: String,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Request timeout
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_API_ENDPOINT.to_string(),
            connect_timeout: DEFAULT_RPC_TIMEOUT,
            request_timeout: DEFAULT_RPC_TIMEOUT,
        }
    }
}

/// Lists pods from the rkt public API
#[derive(Debug, Clone)]
pub struct PodQueryClient {
    config: ClientConfig,
}

impl PodQueryClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(ClientConfig::default())
    }

    /// Get the endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Get the connect timeout
    pub fn connect_timeout(&self) -> Duration {
        self.config.connect_timeout
    }

    async fn connect(&self) -> Result<Channel> {
        let endpoint = Endpoint::from_shared(self.config.endpoint.clone()).map_err(|e| {
            Error::InvalidEndpoint {
                endpoint: self.config.endpoint.clone(),
                reason: e.to_string(),
            }
        })?;

        endpoint
            .connect_timeout(self.config.connect_timeout)
            .timeout(self.config.request_timeout)
            .connect()
            .await
            .map_err(|source| Error::Connection {
                endpoint: self.config.endpoint.clone(),
                source,
            })
    }

    /// List every pod, unfiltered
    pub async fn list_pods(&self) -> Result<Vec<PodRecord>> {
        let channel = self.connect().await?;
        let mut client = PublicApiClient::new(channel);

        let response = client.list_pods(ListPodsRequest::default()).await?;
        let pods: Vec<PodRecord> = response
            .into_inner()
            .pods
            .into_iter()
            .map(PodRecord::from)
            .collect();

        debug!(
            endpoint = %self.config.endpoint,
            pods = pods.len(),
            "Listed pods from runtime API"
        );

        Ok(pods)
    }
}

/// Builder for PodQueryClient configuration
pub struct PodQueryClientBuilder {
    config: ClientConfig,
}

impl PodQueryClientBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn build(self) -> PodQueryClient {
        PodQueryClient::new(self.config)
    }
}

impl Default for PodQueryClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
