//! Collector configuration

use crate::service::{
    ClientConfig, SupervisorConfig, API_SERVICE_ARG, DEFAULT_API_ENDPOINT, DEFAULT_GRACE_PERIOD,
    DEFAULT_PROGRAM, DEFAULT_RPC_TIMEOUT,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for one pod collection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Include pod journals, which may contain sensitive data
    #[serde(default)]
    pub danger: bool,

    /// Runtime executable, resolved through PATH
    #[serde(default = "default_executable")]
    pub executable: String,

    /// Time the api-service must survive to count as started
    #[serde(default = "default_grace_period_ms")]
    pub grace_period_ms: u64,

    /// Runtime API endpoint
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,

    /// Connect and request timeout for the runtime API
    #[serde(default = "default_rpc_timeout_secs")]
    pub rpc_timeout_secs: u64,
}

fn default_executable() -> String {
    DEFAULT_PROGRAM.to_string()
}

fn default_grace_period_ms() -> u64 {
    DEFAULT_GRACE_PERIOD.as_millis() as u64
}

fn default_api_endpoint() -> String {
    DEFAULT_API_ENDPOINT.to_string()
}

fn default_rpc_timeout_secs() -> u64 {
    DEFAULT_RPC_TIMEOUT.as_secs()
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            danger: false,
            executable: default_executable(),
            grace_period_ms: default_grace_period_ms(),
            api_endpoint: default_api_endpoint(),
            rpc_timeout_secs: default_rpc_timeout_secs(),
        }
    }
}

impl CollectorConfig {
    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }

    pub fn supervisor_config(&self) -> SupervisorConfig {
        SupervisorConfig {
            program: self.executable.clone(),
            args: vec![API_SERVICE_ARG.to_string()],
            grace_period: self.grace_period(),
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            endpoint: self.api_endpoint.clone(),
            connect_timeout: self.rpc_timeout(),
            request_timeout: self.rpc_timeout(),
        }
    }
}
