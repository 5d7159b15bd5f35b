//! Error types for pod collection

use std::process::ExitStatus;
use thiserror::Error;

/// Result alias used throughout the collector
pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised while starting the api-service, querying it, or cleaning up
#[derive(Debug, Error)]
pub enum Error {
    /// The runtime executable is not on the search path
    #[error("could not find {program} in PATH")]
    ExecutableNotFound { program: String },

    /// The executable was found but could not be launched
    #[error("failed to launch {program} api-service: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The api-service exited cleanly inside the grace period. Usually this
    /// means it lacked the privileges to serve the pod listing.
    #[error("{program} api-service closed too quickly")]
    StartupTooFast { program: String },

    /// The api-service exited with a failure status inside the grace period
    #[error("{program} api-service exited during startup: {status}")]
    StartupFailed { program: String, status: ExitStatus },

    /// Waiting on the child process failed
    #[error("failed to wait on {program} api-service: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The configured endpoint is not a valid URI
    #[error("invalid runtime API endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// The RPC endpoint could not be reached
    #[error("failed to connect to runtime API at {endpoint}: {source}")]
    Connection {
        endpoint: String,
        #[source]
        source: tonic::transport::Error,
    },

    /// The ListPods call itself failed
    #[error("ListPods call failed: {0}")]
    Query(#[from] tonic::Status),

    /// Killing or reaping the api-service failed
    #[error("failed to stop api-service: {0}")]
    Cleanup(#[source] std::io::Error),
}

impl Error {
    /// Returns true for errors raised before the api-service was running
    pub fn is_startup(&self) -> bool {
        matches!(
            self,
            Error::ExecutableNotFound { .. }
                | Error::Spawn { .. }
                | Error::StartupTooFast { .. }
                | Error::StartupFailed { .. }
                | Error::Wait { .. }
        )
    }

    /// Returns true for errors raised by the RPC layer
    pub fn is_rpc(&self) -> bool {
        matches!(
            self,
            Error::InvalidEndpoint { .. } | Error::Connection { .. } | Error::Query(_)
        )
    }

    /// Short failure class for structured logs
    pub fn class(&self) -> &'static str {
        if self.is_startup() {
            "startup"
        } else if self.is_rpc() {
            "rpc"
        } else {
            "cleanup"
        }
    }
}
