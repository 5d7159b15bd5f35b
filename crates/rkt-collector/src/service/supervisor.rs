//! Supervision of the ephemeral `rkt api-service` process
//!
//! rkt gives no readiness signal, so startup is judged by a race: if the
//! process is still alive once the grace period elapses it is assumed to have
//! acquired what it needs. Without sufficient privileges it exits well before
//! that. A fast, clean exit therefore counts as a failure.

use crate::error::{Error, Result};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

/// Runtime executable looked up on PATH
pub const DEFAULT_PROGRAM: &str = "rkt";

/// Argument that puts rkt into API mode
pub const API_SERVICE_ARG: &str = "api-service";

/// How long the api-service must survive to count as started
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_millis(200);

/// Configuration for the api-service supervisor
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// Program name or path; bare names are resolved through PATH
    pub program: String,
    /// Arguments passed to the program
    pub args: Vec<String>,
    /// Startup grace period
    pub grace_period: Duration,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            args: vec![API_SERVICE_ARG.to_string()],
            grace_period: DEFAULT_GRACE_PERIOD,
        }
    }
}

/// Session state of the supervised process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Idle,
    Starting,
    Running,
    Stopped,
    FailedToStart,
}

/// Launches and kills the api-service subprocess
pub struct ApiServiceSupervisor {
    config: SupervisorConfig,
    state: SupervisorState,
    child: Option<Child>,
}

impl ApiServiceSupervisor {
    pub fn new(config: SupervisorConfig) -> Self {
        Self {
            config,
            state: SupervisorState::Idle,
            child: None,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(SupervisorConfig::default())
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// PID of the running api-service, if any
    pub fn pid(&self) -> Option<u32> {
        self.child.as_ref().and_then(Child::id)
    }

    /// Launch the api-service and wait out the grace period
    pub async fn start(&mut self) -> Result<()> {
        self.state = SupervisorState::Starting;
        let program = self.config.program.clone();

        let path = match which::which(&program) {
            Ok(path) => path,
            Err(e) => {
                warn!(program = %program, error = %e, "Could not find executable in PATH");
                self.state = SupervisorState::FailedToStart;
                return Err(Error::ExecutableNotFound { program });
            }
        };

        let mut child = match Command::new(&path)
            .args(&self.config.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(source) => {
                self.state = SupervisorState::FailedToStart;
                return Err(Error::Spawn { program, source });
            }
        };

        debug!(
            program = %path.display(),
            pid = ?child.id(),
            grace_ms = self.config.grace_period.as_millis() as u64,
            "Launched api-service, waiting out grace period"
        );

        let early_exit = tokio::select! {
            _ = tokio::time::sleep(self.config.grace_period) => None,
            status = child.wait() => Some(status),
        };

        match early_exit {
            None => {
                info!(program = %program, pid = ?child.id(), "api-service started");
                self.child = Some(child);
                self.state = SupervisorState::Running;
                Ok(())
            }
            Some(Ok(status)) if status.success() => {
                warn!(program = %program, "api-service exited cleanly inside grace period");
                self.state = SupervisorState::FailedToStart;
                Err(Error::StartupTooFast { program })
            }
            Some(Ok(status)) => {
                warn!(program = %program, status = %status, "api-service failed during startup");
                self.state = SupervisorState::FailedToStart;
                Err(Error::StartupFailed { program, status })
            }
            Some(Err(source)) => {
                self.state = SupervisorState::FailedToStart;
                Err(Error::Wait { program, source })
            }
        }
    }

    /// Kill the api-service and reap it
    ///
    /// Does nothing when no process is running. Failures are logged and
    /// returned; they are never raised as panics.
    pub async fn stop(&mut self) -> Result<()> {
        let Some(mut child) = self.child.take() else {
            debug!(state = ?self.state, "No api-service to stop");
            return Ok(());
        };
        self.state = SupervisorState::Stopped;

        if let Err(e) = child.start_kill() {
            warn!(error = %e, "Error killing api-service");
            return Err(Error::Cleanup(e));
        }

        match child.wait().await {
            Ok(status) => {
                debug!(status = %status, "api-service stopped");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Error reaping api-service");
                Err(Error::Cleanup(e))
            }
        }
    }
}
