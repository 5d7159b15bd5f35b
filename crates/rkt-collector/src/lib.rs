//! rkt pod-state collection for host diagnostic dumps
//!
//! This crate provides:
//! - Supervision of an ephemeral `rkt api-service` process
//! - A gRPC client for the runtime's public pod listing
//! - Pod records rendered as archive artifacts
//! - Journal collection commands for running pods (danger mode)

pub mod artifact;
pub mod collection;
pub mod config;
pub mod error;
pub mod models;
pub mod observability;
pub mod proto;
pub mod service;

pub use artifact::{append_entries, ArchiveEntry, ArtifactHeader, PodArtifact, ARTIFACT_MODE};
pub use collection::{Collection, RktCollector};
pub use config::CollectorConfig;
pub use error::{Error, Result};
pub use models::*;
pub use observability::StructuredLogger;
