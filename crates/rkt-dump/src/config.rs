//! Configuration loading for rkt-dump

use anyhow::{Context, Result};
use rkt_collector::CollectorConfig;
use std::path::Path;

/// Environment prefix for every setting, e.g. `RKT_DUMP_DANGER=true`
pub const ENV_PREFIX: &str = "RKT_DUMP";

/// Load collector settings from an optional file, then the environment
///
/// Missing keys fall back to the collector defaults.
pub fn load(file: Option<&Path>) -> Result<CollectorConfig> {
    let mut builder = config::Config::builder();

    if let Some(path) = file {
        builder = builder.add_source(config::File::from(path).required(true));
    }

    let settings = builder
        .add_source(config::Environment::with_prefix(ENV_PREFIX))
        .build()
        .context("Failed to read configuration")?;

    settings
        .try_deserialize()
        .context("Failed to parse configuration")
}
