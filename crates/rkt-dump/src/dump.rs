//! Writing collected pods to disk

use anyhow::{Context, Result};
use rkt_collector::{append_entries, Collection, LogCollectionCommand};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Write every pod artifact into a tar archive at `path`
pub fn write_archive(path: &Path, collection: &Collection) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create archive {}", path.display()))?;

    let mut builder = tar::Builder::new(file);
    append_entries(&mut builder, &collection.artifacts)
        .with_context(|| format!("Failed to write pod entries to {}", path.display()))?;
    builder
        .into_inner()
        .and_then(|mut file| file.flush())
        .with_context(|| format!("Failed to finish archive {}", path.display()))?;

    info!(
        path = %path.display(),
        entries = collection.artifacts.len(),
        "Wrote pod archive"
    );
    Ok(())
}

/// Render log collection commands as pretty JSON for the command executor
pub fn render_commands(commands: &[LogCollectionCommand]) -> Result<String> {
    serde_json::to_string_pretty(commands).context("Failed to serialize log commands")
}

/// Write log collection commands to `path`, or stdout when no path is given
pub fn write_commands(path: Option<&Path>, commands: &[LogCollectionCommand]) -> Result<()> {
    let json = render_commands(commands)?;
    match path {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("Failed to write log commands to {}", path.display())),
        None => {
            println!("{}", json);
            Ok(())
        }
    }
}
