//! Archive artifacts for collected pods
//!
//! Each pod becomes one entry in the diagnostic archive. The entry content is
//! the YAML rendering of the pod record and is produced lazily, once.

use crate::models::{PodRecord, ARCHIVE_PREFIX};
use std::io::{self, Write};
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Permission bits for every pod entry
pub const ARTIFACT_MODE: u32 = 0o666;

/// Archive entry metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactHeader {
    pub name: String,
    pub size: u64,
    pub mode: u32,
    /// Seconds since the Unix epoch
    pub mtime: i64,
    /// Symlink target, if the entry is a link
    pub link: Option<String>,
}

impl ArtifactHeader {
    /// Build a ustar/GNU header for this entry
    pub fn to_tar_header(&self) -> io::Result<tar::Header> {
        let mut header = tar::Header::new_gnu();
        header.set_path(&self.name)?;
        header.set_mode(self.mode);
        header.set_mtime(u64::try_from(self.mtime).unwrap_or(0));
        match &self.link {
            Some(target) => {
                header.set_entry_type(tar::EntryType::Symlink);
                header.set_link_name(target)?;
                header.set_size(0);
            }
            None => {
                header.set_entry_type(tar::EntryType::Regular);
                header.set_size(self.size);
            }
        }
        header.set_cksum();
        Ok(header)
    }
}

/// Something the archive writer can store
pub trait ArchiveEntry {
    /// Serialized entry body
    fn content(&self) -> &[u8];

    /// Entry metadata; the size always matches `content()`
    fn header(&self) -> ArtifactHeader;

    /// Path of the entry inside the archive
    fn name(&self) -> String;

    /// Symlink target, empty for regular entries
    fn link(&self) -> &str;
}

/// A single pod rendered as an archive entry
#[derive(Debug)]
pub struct PodArtifact {
    pod: PodRecord,
    content: OnceLock<Vec<u8>>,
    link: Option<String>,
    created_at: i64,
}

impl PodArtifact {
    pub fn new(pod: PodRecord) -> Self {
        Self {
            pod,
            content: OnceLock::new(),
            link: None,
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Mark this artifact as a symlink to `target`
    pub fn as_link(mut self, target: impl Into<String>) -> Self {
        self.link = Some(target.into());
        self
    }

    pub fn pod(&self) -> &PodRecord {
        &self.pod
    }

    pub fn into_pod(self) -> PodRecord {
        self.pod
    }

    pub fn pod_id(&self) -> &str {
        &self.pod.id
    }

    fn render(&self) -> Vec<u8> {
        debug!(pod_id = %self.pod.id, "Collecting pod data");
        match serde_yaml::to_string(&self.pod) {
            Ok(yaml) => yaml.into_bytes(),
            Err(e) => {
                warn!(pod_id = %self.pod.id, error = %e, "Failed to render pod record");
                Vec::new()
            }
        }
    }
}

impl ArchiveEntry for PodArtifact {
    fn content(&self) -> &[u8] {
        self.content.get_or_init(|| self.render())
    }

    fn header(&self) -> ArtifactHeader {
        let size = self.content().len() as u64;
        ArtifactHeader {
            name: self.name(),
            size,
            mode: ARTIFACT_MODE,
            mtime: self.created_at,
            link: self.link.clone(),
        }
    }

    fn name(&self) -> String {
        format!("{}{}", ARCHIVE_PREFIX, self.pod.id)
    }

    fn link(&self) -> &str {
        self.link.as_deref().unwrap_or_default()
    }
}

/// Append every entry to a tar archive
pub fn append_entries<W, E>(builder: &mut tar::Builder<W>, entries: &[E]) -> io::Result<()>
where
    W: Write,
    E: ArchiveEntry,
{
    for entry in entries {
        let header = entry.header().to_tar_header()?;
        if entry.link().is_empty() {
            builder.append(&header, entry.content())?;
        } else {
            builder.append(&header, io::empty())?;
        }
    }
    Ok(())
}
