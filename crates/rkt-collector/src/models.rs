//! Core data models for pod collection

use crate::proto;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Archive path prefix for pod artifacts
pub const ARCHIVE_PREFIX: &str = "rkt/";

/// Program used to collect a running pod's journal
pub const LOG_COMMAND_PROGRAM: &str = "journalctl";

/// Machine name prefix rkt registers pods under with systemd-machined
pub const MACHINE_PREFIX: &str = "rkt-";

/// Archive directory that pod journals are written to
pub const LOG_OUTPUT_PREFIX: &str = "/rkt/";

/// Lifecycle state of a pod as reported by the runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PodState {
    #[default]
    Undefined,
    Embryo,
    Preparing,
    Prepared,
    Running,
    AbortedPrepare,
    Exited,
    Deleting,
    Garbage,
}

impl PodState {
    /// Map a wire enum value, treating unknown values as undefined
    pub fn from_wire(value: i32) -> Self {
        match proto::PodState::try_from(value) {
            Ok(proto::PodState::Embryo) => PodState::Embryo,
            Ok(proto::PodState::Preparing) => PodState::Preparing,
            Ok(proto::PodState::Prepared) => PodState::Prepared,
            Ok(proto::PodState::Running) => PodState::Running,
            Ok(proto::PodState::AbortedPrepare) => PodState::AbortedPrepare,
            Ok(proto::PodState::Exited) => PodState::Exited,
            Ok(proto::PodState::Deleting) => PodState::Deleting,
            Ok(proto::PodState::Garbage) => PodState::Garbage,
            Ok(proto::PodState::Undefined) | Err(_) => PodState::Undefined,
        }
    }
}

/// Lifecycle state of a single app inside a pod
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppState {
    #[default]
    Undefined,
    Running,
    Exited,
}

impl AppState {
    pub fn from_wire(value: i32) -> Self {
        match proto::AppState::try_from(value) {
            Ok(proto::AppState::Running) => AppState::Running,
            Ok(proto::AppState::Exited) => AppState::Exited,
            Ok(proto::AppState::Undefined) | Err(_) => AppState::Undefined,
        }
    }
}

/// Key/value annotation or label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub key: String,
    pub value: String,
}

impl From<proto::KeyValue> for Annotation {
    fn from(kv: proto::KeyValue) -> Self {
        Self {
            key: kv.key,
            value: kv.value,
        }
    }
}

/// Image an app was started from
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: String,
    pub name: String,
    pub version: String,
    /// Image format name (appc, docker, oci) and its version
    pub format: Option<String>,
    pub format_version: Option<String>,
    pub import_timestamp: i64,
    pub size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Annotation>,
}

impl From<proto::Image> for ImageRecord {
    fn from(image: proto::Image) -> Self {
        let (format, format_version) = match image.base_format {
            Some(fmt) => {
                let name = match proto::ImageType::try_from(fmt.r#type) {
                    Ok(proto::ImageType::Appc) => "appc",
                    Ok(proto::ImageType::Docker) => "docker",
                    Ok(proto::ImageType::Oci) => "oci",
                    Ok(proto::ImageType::Undefined) | Err(_) => "undefined",
                };
                (Some(name.to_string()), Some(fmt.version))
            }
            None => (None, None),
        };

        Self {
            id: image.id,
            name: image.name,
            version: image.version,
            format,
            format_version,
            import_timestamp: image.import_timestamp,
            size: image.size,
            manifest: manifest_text(image.manifest),
            annotations: image.annotations.into_iter().map(Into::into).collect(),
            labels: image.labels.into_iter().map(Into::into).collect(),
        }
    }
}

/// App running inside a pod
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppRecord {
    pub name: String,
    pub state: AppState,
    pub exit_code: i32,
    pub image: Option<ImageRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

impl From<proto::App> for AppRecord {
    fn from(app: proto::App) -> Self {
        Self {
            name: app.name,
            state: AppState::from_wire(app.state),
            exit_code: app.exit_code,
            image: app.image.map(Into::into),
            annotations: app.annotations.into_iter().map(Into::into).collect(),
        }
    }
}

/// Network a pod is attached to
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NetworkRecord {
    pub name: String,
    pub ipv4: String,
    pub ipv6: String,
}

impl From<proto::Network> for NetworkRecord {
    fn from(net: proto::Network) -> Self {
        Self {
            name: net.name,
            ipv4: net.ipv4,
            ipv6: net.ipv6,
        }
    }
}

/// Snapshot of one pod as reported by the runtime
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PodRecord {
    pub id: String,
    pub pid: i32,
    pub state: PodState,
    #[serde(default)]
    pub apps: Vec<AppRecord>,
    #[serde(default)]
    pub networks: Vec<NetworkRecord>,
    /// Pod manifest as reported by the runtime (JSON text)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    pub cgroup: String,
    pub created_at: i64,
    pub started_at: i64,
    pub gc_marked_at: i64,
}

impl PodRecord {
    /// Create a minimal record with the given id and state
    pub fn new(id: impl Into<String>, state: PodState) -> Self {
        Self {
            id: id.into(),
            state,
            ..Default::default()
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == PodState::Running
    }
}

impl From<proto::Pod> for PodRecord {
    fn from(pod: proto::Pod) -> Self {
        Self {
            id: pod.id,
            pid: pod.pid,
            state: PodState::from_wire(pod.state),
            apps: pod.apps.into_iter().map(Into::into).collect(),
            networks: pod.networks.into_iter().map(Into::into).collect(),
            manifest: manifest_text(pod.manifest),
            annotations: pod.annotations.into_iter().map(Into::into).collect(),
            cgroup: pod.cgroup,
            created_at: pod.created_at,
            started_at: pod.started_at,
            gc_marked_at: pod.gc_marked_at,
        }
    }
}

/// Manifest bytes as text; invalid UTF-8 sequences become U+FFFD
fn manifest_text(raw: Vec<u8>) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    match String::from_utf8(raw) {
        Ok(text) => Some(text),
        Err(e) => {
            debug!(
                len = e.as_bytes().len(),
                valid_up_to = e.utf8_error().valid_up_to(),
                "Manifest is not valid UTF-8, replacing invalid bytes"
            );
            Some(String::from_utf8_lossy(e.as_bytes()).into_owned())
        }
    }
}

/// External command whose output belongs in the dump at `output`
///
/// The collector only describes the command; running it is up to the
/// caller's command executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogCollectionCommand {
    pub args: Vec<String>,
    pub output: PathBuf,
}

impl LogCollectionCommand {
    /// Journal collection for a single pod
    pub fn for_pod(pod_id: &str) -> Self {
        Self {
            args: vec![
                LOG_COMMAND_PROGRAM.to_string(),
                "-M".to_string(),
                format!("{}{}", MACHINE_PREFIX, pod_id),
            ],
            output: PathBuf::from(format!("{}{}.log", LOG_OUTPUT_PREFIX, pod_id)),
        }
    }

    pub fn program(&self) -> &str {
        self.args.first().map(String::as_str).unwrap_or_default()
    }

    /// Command line as a single space-joined string
    pub fn command_line(&self) -> String {
        self.args.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_text() {
        assert_eq!(manifest_text(Vec::new()), None);
        assert_eq!(manifest_text(b"{}".to_vec()).as_deref(), Some("{}"));
        assert_eq!(
            manifest_text(vec![b'{', 0xff, b'}']).as_deref(),
            Some("{\u{fffd}}")
        );
    }

    #[test]
    fn test_pod_state_from_wire() {
        assert_eq!(PodState::from_wire(4), PodState::Running);
        assert_eq!(PodState::from_wire(6), PodState::Exited);
        assert_eq!(PodState::from_wire(0), PodState::Undefined);
        assert_eq!(PodState::from_wire(42), PodState::Undefined);
    }

    #[test]
    fn test_pod_record_from_proto() {
        let pod = proto::Pod {
            id: "abc".to_string(),
            pid: 1234,
            state: proto::PodState::Running as i32,
            apps: vec![proto::App {
                name: "etcd".to_string(),
                image: Some(proto::Image {
                    name: "coreos.com/etcd".to_string(),
                    base_format: Some(proto::ImageFormat {
                        r#type: proto::ImageType::Appc as i32,
                        version: "0.8.4".to_string(),
                    }),
                    ..Default::default()
                }),
                state: proto::AppState::Running as i32,
                exit_code: 0,
                annotations: vec![],
            }],
            networks: vec![proto::Network {
                name: "default".to_string(),
                ipv4: "172.16.28.2".to_string(),
                ipv6: String::new(),
            }],
            manifest: br#"{"acKind":"PodManifest"}"#.to_vec(),
            annotations: vec![proto::KeyValue {
                key: "owner".to_string(),
                value: "ops".to_string(),
            }],
            cgroup: "/machine.slice/machine-rkt-abc.scope".to_string(),
            created_at: 1,
            started_at: 2,
            gc_marked_at: 0,
        };

        let record = PodRecord::from(pod);
        assert_eq!(record.id, "abc");
        assert!(record.is_running());
        assert_eq!(record.apps.len(), 1);
        assert_eq!(record.apps[0].state, AppState::Running);
        let image = record.apps[0].image.as_ref().unwrap();
        assert_eq!(image.format.as_deref(), Some("appc"));
        assert_eq!(image.format_version.as_deref(), Some("0.8.4"));
        assert!(image.manifest.is_none());
        assert_eq!(record.networks[0].ipv4, "172.16.28.2");
        assert_eq!(
            record.manifest.as_deref(),
            Some(r#"{"acKind":"PodManifest"}"#)
        );
        assert_eq!(record.annotations[0].key, "owner");
    }

    #[test]
    fn test_log_command_for_pod() {
        let cmd = LogCollectionCommand::for_pod("A");
        assert_eq!(cmd.args, vec!["journalctl", "-M", "rkt-A"]);
        assert_eq!(cmd.output, PathBuf::from("/rkt/A.log"));
        assert_eq!(cmd.program(), "journalctl");
        assert_eq!(cmd.command_line(), "journalctl -M rkt-A");
    }
}
