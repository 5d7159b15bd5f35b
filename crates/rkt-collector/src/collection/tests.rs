//! Tests for the collection run
//!
//! The api-service and the pod listing are replaced with in-process fakes
//! that count calls, so every exit path can be checked for cleanup.

#[cfg(test)]
mod collector_tests {
    use crate::artifact::ArchiveEntry;
    use crate::collection::{log_commands_for, RktCollector};
    use crate::config::CollectorConfig;
    use crate::error::{Error, Result};
    use crate::models::{LogCollectionCommand, PodRecord, PodState};
    use crate::service::{async_trait, ApiService, PodQueryClient, PodQueryClientBuilder, PodSource};
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Clone, Copy)]
    enum StartOutcome {
        Ok,
        TooFast,
        NotFound,
    }

    #[derive(Default)]
    struct Calls {
        starts: AtomicUsize,
        stops: AtomicUsize,
        lists: AtomicUsize,
    }

    struct FakeService {
        start: StartOutcome,
        stop_fails: bool,
        calls: Arc<Calls>,
    }

    #[async_trait]
    impl ApiService for FakeService {
        async fn start(&mut self) -> Result<()> {
            self.calls.starts.fetch_add(1, Ordering::SeqCst);
            match self.start {
                StartOutcome::Ok => Ok(()),
                StartOutcome::TooFast => Err(Error::StartupTooFast {
                    program: "rkt".to_string(),
                }),
                StartOutcome::NotFound => Err(Error::ExecutableNotFound {
                    program: "rkt".to_string(),
                }),
            }
        }

        async fn stop(&mut self) -> Result<()> {
            self.calls.stops.fetch_add(1, Ordering::SeqCst);
            if self.stop_fails {
                Err(Error::Cleanup(std::io::Error::other("no such process")))
            } else {
                Ok(())
            }
        }
    }

    struct FakeSource {
        pods: Option<Vec<PodRecord>>,
        calls: Arc<Calls>,
    }

    #[async_trait]
    impl PodSource for FakeSource {
        async fn list_pods(&self) -> Result<Vec<PodRecord>> {
            self.calls.lists.fetch_add(1, Ordering::SeqCst);
            match &self.pods {
                Some(pods) => Ok(pods.clone()),
                None => Err(Error::Query(tonic::Status::internal("listing failed"))),
            }
        }
    }

    fn collector(
        start: StartOutcome,
        stop_fails: bool,
        pods: Option<Vec<PodRecord>>,
        danger: bool,
    ) -> (RktCollector, Arc<Calls>) {
        let calls = Arc::new(Calls::default());
        let service = FakeService {
            start,
            stop_fails,
            calls: calls.clone(),
        };
        let source = FakeSource {
            pods,
            calls: calls.clone(),
        };
        (
            RktCollector::new(Box::new(service), Box::new(source), danger),
            calls,
        )
    }

    fn mixed_pods() -> Vec<PodRecord> {
        vec![
            PodRecord::new("A", PodState::Running),
            PodRecord::new("B", PodState::Exited),
            PodRecord::new("C", PodState::Running),
        ]
    }

    #[tokio::test]
    async fn test_collect_wraps_pods_in_order() {
        let (mut collector, calls) = collector(StartOutcome::Ok, false, Some(mixed_pods()), false);

        let collection = collector.collect().await.unwrap();

        let names: Vec<String> = collection.artifacts.iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["rkt/A", "rkt/B", "rkt/C"]);
        assert_eq!(calls.starts.load(Ordering::SeqCst), 1);
        assert_eq!(calls.lists.load(Ordering::SeqCst), 1);
        assert_eq!(calls.stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_log_commands_without_danger() {
        let (mut collector, _) = collector(StartOutcome::Ok, false, Some(mixed_pods()), false);

        let collection = collector.collect().await.unwrap();
        assert_eq!(collection.artifacts.len(), 3);
        assert!(collection.log_commands.is_empty());
    }

    #[tokio::test]
    async fn test_danger_mode_commands_for_running_pods() {
        let (mut collector, _) = collector(StartOutcome::Ok, false, Some(mixed_pods()), true);

        let collection = collector.collect().await.unwrap();

        assert_eq!(
            collection.log_commands,
            vec![
                LogCollectionCommand {
                    args: vec!["journalctl".into(), "-M".into(), "rkt-A".into()],
                    output: PathBuf::from("/rkt/A.log"),
                },
                LogCollectionCommand {
                    args: vec!["journalctl".into(), "-M".into(), "rkt-C".into()],
                    output: PathBuf::from("/rkt/C.log"),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_danger_mode_with_no_pods() {
        let (mut collector, _) = collector(StartOutcome::Ok, false, Some(vec![]), true);

        let collection = collector.collect().await.unwrap();
        assert!(collection.artifacts.is_empty());
        assert!(collection.log_commands.is_empty());
    }

    #[tokio::test]
    async fn test_start_failure_still_stops_once() {
        let (mut collector, calls) = collector(StartOutcome::TooFast, false, Some(mixed_pods()), true);

        let err = collector.collect().await.unwrap_err();
        assert!(matches!(err, Error::StartupTooFast { .. }));
        assert_eq!(calls.lists.load(Ordering::SeqCst), 0);
        assert_eq!(calls.stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_executable_aborts() {
        let (mut collector, calls) = collector(StartOutcome::NotFound, false, Some(mixed_pods()), false);

        let err = collector.collect().await.unwrap_err();
        assert!(matches!(err, Error::ExecutableNotFound { .. }));
        assert_eq!(calls.lists.load(Ordering::SeqCst), 0);
        assert_eq!(calls.stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_list_failure_still_stops_once() {
        let (mut collector, calls) = collector(StartOutcome::Ok, false, None, true);

        let err = collector.collect().await.unwrap_err();
        assert!(matches!(err, Error::Query(_)));
        assert_eq!(calls.stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stop_failure_is_swallowed() {
        let (mut collector, calls) = collector(StartOutcome::Ok, true, Some(mixed_pods()), false);

        let collection = collector.collect().await.unwrap();
        assert_eq!(collection.artifacts.len(), 3);
        assert_eq!(calls.stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stop_failure_does_not_mask_start_error() {
        let (mut collector, _) = collector(StartOutcome::TooFast, true, None, false);

        let err = collector.collect().await.unwrap_err();
        assert!(matches!(err, Error::StartupTooFast { .. }));
    }

    #[tokio::test]
    async fn test_connection_error_yields_nothing() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let client: PodQueryClient = PodQueryClientBuilder::new()
            .endpoint(format!("http://127.0.0.1:{}", port))
            .connect_timeout(Duration::from_secs(1))
            .build();

        let calls = Arc::new(Calls::default());
        let service = FakeService {
            start: StartOutcome::Ok,
            stop_fails: false,
            calls: calls.clone(),
        };
        let mut collector = RktCollector::new(Box::new(service), Box::new(client), true);

        let err = collector.collect().await.unwrap_err();
        assert!(matches!(err, Error::Connection { .. }), "got {:?}", err);
        assert_eq!(calls.stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_log_commands_for_skips_non_running() {
        let pods = vec![
            PodRecord::new("x", PodState::Prepared),
            PodRecord::new("y", PodState::Garbage),
        ];
        assert!(log_commands_for(&pods).is_empty());
    }

    #[test]
    fn test_from_config() {
        let config = CollectorConfig {
            danger: true,
            ..Default::default()
        };
        let collector = RktCollector::from_config(&config);
        assert!(collector.danger());
    }
}
