//! Latency measurement and background dispatch

use crate::{
    client::HttpClient,
    error::Result,
    logging::{ErrorEventLogger, Logger, LoggerFactory},
    models::Latency,
    state::LatencyState,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Times one fetch of the target resource
pub struct LatencyProbe {
    client: Arc<dyn HttpClient>,
    target_url: String,
}

impl LatencyProbe {
    pub fn new(client: Arc<dyn HttpClient>, target_url: impl Into<String>) -> Self {
        Self {
            client,
            target_url: target_url.into(),
        }
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    /// Fetch and decode the resource, returning the monotonic elapsed time.
    /// The decoded table is dropped.
    pub async fn measure(&self) -> Result<Latency> {
        let start = Instant::now();
        let _colors = self.client.fetch_colors(&self.target_url).await?;
        Ok(Latency::from_duration(start.elapsed()))
    }
}

/// Runs measurements off the UI thread and publishes their outcome
#[derive(Clone)]
pub struct RequestDispatcher {
    probe: Arc<LatencyProbe>,
    state: LatencyState,
    runtime: Handle,
    logger: Logger,
    errors: ErrorEventLogger,
}

impl RequestDispatcher {
    pub fn new(probe: LatencyProbe, state: LatencyState, runtime: Handle, loggers: &LoggerFactory) -> Self {
        Self {
            probe: Arc::new(probe),
            state,
            runtime,
            logger: loggers.create_logger("PROBE"),
            errors: loggers.create_error_logger(),
        }
    }

    pub fn state(&self) -> &LatencyState {
        &self.state
    }

    pub fn runtime(&self) -> &Handle {
        &self.runtime
    }

    /// Spawn one measurement and return at once.
    ///
    /// Overlapping dispatches are allowed; whichever finishes last owns the
    /// screen.
    pub fn dispatch(&self) -> JoinHandle<()> {
        self.state.begin_request();

        let probe = self.probe.clone();
        let state = self.state.clone();
        let logger = self.logger.clone();
        let errors = self.errors.clone();

        self.runtime.spawn(async move {
            match probe.measure().await {
                Ok(latency) => {
                    logger.info(&latency.message())
                        .field("url", probe.target_url())
                        .field("latency_ms", latency.as_millis())
                        .log()
                        .await;
                    state.publish(latency);
                }
                Err(e) => {
                    errors.log_error(&e, Some("latency measurement"), None).await;
                    state.publish_error(e.short_message());
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        client::{HttpRequest, HttpResponse},
        error::AppError,
        logging::LogSink,
        models::Config,
    };
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Answers each request after the next scripted delay
    struct ScriptedClient {
        delays: Mutex<VecDeque<Duration>>,
        fail_with: Option<&'static str>,
        requested: Mutex<Vec<String>>,
    }

    impl ScriptedClient {
        fn new(delays: &[u64]) -> Self {
            Self {
                delays: Mutex::new(delays.iter().map(|ms| Duration::from_millis(*ms)).collect()),
                fail_with: None,
                requested: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &'static str) -> Self {
            Self { fail_with: Some(message), ..Self::new(&[0]) }
        }
    }

    #[async_trait]
    impl HttpClient for ScriptedClient {
        async fn execute_request(&self, request: HttpRequest) -> Result<HttpResponse> {
            self.get(&request.url).await
        }

        async fn get(&self, url: &str) -> Result<HttpResponse> {
            self.requested.lock().unwrap().push(url.to_string());
            let delay = self.delays.lock().unwrap().pop_front().unwrap_or_default();
            tokio::time::sleep(delay).await;

            if let Some(message) = self.fail_with {
                return Err(AppError::network(message));
            }

            Ok(HttpResponse {
                status_code: 200,
                headers: Vec::new(),
                body: br#"{"red":[255,0,0]}"#.to_vec(),
                elapsed: delay,
                final_url: url.to_string(),
            })
        }
    }

    fn dispatcher(client: Arc<ScriptedClient>) -> RequestDispatcher {
        let loggers = LoggerFactory::new(Config::default(), LogSink::Discard);
        let probe = LatencyProbe::new(client, crate::defaults::TARGET_URL);
        RequestDispatcher::new(probe, LatencyState::new(), Handle::current(), &loggers)
    }

    #[tokio::test]
    async fn test_measure_targets_fixed_url() {
        let client = Arc::new(ScriptedClient::new(&[20]));
        let probe = LatencyProbe::new(client.clone(), crate::defaults::TARGET_URL);

        let latency = probe.measure().await.unwrap();

        assert!(latency.as_millis() >= 20);
        assert_eq!(
            client.requested.lock().unwrap().as_slice(),
            ["https://raw.githubusercontent.com/Nerdy-Things/04-android-network-inspector/master/colors.json"]
        );
    }

    #[tokio::test]
    async fn test_measure_propagates_decode_errors() {
        struct NotColors;

        #[async_trait]
        impl HttpClient for NotColors {
            async fn execute_request(&self, request: HttpRequest) -> Result<HttpResponse> {
                self.get(&request.url).await
            }

            async fn get(&self, url: &str) -> Result<HttpResponse> {
                Ok(HttpResponse {
                    status_code: 200,
                    headers: Vec::new(),
                    body: b"<html></html>".to_vec(),
                    elapsed: Duration::ZERO,
                    final_url: url.to_string(),
                })
            }
        }

        let probe = LatencyProbe::new(Arc::new(NotColors), "https://example.com/colors.json");
        assert!(matches!(probe.measure().await, Err(AppError::Parse(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_dispatch_returns_immediately() {
        let dispatcher = dispatcher(Arc::new(ScriptedClient::new(&[400])));

        let started = Instant::now();
        let handle = dispatcher.dispatch();
        assert!(started.elapsed() < Duration::from_millis(100));
        assert!(dispatcher.state().snapshot().is_busy());
        assert!(dispatcher.state().snapshot().latency.is_none());

        handle.await.unwrap();

        let snapshot = dispatcher.state().snapshot();
        assert!(!snapshot.is_busy());
        let latency = snapshot.latency.unwrap();
        assert!(latency.as_millis() >= 400);
        assert_eq!(snapshot.latency_text(), Some(format!("The latest request took {} ms", latency.as_millis())));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_last_completed_measurement_wins() {
        let dispatcher = dispatcher(Arc::new(ScriptedClient::new(&[300, 20])));

        let first = dispatcher.dispatch();
        let second = dispatcher.dispatch();
        first.await.unwrap();
        second.await.unwrap();

        // The 300 ms exchange lands last whichever press it belonged to
        let snapshot = dispatcher.state().snapshot();
        assert!(snapshot.latency.unwrap().as_millis() >= 300);
        assert_eq!(snapshot.completed, 2);
        assert_eq!(snapshot.in_flight, 0);
    }

    #[tokio::test]
    async fn test_failed_measurement_surfaces_error() {
        let dispatcher = dispatcher(Arc::new(ScriptedClient::failing("connection refused")));
        dispatcher.state().publish(Latency::from_millis(10));

        dispatcher.dispatch().await.unwrap();

        let snapshot = dispatcher.state().snapshot();
        assert_eq!(snapshot.latency, Some(Latency::from_millis(10)));
        assert_eq!(snapshot.last_error.as_deref(), Some("network failed: connection refused"));
    }
}
