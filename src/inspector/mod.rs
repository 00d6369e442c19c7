//! Debug-only HTTP inspection
//!
//! The client reports every exchange to an [`Inspector`], which fans the
//! events out to its interceptors. Two interceptors exist: one that logs
//! request and response headers, and a profiler that keeps the most recent
//! exchanges in memory for the on-screen inspector panel. Release builds run
//! with an empty inspector unless explicitly enabled.

pub mod header_logging;
pub mod profiler;

pub use header_logging::HeaderLoggingInterceptor;
pub use profiler::{ExchangeRecord, ExchangeStore, ProfilerInterceptor};

use crate::{
    error::AppError,
    logging::LoggerFactory,
    models::Config,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Request side of one exchange, as seen before it is sent
#[derive(Debug, Clone)]
pub struct ExchangeStart {
    pub id: String,
    pub method: String,
    pub url: String,
    pub request_headers: Vec<(String, String)>,
    pub started_at: DateTime<Utc>,
}

impl ExchangeStart {
    pub fn new(method: &str, url: &str, request_headers: Vec<(String, String)>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            method: method.to_string(),
            url: url.to_string(),
            request_headers,
            started_at: Utc::now(),
        }
    }
}

/// Response side of one exchange, reported once the body has been read
#[derive(Debug, Clone)]
pub struct ExchangeSummary {
    pub status_code: u16,
    pub response_headers: Vec<(String, String)>,
    pub body_size: usize,
    pub elapsed: Duration,
}

/// Observer of HTTP exchanges
#[async_trait]
pub trait Interceptor: Send + Sync {
    /// Called right before the request is sent
    async fn on_request(&self, _exchange: &ExchangeStart) {}

    /// Called after the response body has been read
    async fn on_response(&self, _exchange: &ExchangeStart, _summary: &ExchangeSummary) {}

    /// Called when no usable response was obtained
    async fn on_failure(&self, _exchange: &ExchangeStart, _error: &AppError, _elapsed: Duration) {}
}

/// The set of interceptors attached to a client
#[derive(Clone, Default)]
pub struct Inspector {
    interceptors: Vec<Arc<dyn Interceptor>>,
    store: Option<ExchangeStore>,
}

impl Inspector {
    /// An inspector that observes nothing
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Header logging plus profiling, when the configuration asks for it
    pub fn from_config(config: &Config, loggers: &LoggerFactory) -> Self {
        if !config.inspector_enabled {
            return Self::disabled();
        }

        let store = ExchangeStore::new(crate::defaults::PROFILER_CAPACITY);
        Self::disabled()
            .with_interceptor(Arc::new(HeaderLoggingInterceptor::new(loggers.create_network_logger())))
            .with_profiler(store)
    }

    pub fn with_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Attach a profiler that records into `store`
    pub fn with_profiler(mut self, store: ExchangeStore) -> Self {
        self.interceptors.push(Arc::new(ProfilerInterceptor::new(store.clone())));
        self.store = Some(store);
        self
    }

    pub fn is_enabled(&self) -> bool {
        !self.interceptors.is_empty()
    }

    pub fn interceptor_count(&self) -> usize {
        self.interceptors.len()
    }

    /// Profiler records, if a profiler is attached
    pub fn store(&self) -> Option<&ExchangeStore> {
        self.store.as_ref()
    }

    pub async fn request(&self, exchange: &ExchangeStart) {
        for interceptor in &self.interceptors {
            interceptor.on_request(exchange).await;
        }
    }

    pub async fn response(&self, exchange: &ExchangeStart, summary: &ExchangeSummary) {
        for interceptor in &self.interceptors {
            interceptor.on_response(exchange, summary).await;
        }
    }

    pub async fn failure(&self, exchange: &ExchangeStart, error: &AppError, elapsed: Duration) {
        for interceptor in &self.interceptors {
            interceptor.on_failure(exchange, error, elapsed).await;
        }
    }
}

impl std::fmt::Debug for Inspector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inspector")
            .field("interceptors", &self.interceptors.len())
            .field("profiling", &self.store.is_some())
            .finish()
    }
}
