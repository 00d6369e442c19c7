//! In-memory profiler of recent HTTP exchanges

use super::{ExchangeStart, ExchangeSummary, Interceptor};
use crate::{error::AppError, types::ExchangeStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// One finished exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRecord {
    pub id: String,
    pub method: String,
    pub url: String,
    pub status: ExchangeStatus,
    pub status_code: Option<u16>,
    pub request_headers: Vec<(String, String)>,
    pub response_headers: Vec<(String, String)>,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub body_size: Option<usize>,
    pub error: Option<String>,
}

impl ExchangeRecord {
    /// Status column text: the code, or `ERR` for failures
    pub fn status_label(&self) -> String {
        self.status_code
            .map(|code| code.to_string())
            .unwrap_or_else(|| "ERR".to_string())
    }
}

/// Bounded, shareable history of exchanges; the oldest record is evicted first
#[derive(Debug, Clone)]
pub struct ExchangeStore {
    records: Arc<Mutex<VecDeque<ExchangeRecord>>>,
    capacity: usize,
}

impl ExchangeStore {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // Poisoned locks are recovered; no update leaves the deque half-written
    fn lock(&self) -> MutexGuard<'_, VecDeque<ExchangeRecord>> {
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn push(&self, record: ExchangeRecord) {
        let mut records = self.lock();
        while records.len() >= self.capacity {
            records.pop_front();
        }
        records.push_back(record);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the records, newest first
    pub fn recent(&self) -> Vec<ExchangeRecord> {
        self.lock().iter().rev().cloned().collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

pub struct ProfilerInterceptor {
    store: ExchangeStore,
}

impl ProfilerInterceptor {
    pub fn new(store: ExchangeStore) -> Self {
        Self { store }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[async_trait]
impl Interceptor for ProfilerInterceptor {
    async fn on_response(&self, exchange: &ExchangeStart, summary: &ExchangeSummary) {
        self.store.push(ExchangeRecord {
            id: exchange.id.clone(),
            method: exchange.method.clone(),
            url: exchange.url.clone(),
            status: ExchangeStatus::Completed,
            status_code: Some(summary.status_code),
            request_headers: exchange.request_headers.clone(),
            response_headers: summary.response_headers.clone(),
            started_at: exchange.started_at,
            duration_ms: millis(summary.elapsed),
            body_size: Some(summary.body_size),
            error: None,
        });
    }

    async fn on_failure(&self, exchange: &ExchangeStart, error: &AppError, elapsed: Duration) {
        self.store.push(ExchangeRecord {
            id: exchange.id.clone(),
            method: exchange.method.clone(),
            url: exchange.url.clone(),
            status: ExchangeStatus::Failed,
            status_code: None,
            request_headers: exchange.request_headers.clone(),
            response_headers: Vec::new(),
            started_at: exchange.started_at,
            duration_ms: millis(elapsed),
            body_size: None,
            error: Some(error.to_string()),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(status_code: u16, elapsed_ms: u64) -> ExchangeSummary {
        ExchangeSummary {
            status_code,
            response_headers: vec![("content-length".to_string(), "2".to_string())],
            body_size: 2,
            elapsed: Duration::from_millis(elapsed_ms),
        }
    }

    #[tokio::test]
    async fn test_records_completed_and_failed_exchanges() {
        let store = ExchangeStore::new(8);
        let profiler = ProfilerInterceptor::new(store.clone());

        let ok = ExchangeStart::new("GET", "https://example.com/a", Vec::new());
        profiler.on_request(&ok).await;
        profiler.on_response(&ok, &summary(200, 15)).await;

        let failed = ExchangeStart::new("GET", "https://example.com/b", Vec::new());
        profiler.on_failure(&failed, &AppError::network("refused"), Duration::from_millis(3)).await;

        let recent = store.recent();
        assert_eq!(recent.len(), 2);

        assert_eq!(recent[0].url, "https://example.com/b");
        assert_eq!(recent[0].status, ExchangeStatus::Failed);
        assert_eq!(recent[0].status_label(), "ERR");
        assert_eq!(recent[0].error.as_deref(), Some("Network error: refused"));

        assert_eq!(recent[1].id, ok.id);
        assert_eq!(recent[1].status_code, Some(200));
        assert_eq!(recent[1].duration_ms, 15);
        assert_eq!(recent[1].body_size, Some(2));
    }

    #[tokio::test]
    async fn test_store_evicts_oldest() {
        let store = ExchangeStore::new(2);
        let profiler = ProfilerInterceptor::new(store.clone());

        for path in ["one", "two", "three"] {
            let exchange = ExchangeStart::new("GET", &format!("https://example.com/{}", path), Vec::new());
            profiler.on_response(&exchange, &summary(200, 1)).await;
        }

        let urls: Vec<String> = store.recent().into_iter().map(|r| r.url).collect();
        assert_eq!(urls, vec!["https://example.com/three", "https://example.com/two"]);

        store.clear();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_store_keeps_recording_after_panicking_holder() {
        let store = ExchangeStore::new(4);
        let profiler = ProfilerInterceptor::new(store.clone());

        let records = store.records.clone();
        let holder = std::thread::spawn(move || {
            let _guard = records.lock().unwrap();
            panic!("panicked while holding the exchange store");
        });
        assert!(holder.join().is_err());
        assert!(store.records.is_poisoned());

        let exchange = ExchangeStart::new("GET", "https://example.com/after", Vec::new());
        profiler.on_response(&exchange, &summary(200, 4)).await;

        assert_eq!(store.len(), 1);
        assert_eq!(store.recent()[0].url, "https://example.com/after");

        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        assert_eq!(ExchangeStore::new(0).capacity(), 1);
    }
}
