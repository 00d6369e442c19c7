//! Observable screen state
//!
//! A single `watch` slot holds everything the screen renders. Background
//! measurements write into it and the UI thread reads the latest value on each
//! frame. Writes never queue up: the most recent one wins.

use crate::models::Latency;
use std::sync::Arc;
use tokio::sync::watch;

/// Everything the screen needs to draw itself
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenState {
    /// Latest successful measurement; `None` until the first one lands
    pub latency: Option<Latency>,
    /// Message of the latest failed measurement, cleared by the next success
    pub last_error: Option<String>,
    /// Measurements dispatched but not yet published
    pub in_flight: usize,
    /// Measurements published so far, successful or not
    pub completed: u64,
}

impl ScreenState {
    /// Text of the latency label; hidden until a latency above 0 ms is published
    pub fn latency_text(&self) -> Option<String> {
        self.latency
            .filter(|latency| latency.as_millis() > 0)
            .map(|latency| latency.message())
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }
}

/// Write side of the screen state, shared by every measurement task
#[derive(Debug, Clone)]
pub struct LatencyState {
    sender: Arc<watch::Sender<ScreenState>>,
}

impl Default for LatencyState {
    fn default() -> Self {
        Self::new()
    }
}

impl LatencyState {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(ScreenState::default());
        Self { sender: Arc::new(sender) }
    }

    /// Receiver for the rendering side
    pub fn subscribe(&self) -> watch::Receiver<ScreenState> {
        self.sender.subscribe()
    }

    /// Copy of the current value
    pub fn snapshot(&self) -> ScreenState {
        self.sender.borrow().clone()
    }

    /// Note that a measurement has been dispatched
    pub fn begin_request(&self) {
        self.sender.send_modify(|state| state.in_flight += 1);
    }

    /// Publish a successful measurement
    pub fn publish(&self, latency: Latency) {
        self.sender.send_modify(|state| {
            state.latency = Some(latency);
            state.last_error = None;
            state.in_flight = state.in_flight.saturating_sub(1);
            state.completed += 1;
        });
    }

    /// Publish a failed measurement; the previous latency stays on screen
    pub fn publish_error(&self, message: String) {
        self.sender.send_modify(|state| {
            state.last_error = Some(message);
            state.in_flight = state.in_flight.saturating_sub(1);
            state.completed += 1;
        });
    }

    /// Show an error that did not come from a measurement
    pub fn report_error(&self, message: String) {
        self.sender.send_modify(|state| state.last_error = Some(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_has_no_latency_text() {
        let state = LatencyState::new();
        let snapshot = state.snapshot();

        assert_eq!(snapshot, ScreenState::default());
        assert!(snapshot.latency_text().is_none());
        assert!(!snapshot.is_busy());
    }

    #[test]
    fn test_publish_overwrites_previous_value() {
        let state = LatencyState::new();

        state.begin_request();
        state.begin_request();
        assert_eq!(state.snapshot().in_flight, 2);

        state.publish(Latency::from_millis(120));
        state.publish(Latency::from_millis(80));

        let snapshot = state.snapshot();
        assert_eq!(snapshot.latency, Some(Latency::from_millis(80)));
        assert_eq!(snapshot.latency_text().as_deref(), Some("The latest request took 80 ms"));
        assert_eq!(snapshot.in_flight, 0);
        assert_eq!(snapshot.completed, 2);
    }

    #[test]
    fn test_error_keeps_latency_and_success_clears_error() {
        let state = LatencyState::new();

        state.publish(Latency::from_millis(50));
        state.publish_error("network failed: refused".to_string());

        let snapshot = state.snapshot();
        assert_eq!(snapshot.latency, Some(Latency::from_millis(50)));
        assert_eq!(snapshot.last_error.as_deref(), Some("network failed: refused"));

        state.publish(Latency::from_millis(60));
        assert!(state.snapshot().last_error.is_none());
    }

    #[test]
    fn test_zero_latency_hides_label() {
        let state = LatencyState::new();
        state.publish(Latency::from_millis(0));

        let snapshot = state.snapshot();
        assert_eq!(snapshot.latency, Some(Latency::from_millis(0)));
        assert!(snapshot.latency_text().is_none());

        state.publish(Latency::from_millis(1));
        assert_eq!(state.snapshot().latency_text().as_deref(), Some("The latest request took 1 ms"));
    }

    #[test]
    fn test_report_error_leaves_counters_alone() {
        let state = LatencyState::new();
        state.begin_request();
        state.report_error("navigation failed: no browser".to_string());

        let snapshot = state.snapshot();
        assert_eq!(snapshot.in_flight, 1);
        assert_eq!(snapshot.completed, 0);
        assert_eq!(snapshot.last_error.as_deref(), Some("navigation failed: no browser"));
    }

    #[test]
    fn test_in_flight_never_underflows() {
        let state = LatencyState::new();
        state.publish(Latency::from_millis(1));
        assert_eq!(state.snapshot().in_flight, 0);
    }

    #[tokio::test]
    async fn test_subscriber_sees_changes() {
        let state = LatencyState::new();
        let mut receiver = state.subscribe();

        let writer = state.clone();
        tokio::spawn(async move {
            writer.publish(Latency::from_millis(33));
        });

        receiver.changed().await.unwrap();
        assert_eq!(receiver.borrow_and_update().latency, Some(Latency::from_millis(33)));
    }
}
