//! Logs request and response headers of every exchange

use super::{ExchangeStart, ExchangeSummary, Interceptor};
use crate::{error::AppError, logging::NetworkLogger};
use async_trait::async_trait;
use std::time::Duration;

pub struct HeaderLoggingInterceptor {
    logger: NetworkLogger,
}

impl HeaderLoggingInterceptor {
    pub fn new(logger: NetworkLogger) -> Self {
        Self { logger }
    }
}

#[async_trait]
impl Interceptor for HeaderLoggingInterceptor {
    async fn on_request(&self, exchange: &ExchangeStart) {
        self.logger
            .log_request(&exchange.id, &exchange.method, &exchange.url, &exchange.request_headers)
            .await;
    }

    async fn on_response(&self, exchange: &ExchangeStart, summary: &ExchangeSummary) {
        self.logger
            .log_response(
                &exchange.id,
                &exchange.url,
                summary.status_code,
                &summary.response_headers,
                summary.elapsed.as_secs_f64() * 1000.0,
            )
            .await;
    }

    async fn on_failure(&self, exchange: &ExchangeStart, error: &AppError, elapsed: Duration) {
        self.logger
            .log_failure(&exchange.id, &exchange.url, error, elapsed.as_secs_f64() * 1000.0)
            .await;
    }
}
