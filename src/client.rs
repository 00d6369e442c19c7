//! HTTP client implementation and timing measurements

#[cfg(test)]
mod integration_tests;

use crate::{
    error::{AppError, Result},
    inspector::{ExchangeStart, ExchangeSummary, Inspector},
    models::Config,
    types::ColorTable,
};
use std::time::{Duration, Instant};
use reqwest::{header::HeaderMap, Client, Method, Url};
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// HTTP client trait for abstraction and testing
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request, reading the whole body
    async fn execute_request(&self, request: HttpRequest) -> Result<HttpResponse>;

    /// Execute a GET request with the client defaults
    async fn get(&self, url: &str) -> Result<HttpResponse>;

    /// Fetch the colors resource and decode it
    async fn fetch_colors(&self, url: &str) -> Result<ColorTable> {
        self.get(url).await?.json()
    }
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: Method,
    pub timeout: Duration,
    pub user_agent: Option<String>,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// Create a new HTTP request
    pub fn new(url: String, method: Method) -> Self {
        Self {
            url,
            method,
            timeout: crate::defaults::DEFAULT_TIMEOUT,
            user_agent: Some(crate::defaults::user_agent()),
            headers: Vec::new(),
        }
    }

    /// Create a GET request
    pub fn get(url: String) -> Self {
        Self::new(url, Method::GET)
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Add custom header
    pub fn with_header(mut self, name: String, value: String) -> Self {
        self.headers.push((name, value));
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = Some(user_agent);
        self
    }
}

/// HTTP response with its fully-read body
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub elapsed: Duration,
    pub final_url: String,
}

impl HttpResponse {
    /// Check if the response indicates success
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn body_size(&self) -> usize {
        self.body.len()
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| AppError::parse(format!("Invalid JSON from {}: {}", self.final_url, e)))
    }
}

fn header_pairs(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(k, v)| (k.to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
        .collect()
}

/// reqwest-backed client that reports every exchange to its inspector
pub struct NetworkClient {
    client: Client,
    inspector: Inspector,
    default_timeout: Duration,
}

impl NetworkClient {
    /// Create a new network client
    pub fn new(inspector: Inspector) -> Result<Self> {
        Self::with_timeout(inspector, crate::defaults::DEFAULT_TIMEOUT)
    }

    /// Create a new network client with custom timeout
    pub fn with_timeout(inspector: Inspector, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(crate::defaults::user_agent())
            .build()
            .map_err(|e| AppError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            inspector,
            default_timeout: timeout,
        })
    }

    pub fn inspector(&self) -> &Inspector {
        &self.inspector
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    fn build_request(&self, request: &HttpRequest) -> Result<reqwest::Request> {
        let url = Url::parse(&request.url)
            .map_err(|e| AppError::parse(format!("Invalid URL '{}': {}", request.url, e)))?;

        let mut req_builder = self.client
            .request(request.method.clone(), url)
            .timeout(request.timeout);

        for (name, value) in &request.headers {
            req_builder = req_builder.header(name, value);
        }

        // Set per request so the inspector sees it among the request headers
        if let Some(ref ua) = request.user_agent {
            req_builder = req_builder.header("User-Agent", ua);
        }

        req_builder.build()
            .map_err(|e| AppError::http_request(format!("Failed to build request: {}", e)))
    }

    /// Send and read the body; bad statuses are still reported to the inspector
    async fn send(&self, request: reqwest::Request, exchange: &ExchangeStart, start: Instant) -> Result<HttpResponse> {
        let response = self.client.execute(request).await?;

        let status_code = response.status().as_u16();
        let final_url = response.url().to_string();
        let headers = header_pairs(response.headers());

        let body = response.bytes().await?;
        let elapsed = start.elapsed();

        let summary = ExchangeSummary {
            status_code,
            response_headers: headers.clone(),
            body_size: body.len(),
            elapsed,
        };
        self.inspector.response(exchange, &summary).await;

        Ok(HttpResponse {
            status_code,
            headers,
            body: body.to_vec(),
            elapsed,
            final_url,
        })
    }
}

#[async_trait]
impl HttpClient for NetworkClient {
    async fn execute_request(&self, request: HttpRequest) -> Result<HttpResponse> {
        let built = self.build_request(&request)?;

        let exchange = ExchangeStart::new(
            built.method().as_str(),
            built.url().as_str(),
            header_pairs(built.headers()),
        );
        self.inspector.request(&exchange).await;

        let start = Instant::now();
        match self.send(built, &exchange, start).await {
            Ok(response) if response.is_success() => Ok(response),
            Ok(response) => Err(AppError::http_request(format!(
                "{} returned status {}",
                response.final_url, response.status_code
            ))),
            Err(e) => {
                self.inspector.failure(&exchange, &e, start.elapsed()).await;
                Err(e)
            }
        }
    }

    async fn get(&self, url: &str) -> Result<HttpResponse> {
        let request = HttpRequest::get(url.to_string())
            .with_timeout(self.default_timeout);
        self.execute_request(request).await
    }
}

/// HTTP client factory driven by the application configuration
pub struct ClientFactory {
    timeout: Duration,
}

impl ClientFactory {
    /// Create a new client factory
    pub fn new(config: &Config) -> Self {
        Self { timeout: config.timeout() }
    }

    /// Create a network client reporting to `inspector`
    pub fn create_network_client(&self, inspector: Inspector) -> Result<NetworkClient> {
        NetworkClient::with_timeout(inspector, self.timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_request_creation() {
        let request = HttpRequest::get("https://example.com".to_string());

        assert_eq!(request.url, "https://example.com");
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.timeout, crate::defaults::DEFAULT_TIMEOUT);
        assert_eq!(request.user_agent, Some(crate::defaults::user_agent()));
        assert!(request.headers.is_empty());
    }

    #[test]
    fn test_http_request_builder_pattern() {
        let request = HttpRequest::new("https://example.com".to_string(), Method::HEAD)
            .with_timeout(Duration::from_secs(5))
            .with_header("Accept".to_string(), "application/json".to_string())
            .with_user_agent("test-agent".to_string());

        assert_eq!(request.method, Method::HEAD);
        assert_eq!(request.timeout, Duration::from_secs(5));
        assert_eq!(request.headers[0], ("Accept".to_string(), "application/json".to_string()));
        assert_eq!(request.user_agent, Some("test-agent".to_string()));
    }

    #[test]
    fn test_http_response_json_and_status() {
        let response = HttpResponse {
            status_code: 200,
            headers: vec![],
            body: br#"{"white":[255,255,255]}"#.to_vec(),
            elapsed: Duration::from_millis(10),
            final_url: "https://example.com/colors.json".to_string(),
        };

        assert!(response.is_success());
        assert_eq!(response.body_size(), 23);
        let table: ColorTable = response.json().unwrap();
        assert_eq!(table["white"], vec![255, 255, 255]);

        let bad: Result<ColorTable> = HttpResponse { body: b"[1,2]".to_vec(), ..response }.json();
        assert!(matches!(bad, Err(AppError::Parse(_))));
    }

    #[test]
    fn test_header_pairs_keep_non_utf8_values() {
        use reqwest::header::HeaderValue;

        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        headers.insert("x-origin", HeaderValue::from_bytes(b"caf\xe9").unwrap());

        let pairs = header_pairs(&headers);
        assert!(pairs.contains(&("content-type".to_string(), "application/json".to_string())));

        let (_, origin) = pairs.iter().find(|(name, _)| name == "x-origin").unwrap();
        assert_eq!(origin, "caf\u{FFFD}");
    }

    #[test]
    fn test_network_client_creation() {
        let client = NetworkClient::new(Inspector::disabled()).unwrap();
        assert_eq!(client.default_timeout(), crate::defaults::DEFAULT_TIMEOUT);
        assert!(!client.inspector().is_enabled());
    }

    #[test]
    fn test_client_factory_uses_config_timeout() {
        let config = Config { timeout_seconds: 7, ..Default::default() };
        let client = ClientFactory::new(&config)
            .create_network_client(Inspector::disabled())
            .unwrap();
        assert_eq!(client.default_timeout(), Duration::from_secs(7));
    }

    #[test]
    fn test_build_request_rejects_invalid_url() {
        let client = NetworkClient::new(Inspector::disabled()).unwrap();
        let result = client.build_request(&HttpRequest::get("not-a-valid-url".to_string()));
        assert!(matches!(result, Err(AppError::Parse(_))));
    }

    #[test]
    fn test_build_request_carries_user_agent() {
        let client = NetworkClient::new(Inspector::disabled()).unwrap();
        let built = client.build_request(&HttpRequest::get(crate::defaults::TARGET_URL.to_string())).unwrap();

        assert_eq!(built.url().as_str(), crate::defaults::TARGET_URL);
        assert_eq!(built.method(), Method::GET);
        let ua = built.headers().get("user-agent").unwrap().to_str().unwrap();
        assert!(ua.starts_with("network-inspector/"));
    }
}
