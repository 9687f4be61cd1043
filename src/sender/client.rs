use super::tags::TagRules;
use crate::domain::SinkError;
use crate::port::IngestionSink;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use reqwest::{Client, ClientBuilder};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub ingestion_url: String,
    pub api_token: String,
    pub timeout: Duration,
    pub connection_timeout: Duration,
    pub user_agent: String,
    pub tag_rules: TagRules,
}

impl ClientConfig {
    pub fn new(ingestion_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            ingestion_url: ingestion_url.into(),
            api_token: api_token.into(),
            timeout: Duration::from_secs(30),
            connection_timeout: Duration::from_secs(10),
            user_agent: format!("azure-log-forwarder/{}", env!("CARGO_PKG_VERSION")),
            tag_rules: TagRules::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryStats {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
}

#[derive(Debug, Default)]
struct ClientStats {
    total_requests: AtomicU64,
    successful_requests: AtomicU64,
    failed_requests: AtomicU64,
}

impl ClientStats {
    fn record_request(&self, success: bool) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        if success {
            self.successful_requests.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_requests.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Posts serialized records to the Log Insight Cloud ingestion endpoint.
#[derive(Debug, Clone)]
pub struct HttpIngestionClient {
    client: Client,
    ingestion_url: Url,
    authorization: HeaderValue,
    tag_rules: TagRules,
    stats: Arc<ClientStats>,
}

impl HttpIngestionClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let ingestion_url: Url = config.ingestion_url.parse().map_err(|e| {
            ClientError::InvalidConfiguration(format!("Invalid ingestion URL: {e}"))
        })?;

        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", config.api_token))
            .map_err(|e| ClientError::InvalidConfiguration(format!("Invalid API token: {e}")))?;
        authorization.set_sensitive(true);

        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(config.connection_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                ClientError::InvalidConfiguration(format!("Failed to build HTTP client: {e}"))
            })?;

        if !config.tag_rules.is_empty() {
            debug!(
                tags = ?config.tag_rules.names().collect::<Vec<_>>(),
                "Loaded tag patterns"
            );
        }

        Ok(Self {
            client,
            ingestion_url,
            authorization,
            tag_rules: config.tag_rules,
            stats: Arc::new(ClientStats::default()),
        })
    }

    pub fn ingestion_url(&self) -> &Url {
        &self.ingestion_url
    }

    pub fn tag_rules(&self) -> &TagRules {
        &self.tag_rules
    }

    pub fn stats(&self) -> DeliveryStats {
        DeliveryStats {
            total_requests: self.stats.total_requests.load(Ordering::Relaxed),
            successful_requests: self.stats.successful_requests.load(Ordering::Relaxed),
            failed_requests: self.stats.failed_requests.load(Ordering::Relaxed),
        }
    }

    /// Send one serialized record.
    pub async fn post(&self, payload: String) -> Result<(), SinkError> {
        let start = Instant::now();
        let bytes_sent = payload.len();

        let result = self
            .client
            .post(self.ingestion_url.clone())
            .header(AUTHORIZATION, self.authorization.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(payload)
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                self.stats.record_request(false);
                return Err(if e.is_timeout() {
                    SinkError::Timeout
                } else {
                    SinkError::Transport(e.to_string())
                });
            }
        };

        let status = response.status();
        self.stats.record_request(status.is_success());

        if status.is_success() {
            debug!(
                status = status.as_u16(),
                bytes_sent,
                latency_ms = start.elapsed().as_millis() as u64,
                "Record delivered"
            );
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Ingestion endpoint rejected record");
            Err(SinkError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}

impl IngestionSink for HttpIngestionClient {
    fn post_data_to_stream(
        &self,
        payload: String,
    ) -> Pin<Box<dyn Future<Output = Result<(), SinkError>> + Send + '_>> {
        Box::pin(self.post(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_url() {
        let config = ClientConfig::new("not a url", "token");
        let result = HttpIngestionClient::new(config);
        assert!(matches!(result, Err(ClientError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_rejects_token_with_control_characters() {
        let config = ClientConfig::new("https://example.com/ingest", "bad\ntoken");
        let result = HttpIngestionClient::new(config);
        assert!(matches!(result, Err(ClientError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_new_client_has_empty_stats() {
        let config = ClientConfig::new("https://example.com/ingest", "token");
        let client = HttpIngestionClient::new(config).unwrap();

        assert_eq!(client.ingestion_url().as_str(), "https://example.com/ingest");
        assert_eq!(client.stats().total_requests, 0);
        assert!(client.tag_rules().is_empty());
    }
}
