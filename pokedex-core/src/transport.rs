//! JSON transport - Abstraction over how catalog documents are fetched
//!
//! The engine only ever needs "GET this absolute URL and give me JSON".
//! Implementations:
//! - `HttpFetcher` (reqwest)
//! - Mock (testing)

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::CatalogConfig;
use crate::error::HttpError;

/// Trait for catalog transports
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    /// Fetch and parse the JSON document at `url`
    async fn fetch_json(&self, url: &str) -> Result<Value, HttpError>;

    /// Transport identifier for logging/debugging
    fn name(&self) -> &'static str;
}

/// reqwest-backed transport
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a client honoring the configured timeout
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("pokedex/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl JsonFetcher for HttpFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Value, HttpError> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| HttpError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            if status.as_u16() != 404 {
                warn!("Catalog API error: {} from {}", status, url);
            }
            return Err(HttpError::Status {
                status: status.as_u16(),
            });
        }

        response.json::<Value>().await.map_err(|e| {
            if e.is_decode() {
                HttpError::Body(e.to_string())
            } else {
                HttpError::Transport(e.to_string())
            }
        })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Mock transport for testing
#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Canned responses keyed by URL, with per-URL call counts
    #[derive(Default)]
    pub struct MockFetcher {
        responses: Mutex<HashMap<String, Result<Value, HttpError>>>,
        calls: Mutex<HashMap<String, usize>>,
        delays: Mutex<HashMap<String, Duration>>,
    }

    impl MockFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(&self, url: &str, body: Value) {
            self.responses
                .lock()
                .unwrap()
                .insert(url.to_string(), Ok(body));
        }

        pub fn fail(&self, url: &str, err: HttpError) {
            self.responses
                .lock()
                .unwrap()
                .insert(url.to_string(), Err(err));
        }

        pub fn delay(&self, url: &str, delay: Duration) {
            self.delays.lock().unwrap().insert(url.to_string(), delay);
        }

        pub fn calls(&self, url: &str) -> usize {
            self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
        }

        pub fn total_calls(&self) -> usize {
            self.calls.lock().unwrap().values().sum()
        }
    }

    #[async_trait]
    impl JsonFetcher for MockFetcher {
        async fn fetch_json(&self, url: &str) -> Result<Value, HttpError> {
            *self
                .calls
                .lock()
                .unwrap()
                .entry(url.to_string())
                .or_insert(0) += 1;

            let delay = self.delays.lock().unwrap().get(url).copied();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            self.responses
                .lock()
                .unwrap()
                .get(url)
                .cloned()
                .unwrap_or(Err(HttpError::Status { status: 404 }))
        }

        fn name(&self) -> &'static str {
            "mock"
        }
    }

    /// Minimal PokeAPI-shaped detail document
    pub fn detail_json(id: u32, name: &str) -> Value {
        serde_json::json!({
            "id": id,
            "name": name,
            "height": 4,
            "weight": 60,
            "types": [{"slot": 1, "type": {"name": "electric"}}],
            "stats": [
                {"base_stat": 35, "stat": {"name": "hp"}},
                {"base_stat": 55, "stat": {"name": "attack"}}
            ],
            "abilities": [
                {"ability": {"name": "static"}, "is_hidden": false, "slot": 1}
            ],
            "sprites": {
                "front_default": format!("https://img/{id}.png"),
                "front_shiny": format!("https://img/shiny/{id}.png"),
                "back_default": format!("https://img/back/{id}.png"),
                "back_shiny": null
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::mock::*;
    use super::*;

    #[tokio::test]
    async fn test_mock_fetcher_counts_calls() {
        let fetcher = MockFetcher::new();
        fetcher.respond("https://x/1/", detail_json(1, "bulbasaur"));

        let body = fetcher.fetch_json("https://x/1/").await.unwrap();
        assert_eq!(body["name"], "bulbasaur");
        assert_eq!(fetcher.calls("https://x/1/"), 1);

        let missing = fetcher.fetch_json("https://x/2/").await;
        assert_eq!(missing, Err(HttpError::Status { status: 404 }));
        assert_eq!(fetcher.total_calls(), 2);
    }

    #[test]
    fn test_http_fetcher_builds_from_default_config() {
        let fetcher = HttpFetcher::new(&CatalogConfig::default()).unwrap();
        assert_eq!(fetcher.name(), "http");
    }
}
