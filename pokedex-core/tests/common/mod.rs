//! Test helper functions for integration tests
//!
//! Shared across test files using the tests/common/ pattern.

use async_trait::async_trait;
use pokedex_core::transport::JsonFetcher;
use pokedex_core::{Catalog, CatalogConfig, HttpError};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

/// Initialize logging for tests (only once per test run)
static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .with_target(true)
                    .with_level(true),
            )
            .with(tracing_subscriber::filter::EnvFilter::from_default_env())
            .try_init();
    });
}

/// In-memory catalog server; unknown URLs answer 404
#[derive(Default)]
pub struct FakeCatalog {
    responses: Mutex<HashMap<String, Result<Value, HttpError>>>,
    delays: Mutex<HashMap<String, Duration>>,
    calls: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn respond(&self, url: &str, body: Value) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), Ok(body));
    }

    pub fn fail(&self, url: &str, status: u16) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), Err(HttpError::Status { status }));
    }

    pub fn delay(&self, url: &str, millis: u64) {
        self.delays
            .lock()
            .unwrap()
            .insert(url.to_string(), Duration::from_millis(millis));
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|u| *u == url).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Register an entity under both its id URL and its name URL
    pub fn add_entity(&self, config: &CatalogConfig, id: u32, name: &str) {
        let body = entity_json(id, name);
        self.respond(&config.entity_url(id), body.clone());
        self.respond(&config.name_url(name), body);
    }

    /// Register a list page pointing at `ids` via their id URLs
    pub fn add_page(
        &self,
        config: &CatalogConfig,
        url: &str,
        entries: &[(u32, &str)],
        next: Option<&str>,
        previous: Option<&str>,
    ) {
        let results: Vec<Value> = entries
            .iter()
            .map(|(id, name)| json!({"name": name, "url": config.entity_url(*id)}))
            .collect();
        self.respond(
            url,
            json!({"count": 1302, "next": next, "previous": previous, "results": results}),
        );
    }
}

#[async_trait]
impl JsonFetcher for FakeCatalog {
    async fn fetch_json(&self, url: &str) -> Result<Value, HttpError> {
        self.calls.lock().unwrap().push(url.to_string());

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
        "fake"
    }
}

/// PokeAPI-shaped detail document
pub fn entity_json(id: u32, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "height": 7,
        "weight": 69,
        "types": [
            {"slot": 1, "type": {"name": "grass"}},
            {"slot": 2, "type": {"name": "poison"}}
        ],
        "stats": [
            {"base_stat": 45, "stat": {"name": "hp"}},
            {"base_stat": 49, "stat": {"name": "attack"}},
            {"base_stat": 45, "stat": {"name": "speed"}}
        ],
        "abilities": [
            {"ability": {"name": "overgrow"}, "is_hidden": false, "slot": 1},
            {"ability": {"name": "chlorophyll"}, "is_hidden": true, "slot": 3}
        ],
        "sprites": {
            "front_default": format!("https://sprites/{id}.png"),
            "front_shiny": format!("https://sprites/shiny/{id}.png"),
            "back_default": format!("https://sprites/back/{id}.png"),
            "back_shiny": format!("https://sprites/back/shiny/{id}.png"),
            "other": {"official-artwork": {"front_default": format!("https://artwork/{id}.png")}}
        }
    })
}

/// Catalog over a fresh fake server with default config
pub fn fake_catalog() -> (Arc<FakeCatalog>, Arc<Catalog>, CatalogConfig) {
    init_test_logging();
    let config = CatalogConfig::default();
    let fake = Arc::new(FakeCatalog::default());
    let catalog = Arc::new(Catalog::new(config.clone(), fake.clone()));
    (fake, catalog, config)
}
