//! Catalog client configuration
//!
//! ## Configuration Sources (in precedence order)
//!
//! 1. An explicit path passed on the command line
//! 2. `~/.config/pokedex/config.yaml` (platform config directory)
//! 3. Built-in defaults
//!
//! ```yaml
//! api_base_url: https://pokeapi.co/api/v2
//! resource: pokemon
//! page_size: 20
//! timeout_seconds: 30
//! max_concurrent_fetches: 6
//! variant_sprite_max_id: 649
//! ```

use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default catalog API root
pub const DEFAULT_API_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Default catalog resource
pub const DEFAULT_RESOURCE: &str = "pokemon";

/// Requests shorter than this are clamped up
const MIN_TIMEOUT_SECONDS: u64 = 5;

/// Top-level client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// API root, without the resource segment
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Resource collection browsed by the pager (e.g., "pokemon")
    #[serde(default = "default_resource")]
    pub resource: String,

    /// Entities per catalog page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Timeout for each HTTP fetch in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Detail fetches issued in parallel while loading a page
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,

    /// Entities above this id have no animated or back sprites
    #[serde(default = "default_variant_sprite_max_id")]
    pub variant_sprite_max_id: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            resource: default_resource(),
            page_size: default_page_size(),
            timeout_seconds: default_timeout(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
            variant_sprite_max_id: default_variant_sprite_max_id(),
        }
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_resource() -> String {
    DEFAULT_RESOURCE.to_string()
}

fn default_page_size() -> u32 {
    20
}

fn default_timeout() -> u64 {
    30
}

fn default_max_concurrent_fetches() -> usize {
    6
}

fn default_variant_sprite_max_id() -> u32 {
    649
}

impl CatalogConfig {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    ///
    /// A missing file yields the built-in defaults.
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        let config: CatalogConfig = if config_path.exists() {
            let content = std::fs::read_to_string(config_path).with_context(|| {
                format!("Failed to read catalog config: {}", config_path.display())
            })?;
            serde_yaml_ng::from_str(&content).with_context(|| {
                format!("Failed to parse catalog config: {}", config_path.display())
            })?
        } else {
            debug!(
                "No catalog config at {}, using defaults",
                config_path.display()
            );
            CatalogConfig::default()
        };

        config.validate()?;
        Ok(config.clamped())
    }

    /// Get the default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = directories::ProjectDirs::from("dev", "pokedex", "pokedex")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .or_else(|| dirs::config_dir().map(|d| d.join("pokedex")))
            .context("Could not determine config directory")?;

        Ok(config_dir.join("config.yaml"))
    }

    /// Reject settings that cannot drive a catalog session
    pub fn validate(&self) -> Result<()> {
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            anyhow::bail!("api_base_url must start with http:// or https://");
        }
        Url::parse(&self.resource_url())
            .with_context(|| format!("Invalid api_base_url: {}", self.api_base_url))?;
        if self.resource.trim().is_empty() {
            anyhow::bail!("resource must not be empty");
        }
        if self.page_size == 0 {
            anyhow::bail!("page_size must be at least 1");
        }
        if self.max_concurrent_fetches == 0 {
            anyhow::bail!("max_concurrent_fetches must be at least 1");
        }
        Ok(())
    }

    /// Apply lower bounds that are corrected rather than rejected
    pub fn clamped(mut self) -> Self {
        if self.timeout_seconds < MIN_TIMEOUT_SECONDS {
            warn!(
                "Configured timeout_seconds={} is too low; using minimum of {} seconds",
                self.timeout_seconds, MIN_TIMEOUT_SECONDS
            );
            self.timeout_seconds = MIN_TIMEOUT_SECONDS;
        }
        self
    }

    /// Collection endpoint, e.g. `https://pokeapi.co/api/v2/pokemon`
    pub fn resource_url(&self) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            self.resource.trim_matches('/')
        )
    }

    /// Detail URL for a numeric id (trailing slash matches list-page refs)
    pub fn entity_url(&self, id: u32) -> String {
        format!("{}/{}/", self.resource_url(), id)
    }

    /// Detail URL for an already-normalized name
    ///
    /// The name always lands in a single percent-encoded path segment, so
    /// `/`, `?` and `#` in user input cannot reach another endpoint.
    pub fn name_url(&self, name: &str) -> String {
        let mut url = match Url::parse(&self.resource_url()) {
            Ok(url) => url,
            Err(e) => {
                warn!("Cannot parse {} ({}); escaping name by hand", self.resource_url(), e);
                return format!("{}/{}", self.resource_url(), escape_segment(name));
            }
        };
        match url.path_segments_mut() {
            Ok(mut segments) => {
                segments.push(name);
            }
            Err(()) => return format!("{}/{}", self.resource_url(), escape_segment(name)),
        }
        url.to_string()
    }

    /// List URL for an arbitrary window of the catalog
    pub fn page_url(&self, offset: u32, limit: u32) -> String {
        format!("{}?offset={}&limit={}", self.resource_url(), offset, limit)
    }

    /// The "home" page
    pub fn first_page_url(&self) -> String {
        self.page_url(0, self.page_size)
    }
}

/// Percent-encode everything outside the unreserved set
fn escape_segment(segment: &str) -> String {
    segment
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{b:02X}"),
        })
        .collect()
}
