//! Pokedex Catalog - navigation and detail resolution
//!
//! # Overview
//!
//! - Page through the catalog's list endpoint
//! - Resolve list refs, ids and names to full details through one cache
//! - Walk to id±1 neighbors from any open detail
//! - Pick which sprite variant the detail view shows
//!
//! # Architecture
//!
//! ```text
//! CatalogPager ──┐
//! NameResolver ──┼──► DetailCache ──► JsonFetcher ──► catalog API
//! DetailNavigator┘
//! ```

mod cache;
mod cursor;
mod model;
mod navigator;
mod pager;
mod resolver;
mod variant;

pub use cache::{CacheStats, DetailCache, DetailKey, DetailResult};
pub use cursor::{Direction, PaginationCursor, Unavailable};
pub use model::{EntityDetail, EntityRef, PageEnvelope, PageLinks, Sprites, Stat};
pub use navigator::{DetailNavigator, Neighbor, Neighbors};
pub use pager::{CatalogPager, LoadedPage};
pub use resolver::NameResolver;
pub use variant::PresentationVariantState;

use anyhow::Result;
use std::sync::Arc;

use crate::config::CatalogConfig;
use crate::transport::{HttpFetcher, JsonFetcher};

/// All catalog components wired over one shared cache
pub struct Catalog {
    config: CatalogConfig,
    cache: Arc<DetailCache>,
    pager: CatalogPager,
    resolver: NameResolver,
    navigator: DetailNavigator,
}

impl Catalog {
    pub fn new(config: CatalogConfig, fetcher: Arc<dyn JsonFetcher>) -> Self {
        tracing::debug!("Initializing catalog over {} transport", fetcher.name());

        let cache = Arc::new(DetailCache::new(Arc::clone(&fetcher), config.clone()));
        let pager = CatalogPager::new(fetcher, Arc::clone(&cache), config.max_concurrent_fetches);

        Self {
            resolver: NameResolver::new(Arc::clone(&cache)),
            navigator: DetailNavigator::new(Arc::clone(&cache)),
            pager,
            cache,
            config,
        }
    }

    /// Catalog backed by the real HTTP transport
    pub fn connect(config: CatalogConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self::new(config, Arc::new(fetcher)))
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn cache(&self) -> &DetailCache {
        &self.cache
    }

    pub fn pager(&self) -> &CatalogPager {
        &self.pager
    }

    pub fn resolver(&self) -> &NameResolver {
        &self.resolver
    }

    pub fn navigator(&self) -> &DetailNavigator {
        &self.navigator
    }

    /// Fresh variant state using the configured threshold
    pub fn variant_state(&self) -> PresentationVariantState {
        PresentationVariantState::new(self.config.variant_sprite_max_id)
    }
}
