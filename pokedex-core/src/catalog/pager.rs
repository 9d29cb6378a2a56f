//! Catalog page loading
//!
//! A page is fetched as a list of refs, then every ref is resolved through
//! the shared [`DetailCache`]. Resolutions run in a bounded window and the
//! output keeps the order of the list. One failed resolution fails the page.

use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::{debug, warn};

use super::{DetailCache, EntityDetail, PageEnvelope, PageLinks};
use crate::error::CatalogError;
use crate::transport::JsonFetcher;

/// A fully resolved catalog page
#[derive(Debug, Clone)]
pub struct LoadedPage {
    pub url: String,
    /// Same order as the page's ref list
    pub entities: Vec<Arc<EntityDetail>>,
    pub links: PageLinks,
    /// Total entities in the catalog, when the server reports it
    pub total: Option<u32>,
}

pub struct CatalogPager {
    fetcher: Arc<dyn JsonFetcher>,
    cache: Arc<DetailCache>,
    max_concurrent_fetches: usize,
}

impl CatalogPager {
    pub fn new(
        fetcher: Arc<dyn JsonFetcher>,
        cache: Arc<DetailCache>,
        max_concurrent_fetches: usize,
    ) -> Self {
        Self {
            fetcher,
            cache,
            max_concurrent_fetches: max_concurrent_fetches.max(1),
        }
    }

    /// Fetch the page at `url` and resolve all of its entities
    ///
    /// The caller applies `links` to its cursor only once this succeeds.
    pub async fn load_page(&self, url: &str) -> Result<LoadedPage, CatalogError> {
        debug!("Loading catalog page {}", url);

        let value = self
            .fetcher
            .fetch_json(url)
            .await
            .map_err(|e| CatalogError::from_http(url, e))?;
        let envelope = PageEnvelope::from_json(url, &value)?;

        let ref_count = envelope.refs.len();
        let cache = &self.cache;
        let entities: Vec<Arc<EntityDetail>> = stream::iter(envelope.refs)
            .map(|entity_ref| async move { cache.resolve(entity_ref).await })
            .buffered(self.max_concurrent_fetches)
            .try_collect()
            .await
            .inspect_err(|e| warn!("Page {} aborted: {}", url, e))?;

        debug!("Loaded page {} with {} entities", url, ref_count);

        Ok(LoadedPage {
            url: url.to_string(),
            entities,
            links: envelope.links,
            total: envelope.total,
        })
    }
}
