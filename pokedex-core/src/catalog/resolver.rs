//! Free-text search, independent of pagination

use std::sync::Arc;
use tracing::debug;

use super::{DetailCache, DetailKey, EntityDetail};
use crate::error::CatalogError;

/// Resolves search input to one entity's detail
pub struct NameResolver {
    cache: Arc<DetailCache>,
}

impl NameResolver {
    pub fn new(cache: Arc<DetailCache>) -> Self {
        Self { cache }
    }

    /// Trim and case-fold a query; `None` when nothing is left
    pub fn normalize(query: &str) -> Option<String> {
        let normalized = query.trim().to_lowercase();
        (!normalized.is_empty()).then_some(normalized)
    }

    /// Look up an entity by name (or by id when the query is numeric)
    ///
    /// `NotFound` is an ordinary outcome here: the caller shows a transient
    /// message and carries on.
    pub async fn resolve_by_name(&self, query: &str) -> Result<Arc<EntityDetail>, CatalogError> {
        let normalized = Self::normalize(query).ok_or(CatalogError::EmptyQuery)?;

        // "." and ".." cannot be sent as a path segment
        if normalized.chars().all(|c| c == '.') {
            return Err(CatalogError::NotFound {
                url: self.cache.config().name_url(&normalized),
            });
        }

        let key = match normalized.parse::<u32>() {
            Ok(id) if id > 0 => DetailKey::Id(id),
            _ => DetailKey::Name(normalized),
        };
        debug!("Searching catalog for {:?}", key);

        self.cache.resolve(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogConfig;
    use crate::transport::mock::{detail_json, MockFetcher};
    use serde_json::json;

    fn setup() -> (Arc<MockFetcher>, Arc<DetailCache>, NameResolver, CatalogConfig) {
        let config = CatalogConfig::default();
        let fetcher = Arc::new(MockFetcher::new());
        let cache = Arc::new(DetailCache::new(fetcher.clone(), config.clone()));
        (fetcher, cache.clone(), NameResolver::new(cache), config)
    }

    #[test]
    fn test_normalize() {
        assert_eq!(NameResolver::normalize("  Pikachu \n").as_deref(), Some("pikachu"));
        assert_eq!(NameResolver::normalize("MR-MIME").as_deref(), Some("mr-mime"));
        assert_eq!(NameResolver::normalize("   "), None);
    }

    #[tokio::test]
    async fn test_search_then_id_lookup_hits_cache() {
        let (fetcher, cache, resolver, config) = setup();
        fetcher.respond(&config.name_url("pikachu"), detail_json(25, "pikachu"));

        let found = resolver.resolve_by_name(" Pikachu ").await.unwrap();
        let again = cache.resolve(25).await.unwrap();

        assert!(Arc::ptr_eq(&found, &again));
        assert_eq!(fetcher.total_calls(), 1);
    }

    #[tokio::test]
    async fn test_repeated_search_hits_cache() {
        let (fetcher, _cache, resolver, config) = setup();
        fetcher.respond(&config.name_url("eevee"), detail_json(133, "eevee"));

        resolver.resolve_by_name("eevee").await.unwrap();
        resolver.resolve_by_name("EEVEE").await.unwrap();
        assert_eq!(fetcher.total_calls(), 1);
    }

    #[tokio::test]
    async fn test_numeric_query_resolves_by_id() {
        let (fetcher, _cache, resolver, config) = setup();
        fetcher.respond(&config.entity_url(150), detail_json(150, "mewtwo"));

        let found = resolver.resolve_by_name("150").await.unwrap();
        assert_eq!(found.name, "mewtwo");
    }

    #[tokio::test]
    async fn test_query_cannot_escape_its_path_segment() {
        let (fetcher, cache, resolver, config) = setup();
        // what an unescaped name would have reached
        fetcher.respond(
            &format!("{}/../pokemon-form/1", config.resource_url()),
            detail_json(1, "bulbasaur"),
        );
        fetcher.respond(
            &format!("{}/?offset=0", config.resource_url()),
            json!({"count": 1, "next": null, "previous": null, "results": []}),
        );

        let err = resolver.resolve_by_name("../pokemon-form/1").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(cache.get(1).await.is_none());
        assert_eq!(fetcher.calls(&config.name_url("../pokemon-form/1")), 1);
        assert!(config.name_url("../pokemon-form/1").ends_with("/pokemon/..%2Fpokemon-form%2F1"));

        let err = resolver.resolve_by_name("?offset=0").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(config.name_url("?offset=0").ends_with("/pokemon/%3Foffset=0"));

        let err = resolver.resolve_by_name(" .. ").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(fetcher.total_calls(), 2);
    }

    #[tokio::test]
    async fn test_unknown_and_empty_queries() {
        let (fetcher, _cache, resolver, _config) = setup();

        let err = resolver.resolve_by_name("agumon").await.unwrap_err();
        assert!(err.is_not_found());

        let err = resolver.resolve_by_name("  ").await.unwrap_err();
        assert_eq!(err, CatalogError::EmptyQuery);
        assert_eq!(fetcher.total_calls(), 1);
    }
}
