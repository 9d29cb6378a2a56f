//! Sequential id±1 browsing inside a detail view
//!
//! Neighbors are looked up by arithmetic on the id, so the walk crosses
//! catalog page boundaries freely. A missing id is a gap, not a failure.

use std::sync::Arc;
use tracing::debug;

use super::{DetailCache, Direction, EntityDetail};
use crate::error::CatalogError;

/// One side of a neighbor lookup: `Ok(None)` means there is no such entity
pub type Neighbor = Result<Option<Arc<EntityDetail>>, CatalogError>;

/// Both neighbors of a centre entity, resolved independently
#[derive(Debug, Clone)]
pub struct Neighbors {
    pub previous: Neighbor,
    pub next: Neighbor,
}

impl Neighbors {
    pub fn get(&self, direction: Direction) -> &Neighbor {
        match direction {
            Direction::Forward => &self.next,
            Direction::Backward => &self.previous,
        }
    }
}

pub struct DetailNavigator {
    cache: Arc<DetailCache>,
}

impl DetailNavigator {
    pub fn new(cache: Arc<DetailCache>) -> Self {
        Self { cache }
    }

    /// Resolve both neighbors concurrently
    pub async fn neighbors(&self, center: &EntityDetail) -> Neighbors {
        let (previous, next) = tokio::join!(
            self.neighbor(center, Direction::Backward),
            self.neighbor(center, Direction::Forward)
        );
        Neighbors { previous, next }
    }

    /// Resolve the neighbor on one side
    ///
    /// Ids below 1 are absent without a fetch. There is no upper bound: the
    /// catalog's `NotFound` marks the end.
    pub async fn neighbor(&self, center: &EntityDetail, direction: Direction) -> Neighbor {
        let candidate = match direction {
            Direction::Backward => center.id.checked_sub(1).filter(|id| *id > 0),
            Direction::Forward => center.id.checked_add(1),
        };

        let Some(id) = candidate else {
            debug!("No {} neighbor for id {}", direction, center.id);
            return Ok(None);
        };

        match self.cache.resolve(id).await {
            Ok(detail) => Ok(Some(detail)),
            Err(err) if err.is_not_found() => {
                debug!("Neighbor id {} does not exist", id);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}
