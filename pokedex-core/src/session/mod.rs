//! Browsing session owned by the UI shell
//!
//! Holds what the user is looking at: the current page and its cursor, the
//! open detail with its neighbors, and the sprite variant. Every async
//! operation takes a generation ticket before it awaits and commits only if
//! that ticket is still current, so a slow stale fetch can never overwrite
//! newer state. Failed operations leave the last good state in place.

mod generation;

pub use generation::{Generation, Ticket};

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::catalog::{
    Catalog, Direction, EntityDetail, Neighbors, PaginationCursor, PresentationVariantState,
};
use crate::error::CatalogError;

/// The open detail view
#[derive(Debug, Clone)]
pub struct DetailView {
    pub entity: Arc<EntityDetail>,
    /// `None` until the neighbor lookup finishes
    pub neighbors: Option<Neighbors>,
}

/// Everything the renderer needs to draw the current screen
#[derive(Debug, Clone)]
pub struct ViewState {
    pub cursor: PaginationCursor,
    pub page_url: Option<String>,
    pub page: Vec<Arc<EntityDetail>>,
    pub total: Option<u32>,
    pub detail: Option<DetailView>,
    pub variant: PresentationVariantState,
}

pub struct Session {
    catalog: Arc<Catalog>,
    view: Mutex<ViewState>,
    page_generation: Generation,
    detail_generation: Generation,
}

impl Session {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let view = ViewState {
            cursor: PaginationCursor::default(),
            page_url: None,
            page: Vec::new(),
            total: None,
            detail: None,
            variant: catalog.variant_state(),
        };

        Self {
            catalog,
            view: Mutex::new(view),
            page_generation: Generation::new(),
            detail_generation: Generation::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Copy of the current view
    pub async fn snapshot(&self) -> ViewState {
        self.view.lock().await.clone()
    }

    /// Load the catalog's first page
    pub async fn home(&self) -> Result<Vec<Arc<EntityDetail>>, CatalogError> {
        let url = self.catalog.config().first_page_url();
        self.load_page(&url).await
    }

    pub async fn next_page(&self) -> Result<Vec<Arc<EntityDetail>>, CatalogError> {
        self.turn_page(Direction::Forward).await
    }

    pub async fn previous_page(&self) -> Result<Vec<Arc<EntityDetail>>, CatalogError> {
        self.turn_page(Direction::Backward).await
    }

    async fn turn_page(&self, direction: Direction) -> Result<Vec<Arc<EntityDetail>>, CatalogError> {
        let url = {
            let view = self.view.lock().await;
            view.cursor
                .advance(direction)
                .map(str::to_string)
                .map_err(|u| CatalogError::PageUnavailable {
                    direction: u.direction,
                })?
        };
        self.load_page(&url).await
    }

    /// Load `url` as the current page, replacing page and cursor on success
    pub async fn load_page(&self, url: &str) -> Result<Vec<Arc<EntityDetail>>, CatalogError> {
        let ticket = self.page_generation.begin();
        let result = self.catalog.pager().load_page(url).await;

        let mut view = self.view.lock().await;
        if !self.page_generation.is_current(ticket) {
            debug!("Discarding superseded page load for {}", url);
            return Err(CatalogError::Superseded);
        }
        let page = result?;

        view.cursor.reset(page.links);
        view.page_url = Some(page.url);
        view.page = page.entities.clone();
        view.total = page.total;

        Ok(page.entities)
    }

    /// Open a detail view and resolve its neighbors
    pub async fn open(&self, entity: Arc<EntityDetail>) -> Result<DetailView, CatalogError> {
        let ticket = self.detail_generation.begin();

        {
            let mut view = self.view.lock().await;
            if !self.detail_generation.is_current(ticket) {
                return Err(CatalogError::Superseded);
            }
            view.variant.open(&entity);
            view.detail = Some(DetailView {
                entity: Arc::clone(&entity),
                neighbors: None,
            });
        }

        let neighbors = self.catalog.navigator().neighbors(&entity).await;

        let mut view = self.view.lock().await;
        if !self.detail_generation.is_current(ticket) {
            debug!("Discarding superseded neighbors of id {}", entity.id);
            return Err(CatalogError::Superseded);
        }

        let detail = DetailView {
            entity,
            neighbors: Some(neighbors),
        };
        view.detail = Some(detail.clone());
        Ok(detail)
    }

    /// Open the entity at `index` on the current page; `None` if out of range
    pub async fn open_index(&self, index: usize) -> Result<Option<DetailView>, CatalogError> {
        let entity = self.view.lock().await.page.get(index).cloned();
        match entity {
            Some(entity) => self.open(entity).await.map(Some),
            None => Ok(None),
        }
    }

    /// Search by name and open the match; the page and cursor are untouched
    ///
    /// A failed search leaves any open or opening detail alone; only a
    /// successful one supersedes it.
    pub async fn search(&self, query: &str) -> Result<DetailView, CatalogError> {
        let ticket = self.detail_generation.current();
        let result = self.catalog.resolver().resolve_by_name(query).await;

        if !self.detail_generation.is_current(ticket) {
            return Err(CatalogError::Superseded);
        }
        self.open(result?).await
    }

    /// Move the open detail to its neighbor
    ///
    /// Returns `Ok(None)` when nothing is open or there is no neighbor that
    /// way; the current detail stays open in both cases.
    pub async fn step(&self, direction: Direction) -> Result<Option<DetailView>, CatalogError> {
        let ticket = self.detail_generation.current();

        let (current, known) = {
            let view = self.view.lock().await;
            let Some(detail) = view.detail.as_ref() else {
                return Ok(None);
            };
            let known = detail
                .neighbors
                .as_ref()
                .and_then(|n| n.get(direction).as_ref().ok().cloned());
            (Arc::clone(&detail.entity), known)
        };

        let target = match known {
            Some(target) => target,
            None => self.catalog.navigator().neighbor(&current, direction).await?,
        };

        if !self.detail_generation.is_current(ticket) {
            return Err(CatalogError::Superseded);
        }

        match target {
            Some(entity) => self.open(entity).await.map(Some),
            None => Ok(None),
        }
    }

    /// Close the detail view, superseding any outstanding detail work
    pub async fn close(&self) {
        self.detail_generation.begin();
        let mut view = self.view.lock().await;
        view.detail = None;
        view.variant.close();
    }

    /// Flip shiny/normal and return the sprite now shown
    pub async fn toggle_shiny(&self) -> Option<String> {
        let mut view = self.view.lock().await;
        view.variant.toggle_shiny();
        Self::sprite_of(&view)
    }

    /// Flip front/back and return the sprite now shown
    pub async fn toggle_facing(&self) -> Option<String> {
        let mut view = self.view.lock().await;
        view.variant.toggle_facing();
        Self::sprite_of(&view)
    }

    /// Sprite for the open detail, if any
    pub async fn current_sprite_url(&self) -> Option<String> {
        Self::sprite_of(&*self.view.lock().await)
    }

    fn sprite_of(view: &ViewState) -> Option<String> {
        view.detail
            .as_ref()
            .map(|d| view.variant.current_sprite_url(&d.entity).to_string())
    }
}
