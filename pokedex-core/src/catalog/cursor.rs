//! Pagination cursor over the catalog's list pages

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use super::PageLinks;

/// Which way to move through pages or neighbors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => f.write_str("next"),
            Direction::Backward => f.write_str("previous"),
        }
    }
}

/// No page exists in the requested direction; the caller must not fetch
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("no {direction} page")]
pub struct Unavailable {
    pub direction: Direction,
}

/// Forward/backward fetch endpoints of the current page
///
/// Replaced wholesale on every successful page load; a `None` edge is
/// terminal until the next reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaginationCursor {
    next_url: Option<String>,
    prev_url: Option<String>,
}

impl PaginationCursor {
    pub fn new(links: PageLinks) -> Self {
        Self {
            next_url: links.next,
            prev_url: links.previous,
        }
    }

    /// URL of the adjacent page, if there is one
    pub fn advance(&self, direction: Direction) -> Result<&str, Unavailable> {
        let url = match direction {
            Direction::Forward => self.next_url.as_deref(),
            Direction::Backward => self.prev_url.as_deref(),
        };
        url.ok_or(Unavailable { direction })
    }

    /// Overwrite both edges from a fresh page response
    pub fn reset(&mut self, links: PageLinks) {
        *self = Self::new(links);
    }

    pub fn has(&self, direction: Direction) -> bool {
        self.advance(direction).is_ok()
    }
}
