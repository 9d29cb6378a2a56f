//! Catalog error types
//!
//! Every failure is scoped to the single operation that triggered it. The
//! variants are `Clone` because one shared detail fetch hands the same
//! outcome to every caller waiting on it.

use thiserror::Error;

use crate::catalog::Direction;

/// Failure reported by a [`JsonFetcher`](crate::transport::JsonFetcher)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HttpError {
    /// The server answered with a non-2xx status
    #[error("HTTP {status}")]
    Status { status: u16 },

    /// The request never produced a response (DNS, TLS, timeout, reset)
    #[error("transport failure: {0}")]
    Transport(String),

    /// The response body was not valid JSON
    #[error("invalid JSON body: {0}")]
    Body(String),
}

/// Errors surfaced by the catalog engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Transport failure or a non-2xx status other than 404
    #[error("Network error fetching {url}: {message}")]
    Network { url: String, message: String },

    /// The server confirmed the requested entity does not exist
    #[error("No catalog entry at {url}")]
    NotFound { url: String },

    /// The response parsed as JSON but lacked the expected fields
    #[error("Malformed response from {url}: {message}")]
    MalformedResponse { url: String, message: String },

    /// The cursor has no page in the requested direction
    #[error("No {direction} page available")]
    PageUnavailable { direction: Direction },

    /// A search was submitted with nothing to search for
    #[error("Search query is empty")]
    EmptyQuery,

    /// A newer navigation replaced the operation before it finished
    #[error("Operation superseded by newer navigation")]
    Superseded,
}

impl CatalogError {
    /// Map a transport failure for `url` into the catalog taxonomy
    pub fn from_http(url: &str, err: HttpError) -> Self {
        match err {
            HttpError::Status { status: 404 } => CatalogError::NotFound {
                url: url.to_string(),
            },
            HttpError::Status { status } => CatalogError::Network {
                url: url.to_string(),
                message: format!("HTTP {status}"),
            },
            HttpError::Transport(message) => CatalogError::Network {
                url: url.to_string(),
                message,
            },
            HttpError::Body(message) => CatalogError::MalformedResponse {
                url: url.to_string(),
                message,
            },
        }
    }

    pub(crate) fn malformed(url: &str, message: impl Into<String>) -> Self {
        CatalogError::MalformedResponse {
            url: url.to_string(),
            message: message.into(),
        }
    }

    /// True when the server confirmed absence
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }

    /// True when retrying the same operation could succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, CatalogError::Network { .. })
    }

    /// Short text for a transient, auto-clearing message in the UI
    pub fn user_message(&self) -> String {
        match self {
            CatalogError::Network { .. } => {
                "Could not reach the catalog. Please try again.".to_string()
            }
            // list pages carry their window in the query string
            CatalogError::NotFound { url } if url.contains('?') => {
                "That catalog page no longer exists.".to_string()
            }
            CatalogError::NotFound { .. } => "No matching Pokémon found.".to_string(),
            CatalogError::MalformedResponse { .. } => {
                "The catalog sent an unexpected response.".to_string()
            }
            CatalogError::PageUnavailable { direction } => {
                format!("There is no {direction} page.")
            }
            CatalogError::EmptyQuery => "Type a name to search.".to_string(),
            CatalogError::Superseded => String::new(),
        }
    }
}
