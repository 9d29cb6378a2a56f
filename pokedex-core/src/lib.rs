//! Pokedex core library exports

pub mod catalog;
pub mod config;
pub mod error;
pub mod session;
pub mod transport;

pub use catalog::Catalog;
pub use config::CatalogConfig;
pub use error::{CatalogError, HttpError};
pub use session::Session;
