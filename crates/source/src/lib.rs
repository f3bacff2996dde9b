//! # Flowmap Source
//!
//! Where attention payloads come from.
//!
//! - [`DataSourceRegistry`] keeps the named sources in a [`KeyValueStore`]
//!   and always offers the demo source.
//! - [`SourceLoader`] fetches a source over HTTP or from disk and decodes it.
//! - [`LoadCoordinator`] makes sure only the latest of several overlapping
//!   loads is applied.

mod coordinator;
mod error;
mod loader;
mod registry;
mod store;

pub use coordinator::{LoadCoordinator, LoadTicket};
pub use error::{Result, SourceError};
pub use loader::{DatasetLoader, SourceLoader};
pub use registry::{DataSourceRegistry, CURRENT_SOURCE_KEY, SOURCES_KEY};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
