//! Versioned post storage and refresh for the dashboard.
//!
//! Raw rows come from a [`RowSource`] (HTTP sheet service or local files),
//! get normalized by `brandpulse-ingest`, and land in the in-memory
//! [`PostStore`] keyed by brand slug and platform. Refresh batches carry a
//! monotonic version so late results from an older batch are discarded.

mod error;
mod refresh;
mod source;
mod store;

pub use error::StoreError;
pub use refresh::{refresh_brands, BrandRefresh};
pub use source::{FileSource, RowSource, SheetClient};
pub use store::{PostSet, PostStore, StoredSnapshot};
