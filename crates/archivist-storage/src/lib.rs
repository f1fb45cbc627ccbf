//! Object Store Adapter (spec §4.5): deterministic blob key scheme,
//! sidecar metadata, and the JSONB record store other components use for
//! structured persistence (`CrawlTask`, `ProcessedDocument`).

pub mod blob;
pub mod documents;
pub mod error;
pub mod keys;
pub mod records;

pub use blob::{BlobStore, HeadInfo};
pub use documents::ObjectStoreAdapter;
pub use error::StorageError;
pub use records::RecordStore;
