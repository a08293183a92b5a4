//! Durable result storage.
//!
//! This module persists what a run needs to be resumable and
//! idempotent:
//!
//! - [`record`] - Per-list metadata (`ListRecord`)
//! - [`result_store`] - The filesystem store (`ResultStore`)

pub mod record;
pub mod result_store;

// Re-exports
pub use record::ListRecord;
pub use result_store::ResultStore;
