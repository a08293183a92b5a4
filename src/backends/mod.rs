//! Scan API backend implementations.
//!
//! This module contains implementations of the `ScanApi` trait for
//! driving remote scanning services.
//!
//! ## Available Backends
//!
//! - [`http`] - A batch-style HTTP service (submit, poll, fetch results)
//! - [`mock`] - A scripted in-memory service for testing
//!
//! ## Implementing a Custom Backend
//!
//! To drive a different service, implement the `ScanApi` trait:
//!
//! ```rust,ignore
//! use scanledger::core::{ListName, ScanApi, ScanError, ScanStatus, ScanType};
//! use async_trait::async_trait;
//!
//! #[derive(Debug)]
//! pub struct MyApi {
//!     // Your service's configuration
//! }
//!
//! #[async_trait]
//! impl ScanApi for MyApi {
//!     fn name(&self) -> &str {
//!         "my-service"
//!     }
//!
//!     async fn submit(
//!         &self,
//!         list: &ListName,
//!         domains: &[String],
//!         scan_type: ScanType,
//!     ) -> Result<String, ScanError> {
//!         // Submit the batch, return the assigned scan id
//!         todo!()
//!     }
//!
//!     async fn poll(&self, scan_id: &str) -> Result<ScanStatus, ScanError> {
//!         // Report the scan's current state
//!         todo!()
//!     }
//! }
//! ```

pub mod http;
pub mod mock;

// Re-exports
pub use http::{HttpApiConfig, HttpScanApi};
pub use mock::{MockScanApi, SubmittedScan};
