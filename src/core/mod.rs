//! Core types and traits for the scanledger library.
//!
//! This module provides the fundamental building blocks used throughout
//! the library:
//!
//! - [`types`] - Common types like `ScanType` and `ListName`
//! - [`traits`] - The `ScanApi` and `DomainSource` contracts
//! - [`error`] - Structured error types
//! - [`result`] - Scan result structures

pub mod error;
pub mod result;
pub mod traits;
pub mod types;

// Re-export commonly used types at the core level
pub use error::{
    InvalidScanType, RunError, RunResult, ScanError, ScanPhase, SourceError, StoreError,
};
pub use result::{ListResult, ScanReport};
pub use traits::{ArcScanApi, DomainSource, ScanApi, ScanStatus};
pub use types::{ListName, ScanType};
