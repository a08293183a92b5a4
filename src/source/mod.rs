//! Domain source implementations.
//!
//! This module contains implementations of the `DomainSource` trait,
//! supplying named domain lists to a run:
//!
//! - [`file`] - JSON domains file

pub mod file;

// Re-exports
pub use file::DomainFile;
