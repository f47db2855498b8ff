//! bcp-core: Core library for the bucketcp copy tool
//!
//! This crate provides the core functionality for bcp, including:
//! - Configuration management
//! - Location classification (local path or s3://bucket/key)
//! - ObjectStore trait for S3 operations
//! - Single-file transfers, tree walking and copy dispatch
//!
//! This crate is designed to be independent of any specific S3 SDK,
//! allowing for easy testing and potential future support for other backends.

pub mod config;
pub mod copier;
pub mod copy_spec;
pub mod error;
pub mod location;
pub mod traits;
pub mod transfer;
pub mod walk;

pub use config::{Config, ConfigManager, RemoteConfig};
pub use copier::Copier;
pub use copy_spec::{CopySpec, Direction};
pub use error::{Error, Result};
pub use location::{classify, Location, RemoteRef};
pub use traits::{ListResult, ObjectInfo, ObjectReader, ObjectStore};
pub use walk::{CopyReport, EntryStream, SourceEntry};
