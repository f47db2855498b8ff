//! ObjectStore trait definition
//!
//! This trait defines the interface for S3-compatible storage operations.
//! It allows the copy logic to be decoupled from the specific S3 SDK implementation.

use std::path::Path;
use std::pin::Pin;

use async_trait::async_trait;
use tokio::io::AsyncRead;

use crate::error::Result;
use crate::location::RemoteRef;

/// Streaming body of a remote object
pub type ObjectReader = Pin<Box<dyn AsyncRead + Send>>;

/// Metadata for an object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    /// Object key
    pub key: String,

    /// Size in bytes, when the service reports one
    pub size_bytes: Option<i64>,
}

impl ObjectInfo {
    /// Create a new ObjectInfo for an object of known size
    pub fn file(key: impl Into<String>, size: i64) -> Self {
        Self {
            key: key.into(),
            size_bytes: Some(size),
        }
    }
}

/// One page of a prefix listing
#[derive(Debug, Clone, Default)]
pub struct ListResult {
    /// Listed objects, in service order
    pub items: Vec<ObjectInfo>,

    /// Whether the result is truncated (more items available)
    pub truncated: bool,

    /// Continuation token for pagination
    pub continuation_token: Option<String>,
}

/// Trait for S3-compatible storage operations
///
/// This trait is implemented by the S3 adapter and can be mocked for testing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List every object whose key starts with `prefix`, one page at a time
    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        continuation_token: Option<String>,
    ) -> Result<ListResult>;

    /// Open a read stream over an object's content
    async fn get_object(&self, path: &RemoteRef) -> Result<ObjectReader>;

    /// Upload a local file as an object, streaming it from disk
    async fn put_object(
        &self,
        path: &RemoteRef,
        src: &Path,
        content_type: Option<String>,
    ) -> Result<ObjectInfo>;

    /// Server-side copy; no object data passes through this process
    async fn copy_object(&self, src: &RemoteRef, dst: &RemoteRef) -> Result<ObjectInfo>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_info_file() {
        let info = ObjectInfo::file("test.txt", 1024);
        assert_eq!(info.key, "test.txt");
        assert_eq!(info.size_bytes, Some(1024));
    }

    #[test]
    fn test_list_result_default() {
        let page = ListResult::default();
        assert!(page.items.is_empty());
        assert!(!page.truncated);
        assert!(page.continuation_token.is_none());
    }
}
