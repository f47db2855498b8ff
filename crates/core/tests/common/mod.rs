//! In-memory object store shared by the integration tests

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bcp_core::{Error, ListResult, ObjectInfo, ObjectReader, ObjectStore, RemoteRef, Result};

/// Objects keyed by (bucket, key), listed in key order like S3
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<BTreeMap<(String, String), Vec<u8>>>,
    page_size: usize,
    pub gets: AtomicUsize,
    pub puts: AtomicUsize,
    pub copies: AtomicUsize,
}

impl MemoryStore {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            ..Default::default()
        }
    }

    pub fn insert(&self, bucket: &str, key: &str, data: &[u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), data.to_vec());
    }

    pub fn get(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn keys(&self, bucket: &str) -> Vec<String> {
        self.objects
            .lock()
            .unwrap()
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        continuation_token: Option<String>,
    ) -> Result<ListResult> {
        let objects = self.objects.lock().unwrap();
        let mut matching = objects
            .iter()
            .filter(|((b, k), _)| b == bucket && k.starts_with(prefix))
            .filter(|((_, k), _)| match &continuation_token {
                Some(after) => k > after,
                None => true,
            })
            .map(|((_, k), v)| ObjectInfo::file(k.clone(), v.len() as i64));

        let items: Vec<ObjectInfo> = matching.by_ref().take(self.page_size).collect();
        let truncated = matching.next().is_some();
        let continuation_token = if truncated {
            items.last().map(|i| i.key.clone())
        } else {
            None
        };

        Ok(ListResult {
            items,
            truncated,
            continuation_token,
        })
    }

    async fn get_object(&self, path: &RemoteRef) -> Result<ObjectReader> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        let data = self
            .get(&path.bucket, &path.key)
            .ok_or_else(|| Error::NotFound(path.to_string()))?;
        Ok(Box::pin(std::io::Cursor::new(data)))
    }

    async fn put_object(
        &self,
        path: &RemoteRef,
        src: &Path,
        _content_type: Option<String>,
    ) -> Result<ObjectInfo> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        let data = tokio::fs::read(src).await?;
        let size = data.len() as i64;
        self.insert(&path.bucket, &path.key, &data);
        Ok(ObjectInfo::file(path.key.clone(), size))
    }

    async fn copy_object(&self, src: &RemoteRef, dst: &RemoteRef) -> Result<ObjectInfo> {
        self.copies.fetch_add(1, Ordering::SeqCst);
        let data = self
            .get(&src.bucket, &src.key)
            .ok_or_else(|| Error::NotFound(src.to_string()))?;
        let size = data.len() as i64;
        self.insert(&dst.bucket, &dst.key, &data);
        Ok(ObjectInfo::file(dst.key.clone(), size))
    }
}
