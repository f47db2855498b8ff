//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from bcp-core.

use std::path::Path;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;

use bcp_core::{
    Error, ListResult, ObjectInfo, ObjectReader, ObjectStore, RemoteConfig, RemoteRef, Result,
};

/// Maximum keys requested per listing page
const LIST_PAGE_SIZE: i32 = 1000;

/// S3 client wrapper
///
/// Built once per run and shared by reference with every transfer.
pub struct S3Client {
    inner: aws_sdk_s3::Client,
}

impl S3Client {
    /// Create a new S3 client from the remote configuration
    pub async fn new(remote: &RemoteConfig) -> Result<Self> {
        remote.validate()?;

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(remote.region.clone()));

        // Static keys win over the default credential chain
        if let Some((access_key, secret_key)) = remote.static_credentials() {
            let credentials = aws_credential_types::Credentials::new(
                access_key,
                secret_key,
                None, // session token
                None, // expiry
                "bcp-static-credentials",
            );
            loader = loader.credentials_provider(credentials);
        }

        if let Some(endpoint) = &remote.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let config = loader.load().await;

        // Custom endpoints are usually S3-compatible servers that want path-style
        let force_path_style = match remote.bucket_lookup.as_str() {
            "path" => true,
            "dns" => false,
            _ => remote.endpoint.is_some(),
        };
        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(force_path_style)
            .build();

        tracing::debug!(
            "S3 client ready (region {}, endpoint {}, path style {force_path_style})",
            remote.region,
            remote.endpoint.as_deref().unwrap_or("default")
        );

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
        })
    }

    /// Get the underlying aws-sdk-s3 client
    pub fn inner(&self) -> &aws_sdk_s3::Client {
        &self.inner
    }
}

/// Map an SDK error for `what` onto the core error kinds
fn map_sdk_error(err: impl std::fmt::Display, what: &str) -> Error {
    let err_str = err.to_string();
    if err_str.contains("NotFound")
        || err_str.contains("NoSuchKey")
        || err_str.contains("NoSuchBucket")
    {
        Error::NotFound(what.to_string())
    } else if err_str.contains("AccessDenied")
        || err_str.contains("InvalidAccessKeyId")
        || err_str.contains("SignatureDoesNotMatch")
    {
        Error::Auth(format!("{what}: {err_str}"))
    } else {
        Error::Network(format!("{what}: {err_str}"))
    }
}

/// `x-amz-copy-source` value: `bucket/key`, percent-encoded with `/` kept
fn copy_source(src: &RemoteRef) -> String {
    let key = src
        .key
        .split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/");
    format!("{}/{key}", urlencoding::encode(&src.bucket))
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        continuation_token: Option<String>,
    ) -> Result<ListResult> {
        let mut request = self
            .inner
            .list_objects_v2()
            .bucket(bucket)
            .max_keys(LIST_PAGE_SIZE);

        if !prefix.is_empty() {
            request = request.prefix(prefix);
        }

        if let Some(token) = continuation_token {
            request = request.continuation_token(token);
        }

        let response = request.send().await.map_err(|e| {
            map_sdk_error(
                aws_sdk_s3::error::DisplayErrorContext(e),
                &format!("s3://{bucket}/{prefix}"),
            )
        })?;

        let items = response
            .contents()
            .iter()
            .map(|object| {
                ObjectInfo::file(object.key().unwrap_or_default(), object.size().unwrap_or(0))
            })
            .collect();

        Ok(ListResult {
            items,
            truncated: response.is_truncated().unwrap_or(false),
            continuation_token: response.next_continuation_token().map(|s| s.to_string()),
        })
    }

    async fn get_object(&self, path: &RemoteRef) -> Result<ObjectReader> {
        let response = self
            .inner
            .get_object()
            .bucket(&path.bucket)
            .key(&path.key)
            .send()
            .await
            .map_err(|e| {
                map_sdk_error(aws_sdk_s3::error::DisplayErrorContext(e), &path.to_string())
            })?;

        Ok(Box::pin(response.body.into_async_read()))
    }

    async fn put_object(
        &self,
        path: &RemoteRef,
        src: &Path,
        content_type: Option<String>,
    ) -> Result<ObjectInfo> {
        let size = tokio::fs::metadata(src).await?.len() as i64;
        let body = ByteStream::from_path(src)
            .await
            .map_err(|e| Error::General(format!("Failed to read {}: {e}", src.display())))?;

        let mut request = self
            .inner
            .put_object()
            .bucket(&path.bucket)
            .key(&path.key)
            .body(body);

        if let Some(ct) = content_type {
            request = request.content_type(ct);
        }

        request.send().await.map_err(|e| {
            map_sdk_error(aws_sdk_s3::error::DisplayErrorContext(e), &path.to_string())
        })?;

        Ok(ObjectInfo::file(&path.key, size))
    }

    async fn copy_object(&self, src: &RemoteRef, dst: &RemoteRef) -> Result<ObjectInfo> {
        self.inner
            .copy_object()
            .copy_source(copy_source(src))
            .bucket(&dst.bucket)
            .key(&dst.key)
            .send()
            .await
            .map_err(|e| {
                map_sdk_error(aws_sdk_s3::error::DisplayErrorContext(e), &src.to_string())
            })?;

        // Copy does not report a size; the caller falls back to 0
        Ok(ObjectInfo {
            key: dst.key.clone(),
            size_bytes: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_sdk_error_not_found() {
        let err = map_sdk_error("NoSuchKey: The specified key does not exist", "s3://b/k");
        assert!(matches!(err, Error::NotFound(p) if p == "s3://b/k"));
    }

    #[test]
    fn test_map_sdk_error_auth() {
        let err = map_sdk_error("AccessDenied: Access Denied", "s3://b/k");
        assert!(matches!(err, Error::Auth(_)));
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_map_sdk_error_network() {
        let err = map_sdk_error("dispatch failure: connection refused", "s3://b/k");
        assert!(matches!(err, Error::Network(_)));
    }

    #[test]
    fn test_copy_source_plain_key() {
        let src = RemoteRef::new("bucket", "dir/sub/file.txt");
        assert_eq!(copy_source(&src), "bucket/dir/sub/file.txt");
    }

    #[test]
    fn test_copy_source_encodes_reserved_and_non_ascii() {
        let src = RemoteRef::new("b", "données/é t+x?#%.txt");
        let encoded = copy_source(&src);
        assert_eq!(encoded, "b/donn%C3%A9es/%C3%A9%20t%2Bx%3F%23%25.txt");
        assert!(encoded.is_ascii());
    }

    #[test]
    fn test_copy_source_keeps_encoded_slash_literal() {
        let src = RemoteRef::new("b", "a%2Fb");
        assert_eq!(copy_source(&src), "b/a%252Fb");
    }

    #[tokio::test]
    async fn test_new_rejects_invalid_endpoint() {
        let remote = RemoteConfig {
            endpoint: Some("::not-a-url".into()),
            ..Default::default()
        };
        assert!(S3Client::new(&remote).await.is_err());
    }

    #[tokio::test]
    async fn test_new_with_static_credentials() {
        let remote = RemoteConfig {
            endpoint: Some("http://localhost:9000".into()),
            access_key: Some("accesskey".into()),
            secret_key: Some("secretkey".into()),
            ..Default::default()
        };
        let client = S3Client::new(&remote).await.unwrap();
        assert_eq!(
            client.inner().config().region().map(|r| r.to_string()),
            Some("us-east-1".to_string())
        );
    }
}
