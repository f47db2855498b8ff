//! Location classification
//!
//! Handles parsing of remote references in the format: s3://bucket/key
//! Anything else is passed through as a local path.

use std::path::PathBuf;

/// Scheme token that marks a remote location
pub const SCHEME: &str = "s3";

/// A parsed remote reference pointing to an S3 location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRef {
    /// Bucket name (never empty)
    pub bucket: String,
    /// Object key or key prefix (empty for bucket root)
    pub key: String,
}

impl RemoteRef {
    /// Create a new RemoteRef
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Match `s3://<bucket>/<key>`.
    ///
    /// `bucket` is one or more characters without a slash and `key` is the
    /// remainder, possibly empty. Returns `None` for any other shape; the
    /// bucket name is not validated further.
    pub fn parse(s: &str) -> Option<Self> {
        let rest = s.strip_prefix(SCHEME)?.strip_prefix("://")?;
        let (bucket, key) = rest.split_once('/')?;
        if bucket.is_empty() {
            return None;
        }
        Some(Self::new(bucket, key))
    }

    /// Join a relative key beneath this reference.
    ///
    /// Exactly one `/` separates a non-empty key from `child`; an empty key is
    /// the bucket root and gets no separator.
    pub fn join(&self, child: &str) -> Self {
        let child = child.trim_start_matches('/');
        let key = if self.key.is_empty() {
            child.to_string()
        } else if self.key.ends_with('/') {
            format!("{}{child}", self.key)
        } else {
            format!("{}/{child}", self.key)
        };
        Self {
            bucket: self.bucket.clone(),
            key,
        }
    }
}

impl std::fmt::Display for RemoteRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{SCHEME}://{}/{}", self.bucket, self.key)
    }
}

/// A classified location: local filesystem path or remote reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Local filesystem path
    Local(PathBuf),
    /// Remote S3 reference
    Remote(RemoteRef),
}

impl Location {
    /// Check if this is a remote location
    pub fn is_remote(&self) -> bool {
        matches!(self, Location::Remote(_))
    }

    /// Check if this is a local location
    pub fn is_local(&self) -> bool {
        matches!(self, Location::Local(_))
    }

    /// Get the remote reference if this is a remote location
    pub fn as_remote(&self) -> Option<&RemoteRef> {
        match self {
            Location::Remote(r) => Some(r),
            Location::Local(_) => None,
        }
    }

    /// Get the local path if this is a local location
    pub fn as_local(&self) -> Option<&PathBuf> {
        match self {
            Location::Local(p) => Some(p),
            Location::Remote(_) => None,
        }
    }

    /// Short label used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            Location::Local(_) => "local",
            Location::Remote(_) => "remote",
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Local(p) => write!(f, "{}", p.display()),
            Location::Remote(r) => write!(f, "{r}"),
        }
    }
}

/// Classify a string as a remote reference or a local path.
///
/// Classification is purely syntactic: nothing is checked on disk or in the
/// bucket, and a string that does not look remote is never an error.
pub fn classify(s: &str) -> Location {
    match RemoteRef::parse(s) {
        Some(remote) => Location::Remote(remote),
        None => Location::Local(PathBuf::from(s)),
    }
}
