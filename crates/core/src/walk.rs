//! Tree walking
//!
//! Enumerates the leaf files beneath a source root as a lazy stream of
//! [`SourceEntry`] values, then mirrors them one at a time under a destination
//! root. Local and remote roots differ only in the stream they supply.

use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR_STR};

use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use serde::Serialize;
use tokio::sync::mpsc;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::location::{Location, RemoteRef};
use crate::traits::ObjectStore;
use crate::transfer;

/// One file found under a source root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Full location of the file
    pub source: Location,
    /// Path relative to the root, `/`-separated; empty when the entry is the root itself
    pub relative: String,
}

/// Lazy, single-pass sequence of entries
pub type EntryStream<'a> = BoxStream<'a, Result<SourceEntry>>;

/// Totals for a finished copy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CopyReport {
    pub files: u64,
    pub bytes: u64,
}

impl CopyReport {
    pub fn record(&mut self, bytes: u64) {
        self.files += 1;
        self.bytes += bytes;
    }

    pub fn size_human(&self) -> String {
        humansize::format_size(self.bytes, humansize::BINARY)
    }
}

/// Entries buffered ahead of the consumer during a local walk
const WALK_BUFFER: usize = 64;

/// Depth-first walk of a local directory.
///
/// Directories (including the root) are skipped. Entries that cannot be read
/// are logged and skipped; the walk carries on with the rest of the tree.
/// `walkdir` blocks, so it runs on the blocking pool and feeds a bounded
/// channel. Must be called from within a tokio runtime.
pub fn local_entries(root: &Path) -> EntryStream<'static> {
    let root = root.to_path_buf();
    let (tx, rx) = mpsc::channel(WALK_BUFFER);

    tokio::task::spawn_blocking(move || {
        for entry in WalkDir::new(&root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) if entry.file_type().is_dir() => continue,
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry under {}: {e}", root.display());
                    continue;
                }
            };
            let relative = match entry.path().strip_prefix(&root) {
                Ok(rel) => relative_key(rel),
                Err(_) => String::new(),
            };
            let item = SourceEntry {
                source: Location::Local(entry.into_path()),
                relative,
            };
            // Receiver gone: the copy stopped early
            if tx.blocking_send(item).is_err() {
                break;
            }
        }
    });

    stream::unfold(rx, |mut rx| async move {
        let entry = rx.recv().await?;
        Some((Ok(entry), rx))
    })
    .boxed()
}

/// Every object whose key starts with the root key, page by page.
///
/// Matching is a plain string prefix: root `foo` also yields `foobar`.
pub fn remote_entries<'a>(store: &'a dyn ObjectStore, root: &'a RemoteRef) -> EntryStream<'a> {
    // `None` state ends the stream; `Some(token)` fetches the next page.
    let pages = stream::try_unfold(Some(None), move |state: Option<Option<String>>| async move {
        let Some(token) = state else {
            return Ok::<_, Error>(None);
        };

        let page = store.list_objects(&root.bucket, &root.key, token).await?;
        let next = match (page.truncated, page.continuation_token) {
            (true, Some(token)) => Some(Some(token)),
            _ => None,
        };

        let entries: Vec<Result<SourceEntry>> = page
            .items
            .into_iter()
            .filter_map(|item| remote_entry(root, item.key))
            .map(Ok)
            .collect();

        Ok::<_, Error>(Some((stream::iter(entries), next)))
    });

    pages.try_flatten().boxed()
}

fn remote_entry(root: &RemoteRef, key: String) -> Option<SourceEntry> {
    let Some(relative) = key.strip_prefix(root.key.as_str()) else {
        tracing::warn!("Listed key {key} does not start with {}", root.key);
        return None;
    };
    let relative = relative.to_string();

    if !root.key.is_empty()
        && !root.key.ends_with('/')
        && !relative.is_empty()
        && !relative.starts_with('/')
    {
        tracing::debug!("{key} matches prefix {} without a path separator", root.key);
    }

    Some(SourceEntry {
        source: Location::Remote(RemoteRef::new(&root.bucket, key)),
        relative,
    })
}

/// Where an entry lands beneath the destination root.
///
/// A local destination refuses relative paths that would climb out of the
/// root (`..`, absolute or drive-prefixed components). Object keys are
/// literal strings, so remote destinations take them as they are.
pub fn destination_for(root: &Location, relative: &str) -> Result<Location> {
    if relative.is_empty() {
        return Ok(root.clone());
    }
    match root {
        Location::Local(path) => Ok(Location::Local(path.join(local_relative(relative)?))),
        Location::Remote(remote) => Ok(Location::Remote(remote.join(relative))),
    }
}

fn local_relative(relative: &str) -> Result<PathBuf> {
    let native = PathBuf::from(
        relative
            .trim_start_matches('/')
            .replace('/', MAIN_SEPARATOR_STR),
    );
    let contained = native
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !contained {
        return Err(Error::General(format!(
            "refusing to write {relative:?} outside the destination directory"
        )));
    }
    Ok(native)
}

/// Copy every entry beneath `destination`, strictly in stream order.
///
/// The first failed transfer stops the walk and is returned; files already
/// copied stay in place.
pub async fn mirror(
    store: Option<&dyn ObjectStore>,
    mut entries: EntryStream<'_>,
    destination: &Location,
) -> Result<CopyReport> {
    let mut report = CopyReport::default();
    while let Some(entry) = entries.next().await {
        let entry = entry?;
        let target = destination_for(destination, &entry.relative)?;
        let bytes = transfer::transfer(store, &entry.source, &target).await?;
        report.record(bytes);
    }
    Ok(report)
}

fn relative_key(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
