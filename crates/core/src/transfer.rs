//! Single-file transfer
//!
//! One routine per (local|remote) x (local|remote) combination. Each logs a
//! progress line before moving any bytes and returns the number of bytes
//! transferred. Local destinations get their parent directories created and
//! are synced to disk before returning.

use std::path::Path;

use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::error::{Error, Result};
use crate::location::{Location, RemoteRef};
use crate::traits::ObjectStore;

/// Read buffer for downloads
const DOWNLOAD_CHUNK: usize = 64 * 1024;

/// Copy one local file to another local path
pub async fn local_to_local(src: &Path, dst: &Path) -> Result<u64> {
    tracing::info!(
        "Copying from \"{}\" to \"{}\"",
        src.display(),
        dst.display()
    );

    let mut reader = fs::File::open(src)
        .await
        .map_err(|e| Error::from_io(e, src.display()))?;

    create_parent_dirs(dst).await?;
    let mut writer = fs::File::create(dst).await?;

    let bytes = tokio::io::copy(&mut reader, &mut writer).await?;
    finish_local(writer).await?;
    Ok(bytes)
}

/// Upload one local file to an object
pub async fn local_to_remote(store: &dyn ObjectStore, src: &Path, dst: &RemoteRef) -> Result<u64> {
    tracing::info!("Copying from \"{}\" to \"{dst}\"", src.display());

    let metadata = fs::metadata(src)
        .await
        .map_err(|e| Error::from_io(e, src.display()))?;
    if metadata.is_dir() {
        return Err(Error::General(format!(
            "{} is a directory, not a file",
            src.display()
        )));
    }

    let content_type = mime_guess::from_path(src)
        .first()
        .map(|m| m.essence_str().to_string());

    let info = store.put_object(dst, src, content_type).await?;
    Ok(info
        .size_bytes
        .and_then(|s| u64::try_from(s).ok())
        .unwrap_or(metadata.len()))
}

/// Download one object to a local path
pub async fn remote_to_local(store: &dyn ObjectStore, src: &RemoteRef, dst: &Path) -> Result<u64> {
    tracing::info!("Copying from \"{src}\" to \"{}\"", dst.display());

    let mut reader = store.get_object(src).await?;

    create_parent_dirs(dst).await?;
    let mut writer = fs::File::create(dst).await?;

    // Read failures come from the service, write failures from the local disk
    let mut buf = vec![0u8; DOWNLOAD_CHUNK];
    let mut bytes = 0u64;
    loop {
        let n = reader
            .read(&mut buf)
            .await
            .map_err(|e| Error::Network(format!("reading {src}: {e}")))?;
        if n == 0 {
            break;
        }
        writer.write_all(&buf[..n]).await?;
        bytes += n as u64;
    }
    finish_local(writer).await?;
    Ok(bytes)
}

/// Server-side copy between two objects
pub async fn remote_to_remote(
    store: &dyn ObjectStore,
    src: &RemoteRef,
    dst: &RemoteRef,
) -> Result<u64> {
    tracing::info!("Copying from \"{src}\" to \"{dst}\"");

    let info = store.copy_object(src, dst).await?;
    Ok(info
        .size_bytes
        .and_then(|s| u64::try_from(s).ok())
        .unwrap_or(0))
}

/// Route one transfer by the kinds of its two ends
pub async fn transfer(
    store: Option<&dyn ObjectStore>,
    src: &Location,
    dst: &Location,
) -> Result<u64> {
    match (src, dst) {
        (Location::Local(s), Location::Local(d)) => local_to_local(s, d).await,
        (Location::Local(s), Location::Remote(d)) => local_to_remote(require(store)?, s, d).await,
        (Location::Remote(s), Location::Local(d)) => remote_to_local(require(store)?, s, d).await,
        (Location::Remote(s), Location::Remote(d)) => {
            remote_to_remote(require(store)?, s, d).await
        }
    }
}

pub(crate) fn require(store: Option<&dyn ObjectStore>) -> Result<&dyn ObjectStore> {
    store.ok_or_else(|| Error::Config("a remote location needs an object store client".into()))
}

/// Equivalent of `mkdir -p` on the destination's parent
async fn create_parent_dirs(dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    Ok(())
}

/// Flush and sync so that a failed write surfaces here instead of on drop
async fn finish_local(mut file: fs::File) -> Result<()> {
    file.flush().await?;
    file.sync_all().await?;
    Ok(())
}
