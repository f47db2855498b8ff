//! Copy dispatcher
//!
//! Decides between a single transfer and a tree walk for a [`CopySpec`] and
//! runs it. The object store handle is created once by the caller and shared
//! by reference with every transfer.

use tokio::fs;

use crate::copy_spec::CopySpec;
use crate::error::{Error, Result};
use crate::location::Location;
use crate::traits::ObjectStore;
use crate::transfer;
use crate::walk::{self, CopyReport};

/// Runs one copy against an optional object store
pub struct Copier<'a> {
    store: Option<&'a dyn ObjectStore>,
}

impl<'a> Copier<'a> {
    /// Copier able to reach remote locations through `store`
    pub fn new(store: &'a dyn ObjectStore) -> Self {
        Self { store: Some(store) }
    }

    /// Copier for local-to-local copies only
    pub fn local_only() -> Self {
        Self { store: None }
    }

    /// Copy `spec.source` to `spec.destination`.
    ///
    /// A local file is copied once to the literal destination; a local
    /// directory is mirrored. A remote source is always listed as a prefix,
    /// even when it names a single object.
    pub async fn run(&self, spec: &CopySpec) -> Result<CopyReport> {
        tracing::info!("From: {}", spec.source);
        tracing::info!("To: {}", spec.destination);
        tracing::info!(
            "Source is {}, destination is {}",
            spec.source.kind(),
            spec.destination.kind()
        );
        tracing::debug!("Direction: {}", spec.direction());

        let report = match &spec.source {
            Location::Local(path) => {
                let metadata = fs::metadata(path)
                    .await
                    .map_err(|e| Error::from_io(e, path.display()))?;

                if metadata.is_dir() {
                    walk::mirror(self.store, walk::local_entries(path), &spec.destination).await?
                } else {
                    let bytes =
                        transfer::transfer(self.store, &spec.source, &spec.destination).await?;
                    let mut report = CopyReport::default();
                    report.record(bytes);
                    report
                }
            }
            Location::Remote(root) => {
                let store = transfer::require(self.store)?;
                walk::mirror(
                    self.store,
                    walk::remote_entries(store, root),
                    &spec.destination,
                )
                .await?
            }
        };

        tracing::info!("Finished copying");
        Ok(report)
    }
}
