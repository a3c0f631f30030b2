//! `compact <store>` — rewrite a store's backing file in place.

use crate::stores::resolve_store;
use kgdb_core::{Error, Result};
use kgdb_storage::KVStore;
use std::path::Path;
use tracing::info;

/// Compact the named store into a sibling `<name>.compact` directory,
/// then replace the original with it.
///
/// # Errors
///
/// Propagates storage faults; [`Error::NotFound`] if the store
/// directory doesn't exist yet.
pub fn run(data_dir: &Path, store: &str) -> Result<()> {
    let (path, schema) = resolve_store(data_dir, store)?;
    if !path.exists() {
        return Err(Error::NotFound(format!("store not yet built: {}", path.display())));
    }
    let config = kgdb_storage::StoreConfig::new(&path);
    let handle = KVStore::open(config, schema)?;

    let dest = path.with_extension("compact");
    if dest.exists() {
        std::fs::remove_dir_all(&dest).map_err(Error::IoError)?;
    }
    handle.compact(&dest)?;
    handle.close()?;
    drop(handle);

    std::fs::remove_dir_all(&path).map_err(Error::IoError)?;
    std::fs::rename(&dest, &path).map_err(Error::IoError)?;
    info!(store, "compaction complete");
    Ok(())
}
