//! Opens the named store files a data directory holds: one `entity`
//! store (interner + graph columns), one `labels` store, and a
//! `deletes` store per `(lang, max_distance, prefix_len)` tuning.

use kgdb_core::Result;
use kgdb_graph::domain::graph_schema;
use kgdb_interner::interner_schema;
use kgdb_labels::{label_schema, symdelete_schema};
use kgdb_storage::{KVStore, Schema, StoreConfig};
use std::path::{Path, PathBuf};

fn store_config(dir: &Path, name: &str, readonly: bool) -> StoreConfig {
    StoreConfig::new(dir.join(name)).with_readonly(readonly)
}

/// Open (creating if absent) the combined interner+graph store at
/// `<data_dir>/entity`.
///
/// # Errors
///
/// Propagates storage faults.
pub fn open_entity_store(data_dir: &Path, readonly: bool) -> Result<KVStore> {
    let mut schema = interner_schema();
    for column in graph_schema().columns() {
        schema = schema.with_column(column.clone());
    }
    KVStore::open(store_config(data_dir, "entity", readonly), schema)
}

/// Open (creating if absent) the label vocabulary store at
/// `<data_dir>/labels`.
///
/// # Errors
///
/// Propagates storage faults.
pub fn open_labels_store(data_dir: &Path, readonly: bool) -> Result<KVStore> {
    KVStore::open(store_config(data_dir, "labels", readonly), label_schema())
}

/// The on-disk directory name for a `(lang, max_distance, prefix_len)`
/// deletes store.
#[must_use]
pub fn deletes_store_name(lang: &str, max_distance: usize, prefix_len: usize) -> String {
    format!("deletes_{lang}_{max_distance}_{prefix_len}")
}

/// Open (creating if absent) a deletes store at
/// `<data_dir>/deletes_<lang>_<max_distance>_<prefix_len>`.
///
/// # Errors
///
/// Propagates storage faults.
pub fn open_deletes_store(
    data_dir: &Path,
    lang: &str,
    max_distance: usize,
    prefix_len: usize,
    readonly: bool,
) -> Result<KVStore> {
    let name = deletes_store_name(lang, max_distance, prefix_len);
    KVStore::open(store_config(data_dir, &name, readonly), symdelete_schema())
}

/// Resolve the `--store` argument of `compact` to its on-disk
/// directory and declared [`Schema`].
///
/// # Errors
///
/// Returns [`kgdb_core::Error::InvalidInput`] for an unrecognized
/// store name.
pub fn resolve_store(data_dir: &Path, store: &str) -> Result<(PathBuf, Schema)> {
    if store == "entity" {
        let mut schema = interner_schema();
        for column in graph_schema().columns() {
            schema = schema.with_column(column.clone());
        }
        return Ok((data_dir.join("entity"), schema));
    }
    if store == "labels" {
        return Ok((data_dir.join("labels"), label_schema()));
    }
    if let Some(rest) = store.strip_prefix("deletes:") {
        let parts: Vec<&str> = rest.split(':').collect();
        let [lang, max_distance, prefix_len] = parts[..] else {
            return Err(kgdb_core::Error::InvalidInput(format!(
                "expected deletes:<lang>:<max_distance>:<prefix_len>, got {store}"
            )));
        };
        let max_distance: usize = max_distance
            .parse()
            .map_err(|_| kgdb_core::Error::InvalidInput(format!("bad max_distance in {store}")))?;
        let prefix_len: usize = prefix_len
            .parse()
            .map_err(|_| kgdb_core::Error::InvalidInput(format!("bad prefix_len in {store}")))?;
        let name = deletes_store_name(lang, max_distance, prefix_len);
        return Ok((data_dir.join(name), symdelete_schema()));
    }
    Err(kgdb_core::Error::InvalidInput(format!("unknown store: {store}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deletes_store_name_is_lang_distance_prefix() {
        assert_eq!(deletes_store_name("en", 4, 10), "deletes_en_4_10");
    }

    #[test]
    fn resolve_store_recognizes_entity_and_labels() {
        let dir = std::path::Path::new("/data");
        let (path, _) = resolve_store(dir, "entity").unwrap();
        assert_eq!(path, dir.join("entity"));
        let (path, _) = resolve_store(dir, "labels").unwrap();
        assert_eq!(path, dir.join("labels"));
    }

    #[test]
    fn resolve_store_parses_deletes_spec() {
        let dir = std::path::Path::new("/data");
        let (path, _) = resolve_store(dir, "deletes:en:4:10").unwrap();
        assert_eq!(path, dir.join("deletes_en_4_10"));
    }

    #[test]
    fn resolve_store_rejects_malformed_deletes_spec() {
        let dir = std::path::Path::new("/data");
        assert!(resolve_store(dir, "deletes:en:4").is_err());
        assert!(resolve_store(dir, "deletes:en:four:10").is_err());
    }

    #[test]
    fn resolve_store_rejects_unknown_name() {
        let dir = std::path::Path::new("/data");
        assert!(resolve_store(dir, "bogus").is_err());
    }
}
