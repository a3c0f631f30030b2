//! Bidirectional string-id <-> dense LID interner.
//!
//! Two columns carry the whole bijection: `ID_LID` (source id string ->
//! 4-byte big-endian LID) and `LID_ID` (4-byte big-endian LID -> source
//! id string). `max_lid` is never stored explicitly; it is recovered at
//! open time as `count(ID_LID)` and then tracked in memory.

#![warn(missing_docs)]

use kgdb_codec::key::{fixed_key_u32, split_composite_key};
use kgdb_core::{Error, Lid, Result};
use kgdb_storage::{ColumnSchema, KeyKind, KVStore, Schema};
use std::sync::Mutex;
use tracing::debug;

/// Column name for the forward (id -> LID) direction.
pub const COL_ID_LID: &str = "ID_LID";
/// Column name for the reverse (LID -> id) direction.
pub const COL_LID_ID: &str = "LID_ID";

/// Declares the two columns the interner needs. Call once while
/// assembling a store's [`Schema`] before [`KVStore::open`].
#[must_use]
pub fn interner_schema() -> Schema {
    Schema::new()
        .with_column(ColumnSchema::new(
            COL_ID_LID,
            KeyKind::StringKey,
            kgdb_codec::ValueEncoding::Bytes,
        ))
        .with_column(ColumnSchema::new(
            COL_LID_ID,
            KeyKind::IntegerKey { is_64bit: false },
            kgdb_codec::ValueEncoding::Bytes,
        ))
}

/// The string id <-> `Lid` bijection.
///
/// Holds a reference to a [`KVStore`] already opened with
/// [`interner_schema`]'s columns present (possibly alongside other
/// domain columns from the same store).
pub struct IdInterner<'a> {
    store: &'a KVStore,
    next_lid: Mutex<u32>,
}

impl<'a> IdInterner<'a> {
    /// Attach an interner to an already-open store, recovering
    /// `max_lid` by counting existing `ID_LID` rows.
    ///
    /// # Errors
    ///
    /// Propagates any I/O error from the initial count scan.
    pub fn open(store: &'a KVStore) -> Result<Self> {
        let existing = store.iter(COL_ID_LID, None, None)?;
        let next_lid = existing.len() as u32;
        Ok(IdInterner {
            store,
            next_lid: Mutex::new(next_lid),
        })
    }

    /// Look up the `Lid` for `id`, allocating a fresh one (and writing
    /// both directions) if `id` has never been seen.
    ///
    /// `get_or_create` checks the write buffer and backing `ID_LID`
    /// column first (via [`KVStore::get`], which already layers both);
    /// allocation and the two-column write are serialized by an
    /// internal mutex so concurrent callers for the same `id` cannot
    /// race into two different LIDs.
    ///
    /// # Errors
    ///
    /// Propagates storage I/O or capacity errors.
    pub fn get_or_create(&self, id: &str) -> Result<Lid> {
        let mut next_lid = self.next_lid.lock().expect("interner lock poisoned");
        if let Some(bytes) = self.store.get(COL_ID_LID, id.as_bytes())? {
            return split_fixed_u32(&bytes);
        }
        let lid = Lid::new(*next_lid);
        *next_lid += 1;
        self.store
            .put(COL_ID_LID, id.as_bytes().to_vec(), fixed_key_u32(lid.get()).to_vec())?;
        self.store
            .put(COL_LID_ID, fixed_key_u32(lid.get()).to_vec(), id.as_bytes().to_vec())?;
        debug!(id, lid = lid.get(), "interned new id");
        Ok(lid)
    }

    /// Pure read: resolve `id` to its `Lid` without creating one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `id` was never interned.
    pub fn lookup_by_id(&self, id: &str) -> Result<Lid> {
        match self.store.get(COL_ID_LID, id.as_bytes())? {
            Some(bytes) => split_fixed_u32(&bytes),
            None => Err(Error::NotFound(id.to_string())),
        }
    }

    /// Pure read: resolve `lid` back to its source id string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `lid` was never assigned.
    pub fn lookup_by_lid(&self, lid: Lid) -> Result<String> {
        match self.store.get(COL_LID_ID, &fixed_key_u32(lid.get()))? {
            Some(bytes) => String::from_utf8(bytes)
                .map_err(|e| Error::DecodeError {
                    column: COL_LID_ID.to_string(),
                    reason: e.to_string(),
                }),
            None => Err(Error::NotFound(lid.to_string())),
        }
    }

    /// Parse a raw signed integer (as decoded from an `OBJ` claim
    /// payload) as a `Lid` and resolve it, returning "not found"
    /// without any I/O for a non-numeric or negative input.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for a negative/overflowing raw
    /// value, or [`Error::NotFound`] if the resolved `Lid` is unassigned.
    pub fn lookup_by_raw_lid(&self, raw: i64) -> Result<String> {
        let lid = Lid::from_signed(raw)
            .ok_or_else(|| Error::InvalidInput(format!("invalid lid: {raw}")))?;
        self.lookup_by_lid(lid)
    }

    /// Current allocation counter, i.e. the number of distinct ids
    /// interned so far (including any not yet flushed).
    #[must_use]
    pub fn len(&self) -> u32 {
        *self.next_lid.lock().expect("interner lock poisoned")
    }

    /// `true` if nothing has been interned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn split_fixed_u32(bytes: &[u8]) -> Result<Lid> {
    if bytes.len() != 4 {
        return Err(Error::DecodeError {
            column: COL_ID_LID.to_string(),
            reason: format!("expected 4-byte LID, got {} bytes", bytes.len()),
        });
    }
    // reuse the composite-key reader for a single-segment key
    let lids = split_composite_key(bytes).map_err(|e| Error::DecodeError {
        column: COL_ID_LID.to_string(),
        reason: e.to_string(),
    })?;
    lids.first()
        .copied()
        .ok_or_else(|| Error::DecodeError {
            column: COL_ID_LID.to_string(),
            reason: "empty LID segment".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kgdb_storage::StoreConfig;
    use tempfile::tempdir;

    fn open_store(dir: &std::path::Path) -> KVStore {
        KVStore::open(StoreConfig::for_testing(dir), interner_schema()).unwrap()
    }

    #[test]
    fn get_or_create_assigns_sequential_lids() {
        let dir = tempdir().unwrap();
        let store = open_store(dir.path());
        let interner = IdInterner::open(&store).unwrap();
        let q1 = interner.get_or_create("Q1").unwrap();
        let q2 = interner.get_or_create("Q2").unwrap();
        assert_eq!(q1.get(), 0);
        assert_eq!(q2.get(), 1);
    }

    #[test]
    fn get_or_create_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = open_store(dir.path());
        let interner = IdInterner::open(&store).unwrap();
        let first = interner.get_or_create("Q17").unwrap();
        let second = interner.get_or_create("Q17").unwrap();
        assert_eq!(first, second);
        assert_eq!(interner.len(), 1);
    }

    #[test]
    fn lookup_by_id_before_creation_is_not_found() {
        let dir = tempdir().unwrap();
        let store = open_store(dir.path());
        let interner = IdInterner::open(&store).unwrap();
        assert!(interner.lookup_by_id("Q404").unwrap_err().is_absent());
    }

    #[test]
    fn lookup_by_lid_resolves_after_create() {
        let dir = tempdir().unwrap();
        let store = open_store(dir.path());
        let interner = IdInterner::open(&store).unwrap();
        let lid = interner.get_or_create("Q17").unwrap();
        assert_eq!(interner.lookup_by_lid(lid).unwrap(), "Q17");
    }

    #[test]
    fn lookup_by_raw_lid_rejects_negative_without_io() {
        let dir = tempdir().unwrap();
        let store = open_store(dir.path());
        let interner = IdInterner::open(&store).unwrap();
        let err = interner.lookup_by_raw_lid(-1).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn interner_recovers_counter_across_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = open_store(dir.path());
            let interner = IdInterner::open(&store).unwrap();
            interner.get_or_create("Q1").unwrap();
            interner.get_or_create("Q2").unwrap();
            store.close().unwrap();
        }
        let store = open_store(dir.path());
        let interner = IdInterner::open(&store).unwrap();
        assert_eq!(interner.len(), 2);
        let q3 = interner.get_or_create("Q3").unwrap();
        assert_eq!(q3.get(), 2);
    }
}
