//! `KVStore`: a schema-declared, memory-mapped columnar key/value store.
//!
//! Backed by a single heed (LMDB) environment; each column schema
//! becomes one named sub-database. Writes land in an in-process
//! [`WriteBuffer`] and are flushed as one sorted, batched transaction
//! once the aggregate buffer crosses `buff_limit`, or on explicit
//! [`KVStore::flush`]/[`KVStore::close`].

use crate::buffer::WriteBuffer;
use crate::config::StoreConfig;
use crate::schema::Schema;
use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};
use kgdb_codec::{compress_frame, decompress_frame, ValueCodec, ValueCodecError, ValueEncoding};
use kgdb_core::{Error, Result};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::{debug, info, warn};

/// A schema-declared column store backed by one heed environment.
pub struct KVStore {
    env: Env,
    dbs: HashMap<String, Database<Bytes, Bytes>>,
    schema: Schema,
    config: RwLock<StoreConfig>,
    buffer: RwLock<WriteBuffer>,
}

impl KVStore {
    /// Open (creating if absent) a store at `config.path` with the
    /// given `schema`, one named sub-database per column.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IoError`] if the directory or mmap cannot be
    /// created or opened.
    pub fn open(config: StoreConfig, schema: Schema) -> Result<Self> {
        std::fs::create_dir_all(&config.path).map_err(Error::IoError)?;

        let mut options = EnvOpenOptions::new();
        options.map_size(config.map_size as usize);
        options.max_dbs(schema.columns().len() as u32 + 1);
        if config.readonly {
            options.flags(heed::EnvFlags::READ_ONLY);
        }

        // SAFETY: the directory is exclusively owned by this store for
        // the lifetime of the `Env`; no other process maps it concurrently.
        let env = unsafe { options.open(&config.path) }.map_err(map_heed_err)?;

        let mut dbs = HashMap::new();
        {
            let mut wtxn = env.write_txn().map_err(map_heed_err)?;
            for column in schema.columns() {
                let db: Database<Bytes, Bytes> = env
                    .create_database(&mut wtxn, Some(&column.name))
                    .map_err(map_heed_err)?;
                dbs.insert(column.name.clone(), db);
            }
            wtxn.commit().map_err(map_heed_err)?;
        }

        let buff_limit = config.buff_limit;
        Ok(KVStore {
            env,
            dbs,
            schema,
            config: RwLock::new(config),
            buffer: RwLock::new(WriteBuffer::new(buff_limit)),
        })
    }

    /// The schema this store was opened with.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    fn db(&self, column: &str) -> Result<&Database<Bytes, Bytes>> {
        self.dbs
            .get(column)
            .ok_or_else(|| Error::InvalidInput(format!("unknown column {column}")))
    }

    fn codec_for(&self, column: &str) -> Result<ValueCodec> {
        let schema = self
            .schema
            .column(column)
            .ok_or_else(|| Error::InvalidInput(format!("unknown column {column}")))?;
        Ok(ValueCodec::new(schema.value_encoding))
    }

    fn is_compressed(&self, column: &str) -> bool {
        self.schema.column(column).is_some_and(|c| c.compressed)
    }

    /// Read one value from `column`, checking the write buffer first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an unknown column, or
    /// [`Error::IoError`] on a backing-store fault.
    pub fn get(&self, column: &str, key: &[u8]) -> Result<Option<Vec<u8>>> {
        {
            let buffer = self.buffer.read().expect("write buffer lock poisoned");
            if let Some(col_buf) = buffer.column(column) {
                if let Some(staged) = col_buf.get(key) {
                    return Ok(staged.map(|bytes| self.unwrap_value(column, bytes)));
                }
            }
        }
        let db = self.db(column)?;
        let rtxn = self.env.read_txn().map_err(map_heed_err)?;
        let raw = db.get(&rtxn, key).map_err(map_heed_err)?;
        Ok(raw.map(|bytes| self.unwrap_value(column, bytes)))
    }

    fn unwrap_value(&self, column: &str, bytes: &[u8]) -> Vec<u8> {
        if self.is_compressed(column) {
            decompress_frame(bytes).unwrap_or_else(|_| bytes.to_vec())
        } else {
            bytes.to_vec()
        }
    }

    /// Read several keys from `column` in a single read transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an unknown column.
    pub fn multi_get(
        &self,
        column: &str,
        keys: &[Vec<u8>],
    ) -> Result<HashMap<Vec<u8>, Vec<u8>>> {
        let db = self.db(column)?;
        let rtxn = self.env.read_txn().map_err(map_heed_err)?;
        let buffer = self.buffer.read().expect("write buffer lock poisoned");
        let col_buf = buffer.column(column);
        let mut out = HashMap::with_capacity(keys.len());
        for key in keys {
            if let Some(staged) = col_buf.and_then(|b| b.get(key)) {
                if let Some(bytes) = staged {
                    out.insert(key.clone(), self.unwrap_value(column, bytes));
                }
                continue;
            }
            if let Some(bytes) = db.get(&rtxn, key).map_err(map_heed_err)? {
                out.insert(key.clone(), self.unwrap_value(column, bytes));
            }
        }
        Ok(out)
    }

    /// Ordered scan of `column` over `[from, to)` encoded key bytes.
    /// `from`/`to` of `None` are open-ended.
    ///
    /// Buffered (unflushed) writes are not visible to this scan; call
    /// [`KVStore::flush`] first if a consistent combined view is needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an unknown column.
    pub fn iter(
        &self,
        column: &str,
        from: Option<&[u8]>,
        to: Option<&[u8]>,
    ) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let db = self.db(column)?;
        let rtxn = self.env.read_txn().map_err(map_heed_err)?;
        let iter = db.iter(&rtxn).map_err(map_heed_err)?;
        let mut out = Vec::new();
        for entry in iter {
            let (k, v) = entry.map_err(map_heed_err)?;
            if let Some(from) = from {
                if k < from {
                    continue;
                }
            }
            if let Some(to) = to {
                if k >= to {
                    break;
                }
            }
            out.push((k.to_vec(), self.unwrap_value(column, v)));
        }
        Ok(out)
    }

    /// Byte-prefix scan of `column`: every row whose key starts with
    /// `prefix`. For composite-key columns this yields every row whose
    /// leading segments match.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an unknown column.
    pub fn iter_prefix(&self, column: &str, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let db = self.db(column)?;
        let rtxn = self.env.read_txn().map_err(map_heed_err)?;
        let iter = db.prefix_iter(&rtxn, prefix).map_err(map_heed_err)?;
        let mut out = Vec::with_capacity(16);
        for entry in iter {
            let (k, v) = entry.map_err(map_heed_err)?;
            out.push((k.to_vec(), self.unwrap_value(column, v)));
        }
        Ok(out)
    }

    fn frame(&self, column: &str, value: Vec<u8>) -> Vec<u8> {
        if self.is_compressed(column) {
            compress_frame(&value)
        } else {
            value
        }
    }

    /// Stage a write. May trigger a flush if the aggregate write
    /// buffer crosses `buff_limit`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an unknown column, or
    /// propagates a flush failure.
    pub fn put(&self, column: &str, key: Vec<u8>, value: Vec<u8>) -> Result<()> {
        self.db(column)?;
        let framed = self.frame(column, value);
        {
            let mut buffer = self.buffer.write().expect("write buffer lock poisoned");
            buffer.column_mut(column).put(key, framed);
        }
        self.maybe_flush()
    }

    /// Stage several writes to `column` at once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an unknown column.
    pub fn put_batch(&self, column: &str, items: Vec<(Vec<u8>, Vec<u8>)>) -> Result<()> {
        self.db(column)?;
        {
            let mut buffer = self.buffer.write().expect("write buffer lock poisoned");
            let col_buf = buffer.column_mut(column);
            for (key, value) in items {
                let framed = self.frame(column, value);
                col_buf.put(key, framed);
            }
        }
        self.maybe_flush()
    }

    /// Read-modify-write `key` in `column` through the column's
    /// associative `merge` operator (counter addition semantics belong
    /// to `OBJ`-encoded callers; here `INT_NUMPY`/`INT_BITMAP` union and
    /// `BYTES` concatenate, per [`kgdb_codec::ValueCodec::merge`]).
    ///
    /// # Errors
    ///
    /// Returns [`Error::DecodeError`] if either side fails to decode,
    /// or [`Error::InvalidInput`] if the column has no merge operator.
    pub fn merge(&self, column: &str, key: Vec<u8>, incoming: Vec<u8>) -> Result<()> {
        let codec = self.codec_for(column)?;
        let existing = self.get(column, &key)?;
        let merged_bytes = match existing {
            Some(existing_bytes) => {
                let existing_value = codec
                    .decode(&existing_bytes)
                    .map_err(|e| decode_err(column, e))?;
                let incoming_value = codec.decode(&incoming).map_err(|e| decode_err(column, e))?;
                let merged = codec
                    .merge(existing_value, incoming_value)
                    .map_err(|e| decode_err(column, e))?;
                codec.encode(&merged).map_err(|e| decode_err(column, e))?
            }
            None => incoming,
        };
        self.put(column, key, merged_bytes)
    }

    /// Stage a delete (tombstone). Resolved at the next flush.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an unknown column.
    pub fn delete(&self, column: &str, key: Vec<u8>) -> Result<()> {
        self.db(column)?;
        {
            let mut buffer = self.buffer.write().expect("write buffer lock poisoned");
            buffer.column_mut(column).delete(key);
        }
        self.maybe_flush()
    }

    /// Delete every row matching `prefix`. Flushes first so the scan
    /// sees all previously buffered writes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an unknown column.
    pub fn delete_prefix(&self, column: &str, prefix: &[u8]) -> Result<()> {
        self.flush()?;
        let matching = self.iter_prefix(column, prefix)?;
        let mut buffer = self.buffer.write().expect("write buffer lock poisoned");
        let col_buf = buffer.column_mut(column);
        for (key, _) in matching {
            col_buf.delete(key);
        }
        drop(buffer);
        self.flush()
    }

    fn maybe_flush(&self) -> Result<()> {
        let should = self.buffer.read().expect("write buffer lock poisoned").should_flush();
        if should {
            self.flush()?;
        }
        Ok(())
    }

    /// Apply every buffered write as one batched transaction, growing
    /// the mmap by `map_grow_step` and retrying once on exhaustion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityError`] if the map is still full after
    /// one grow-and-retry.
    pub fn flush(&self) -> Result<()> {
        let drained = {
            let mut buffer = self.buffer.write().expect("write buffer lock poisoned");
            buffer.drain_all()
        };
        if drained.is_empty() {
            return Ok(());
        }
        match self.apply_batch(&drained) {
            Ok(()) => Ok(()),
            Err(Error::CapacityError(_)) => {
                let grow_by = self.config.read().expect("config lock poisoned").map_grow_step;
                warn!(grow_by, "store map full, growing and retrying");
                self.grow_map()?;
                self.apply_batch(&drained)
            }
            Err(other) => Err(other),
        }
    }

    fn apply_batch(&self, drained: &[(String, Vec<(Vec<u8>, Option<Vec<u8>>)>)]) -> Result<()> {
        let mut wtxn = self.env.write_txn().map_err(map_heed_err)?;
        for (column, writes) in drained {
            let db = self.db(column)?;
            for (key, value) in writes {
                match value {
                    Some(bytes) => {
                        db.put(&mut wtxn, key, bytes).map_err(map_heed_err)?;
                    }
                    None => {
                        db.delete(&mut wtxn, key).map_err(map_heed_err)?;
                    }
                }
            }
            debug!(column = %column, rows = writes.len(), "flushed batch");
        }
        wtxn.commit().map_err(map_heed_err)
    }

    /// Grow the backing mmap by `map_grow_step`, per the capacity
    /// retry policy: +5 GiB default, one attempt per flush.
    ///
    /// Safe to call here because `flush` holds exclusive access to the
    /// write path (single-writer) and no read/write transaction is open
    /// at this point in `flush`'s call sequence.
    fn grow_map(&self) -> Result<()> {
        let mut config = self.config.write().expect("config lock poisoned");
        let new_size = config.map_size.saturating_add(config.map_grow_step);
        // SAFETY: no transaction is open on `self.env` while `flush` holds
        // the write-buffer lock and calls into `grow_map`.
        unsafe { self.env.resize(new_size as usize) }.map_err(map_heed_err)?;
        config.map_size = new_size;
        Ok(())
    }

    /// Copy all live (non-tombstoned) data into a fresh file and
    /// atomically replace the current environment. This implementation
    /// relies on heed's own copy-on-compact; callers get back an error
    /// if the environment cannot be copied.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IoError`] if the copy fails.
    pub fn compact(&self, dest_path: &std::path::Path) -> Result<()> {
        self.flush()?;
        std::fs::create_dir_all(dest_path).map_err(Error::IoError)?;
        self.env
            .copy_to_path(dest_path, heed::CompactionOption::Enabled)
            .map_err(map_heed_err)?;
        info!(dest = %dest_path.display(), "compacted store");
        Ok(())
    }

    /// Flush pending writes. Dropping the store also releases the
    /// mmap; `close` exists for call sites that want an explicit,
    /// fallible flush point before that drop.
    ///
    /// # Errors
    ///
    /// Propagates [`KVStore::flush`]'s errors.
    pub fn close(&self) -> Result<()> {
        self.flush()
    }
}

fn decode_err(column: &str, err: ValueCodecError) -> Error {
    Error::DecodeError {
        column: column.to_string(),
        reason: err.to_string(),
    }
}

fn map_heed_err(err: heed::Error) -> Error {
    if matches!(
        err,
        heed::Error::Mdb(heed::MdbError::MapFull)
    ) {
        Error::CapacityError(err.to_string())
    } else {
        Error::IoError(std::io::Error::other(err.to_string()))
    }
}

/// Declare the standard `INT_NUMPY`/`INT_BITMAP` columns' value
/// encoding default (used by callers building a [`Schema`] who don't
/// need per-column overrides).
#[must_use]
pub fn default_encoding_for_key_kind(is_set_of_entities: bool) -> ValueEncoding {
    if is_set_of_entities {
        ValueEncoding::IntBitmap
    } else {
        ValueEncoding::Obj
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnSchema, KeyKind};
    use kgdb_codec::ValueEncoding;
    use tempfile::tempdir;

    fn test_schema() -> Schema {
        Schema::new()
            .with_column(ColumnSchema::new(
                "LABEL",
                KeyKind::IntegerKey { is_64bit: false },
                ValueEncoding::Obj,
            ))
            .with_column(ColumnSchema::new(
                "CLAIMS_ENT",
                KeyKind::CompositeKey,
                ValueEncoding::IntNumpy,
            ))
    }

    #[test]
    fn put_then_get_round_trips_before_flush() {
        let dir = tempdir().unwrap();
        let store = KVStore::open(StoreConfig::for_testing(dir.path()), test_schema()).unwrap();
        store.put("LABEL", b"k".to_vec(), b"hello".to_vec()).unwrap();
        assert_eq!(store.get("LABEL", b"k").unwrap(), Some(b"hello".to_vec()));
    }

    #[test]
    fn put_then_get_round_trips_after_flush() {
        let dir = tempdir().unwrap();
        let store = KVStore::open(StoreConfig::for_testing(dir.path()), test_schema()).unwrap();
        store.put("LABEL", b"k".to_vec(), b"hello".to_vec()).unwrap();
        store.flush().unwrap();
        assert_eq!(store.get("LABEL", b"k").unwrap(), Some(b"hello".to_vec()));
    }

    #[test]
    fn unknown_column_is_invalid_input() {
        let dir = tempdir().unwrap();
        let store = KVStore::open(StoreConfig::for_testing(dir.path()), test_schema()).unwrap();
        let err = store.put("NOPE", b"k".to_vec(), b"v".to_vec()).unwrap_err();
        assert!(err.is_absent());
    }

    #[test]
    fn delete_removes_buffered_and_flushed_value() {
        let dir = tempdir().unwrap();
        let store = KVStore::open(StoreConfig::for_testing(dir.path()), test_schema()).unwrap();
        store.put("LABEL", b"k".to_vec(), b"v".to_vec()).unwrap();
        store.flush().unwrap();
        store.delete("LABEL", b"k".to_vec()).unwrap();
        store.flush().unwrap();
        assert_eq!(store.get("LABEL", b"k").unwrap(), None);
    }

    #[test]
    fn iter_prefix_matches_composite_key_segments() {
        let dir = tempdir().unwrap();
        let store = KVStore::open(StoreConfig::for_testing(dir.path()), test_schema()).unwrap();
        let key_a = kgdb_codec::composite_key(&[kgdb_core::Lid::new(1), kgdb_core::Lid::new(2)]);
        let key_b = kgdb_codec::composite_key(&[kgdb_core::Lid::new(1), kgdb_core::Lid::new(9)]);
        let key_other = kgdb_codec::composite_key(&[kgdb_core::Lid::new(5), kgdb_core::Lid::new(2)]);
        store.put("CLAIMS_ENT", key_a, b"a".to_vec()).unwrap();
        store.put("CLAIMS_ENT", key_b, b"b".to_vec()).unwrap();
        store.put("CLAIMS_ENT", key_other, b"c".to_vec()).unwrap();
        store.flush().unwrap();
        let prefix = kgdb_codec::composite_key_prefix(&[kgdb_core::Lid::new(1)]);
        let rows = store.iter_prefix("CLAIMS_ENT", &prefix).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn multi_get_mixes_buffered_and_flushed_rows() {
        let dir = tempdir().unwrap();
        let store = KVStore::open(StoreConfig::for_testing(dir.path()), test_schema()).unwrap();
        store.put("LABEL", b"flushed".to_vec(), b"1".to_vec()).unwrap();
        store.flush().unwrap();
        store.put("LABEL", b"buffered".to_vec(), b"2".to_vec()).unwrap();
        let result = store
            .multi_get("LABEL", &[b"flushed".to_vec(), b"buffered".to_vec(), b"missing".to_vec()])
            .unwrap();
        assert_eq!(result.len(), 2);
    }
}
