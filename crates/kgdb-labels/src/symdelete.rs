//! `SymDeleteIndex`: a FAROO/SymSpell-style approximate-match index
//! over prefix-trimmed vocabulary labels (§4.8).
//!
//! Every label contributes the set of strings reachable by deleting up
//! to `max_distance` characters from its first `prefix_len` characters
//! ("deletion variants"); each variant maps to the bitmap of label-LIDs
//! that produced it. A query is answered the same way: its own
//! deletion variants are looked up, and any label that shares a
//! variant with the query is within `max_distance` deletions of it
//! from a common ancestor string — the standard SymSpell symmetry.

use kgdb_codec::{ColumnValue, ValueCodec, ValueEncoding};
use kgdb_core::{Error, Result};
use kgdb_storage::{ColumnSchema, KeyKind, Schema, StoreConfig, KVStore};
use roaring::RoaringBitmap;

/// Deletion-variant postings: prefix-trimmed deletion variant → bitmap
/// of label-LIDs.
pub const COL_DELETE: &str = "DELETE";

/// Declare the column a `SymDeleteIndex` owns in its own store.
#[must_use]
pub fn symdelete_schema() -> Schema {
    Schema::new().with_column(ColumnSchema::new(COL_DELETE, KeyKind::StringKey, ValueEncoding::IntBitmap))
}

/// One `(lang, max_distance, prefix_len)` index's tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymDeleteConfig {
    /// Max characters considered when trimming a label/query.
    pub prefix_len: usize,
    /// Max number of character deletions a variant may represent.
    pub max_distance: usize,
}

impl Default for SymDeleteConfig {
    fn default() -> Self {
        SymDeleteConfig { prefix_len: 10, max_distance: 4 }
    }
}

/// All deletion variants of `key[:prefix_length]`: every substring
/// obtainable by deleting some number of characters such that the
/// result still has length ≥ `max(1, trimmed_len − max_edit_dis)`
/// (order-preserving subsequences, not arbitrary character subsets).
#[must_use]
pub fn delete_variants(key: &str, max_edit_dis: usize, prefix_length: usize) -> Vec<String> {
    let chars: Vec<char> = key.chars().take(prefix_length).collect();
    let n = chars.len();
    if n == 0 {
        return Vec::new();
    }
    let min_len = (n.saturating_sub(max_edit_dis)).max(1);

    let mut out = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for k in min_len..=n {
        subsequences_of_length(&chars, k, &mut |s: &str| {
            if seen.insert(s.to_string()) {
                out.push(s.to_string());
            }
        });
    }
    out
}

fn subsequences_of_length(chars: &[char], k: usize, emit: &mut impl FnMut(&str)) {
    if k == 0 || k > chars.len() {
        return;
    }
    let mut combo: Vec<char> = Vec::with_capacity(k);
    fn backtrack(chars: &[char], start: usize, k: usize, combo: &mut Vec<char>, emit: &mut impl FnMut(&str)) {
        if combo.len() == k {
            let s: String = combo.iter().collect();
            emit(&s);
            return;
        }
        let remaining_needed = k - combo.len();
        if chars.len() < start + remaining_needed {
            return;
        }
        for i in start..chars.len() {
            combo.push(chars[i]);
            backtrack(chars, i + 1, k, combo, emit);
            combo.pop();
        }
    }
    backtrack(chars, 0, k, &mut combo, emit);
}

/// Deletion-neighborhood fuzzy index over a dedicated label [`KVStore`].
pub struct SymDeleteIndex<'a> {
    store: &'a KVStore,
    config: SymDeleteConfig,
}

impl<'a> SymDeleteIndex<'a> {
    /// Attach to an already-open store declared with [`symdelete_schema`].
    #[must_use]
    pub fn open(store: &'a KVStore, config: SymDeleteConfig) -> Self {
        SymDeleteIndex { store, config }
    }

    /// Open a fresh on-disk deletes store at `config`, declaring
    /// [`symdelete_schema`].
    ///
    /// # Errors
    ///
    /// Propagates storage faults.
    pub fn open_store(store_config: StoreConfig) -> Result<KVStore> {
        KVStore::open(store_config, symdelete_schema())
    }

    /// Index `label`'s deletion variants against `label_lid`, merging
    /// with whatever postings already exist for each variant.
    ///
    /// # Errors
    ///
    /// Propagates storage faults.
    pub fn add_label(&self, label: &str, label_lid: u32) -> Result<()> {
        let mut bitmap = RoaringBitmap::new();
        bitmap.insert(label_lid);
        let encoded = ValueCodec::new(ValueEncoding::IntBitmap)
            .encode(&ColumnValue::IntBitmap(bitmap))
            .map_err(|e| Error::DecodeError { column: COL_DELETE.to_string(), reason: e.to_string() })?;
        for variant in delete_variants(label, self.config.max_distance, self.config.prefix_len) {
            if variant.is_empty() {
                continue;
            }
            self.store.merge(COL_DELETE, variant.into_bytes(), encoded.clone())?;
        }
        Ok(())
    }

    /// Index every `(label, label_lid)` pair.
    ///
    /// # Errors
    ///
    /// Propagates storage faults.
    pub fn build_from_labels<'b>(&self, labels: impl Iterator<Item = (&'b str, u32)>) -> Result<()> {
        for (label, label_lid) in labels {
            if label.is_empty() {
                continue;
            }
            self.add_label(label, label_lid)?;
        }
        Ok(())
    }

    /// Candidate label-LIDs within `max_distance` deletions of `term`
    /// from a shared ancestor: the union of postings for every
    /// deletion variant of `term` itself (the query-side half of the
    /// SymSpell symmetry).
    ///
    /// # Errors
    ///
    /// Propagates storage faults.
    pub fn candidates(&self, term: &str) -> Result<RoaringBitmap> {
        let mut out = RoaringBitmap::new();
        for variant in delete_variants(term, self.config.max_distance, self.config.prefix_len) {
            if variant.is_empty() {
                continue;
            }
            if let Some(bytes) = self.store.get(COL_DELETE, variant.as_bytes())? {
                match ValueCodec::new(ValueEncoding::IntBitmap).decode(&bytes).map_err(|e| {
                    Error::DecodeError { column: COL_DELETE.to_string(), reason: e.to_string() }
                })? {
                    ColumnValue::IntBitmap(bitmap) => out |= bitmap,
                    _ => unreachable!("DELETE is always IntBitmap-encoded"),
                }
            }
        }
        Ok(out)
    }

    /// This index's tuning.
    #[must_use]
    pub fn config(&self) -> SymDeleteConfig {
        self.config
    }
}
