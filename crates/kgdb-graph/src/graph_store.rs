//! `GraphStore`: the typed domain façade over [`kgdb_storage::KVStore`]
//! and [`kgdb_interner::IdInterner`].
//!
//! Every read that accepts an ID or LID follows the same three steps:
//! intern-lookup the string (if given one), optionally dereference
//! `REDIRECT` once, then read and decode the target column.

use crate::domain::{
    COL_ALIASES, COL_CLAIMS_ENT, COL_CLAIMS_ENT_INV, COL_CLAIMS_LIT, COL_DBPEDIA, COL_DESC,
    COL_LABEL, COL_LABELS, COL_PAGERANK, COL_REDIRECT, COL_REDIRECT_OF, COL_SITELINKS,
    COL_WIKIPEDIA,
};
use kgdb_codec::key::{composite_key, composite_key_prefix, fixed_key_u32};
use kgdb_codec::{ColumnValue, ValueCodec, ValueEncoding};
use kgdb_core::{Error, Lid, Result, Value};
use kgdb_interner::IdInterner;
use kgdb_storage::KVStore;
use roaring::RoaringBitmap;
use std::collections::BTreeMap;

/// Either a source-system string id or an already-resolved `Lid`.
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    /// A QID/PID, Wikipedia title, or DBpedia resource name.
    Id(&'a str),
    /// An already-interned local id.
    Lid(Lid),
}

impl<'a> From<&'a str> for EntityRef<'a> {
    fn from(id: &'a str) -> Self {
        EntityRef::Id(id)
    }
}

impl From<Lid> for EntityRef<'_> {
    fn from(lid: Lid) -> Self {
        EntityRef::Lid(lid)
    }
}

/// Typed façade over the domain columns declared in [`crate::domain`].
pub struct GraphStore<'a> {
    store: &'a KVStore,
    interner: &'a IdInterner<'a>,
}

impl<'a> GraphStore<'a> {
    /// Attach a façade to an already-open store and interner sharing
    /// the same backing [`KVStore`].
    #[must_use]
    pub fn new(store: &'a KVStore, interner: &'a IdInterner<'a>) -> Self {
        GraphStore { store, interner }
    }

    /// Resolve an [`EntityRef`] to a `Lid`. Returns "not found" for a
    /// string id that was never interned; never performs I/O for an
    /// already-resolved `Lid`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown string id.
    pub fn resolve(&self, entity: EntityRef<'_>) -> Result<Lid> {
        match entity {
            EntityRef::Id(id) => self.interner.lookup_by_id(id),
            EntityRef::Lid(lid) => Ok(lid),
        }
    }

    /// Dereference `REDIRECT` for `lid` at most once, returning `lid`
    /// itself if it has no redirect entry.
    ///
    /// # Errors
    ///
    /// Propagates storage faults; a missing `REDIRECT` row is not an
    /// error (it means `lid` isn't a redirect).
    pub fn canonicalize(&self, lid: Lid) -> Result<Lid> {
        let raw = self.store.get(COL_REDIRECT, &fixed_key_u32(lid.get()))?;
        match raw {
            Some(bytes) => {
                let value = decode_obj(COL_REDIRECT, &bytes)?;
                match value.as_int() {
                    Some(target) => Lid::from_signed(target).ok_or_else(|| Error::DecodeError {
                        column: COL_REDIRECT.to_string(),
                        reason: format!("redirect target {target} is not a valid lid"),
                    }),
                    None => Ok(lid),
                }
            }
            None => Ok(lid),
        }
    }

    /// Resolve then canonicalize in one call: the standard read-path
    /// prelude every domain getter uses.
    ///
    /// # Errors
    ///
    /// Propagates [`GraphStore::resolve`]/[`GraphStore::canonicalize`] errors.
    pub fn resolve_canonical(&self, entity: EntityRef<'_>) -> Result<Lid> {
        let lid = self.resolve(entity)?;
        self.canonicalize(lid)
    }

    /// Canonical English label for an entity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the entity or its label is absent.
    pub fn get_label(&self, entity: EntityRef<'_>) -> Result<Option<String>> {
        let lid = self.resolve_canonical(entity)?;
        let raw = self.store.get(COL_LABEL, &fixed_key_u32(lid.get()))?;
        match raw {
            Some(bytes) => Ok(decode_obj(COL_LABEL, &bytes)?.as_text().map(str::to_owned)),
            None => Ok(None),
        }
    }

    /// Set the canonical English label for `lid`, interning nothing
    /// further (the label is a plain string, not an entity reference).
    ///
    /// # Errors
    ///
    /// Propagates storage faults.
    pub fn put_label(&self, lid: Lid, label: &str) -> Result<()> {
        let bytes = encode_obj(&Value::Text(label.to_string()))?;
        self.store.put(COL_LABEL, fixed_key_u32(lid.get()).to_vec(), bytes)
    }

    /// Per-language labels (`lang -> text`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `entity` doesn't resolve.
    pub fn get_labels(&self, entity: EntityRef<'_>) -> Result<BTreeMap<String, String>> {
        self.get_lang_text_map(COL_LABELS, entity)
    }

    /// Replace the per-language label map for `lid`.
    ///
    /// # Errors
    ///
    /// Propagates storage faults.
    pub fn put_labels(&self, lid: Lid, labels: &BTreeMap<String, String>) -> Result<()> {
        self.put_lang_text_map(COL_LABELS, lid, labels)
    }

    /// Per-language descriptions (`lang -> text`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `entity` doesn't resolve.
    pub fn get_desc(&self, entity: EntityRef<'_>) -> Result<BTreeMap<String, String>> {
        self.get_lang_text_map(COL_DESC, entity)
    }

    /// Replace the per-language description map for `lid`.
    ///
    /// # Errors
    ///
    /// Propagates storage faults.
    pub fn put_desc(&self, lid: Lid, desc: &BTreeMap<String, String>) -> Result<()> {
        self.put_lang_text_map(COL_DESC, lid, desc)
    }

    /// Per-language alias sets (`lang -> {text}`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `entity` doesn't resolve.
    pub fn get_aliases(&self, entity: EntityRef<'_>) -> Result<BTreeMap<String, Vec<String>>> {
        let lid = self.resolve_canonical(entity)?;
        let raw = self.store.get(COL_ALIASES, &fixed_key_u32(lid.get()))?;
        match raw {
            Some(bytes) => Ok(value_as_lang_list_map(&decode_obj(COL_ALIASES, &bytes)?)),
            None => Ok(BTreeMap::new()),
        }
    }

    /// Replace the per-language alias map for `lid`.
    ///
    /// # Errors
    ///
    /// Propagates storage faults.
    pub fn put_aliases(&self, lid: Lid, aliases: &BTreeMap<String, Vec<String>>) -> Result<()> {
        let mut map = BTreeMap::new();
        for (lang, values) in aliases {
            let arr = values.iter().map(|v| Value::Text(v.clone())).collect();
            map.insert(lang.clone(), Value::Array(arr));
        }
        let bytes = encode_obj(&Value::Map(map))?;
        self.store.put(COL_ALIASES, fixed_key_u32(lid.get()).to_vec(), bytes)
    }

    /// Sitelinks (`site -> title`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `entity` doesn't resolve.
    pub fn get_sitelinks(&self, entity: EntityRef<'_>) -> Result<BTreeMap<String, String>> {
        self.get_lang_text_map(COL_SITELINKS, entity)
    }

    /// Replace the sitelinks map for `lid`.
    ///
    /// # Errors
    ///
    /// Propagates storage faults.
    pub fn put_sitelinks(&self, lid: Lid, sitelinks: &BTreeMap<String, String>) -> Result<()> {
        self.put_lang_text_map(COL_SITELINKS, lid, sitelinks)
    }

    fn get_lang_text_map(
        &self,
        column: &str,
        entity: EntityRef<'_>,
    ) -> Result<BTreeMap<String, String>> {
        let lid = self.resolve_canonical(entity)?;
        let raw = self.store.get(column, &fixed_key_u32(lid.get()))?;
        match raw {
            Some(bytes) => Ok(value_as_lang_text_map(&decode_obj(column, &bytes)?)),
            None => Ok(BTreeMap::new()),
        }
    }

    fn put_lang_text_map(
        &self,
        column: &str,
        lid: Lid,
        map: &BTreeMap<String, String>,
    ) -> Result<()> {
        let value = Value::Map(
            map.iter()
                .map(|(k, v)| (k.clone(), Value::Text(v.clone())))
                .collect(),
        );
        let bytes = encode_obj(&value)?;
        self.store.put(column, fixed_key_u32(lid.get()).to_vec(), bytes)
    }

    /// The Wikipedia title mapped to `entity`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `entity` doesn't resolve.
    pub fn get_wikipedia(&self, entity: EntityRef<'_>) -> Result<Option<String>> {
        self.get_text_column(COL_WIKIPEDIA, entity)
    }

    /// The DBpedia resource name mapped to `entity`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `entity` doesn't resolve.
    pub fn get_dbpedia(&self, entity: EntityRef<'_>) -> Result<Option<String>> {
        self.get_text_column(COL_DBPEDIA, entity)
    }

    fn get_text_column(&self, column: &str, entity: EntityRef<'_>) -> Result<Option<String>> {
        let lid = self.resolve_canonical(entity)?;
        let raw = self.store.get(column, &fixed_key_u32(lid.get()))?;
        match raw {
            Some(bytes) => Ok(decode_obj(column, &bytes)?.as_text().map(str::to_owned)),
            None => Ok(None),
        }
    }

    /// Record a Wikidata-LID <-> Wikipedia-title mapping. Both inputs
    /// are already-resolved canonical LIDs/strings; §4.4 step 2
    /// requires dereferencing `REDIRECT` on the Wikidata side before
    /// this call, which callers do via [`GraphStore::canonicalize`].
    ///
    /// # Errors
    ///
    /// Propagates storage faults.
    pub fn put_wikipedia_mapping(&self, wikidata_lid: Lid, wikipedia_title: &str) -> Result<()> {
        let bytes = encode_obj(&Value::Text(wikipedia_title.to_string()))?;
        self.store
            .put(COL_WIKIPEDIA, fixed_key_u32(wikidata_lid.get()).to_vec(), bytes)
    }

    /// Record a Wikidata-LID <-> DBpedia-resource mapping, mirroring
    /// [`GraphStore::put_wikipedia_mapping`].
    ///
    /// # Errors
    ///
    /// Propagates storage faults.
    pub fn put_dbpedia_mapping(&self, wikidata_lid: Lid, dbpedia_resource: &str) -> Result<()> {
        let bytes = encode_obj(&Value::Text(dbpedia_resource.to_string()))?;
        self.store
            .put(COL_DBPEDIA, fixed_key_u32(wikidata_lid.get()).to_vec(), bytes)
    }

    /// The persisted PageRank score for `entity`, if `kgdb-rank` has
    /// written one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `entity` doesn't resolve.
    pub fn get_pagerank(&self, entity: EntityRef<'_>) -> Result<Option<f64>> {
        let lid = self.resolve_canonical(entity)?;
        let raw = self.store.get(COL_PAGERANK, &fixed_key_u32(lid.get()))?;
        match raw {
            Some(bytes) => Ok(match decode_obj(COL_PAGERANK, &bytes)? {
                Value::Float(f) => Some(f),
                Value::Int(i) => Some(i as f64),
                _ => None,
            }),
            None => Ok(None),
        }
    }

    /// Persist a PageRank score for `lid`. Called once per LID by
    /// `kgdb-rank` after power iteration converges.
    ///
    /// # Errors
    ///
    /// Propagates storage faults.
    pub fn put_pagerank(&self, lid: Lid, score: f64) -> Result<()> {
        let bytes = encode_obj(&Value::Float(score))?;
        self.store.put(COL_PAGERANK, fixed_key_u32(lid.get()).to_vec(), bytes)
    }

    /// `true` iff `lid` is the object of any `P279` (subclass-of) edge,
    /// i.e. something else is declared a subclass of it. Used by
    /// `kgdb-labels` to classify vocabulary entries as "type" vs "entity".
    ///
    /// # Errors
    ///
    /// Propagates storage faults.
    pub fn is_a_type(&self, lid: Lid, subclass_of_prop: Lid) -> Result<bool> {
        let bitmap = self.get_claims_entity_inverse(EntityRef::Lid(lid), subclass_of_prop)?;
        Ok(!bitmap.is_empty())
    }

    /// Object LIDs of `(subject, prop)`, sorted ascending, as declared
    /// for `CLAIMS_ENT`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `subject` doesn't resolve.
    pub fn get_claims_entity(&self, subject: EntityRef<'_>, prop: Lid) -> Result<Vec<Lid>> {
        let subject_lid = self.resolve_canonical(subject)?;
        let key = composite_key(&[subject_lid, prop]);
        match self.store.get(COL_CLAIMS_ENT, &key)? {
            Some(bytes) => match ValueCodec::new(ValueEncoding::IntNumpy)
                .decode(&bytes)
                .map_err(|e| Error::DecodeError {
                    column: COL_CLAIMS_ENT.to_string(),
                    reason: e.to_string(),
                })? {
                ColumnValue::IntNumpy(lids) => Ok(lids),
                _ => unreachable!("CLAIMS_ENT is always IntNumpy-encoded"),
            },
            None => Ok(Vec::new()),
        }
    }

    /// All `(subject, prop)` entity-claim rows for `subject`, across
    /// every property, via the `CLAIMS_ENT` composite-key prefix scan.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `subject` doesn't resolve.
    pub fn get_all_claims_entity(&self, subject: EntityRef<'_>) -> Result<Vec<(Lid, Vec<Lid>)>> {
        let subject_lid = self.resolve_canonical(subject)?;
        let prefix = composite_key_prefix(&[subject_lid]);
        let rows = self.store.iter_prefix(COL_CLAIMS_ENT, &prefix)?;
        let codec = ValueCodec::new(ValueEncoding::IntNumpy);
        let mut out = Vec::with_capacity(rows.len());
        for (key, bytes) in rows {
            let segments = kgdb_codec::split_composite_key(&key).map_err(|e| Error::DecodeError {
                column: COL_CLAIMS_ENT.to_string(),
                reason: e.to_string(),
            })?;
            let prop = segments
                .get(1)
                .copied()
                .ok_or_else(|| Error::DecodeError {
                    column: COL_CLAIMS_ENT.to_string(),
                    reason: "composite key missing property segment".to_string(),
                })?;
            match codec.decode(&bytes).map_err(|e| Error::DecodeError {
                column: COL_CLAIMS_ENT.to_string(),
                reason: e.to_string(),
            })? {
                ColumnValue::IntNumpy(lids) => out.push((prop, lids)),
                _ => unreachable!("CLAIMS_ENT is always IntNumpy-encoded"),
            }
        }
        Ok(out)
    }

    /// Write `(subject, prop) -> objects` to `CLAIMS_ENT`, interning
    /// every object id along the way (`put_with_interning`).
    ///
    /// # Errors
    ///
    /// Propagates interner/storage faults.
    pub fn put_claims_entity_with_interning(
        &self,
        subject: Lid,
        prop: Lid,
        object_ids: &[&str],
    ) -> Result<()> {
        let mut object_lids = Vec::with_capacity(object_ids.len());
        for id in object_ids {
            object_lids.push(self.interner.get_or_create(id)?);
        }
        object_lids.sort();
        let key = composite_key(&[subject, prop]);
        let value = ValueCodec::new(ValueEncoding::IntNumpy)
            .encode(&ColumnValue::IntNumpy(object_lids))
            .map_err(|e| Error::DecodeError {
                column: COL_CLAIMS_ENT.to_string(),
                reason: e.to_string(),
            })?;
        self.store.put(COL_CLAIMS_ENT, key, value)
    }

    /// Subject LIDs with an entity claim `(*, prop) = object`, from the
    /// inverted `CLAIMS_ENT_INV` column.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `object` doesn't resolve.
    pub fn get_claims_entity_inverse(
        &self,
        object: EntityRef<'_>,
        prop: Lid,
    ) -> Result<RoaringBitmap> {
        let object_lid = self.resolve_canonical(object)?;
        let key = composite_key(&[object_lid, prop]);
        match self.store.get(COL_CLAIMS_ENT_INV, &key)? {
            Some(bytes) => match ValueCodec::new(ValueEncoding::IntBitmap)
                .decode(&bytes)
                .map_err(|e| Error::DecodeError {
                    column: COL_CLAIMS_ENT_INV.to_string(),
                    reason: e.to_string(),
                })? {
                ColumnValue::IntBitmap(bitmap) => Ok(bitmap),
                _ => unreachable!("CLAIMS_ENT_INV is always IntBitmap-encoded"),
            },
            None => Ok(RoaringBitmap::new()),
        }
    }

    /// All `(prop, subjects)` inverted-claim rows for `object`, across
    /// every property, via the `CLAIMS_ENT_INV` composite-key prefix
    /// scan — the properties for which `object` appears as the
    /// *object* of a claim, not the properties on its own outbound
    /// claims.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `object` doesn't resolve.
    pub fn get_all_claims_entity_inverse(
        &self,
        object: EntityRef<'_>,
    ) -> Result<Vec<(Lid, RoaringBitmap)>> {
        let object_lid = self.resolve_canonical(object)?;
        let prefix = composite_key_prefix(&[object_lid]);
        let rows = self.store.iter_prefix(COL_CLAIMS_ENT_INV, &prefix)?;
        let codec = ValueCodec::new(ValueEncoding::IntBitmap);
        let mut out = Vec::with_capacity(rows.len());
        for (key, bytes) in rows {
            let segments = kgdb_codec::split_composite_key(&key).map_err(|e| Error::DecodeError {
                column: COL_CLAIMS_ENT_INV.to_string(),
                reason: e.to_string(),
            })?;
            let prop = segments
                .get(1)
                .copied()
                .ok_or_else(|| Error::DecodeError {
                    column: COL_CLAIMS_ENT_INV.to_string(),
                    reason: "composite key missing property segment".to_string(),
                })?;
            match codec.decode(&bytes).map_err(|e| Error::DecodeError {
                column: COL_CLAIMS_ENT_INV.to_string(),
                reason: e.to_string(),
            })? {
                ColumnValue::IntBitmap(bitmap) => out.push((prop, bitmap)),
                _ => unreachable!("CLAIMS_ENT_INV is always IntBitmap-encoded"),
            }
        }
        Ok(out)
    }

    /// Merge `subjects` into the `(object, prop)` posting list, unioning
    /// with whatever is already stored rather than overwriting.
    ///
    /// # Errors
    ///
    /// Propagates storage faults.
    pub fn merge_claims_entity_inverse(
        &self,
        object: Lid,
        prop: Lid,
        subjects: RoaringBitmap,
    ) -> Result<()> {
        let key = composite_key(&[object, prop]);
        let bytes = ValueCodec::new(ValueEncoding::IntBitmap)
            .encode(&ColumnValue::IntBitmap(subjects))
            .map_err(|e| Error::DecodeError {
                column: COL_CLAIMS_ENT_INV.to_string(),
                reason: e.to_string(),
            })?;
        self.store.merge(COL_CLAIMS_ENT_INV, key, bytes)
    }

    /// Literal claims for an entity: `datatype -> pid -> [values]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `entity` doesn't resolve.
    pub fn get_claims_literal(&self, entity: EntityRef<'_>) -> Result<Option<Value>> {
        let lid = self.resolve_canonical(entity)?;
        let raw = self.store.get(COL_CLAIMS_LIT, &fixed_key_u32(lid.get()))?;
        raw.map(|bytes| decode_obj(COL_CLAIMS_LIT, &bytes)).transpose()
    }

    /// Replace the literal-claims value (`datatype -> pid -> [values]`)
    /// for `lid`.
    ///
    /// # Errors
    ///
    /// Propagates storage faults.
    pub fn put_claims_literal(&self, lid: Lid, value: &Value) -> Result<()> {
        let bytes = encode_obj(value)?;
        self.store.put(COL_CLAIMS_LIT, fixed_key_u32(lid.get()).to_vec(), bytes)
    }

    /// Record `from -> to` as a redirect, maintaining both `REDIRECT`
    /// and the reverse `REDIRECT_OF` posting list.
    ///
    /// # Errors
    ///
    /// Propagates storage faults.
    pub fn put_redirect(&self, from: Lid, to: Lid) -> Result<()> {
        let target_bytes = encode_obj(&Value::Int(i64::from(to.get())))?;
        self.store
            .put(COL_REDIRECT, fixed_key_u32(from.get()).to_vec(), target_bytes)?;
        let mut reverse = RoaringBitmap::new();
        reverse.insert(from.get());
        let reverse_bytes = ValueCodec::new(ValueEncoding::IntBitmap)
            .encode(&ColumnValue::IntBitmap(reverse))
            .map_err(|e| Error::DecodeError {
                column: COL_REDIRECT_OF.to_string(),
                reason: e.to_string(),
            })?;
        self.store
            .merge(COL_REDIRECT_OF, fixed_key_u32(to.get()).to_vec(), reverse_bytes)
    }

    /// Every LID that redirects to `lid`.
    ///
    /// # Errors
    ///
    /// Propagates storage faults.
    pub fn redirects_of(&self, lid: Lid) -> Result<RoaringBitmap> {
        match self.store.get(COL_REDIRECT_OF, &fixed_key_u32(lid.get()))? {
            Some(bytes) => match ValueCodec::new(ValueEncoding::IntBitmap)
                .decode(&bytes)
                .map_err(|e| Error::DecodeError {
                    column: COL_REDIRECT_OF.to_string(),
                    reason: e.to_string(),
                })? {
                ColumnValue::IntBitmap(bitmap) => Ok(bitmap),
                _ => unreachable!("REDIRECT_OF is always IntBitmap-encoded"),
            },
            None => Ok(RoaringBitmap::new()),
        }
    }
}

fn encode_obj(value: &Value) -> Result<Vec<u8>> {
    ValueCodec::new(ValueEncoding::Obj)
        .encode(&ColumnValue::Obj(value.clone()))
        .map_err(|e| Error::DecodeError {
            column: "OBJ".to_string(),
            reason: e.to_string(),
        })
}

fn decode_obj(column: &str, bytes: &[u8]) -> Result<Value> {
    match ValueCodec::new(ValueEncoding::Obj)
        .decode(bytes)
        .map_err(|e| Error::DecodeError {
            column: column.to_string(),
            reason: e.to_string(),
        })? {
        ColumnValue::Obj(value) => Ok(value),
        _ => unreachable!("decode(Obj codec) always returns ColumnValue::Obj"),
    }
}

fn value_as_lang_text_map(value: &Value) -> BTreeMap<String, String> {
    match value.as_map() {
        Some(map) => map
            .iter()
            .filter_map(|(lang, v)| v.as_text().map(|text| (lang.clone(), text.to_string())))
            .collect(),
        None => BTreeMap::new(),
    }
}

fn value_as_lang_list_map(value: &Value) -> BTreeMap<String, Vec<String>> {
    match value.as_map() {
        Some(map) => map
            .iter()
            .map(|(lang, v)| {
                let texts = v
                    .as_array()
                    .map(|arr| arr.iter().filter_map(Value::as_text).map(str::to_owned).collect())
                    .unwrap_or_default();
                (lang.clone(), texts)
            })
            .collect(),
        None => BTreeMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::graph_schema;
    use kgdb_interner::interner_schema;
    use kgdb_storage::StoreConfig;
    use tempfile::tempdir;

    fn open(dir: &std::path::Path) -> KVStore {
        let mut schema = interner_schema();
        for col in graph_schema().columns() {
            schema = schema.with_column(col.clone());
        }
        KVStore::open(StoreConfig::for_testing(dir), schema).unwrap()
    }

    #[test]
    fn label_round_trips_through_string_lookup() {
        let dir = tempdir().unwrap();
        let store = open(dir.path());
        let interner = IdInterner::open(&store).unwrap();
        let graph = GraphStore::new(&store, &interner);
        let lid = interner.get_or_create("Q1490").unwrap();
        graph.put_label(lid, "Tokyo").unwrap();
        assert_eq!(
            graph.get_label(EntityRef::Id("Q1490")).unwrap(),
            Some("Tokyo".to_string())
        );
    }

    #[test]
    fn redirect_is_dereferenced_once() {
        let dir = tempdir().unwrap();
        let store = open(dir.path());
        let interner = IdInterner::open(&store).unwrap();
        let graph = GraphStore::new(&store, &interner);
        let old = interner.get_or_create("Q_old").unwrap();
        let new = interner.get_or_create("Q_new").unwrap();
        graph.put_label(new, "Canonical").unwrap();
        graph.put_redirect(old, new).unwrap();
        assert_eq!(graph.canonicalize(old).unwrap(), new);
        assert_eq!(
            graph.get_label(EntityRef::Lid(old)).unwrap(),
            Some("Canonical".to_string())
        );
    }

    #[test]
    fn redirect_of_tracks_reverse_mapping() {
        let dir = tempdir().unwrap();
        let store = open(dir.path());
        let interner = IdInterner::open(&store).unwrap();
        let graph = GraphStore::new(&store, &interner);
        let old = interner.get_or_create("Q_old").unwrap();
        let new = interner.get_or_create("Q_new").unwrap();
        graph.put_redirect(old, new).unwrap();
        assert!(graph.redirects_of(new).unwrap().contains(old.get()));
    }

    #[test]
    fn claims_entity_round_trips_sorted() {
        let dir = tempdir().unwrap();
        let store = open(dir.path());
        let interner = IdInterner::open(&store).unwrap();
        let graph = GraphStore::new(&store, &interner);
        let subject = interner.get_or_create("Q5").unwrap();
        let prop = interner.get_or_create("P31").unwrap();
        graph
            .put_claims_entity_with_interning(subject, prop, &["Q3", "Q1"])
            .unwrap();
        let objects = graph.get_claims_entity(EntityRef::Lid(subject), prop).unwrap();
        let q1 = interner.lookup_by_id("Q1").unwrap();
        let q3 = interner.lookup_by_id("Q3").unwrap();
        assert_eq!(objects, {
            let mut v = vec![q1, q3];
            v.sort();
            v
        });
    }

    #[test]
    fn missing_entity_is_not_found() {
        let dir = tempdir().unwrap();
        let store = open(dir.path());
        let interner = IdInterner::open(&store).unwrap();
        let graph = GraphStore::new(&store, &interner);
        assert!(graph.get_label(EntityRef::Id("Q999")).unwrap_err().is_absent());
    }

    #[test]
    fn labels_desc_sitelinks_round_trip() {
        let dir = tempdir().unwrap();
        let store = open(dir.path());
        let interner = IdInterner::open(&store).unwrap();
        let graph = GraphStore::new(&store, &interner);
        let lid = interner.get_or_create("Q1490").unwrap();

        let mut labels = BTreeMap::new();
        labels.insert("en".to_string(), "Tokyo".to_string());
        labels.insert("ja".to_string(), "東京".to_string());
        graph.put_labels(lid, &labels).unwrap();
        assert_eq!(graph.get_labels(EntityRef::Lid(lid)).unwrap(), labels);

        let mut desc = BTreeMap::new();
        desc.insert("en".to_string(), "capital of Japan".to_string());
        graph.put_desc(lid, &desc).unwrap();
        assert_eq!(graph.get_desc(EntityRef::Lid(lid)).unwrap(), desc);

        let mut sitelinks = BTreeMap::new();
        sitelinks.insert("enwiki".to_string(), "Tokyo".to_string());
        graph.put_sitelinks(lid, &sitelinks).unwrap();
        assert_eq!(graph.get_sitelinks(EntityRef::Lid(lid)).unwrap(), sitelinks);
    }

    #[test]
    fn aliases_round_trip_as_lang_to_list_map() {
        let dir = tempdir().unwrap();
        let store = open(dir.path());
        let interner = IdInterner::open(&store).unwrap();
        let graph = GraphStore::new(&store, &interner);
        let lid = interner.get_or_create("Q1490").unwrap();

        let mut aliases = BTreeMap::new();
        aliases.insert(
            "en".to_string(),
            vec!["Tokyo Metropolis".to_string(), "Edo".to_string()],
        );
        graph.put_aliases(lid, &aliases).unwrap();
        assert_eq!(graph.get_aliases(EntityRef::Lid(lid)).unwrap(), aliases);
    }

    #[test]
    fn claims_literal_round_trips() {
        let dir = tempdir().unwrap();
        let store = open(dir.path());
        let interner = IdInterner::open(&store).unwrap();
        let graph = GraphStore::new(&store, &interner);
        let lid = interner.get_or_create("Q1490").unwrap();

        let mut by_pid = BTreeMap::new();
        by_pid.insert("P1559".to_string(), Value::Array(vec![Value::Text("Tōkyō".into())]));
        let mut by_datatype = BTreeMap::new();
        by_datatype.insert("string".to_string(), Value::Map(by_pid));
        let value = Value::Map(by_datatype);

        graph.put_claims_literal(lid, &value).unwrap();
        assert_eq!(graph.get_claims_literal(EntityRef::Lid(lid)).unwrap(), Some(value));
    }

    #[test]
    fn missing_columns_default_to_empty_map() {
        let dir = tempdir().unwrap();
        let store = open(dir.path());
        let interner = IdInterner::open(&store).unwrap();
        let graph = GraphStore::new(&store, &interner);
        let lid = interner.get_or_create("Q1490").unwrap();
        assert!(graph.get_labels(EntityRef::Lid(lid)).unwrap().is_empty());
        assert!(graph.get_aliases(EntityRef::Lid(lid)).unwrap().is_empty());
    }

    #[test]
    fn wikipedia_and_dbpedia_mappings_round_trip() {
        let dir = tempdir().unwrap();
        let store = open(dir.path());
        let interner = IdInterner::open(&store).unwrap();
        let graph = GraphStore::new(&store, &interner);
        let lid = interner.get_or_create("Q1490").unwrap();

        graph.put_wikipedia_mapping(lid, "Tokyo").unwrap();
        graph.put_dbpedia_mapping(lid, "Tokyo").unwrap();
        assert_eq!(
            graph.get_wikipedia(EntityRef::Lid(lid)).unwrap(),
            Some("Tokyo".to_string())
        );
        assert_eq!(
            graph.get_dbpedia(EntityRef::Lid(lid)).unwrap(),
            Some("Tokyo".to_string())
        );
    }

    #[test]
    fn pagerank_round_trips_and_defaults_to_none() {
        let dir = tempdir().unwrap();
        let store = open(dir.path());
        let interner = IdInterner::open(&store).unwrap();
        let graph = GraphStore::new(&store, &interner);
        let lid = interner.get_or_create("Q1490").unwrap();
        assert_eq!(graph.get_pagerank(EntityRef::Lid(lid)).unwrap(), None);
        graph.put_pagerank(lid, 0.00042).unwrap();
        assert_eq!(graph.get_pagerank(EntityRef::Lid(lid)).unwrap(), Some(0.00042));
    }

    #[test]
    fn is_a_type_reflects_inverse_subclass_edges() {
        let dir = tempdir().unwrap();
        let store = open(dir.path());
        let interner = IdInterner::open(&store).unwrap();
        let graph = GraphStore::new(&store, &interner);
        let city = interner.get_or_create("Q515").unwrap();
        let settlement = interner.get_or_create("Q486972").unwrap();
        let subclass_of = interner.get_or_create("P279").unwrap();
        graph
            .put_claims_entity_with_interning(city, subclass_of, &["Q486972"])
            .unwrap();
        assert!(graph.is_a_type(settlement, subclass_of).unwrap());
        assert!(!graph.is_a_type(city, subclass_of).unwrap());
    }
}
