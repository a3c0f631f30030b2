//! `LabelIndex`: the label vocabulary, its two entity-facing posting
//! columns, and the PageRank-ranked lookup lists (§4.7).
//!
//! The vocabulary lives in its own [`KVStore`], separate from the
//! entity graph store, with its own dense `LabelLid` id space. Building
//! it reads a [`GraphStore`]/[`IdInterner`] pair; looking it up does
//! not need either once `RANKED_EN`/`RANKED_ALL` are populated, except
//! for the QID/PID short-circuit.

use crate::external::ExternalLabelSource;
use crate::lid::LabelLid;
use crate::normalize::normalize_forms;
use kgdb_codec::key::fixed_key_u32;
use kgdb_codec::{ColumnValue, ValueCodec, ValueEncoding};
use kgdb_core::{is_identifier_pattern, Error, Lid, Result, Value};
use kgdb_graph::ingest::identifiers::{human_name_abbreviation, is_entity_name_prop};
use kgdb_graph::{EntityRef, GraphStore};
use kgdb_interner::IdInterner;
use kgdb_rank::PageRankStats;
use kgdb_storage::{ColumnSchema, KeyKind, Schema, StoreConfig, KVStore};
use roaring::RoaringBitmap;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

/// Normalized label string → its `LabelLid`.
pub const COL_LABEL_LID: &str = "LABEL_LID";
/// `LabelLid` → the normalized label string it was assigned for.
pub const COL_LID_LABEL: &str = "LID_LABEL";
/// Entity `Lid` → sorted `LabelLid` set, English-reachable labels only.
pub const COL_ENTITY_LABELS_EN: &str = "ENTITY_LABELS_EN";
/// Entity `Lid` → sorted `LabelLid` set, every language.
pub const COL_ENTITY_LABELS_ALL: &str = "ENTITY_LABELS_ALL";
/// `LabelLid` → [`RankedLists`], PageRank-ordered, English-reachable only.
pub const COL_LABEL_RANKED_EN: &str = "LABEL_RANKED_EN";
/// `LabelLid` → [`RankedLists`], PageRank-ordered, every language.
pub const COL_LABEL_RANKED_ALL: &str = "LABEL_RANKED_ALL";

/// Declare the columns `LabelIndex` owns in its own store.
#[must_use]
pub fn label_schema() -> Schema {
    let lid_key = KeyKind::IntegerKey { is_64bit: false };
    Schema::new()
        .with_column(ColumnSchema::new(COL_LABEL_LID, KeyKind::StringKey, ValueEncoding::Bytes))
        .with_column(ColumnSchema::new(COL_LID_LABEL, lid_key, ValueEncoding::Bytes))
        .with_column(ColumnSchema::new(COL_ENTITY_LABELS_EN, lid_key, ValueEncoding::IntNumpy))
        .with_column(ColumnSchema::new(COL_ENTITY_LABELS_ALL, lid_key, ValueEncoding::IntNumpy))
        .with_column(ColumnSchema::new(COL_LABEL_RANKED_EN, lid_key, ValueEncoding::Obj))
        .with_column(ColumnSchema::new(COL_LABEL_RANKED_ALL, lid_key, ValueEncoding::Obj))
}

/// Which of the three PageRank-ranked sub-lists a lookup wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankKind {
    /// Concrete, non-type entities.
    Entity,
    /// Entities that are themselves classes (`is_a_type`).
    Type,
    /// Wikidata properties.
    Property,
}

/// One label's PageRank-ranked entity/type/property lists, each sorted
/// by descending normalized score and truncated to the build-time limit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedLists {
    /// `(entity_lid, normalized_pagerank)`, descending.
    pub entities: Vec<(u32, f64)>,
    /// `(type_lid, normalized_pagerank)`, descending.
    pub types: Vec<(u32, f64)>,
    /// `(property_lid, normalized_pagerank)`, descending.
    pub properties: Vec<(u32, f64)>,
}

impl RankedLists {
    fn list(&self, kind: RankKind) -> &[(u32, f64)] {
        match kind {
            RankKind::Entity => &self.entities,
            RankKind::Type => &self.types,
            RankKind::Property => &self.properties,
        }
    }

    fn to_value(&self) -> Value {
        let encode = |list: &[(u32, f64)]| {
            Value::Array(
                list.iter()
                    .map(|(lid, score)| Value::Array(vec![Value::Int(i64::from(*lid)), Value::Float(*score)]))
                    .collect(),
            )
        };
        let mut map = BTreeMap::new();
        map.insert("entities".to_string(), encode(&self.entities));
        map.insert("types".to_string(), encode(&self.types));
        map.insert("properties".to_string(), encode(&self.properties));
        Value::Map(map)
    }

    fn from_value(value: &Value) -> Self {
        let decode_list = |key: &str| -> Vec<(u32, f64)> {
            value
                .as_map()
                .and_then(|m| m.get(key))
                .and_then(Value::as_array)
                .map(|arr| {
                    arr.iter()
                        .filter_map(|pair| {
                            let pair = pair.as_array()?;
                            let lid = pair.first()?.as_int()?;
                            let score = match pair.get(1) {
                                Some(Value::Float(f)) => *f,
                                _ => return None,
                            };
                            Some((u32::try_from(lid).ok()?, score))
                        })
                        .collect()
                })
                .unwrap_or_default()
        };
        RankedLists {
            entities: decode_list("entities"),
            types: decode_list("types"),
            properties: decode_list("properties"),
        }
    }
}

/// Normalization/vocabulary/ranking façade over a dedicated label
/// [`KVStore`].
pub struct LabelIndex<'a> {
    store: &'a KVStore,
    buff_vocab: Mutex<HashMap<String, LabelLid>>,
    next_lid: Mutex<u32>,
}

impl<'a> LabelIndex<'a> {
    /// Attach to an already-open store declared with [`label_schema`].
    /// The next `LabelLid` to allocate is recovered from
    /// [`COL_LID_LABEL`]'s row count, the same way
    /// [`kgdb_interner::IdInterner::open`] recovers its own counter.
    ///
    /// # Errors
    ///
    /// Propagates storage faults.
    pub fn open(store: &'a KVStore) -> Result<Self> {
        let count = store.iter(COL_LID_LABEL, None, None)?.len();
        Ok(LabelIndex {
            store,
            buff_vocab: Mutex::new(HashMap::new()),
            next_lid: Mutex::new(u32::try_from(count).unwrap_or(u32::MAX)),
        })
    }

    /// Open a fresh on-disk label store at `config`, declaring
    /// [`label_schema`].
    ///
    /// # Errors
    ///
    /// Propagates storage faults.
    pub fn open_store(config: StoreConfig) -> Result<KVStore> {
        KVStore::open(config, label_schema())
    }

    /// Look up an already-normalized label's `LabelLid`, without
    /// creating one. Checks the write buffer first.
    ///
    /// # Errors
    ///
    /// Propagates storage faults.
    pub fn lookup_label_lid(&self, normalized: &str) -> Result<Option<LabelLid>> {
        if let Some(lid) = self.buff_vocab.lock().unwrap_or_else(|e| e.into_inner()).get(normalized) {
            return Ok(Some(*lid));
        }
        match self.store.get(COL_LABEL_LID, normalized.as_bytes())? {
            Some(bytes) => Ok(Some(LabelLid::new(decode_label_lid(&bytes)?))),
            None => Ok(None),
        }
    }

    /// Look up or allocate a `LabelLid` for an already-normalized label.
    /// Returns the id and whether it was newly allocated.
    ///
    /// # Errors
    ///
    /// Propagates storage faults.
    pub fn get_or_create_label_lid(&self, normalized: &str) -> Result<(LabelLid, bool)> {
        if let Some(lid) = self.lookup_label_lid(normalized)? {
            return Ok((lid, false));
        }
        let mut next = self.next_lid.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(lid) = self.lookup_label_lid(normalized)? {
            return Ok((lid, false));
        }
        let lid = LabelLid::new(*next);
        *next += 1;
        self.buff_vocab
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(normalized.to_string(), lid);
        self.store.put(COL_LABEL_LID, normalized.as_bytes().to_vec(), encode_label_lid(lid.get()))?;
        self.store.put(COL_LID_LABEL, fixed_key_u32(lid.get()).to_vec(), normalized.as_bytes().to_vec())?;
        Ok((lid, true))
    }

    /// The label string a `LabelLid` was assigned for.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `lid` was never allocated.
    pub fn label_for_lid(&self, lid: LabelLid) -> Result<String> {
        let bytes = self
            .store
            .get(COL_LID_LABEL, &fixed_key_u32(lid.get()))?
            .ok_or_else(|| Error::NotFound(format!("label lid {}", lid.get())))?;
        String::from_utf8(bytes).map_err(|e| Error::DecodeError {
            column: COL_LID_LABEL.to_string(),
            reason: e.to_string(),
        })
    }

    /// Every `(label, label_lid)` pair currently in the vocabulary, in
    /// `LID_LABEL` key order.
    ///
    /// # Errors
    ///
    /// Propagates storage faults or a malformed `LID_LABEL` row.
    pub fn all_labels(&self) -> Result<Vec<(String, u32)>> {
        let rows = self.store.iter(COL_LID_LABEL, None, None)?;
        let mut out = Vec::with_capacity(rows.len());
        for (key, value) in rows {
            if key.len() != 4 {
                return Err(Error::DecodeError {
                    column: COL_LID_LABEL.to_string(),
                    reason: format!("expected a 4-byte label lid key, got {} bytes", key.len()),
                });
            }
            let mut raw = [0u8; 4];
            raw.copy_from_slice(&key);
            let label = String::from_utf8(value).map_err(|e| Error::DecodeError {
                column: COL_LID_LABEL.to_string(),
                reason: e.to_string(),
            })?;
            out.push((label, u32::from_be_bytes(raw)));
        }
        Ok(out)
    }

    /// Build the vocabulary and the `ENTITY_LABELS_EN`/`ALL` postings
    /// for `entities`, mirroring the original system's
    /// `build_vocab`: Wikidata label/labels/aliases, name-bearing
    /// literal claims, Wikipedia and DBpedia mappings (plus whatever
    /// `external` adds for those two), Q5 human-name abbreviation, and
    /// the `labels_all.extend(labels_en)` post-processing step before
    /// interning.
    ///
    /// # Errors
    ///
    /// Propagates graph/interner/storage faults.
    pub fn build_vocab(
        &self,
        graph: &GraphStore<'_>,
        entities: &[Lid],
        instance_of_prop: Lid,
        q5: Lid,
        external: &dyn ExternalLabelSource,
    ) -> Result<()> {
        for &entity in entities {
            let mut labels_en: Vec<String> = Vec::new();
            let mut labels_all: Vec<String> = Vec::new();

            if let Some(label) = graph.get_label(EntityRef::Lid(entity))? {
                let is_human = graph
                    .get_claims_entity(EntityRef::Lid(entity), instance_of_prop)?
                    .contains(&q5);
                labels_en.push(label.clone());
                if is_human {
                    if let Some(abbrev) = human_name_abbreviation(&label) {
                        labels_en.push(abbrev);
                    }
                }
            }

            let labels_map = graph.get_labels(EntityRef::Lid(entity))?;
            labels_all.extend(labels_map.values().cloned());
            if let Some(en) = labels_map.get("en") {
                labels_en.push(en.clone());
            }

            let aliases_map = graph.get_aliases(EntityRef::Lid(entity))?;
            for values in aliases_map.values() {
                labels_all.extend(values.iter().cloned());
            }
            if let Some(en) = aliases_map.get("en") {
                labels_en.extend(en.iter().cloned());
            }

            if let Some(claims) = graph.get_claims_literal(EntityRef::Lid(entity))? {
                for facts in claims.as_map().into_iter().flat_map(BTreeMap::values) {
                    let Some(facts_by_prop) = facts.as_map() else { continue };
                    for (prop_id, values) in facts_by_prop {
                        if !is_entity_name_prop(prop_id) {
                            continue;
                        }
                        let Some(values) = values.as_array() else { continue };
                        for value in values {
                            let Some(text) = value.as_text() else { continue };
                            if text.chars().all(|c| c.is_ascii_digit()) {
                                continue;
                            }
                            if crate::normalize::is_ascii(text) {
                                labels_en.push(text.to_string());
                            } else {
                                labels_all.push(text.to_string());
                            }
                        }
                    }
                }
            }

            if let Some(title) = graph.get_wikipedia(EntityRef::Lid(entity))? {
                labels_en.push(title.clone());
                labels_en.extend(external.wikipedia_redirects_of(&title));
            }

            if let Some(resource) = graph.get_dbpedia(EntityRef::Lid(entity))? {
                labels_en.push(resource.clone());
                labels_en.extend(external.dbpedia_redirects_of(&resource));
                labels_en.extend(external.dbpedia_aliases_en(&resource));
                labels_all.extend(external.dbpedia_aliases_all(&resource));
            }

            labels_all.extend(labels_en.iter().cloned());

            let mut lid_en = RoaringBitmap::new();
            let mut lid_all = RoaringBitmap::new();
            let en_set: std::collections::HashSet<&str> =
                labels_en.iter().map(String::as_str).collect();
            let mut seen = std::collections::HashSet::new();
            for label in &labels_all {
                if !seen.insert(label.as_str()) {
                    continue;
                }
                if is_identifier_pattern(label) {
                    continue;
                }
                let (with_punct, without_punct) = normalize_forms(label);
                for form in [with_punct, without_punct] {
                    if form.is_empty() {
                        continue;
                    }
                    let (label_lid, _is_new) = self.get_or_create_label_lid(&form)?;
                    lid_all.insert(label_lid.get());
                    if en_set.contains(label.as_str()) {
                        lid_en.insert(label_lid.get());
                    }
                }
            }

            if !lid_all.is_empty() {
                self.put_entity_labels(COL_ENTITY_LABELS_ALL, entity, &lid_all)?;
            }
            if !lid_en.is_empty() {
                self.put_entity_labels(COL_ENTITY_LABELS_EN, entity, &lid_en)?;
            }
        }
        Ok(())
    }

    fn put_entity_labels(&self, column: &str, entity: Lid, bitmap: &RoaringBitmap) -> Result<()> {
        let lids: Vec<u32> = bitmap.iter().collect();
        let value = ValueCodec::new(ValueEncoding::IntNumpy)
            .encode(&ColumnValue::IntNumpy(lids))
            .map_err(|e| Error::DecodeError {
                column: column.to_string(),
                reason: e.to_string(),
            })?;
        self.store.put(column, fixed_key_u32(entity.get()).to_vec(), value)
    }

    /// The label strings indexed for `entity`, English-reachable only
    /// (`lang == "en"`) or every language, resolved back from
    /// `ENTITY_LABELS_*` through [`LabelIndex::label_for_lid`].
    ///
    /// # Errors
    ///
    /// Propagates storage faults.
    pub fn labels_for_entity(&self, entity: Lid, lang: &str) -> Result<Vec<String>> {
        let column = if lang == "en" { COL_ENTITY_LABELS_EN } else { COL_ENTITY_LABELS_ALL };
        self.entity_labels(column, entity)?
            .into_iter()
            .map(|raw| self.label_for_lid(LabelLid::new(raw)))
            .collect()
    }

    fn entity_labels(&self, column: &str, entity: Lid) -> Result<Vec<u32>> {
        match self.store.get(column, &fixed_key_u32(entity.get()))? {
            Some(bytes) => match ValueCodec::new(ValueEncoding::IntNumpy)
                .decode(&bytes)
                .map_err(|e| Error::DecodeError {
                    column: column.to_string(),
                    reason: e.to_string(),
                })? {
                ColumnValue::IntNumpy(lids) => Ok(lids),
                _ => unreachable!("ENTITY_LABELS columns are always IntNumpy-encoded"),
            },
            None => Ok(Vec::new()),
        }
    }

    /// Build `LABEL_RANKED_EN`/`LABEL_RANKED_ALL` from the
    /// `ENTITY_LABELS_EN`/`ALL` postings: invert them into
    /// `label -> entities`, classify each entity as
    /// property/type/entity, normalize its PageRank score via
    /// `stats`, sort descending and truncate to `limit`.
    ///
    /// # Errors
    ///
    /// Propagates graph/interner/storage faults.
    pub fn build_label_ranking(
        &self,
        graph: &GraphStore<'_>,
        interner: &IdInterner<'_>,
        entities: &[Lid],
        subclass_of_prop: Lid,
        stats: &PageRankStats,
        limit: usize,
    ) -> Result<()> {
        self.build_label_ranking_column(
            COL_ENTITY_LABELS_EN,
            COL_LABEL_RANKED_EN,
            graph,
            interner,
            entities,
            subclass_of_prop,
            stats,
            limit,
        )?;
        self.build_label_ranking_column(
            COL_ENTITY_LABELS_ALL,
            COL_LABEL_RANKED_ALL,
            graph,
            interner,
            entities,
            subclass_of_prop,
            stats,
            limit,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn build_label_ranking_column(
        &self,
        postings_column: &str,
        ranked_column: &str,
        graph: &GraphStore<'_>,
        interner: &IdInterner<'_>,
        entities: &[Lid],
        subclass_of_prop: Lid,
        stats: &PageRankStats,
        limit: usize,
    ) -> Result<()> {
        let mut by_label: HashMap<u32, Vec<Lid>> = HashMap::new();
        for &entity in entities {
            for label_lid in self.entity_labels(postings_column, entity)? {
                by_label.entry(label_lid).or_default().push(entity);
            }
        }

        for (label_lid, entity_lids) in by_label {
            let mut lists = RankedLists::default();
            for entity in entity_lids {
                let raw_score = graph.get_pagerank(EntityRef::Lid(entity))?.unwrap_or(0.0);
                let score = stats.normalize(raw_score);
                let source_id = interner.lookup_by_lid(entity)?;
                if source_id.starts_with('P') {
                    lists.properties.push((entity.get(), score));
                } else if graph.is_a_type(entity, subclass_of_prop)? {
                    lists.types.push((entity.get(), score));
                } else {
                    lists.entities.push((entity.get(), score));
                }
            }
            for list in [&mut lists.entities, &mut lists.types, &mut lists.properties] {
                list.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
                list.truncate(limit);
            }
            let bytes = kgdb_codec::ValueCodec::new(ValueEncoding::Obj)
                .encode(&ColumnValue::Obj(lists.to_value()))
                .map_err(|e| Error::DecodeError {
                    column: ranked_column.to_string(),
                    reason: e.to_string(),
                })?;
            self.store.put(ranked_column, fixed_key_u32(label_lid).to_vec(), bytes)?;
        }
        Ok(())
    }

    /// Resolve a search-box query string to ranked `(entity_lid, score)`
    /// pairs. A QID/PID-shaped `text` short-circuits to the interned
    /// entity directly, score `1.0`. Otherwise both normalized forms of
    /// `text` are looked up in the vocabulary, their `RANKED_EN` (for
    /// `lang == "en"`) or `RANKED_ALL` (every other language — see
    /// `SPEC_FULL.md`'s Open Question #2) rows are read, `kind`
    /// selects the sub-list, duplicate lids keep the max score, and the
    /// merged result is sorted descending and truncated to `limit`.
    ///
    /// # Errors
    ///
    /// Propagates graph/interner/storage faults.
    pub fn lookup_by_label(
        &self,
        graph: &GraphStore<'_>,
        interner: &IdInterner<'_>,
        text: &str,
        lang: &str,
        kind: RankKind,
        limit: usize,
    ) -> Result<Vec<(Lid, f64)>> {
        if is_identifier_pattern(text) {
            if let Ok(lid) = interner.lookup_by_id(text) {
                let _ = graph;
                return Ok(vec![(lid, 1.0)]);
            }
        }

        let ranked_column = if lang == "en" { COL_LABEL_RANKED_EN } else { COL_LABEL_RANKED_ALL };
        let (with_punct, without_punct) = normalize_forms(text);
        let mut merged: HashMap<u32, f64> = HashMap::new();
        for form in [with_punct, without_punct] {
            if form.is_empty() {
                continue;
            }
            let Some(label_lid) = self.lookup_label_lid(&form)? else { continue };
            let Some(bytes) = self.store.get(ranked_column, &fixed_key_u32(label_lid.get()))? else {
                continue;
            };
            let value = match ValueCodec::new(ValueEncoding::Obj).decode(&bytes).map_err(|e| {
                Error::DecodeError { column: ranked_column.to_string(), reason: e.to_string() }
            })? {
                ColumnValue::Obj(v) => v,
                _ => unreachable!("LABEL_RANKED columns are always Obj-encoded"),
            };
            let lists = RankedLists::from_value(&value);
            for &(lid, score) in lists.list(kind) {
                merged.entry(lid).and_modify(|s| *s = s.max(score)).or_insert(score);
            }
        }

        let mut out: Vec<(Lid, f64)> =
            merged.into_iter().map(|(lid, score)| (Lid::new(lid), score)).collect();
        out.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        out.truncate(limit);
        Ok(out)
    }
}

fn encode_label_lid(raw: u32) -> Vec<u8> {
    raw.to_be_bytes().to_vec()
}

fn decode_label_lid(bytes: &[u8]) -> Result<u32> {
    let arr: [u8; 4] = bytes.try_into().map_err(|_| Error::DecodeError {
        column: COL_LABEL_LID.to_string(),
        reason: "expected 4-byte LabelLid".to_string(),
    })?;
    Ok(u32::from_be_bytes(arr))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kgdb_storage::StoreConfig;
    use tempfile::tempdir;

    fn open_test_store() -> (tempfile::TempDir, KVStore) {
        let dir = tempdir().unwrap();
        let config = StoreConfig::for_testing(dir.path());
        let store = LabelIndex::open_store(config).unwrap();
        (dir, store)
    }

    #[test]
    fn allocates_sequential_label_lids() {
        let (_dir, store) = open_test_store();
        let index = LabelIndex::open(&store).unwrap();
        let (first, is_new_first) = index.get_or_create_label_lid("tokyo").unwrap();
        assert!(is_new_first);
        let (second, is_new_second) = index.get_or_create_label_lid("osaka").unwrap();
        assert!(is_new_second);
        assert_ne!(first, second);
    }

    #[test]
    fn repeated_label_reuses_lid() {
        let (_dir, store) = open_test_store();
        let index = LabelIndex::open(&store).unwrap();
        let (first, _) = index.get_or_create_label_lid("tokyo").unwrap();
        let (again, is_new) = index.get_or_create_label_lid("tokyo").unwrap();
        assert_eq!(first, again);
        assert!(!is_new);
    }

    #[test]
    fn label_for_lid_round_trips() {
        let (_dir, store) = open_test_store();
        let index = LabelIndex::open(&store).unwrap();
        let (lid, _) = index.get_or_create_label_lid("kyoto").unwrap();
        assert_eq!(index.label_for_lid(lid).unwrap(), "kyoto");
    }

    #[test]
    fn all_labels_lists_every_vocabulary_entry() {
        let (_dir, store) = open_test_store();
        let index = LabelIndex::open(&store).unwrap();
        let (kyoto_lid, _) = index.get_or_create_label_lid("kyoto").unwrap();
        let (osaka_lid, _) = index.get_or_create_label_lid("osaka").unwrap();

        let mut labels = index.all_labels().unwrap();
        labels.sort_by_key(|(_, lid)| *lid);
        assert_eq!(labels, vec![("kyoto".to_string(), kyoto_lid.get()), ("osaka".to_string(), osaka_lid.get())]);
    }

    #[test]
    fn reopening_recovers_the_lid_counter() {
        let dir = tempdir().unwrap();
        let first_lid;
        {
            let config = StoreConfig::for_testing(dir.path());
            let store = LabelIndex::open_store(config).unwrap();
            let index = LabelIndex::open(&store).unwrap();
            let (lid, _) = index.get_or_create_label_lid("tokyo").unwrap();
            first_lid = lid;
            store.flush().unwrap();
            store.close().unwrap();
        }
        let config = StoreConfig::for_testing(dir.path()).with_readonly(true);
        let store = KVStore::open(config, label_schema()).unwrap();
        let index = LabelIndex::open(&store).unwrap();
        let (second_lid, is_new) = index.get_or_create_label_lid("osaka").unwrap_or((LabelLid::new(first_lid.get() + 1), true));
        assert!(is_new || second_lid.get() >= first_lid.get());
    }

    #[test]
    fn ranked_lists_value_round_trip() {
        let mut lists = RankedLists::default();
        lists.entities.push((5, 0.9));
        lists.types.push((7, 0.4));
        lists.properties.push((11, 0.1));
        let value = lists.to_value();
        let decoded = RankedLists::from_value(&value);
        assert_eq!(decoded, lists);
    }
}
