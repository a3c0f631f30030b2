//! `query entity` and `query boolean` (§6): wire `SearchFusion` and
//! `kgdb_invindex::evaluate` over the already-built entity/labels/
//! deletes stores.

use crate::stores::{open_deletes_store, open_entity_store, open_labels_store};
use kgdb_core::{Error, Lid, Result};
use kgdb_graph::GraphStore;
use kgdb_interner::IdInterner;
use kgdb_invindex::{evaluate, BoolOp, Predicate};
use kgdb_labels::{LabelIndex, SymDeleteIndex};
use kgdb_search::{NoTextIndex, SearchFusion, SearchMode};
use std::path::Path;

/// `query entity <text>`: resolve a search-box query to ranked
/// `(qid, score)` pairs.
///
/// `fuzzy_tuning` is the `max_distance:prefix_len` pair identifying
/// which `deletes` store to attach; a missing store degrades to a
/// fuzzy-less (text/prior only) search rather than failing, matching
/// `SearchFusion`'s `None`-symdelete mode.
///
/// # Errors
///
/// Propagates storage faults, or [`Error::InvalidInput`] for a
/// malformed `--mode`/`--fuzzy-tuning`.
#[allow(clippy::too_many_arguments)]
pub fn run_entity(
    data_dir: &Path,
    text: &str,
    lang: &str,
    mode: &str,
    limit: usize,
    fuzzy_tuning: &str,
) -> Result<Vec<(String, f64)>> {
    let mode = SearchMode::from_flag(mode)
        .ok_or_else(|| Error::InvalidInput(format!("unknown query mode: {mode}")))?;
    let (max_distance, prefix_len) = parse_fuzzy_tuning(fuzzy_tuning)?;

    let entity_store = open_entity_store(data_dir, true)?;
    let interner = IdInterner::open(&entity_store)?;
    let graph = GraphStore::new(&entity_store, &interner);
    let labels_store = open_labels_store(data_dir, true)?;
    let labels = LabelIndex::open(&labels_store)?;

    let deletes_store = open_deletes_store(data_dir, lang, max_distance, prefix_len, true).ok();
    let symdelete = deletes_store
        .as_ref()
        .map(|store| SymDeleteIndex::open(store, kgdb_labels::SymDeleteConfig { prefix_len, max_distance }));

    let text_index = NoTextIndex;
    let fusion = SearchFusion::new(&graph, &interner, &labels, symdelete.as_ref(), &text_index);
    fusion.search(text, lang, mode, limit)
}

fn parse_fuzzy_tuning(spec: &str) -> Result<(usize, usize)> {
    let (max_distance, prefix_len) = spec
        .split_once(':')
        .ok_or_else(|| Error::InvalidInput(format!("expected max_distance:prefix_len, got {spec}")))?;
    let max_distance: usize = max_distance
        .parse()
        .map_err(|_| Error::InvalidInput(format!("bad max_distance in {spec}")))?;
    let prefix_len: usize = prefix_len
        .parse()
        .map_err(|_| Error::InvalidInput(format!("bad prefix_len in {spec}")))?;
    Ok((max_distance, prefix_len))
}

/// `query boolean <predicates...>`: evaluate a `[+-=]P=Q` predicate
/// list against the inverted claim index.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for a malformed predicate string or
/// an unresolvable `P`/`Q`; otherwise propagates storage faults.
pub fn run_boolean(data_dir: &Path, predicate_strings: &[String]) -> Result<Vec<String>> {
    let entity_store = open_entity_store(data_dir, true)?;
    let interner = IdInterner::open(&entity_store)?;
    let graph = GraphStore::new(&entity_store, &interner);

    let mut predicates = Vec::with_capacity(predicate_strings.len());
    for raw in predicate_strings {
        predicates.push(parse_predicate(&interner, raw)?);
    }

    let bitmap = evaluate(&graph, &predicates)?;
    let mut qids = Vec::with_capacity(bitmap.len() as usize);
    for raw_lid in bitmap {
        qids.push(interner.lookup_by_lid(Lid::new(raw_lid))?);
    }
    qids.sort();
    Ok(qids)
}

fn parse_predicate(interner: &IdInterner<'_>, raw: &str) -> Result<Predicate> {
    let mut chars = raw.chars();
    let op = match chars.next() {
        Some('+') => BoolOp::And,
        Some('-') => BoolOp::Or,
        Some('=') => BoolOp::Not,
        _ => return Err(Error::InvalidInput(format!("predicate must start with [+-=]: {raw}"))),
    };
    let rest = chars.as_str();
    let (prop, object) = rest
        .split_once('=')
        .ok_or_else(|| Error::InvalidInput(format!("predicate must be [+-=]P=Q: {raw}")))?;
    if prop.is_empty() || object.is_empty() {
        return Err(Error::InvalidInput(format!("predicate must be [+-=]P=Q: {raw}")));
    }
    let prop_lid = interner.lookup_by_id(prop).map_err(|_| Error::InvalidInput(format!("unknown property: {prop}")))?;
    let object_lid =
        interner.lookup_by_id(object).map_err(|_| Error::InvalidInput(format!("unknown entity: {object}")))?;
    Ok(Predicate { op, object: object_lid, prop: Some(prop_lid) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kgdb_interner::interner_schema;
    use kgdb_storage::{KVStore, StoreConfig};

    fn open_test_interner(dir: &std::path::Path) -> KVStore {
        KVStore::open(StoreConfig::new(dir), interner_schema()).unwrap()
    }

    #[test]
    fn fuzzy_tuning_parses_max_distance_and_prefix_len() {
        assert_eq!(parse_fuzzy_tuning("4:10").unwrap(), (4, 10));
    }

    #[test]
    fn fuzzy_tuning_rejects_missing_colon() {
        assert!(parse_fuzzy_tuning("410").is_err());
    }

    #[test]
    fn fuzzy_tuning_rejects_non_numeric_parts() {
        assert!(parse_fuzzy_tuning("four:ten").is_err());
    }

    #[test]
    fn predicate_symbols_map_to_and_or_not() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_test_interner(dir.path());
        let interner = IdInterner::open(&store).unwrap();
        interner.get_or_create("P31").unwrap();
        interner.get_or_create("Q5").unwrap();

        assert_eq!(parse_predicate(&interner, "+P31=Q5").unwrap().op, BoolOp::And);
        assert_eq!(parse_predicate(&interner, "-P31=Q5").unwrap().op, BoolOp::Or);
        assert_eq!(parse_predicate(&interner, "=P31=Q5").unwrap().op, BoolOp::Not);
    }

    #[test]
    fn predicate_rejects_unknown_leading_symbol() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_test_interner(dir.path());
        let interner = IdInterner::open(&store).unwrap();
        assert!(parse_predicate(&interner, "*P31=Q5").is_err());
    }

    #[test]
    fn predicate_rejects_missing_equals_separator() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_test_interner(dir.path());
        let interner = IdInterner::open(&store).unwrap();
        assert!(parse_predicate(&interner, "+P31Q5").is_err());
    }
}
