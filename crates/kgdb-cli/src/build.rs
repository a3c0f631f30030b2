//! `build <stage>` — idempotent ingestion stage runners (§6).
//!
//! Wire-format specifics of the upstream dumps are an external
//! boundary; each stage here accepts the pragmatic already-staged
//! shape (decompressed SQL text, newline-delimited Wikidata JSON,
//! tab-separated mapping files) and drives the already-built
//! `kgdb-graph`/`kgdb-labels`/`kgdb-rank` pipelines over it.

use kgdb_core::{Error, Lid, Limits, Result, Value};
use kgdb_graph::ingest::{normalize_claim_value, parse_sql_values, ClaimValue, IdentifierClassSet};
use kgdb_graph::{EntityRef, GraphStore};
use kgdb_interner::{IdInterner, COL_LID_ID};
use kgdb_labels::{ExternalLabelSource, LabelIndex, NoExternalSources, SymDeleteIndex};
use kgdb_rank::{add_wikidata_claim_edges, compute_with_config, EdgeListBuilder, PageRankConfig, PageRankStats};
use kgdb_storage::KVStore;
use serde_json::Value as Json;
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;
use tracing::{info, warn};

fn open_lines(path: &Path) -> Result<std::io::BufReader<std::fs::File>> {
    let file = std::fs::File::open(path)
        .map_err(|_| Error::NotFound(format!("dump not found: {}", path.display())))?;
    Ok(std::io::BufReader::new(file))
}

/// Every LID currently known to the interner, in ascending order.
///
/// # Errors
///
/// Propagates storage faults.
pub fn all_entity_lids(entity_store: &KVStore) -> Result<Vec<Lid>> {
    let rows = entity_store.iter(COL_LID_ID, None, None)?;
    let mut lids = Vec::with_capacity(rows.len());
    for (key, _) in rows {
        if key.len() != 4 {
            return Err(Error::DecodeError {
                column: COL_LID_ID.to_string(),
                reason: format!("expected a 4-byte LID key, got {} bytes", key.len()),
            });
        }
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&key);
        lids.push(Lid::new(u32::from_be_bytes(raw)));
    }
    lids.sort();
    Ok(lids)
}

/// `build redirects`: join `page.sql`'s `(page_id, page_namespace,
/// page_title, ...)` tuples against `redirect.sql`'s `(rd_from,
/// rd_namespace, rd_title, ...)` tuples to populate `REDIRECT`/
/// `REDIRECT_OF`.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if either input file is missing.
pub fn run_redirects(
    interner: &IdInterner<'_>,
    graph: &GraphStore<'_>,
    page_sql: &Path,
    redirect_sql: &Path,
) -> Result<usize> {
    let mut page_titles: BTreeMap<u64, String> = BTreeMap::new();
    for line in open_lines(page_sql)?.lines() {
        let line = line.map_err(Error::IoError)?;
        for tuple in parse_sql_values(&line) {
            let (Some(Some(id)), Some(Some(title))) = (tuple.first(), tuple.get(2)) else { continue };
            let Ok(id) = id.parse::<u64>() else { continue };
            page_titles.insert(id, title.clone());
        }
    }

    let mut count = 0;
    for line in open_lines(redirect_sql)?.lines() {
        let line = line.map_err(Error::IoError)?;
        for tuple in parse_sql_values(&line) {
            let (Some(Some(from_id)), Some(Some(to_title))) = (tuple.first(), tuple.get(2)) else { continue };
            let Ok(from_id) = from_id.parse::<u64>() else { continue };
            let Some(from_title) = page_titles.get(&from_id) else {
                warn!(from_id, "redirect source page id not found in page.sql, skipping");
                continue;
            };
            let from_lid = interner.get_or_create(from_title)?;
            let to_lid = interner.get_or_create(to_title)?;
            graph.put_redirect(from_lid, to_lid)?;
            count += 1;
        }
    }
    info!(count, "redirects ingested");
    Ok(count)
}

/// `build mappings`: attach Wikipedia titles and DBpedia resource
/// names to already-interned Wikidata entities from tab-separated
/// `qid\tvalue` files.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if either input file is missing.
pub fn run_mappings(
    interner: &IdInterner<'_>,
    graph: &GraphStore<'_>,
    wikipedia: &Path,
    dbpedia: &Path,
) -> Result<usize> {
    let mut count = 0;
    for line in open_lines(wikipedia)?.lines() {
        let line = line.map_err(Error::IoError)?;
        let Some((qid, title)) = line.split_once('\t') else { continue };
        let lid = interner.get_or_create(qid)?;
        graph.put_wikipedia_mapping(lid, title)?;
        count += 1;
    }
    for line in open_lines(dbpedia)?.lines() {
        let line = line.map_err(Error::IoError)?;
        let Some((qid, resource)) = line.split_once('\t') else { continue };
        let lid = interner.get_or_create(qid)?;
        graph.put_dbpedia_mapping(lid, resource)?;
        count += 1;
    }
    info!(count, "mappings ingested");
    Ok(count)
}

fn lang_map_from_json(value: &Json, field: &str) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    let Some(obj) = value.get(field).and_then(Json::as_object) else { return out };
    for (lang, entry) in obj {
        if let Some(text) = entry.get("value").and_then(Json::as_str) {
            out.insert(lang.clone(), text.to_string());
        }
    }
    out
}

fn alias_map_from_json(value: &Json) -> BTreeMap<String, Vec<String>> {
    let mut out = BTreeMap::new();
    let Some(obj) = value.get("aliases").and_then(Json::as_object) else { return out };
    for (lang, entries) in obj {
        let Some(entries) = entries.as_array() else { continue };
        let values: Vec<String> = entries
            .iter()
            .filter_map(|e| e.get("value").and_then(Json::as_str).map(str::to_string))
            .collect();
        if !values.is_empty() {
            out.insert(lang.clone(), values);
        }
    }
    out
}

fn sitelinks_from_json(value: &Json) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    let Some(obj) = value.get("sitelinks").and_then(Json::as_object) else { return out };
    for (site, entry) in obj {
        if let Some(title) = entry.get("title").and_then(Json::as_str) {
            out.insert(site.clone(), title.to_string());
        }
    }
    out
}

/// Strip a Wikidata JSON dump's outer `[`/`]`/trailing comma, one item
/// per line. Returns `None` for a wrapper-only or blank line.
fn strip_dump_wrapper(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed == "[" || trimmed == "]" {
        return None;
    }
    Some(trimmed.trim_end_matches(','))
}

/// One item's claims, split into the entity-valued claims already
/// written by the caller and the literal-valued claims left to persist.
struct ParsedClaims {
    instance_of: Vec<String>,
    literal: BTreeMap<String, BTreeMap<String, Vec<Value>>>,
}

fn ingest_claims(
    graph: &GraphStore<'_>,
    interner: &IdInterner<'_>,
    lid: Lid,
    claims: &Json,
    instance_of_prop: &str,
) -> Result<ParsedClaims> {
    let mut instance_of = Vec::new();
    let mut literal: BTreeMap<String, BTreeMap<String, Vec<Value>>> = BTreeMap::new();

    let Some(claims) = claims.as_object() else {
        return Ok(ParsedClaims { instance_of, literal });
    };
    for (pid, snaks) in claims {
        let Some(snaks) = snaks.as_array() else { continue };
        let mut entity_objects: Vec<String> = Vec::new();
        for snak in snaks {
            let Some(datavalue) = snak.get("mainsnak").and_then(|m| m.get("datavalue")) else { continue };
            let Some(datatype) = datavalue.get("type").and_then(Json::as_str) else { continue };
            let Some(value) = datavalue.get("value") else { continue };
            let Some(claim_value) = normalize_claim_value(datatype, value) else { continue };
            match claim_value {
                ClaimValue::EntityId(id) => {
                    if pid == instance_of_prop {
                        instance_of.push(id.clone());
                    }
                    entity_objects.push(id);
                }
                ClaimValue::Time(text) => {
                    literal.entry("time".to_string()).or_default().entry(pid.clone()).or_default().push(Value::Text(text));
                }
                ClaimValue::Quantity { amount, unit } => {
                    let mut map = BTreeMap::new();
                    map.insert("amount".to_string(), Value::Text(amount));
                    map.insert("unit".to_string(), Value::Text(unit));
                    literal.entry("quantity".to_string()).or_default().entry(pid.clone()).or_default().push(Value::Map(map));
                }
                ClaimValue::MonolingualText(text) | ClaimValue::PlainString(text) => {
                    literal.entry("string".to_string()).or_default().entry(pid.clone()).or_default().push(Value::Text(text));
                }
            }
        }
        if !entity_objects.is_empty() {
            let prop_lid = interner.get_or_create(pid)?;
            let refs: Vec<&str> = entity_objects.iter().map(String::as_str).collect();
            graph.put_claims_entity_with_interning(lid, prop_lid, &refs)?;
        }
    }
    Ok(ParsedClaims { instance_of, literal })
}

/// `build info`: ingest a Wikidata JSON dump (one object per line,
/// tolerating the dump's outer `[ ... ]` array wrapper) into
/// `LABEL`/`LABELS`/`DESC`/`ALIASES`/`SITELINKS`/`CLAIMS_ENT`/`CLAIMS_LIT`.
///
/// Entities whose `instance_of_prop` claim intersects
/// `identifier_skip` are still interned (so claims pointing *at* them
/// still resolve) but contribute no literal claims of their own,
/// mirroring the source system's identifier-class skip list used when
/// building the label vocabulary.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if `wikidata_dump` is missing.
pub fn run_info(
    interner: &IdInterner<'_>,
    graph: &GraphStore<'_>,
    wikidata_dump: &Path,
    instance_of_prop: &str,
    identifier_skip: &IdentifierClassSet,
) -> Result<usize> {
    let mut ingested = 0usize;
    let mut skipped = 0usize;
    for line in open_lines(wikidata_dump)?.lines() {
        let line = line.map_err(Error::IoError)?;
        let Some(line) = strip_dump_wrapper(&line) else { continue };
        let item: Json = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "skipping malformed dump line");
                skipped += 1;
                continue;
            }
        };
        if item.get("type").and_then(Json::as_str) != Some("item") {
            continue;
        }
        let Some(qid) = item.get("id").and_then(Json::as_str) else {
            skipped += 1;
            continue;
        };
        if !kgdb_core::is_identifier_pattern(qid) {
            skipped += 1;
            continue;
        }

        let lid = interner.get_or_create(qid)?;

        let labels = lang_map_from_json(&item, "labels");
        if let Some(en) = labels.get("en") {
            graph.put_label(lid, en)?;
        }
        if !labels.is_empty() {
            graph.put_labels(lid, &labels)?;
        }
        let descriptions = lang_map_from_json(&item, "descriptions");
        if !descriptions.is_empty() {
            graph.put_desc(lid, &descriptions)?;
        }
        let aliases = alias_map_from_json(&item);
        if !aliases.is_empty() {
            graph.put_aliases(lid, &aliases)?;
        }
        let sitelinks = sitelinks_from_json(&item);
        if !sitelinks.is_empty() {
            graph.put_sitelinks(lid, &sitelinks)?;
        }

        let parsed = match item.get("claims") {
            Some(claims) => ingest_claims(graph, interner, lid, claims, instance_of_prop)?,
            None => ParsedClaims { instance_of: Vec::new(), literal: BTreeMap::new() },
        };

        if parsed.instance_of.iter().any(|id| identifier_skip.contains(id)) {
            skipped += 1;
            continue;
        }
        if !parsed.literal.is_empty() {
            let by_datatype = parsed
                .literal
                .into_iter()
                .map(|(datatype, by_pid)| {
                    let by_pid = by_pid.into_iter().map(|(pid, values)| (pid, Value::Array(values))).collect();
                    (datatype, Value::Map(by_pid))
                })
                .collect();
            graph.put_claims_literal(lid, &Value::Map(by_datatype))?;
        }

        ingested += 1;
    }
    info!(ingested, skipped, "wikidata entities ingested");
    Ok(ingested)
}

/// `build pagerank`: assemble the Wikidata-claim edge graph and run
/// power-iteration PageRank over every currently-known entity.
///
/// # Errors
///
/// Propagates storage faults.
pub fn run_pagerank(store: &KVStore, graph: &GraphStore<'_>, interner: &IdInterner<'_>, alpha: f64) -> Result<PageRankStats> {
    let mut builder = EdgeListBuilder::new();
    add_wikidata_claim_edges(store, graph, &mut builder)?;
    let n = interner.len() as usize;
    let matrix = builder.build(n);
    let config = PageRankConfig { alpha, ..PageRankConfig::default() };
    let result = compute_with_config(&matrix, n, None, config);
    for (raw_lid, &score) in result.scores.iter().enumerate() {
        graph.put_pagerank(Lid::new(raw_lid as u32), score)?;
    }
    info!(n, iterations = result.iterations, "pagerank recomputed");
    Ok(result.stats)
}

/// `build labels`: rebuild the vocabulary and the PageRank-ranked
/// lookup lists over every currently-known entity.
///
/// # Errors
///
/// Propagates storage faults.
pub fn run_labels(
    labels: &LabelIndex<'_>,
    graph: &GraphStore<'_>,
    interner: &IdInterner<'_>,
    entities: &[Lid],
    instance_of_prop: &str,
    subclass_of_prop: &str,
    q5: &str,
) -> Result<()> {
    let instance_of_lid = interner.get_or_create(instance_of_prop)?;
    let subclass_of_lid = interner.get_or_create(subclass_of_prop)?;
    let q5_lid = interner.get_or_create(q5)?;
    let source: &dyn ExternalLabelSource = &NoExternalSources;
    labels.build_vocab(graph, entities, instance_of_lid, q5_lid, source)?;

    let mut scores = Vec::with_capacity(entities.len());
    for &entity in entities {
        scores.push(graph.get_pagerank(EntityRef::Lid(entity))?.unwrap_or(0.0));
    }
    let stats = PageRankStats::from_scores(&scores);
    labels.build_label_ranking(graph, interner, entities, subclass_of_lid, &stats, Limits::default().limit_gen_can)?;
    info!(entities = entities.len(), "label vocabulary and ranking rebuilt");
    Ok(())
}

/// `build deletes`: rebuild a SymDelete fuzzy index from every label
/// currently in the vocabulary.
///
/// # Errors
///
/// Propagates storage faults.
pub fn run_deletes(symdelete: &SymDeleteIndex<'_>, labels: &LabelIndex<'_>) -> Result<usize> {
    let vocabulary = labels.all_labels()?;
    symdelete.build_from_labels(vocabulary.iter().map(|(label, lid)| (label.as_str(), *lid)))?;
    Ok(vocabulary.len())
}

/// `build text-index`: a thin stub. Building the external BM25 engine
/// lives outside this crate's boundary
/// ([`kgdb_search::text_index::TextIndex`] is the seam this CLI would
/// dispatch to); this stage only confirms the labels store it would
/// source text from already exists.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if the labels store hasn't been built yet.
pub fn run_text_index(data_dir: &Path) -> Result<()> {
    let labels_path = data_dir.join("labels");
    if !labels_path.exists() {
        return Err(Error::NotFound(format!("labels store not yet built: {}", labels_path.display())));
    }
    info!("external text index build is an out-of-process boundary; nothing to do locally");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strip_dump_wrapper_drops_brackets_and_blank_lines() {
        assert_eq!(strip_dump_wrapper("["), None);
        assert_eq!(strip_dump_wrapper("]"), None);
        assert_eq!(strip_dump_wrapper("   "), None);
        assert_eq!(strip_dump_wrapper("{\"id\":\"Q1\"},"), Some("{\"id\":\"Q1\"}"));
        assert_eq!(strip_dump_wrapper("{\"id\":\"Q1\"}"), Some("{\"id\":\"Q1\"}"));
    }

    #[test]
    fn lang_map_pulls_value_field_per_language() {
        let item = json!({"labels": {"en": {"language": "en", "value": "Tokyo"}, "ja": {"language": "ja", "value": "東京"}}});
        let labels = lang_map_from_json(&item, "labels");
        assert_eq!(labels.get("en").map(String::as_str), Some("Tokyo"));
        assert_eq!(labels.get("ja").map(String::as_str), Some("東京"));
    }

    #[test]
    fn lang_map_is_empty_when_field_absent() {
        let item = json!({});
        assert!(lang_map_from_json(&item, "descriptions").is_empty());
    }

    #[test]
    fn alias_map_collects_values_per_language() {
        let item = json!({"aliases": {"en": [{"language": "en", "value": "Edo"}, {"language": "en", "value": "Tōkyō"}]}});
        let aliases = alias_map_from_json(&item);
        assert_eq!(aliases.get("en"), Some(&vec!["Edo".to_string(), "Tōkyō".to_string()]));
    }

    #[test]
    fn sitelinks_map_pulls_title_field() {
        let item = json!({"sitelinks": {"enwiki": {"site": "enwiki", "title": "Tokyo"}}});
        let sitelinks = sitelinks_from_json(&item);
        assert_eq!(sitelinks.get("enwiki").map(String::as_str), Some("Tokyo"));
    }
}
