//! `SearchFusion`: combines the external text index, the SymDelete
//! fuzzy index, and `LabelIndex`'s PageRank priors into one ranked
//! entity list (§4.9).

use crate::rewrite::query_variants;
use crate::text_index::TextIndex;
use kgdb_core::{is_identifier_pattern, Lid, Result};
use kgdb_graph::{EntityRef, GraphStore};
use kgdb_interner::IdInterner;
use kgdb_labels::{is_ascii, LabelIndex, RankKind, SymDeleteIndex};
use std::collections::HashMap;

/// Which collaborators a query consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Both the text index and the fuzzy index (`"a"`).
    Both,
    /// Text index only (`"b"`).
    TextOnly,
    /// Fuzzy index only (`"f"`).
    FuzzyOnly,
}

impl SearchMode {
    /// Parse the single-letter CLI mode flag.
    #[must_use]
    pub fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            "a" => Some(SearchMode::Both),
            "b" => Some(SearchMode::TextOnly),
            "f" => Some(SearchMode::FuzzyOnly),
            _ => None,
        }
    }

    fn wants_text(self) -> bool {
        matches!(self, SearchMode::Both | SearchMode::TextOnly)
    }

    fn wants_fuzzy(self) -> bool {
        matches!(self, SearchMode::Both | SearchMode::FuzzyOnly)
    }
}

/// Published score-fusion weights (§4.9 step 5).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionWeights {
    /// Weight on the merged text/fuzzy label score.
    pub text: f64,
    /// Weight on the entity's normalized PageRank prior.
    pub prior: f64,
    /// Weight on the closest-label string similarity.
    pub label: f64,
    /// Weight on the canonical-label string similarity (English only).
    pub main_label: f64,
}

impl Default for FusionWeights {
    fn default() -> Self {
        FusionWeights { text: 0.4, prior: 0.3, label: 0.3, main_label: 0.001 }
    }
}

const TEXT_SOURCE_WEIGHT: f64 = 0.9;
const FUZZY_SOURCE_WEIGHT: f64 = 1.0;

/// Composes a [`GraphStore`]/[`IdInterner`]/[`LabelIndex`] with an
/// optional [`SymDeleteIndex`] and an optional external [`TextIndex`]
/// to answer ranked entity search queries.
pub struct SearchFusion<'a> {
    graph: &'a GraphStore<'a>,
    interner: &'a IdInterner<'a>,
    labels: &'a LabelIndex<'a>,
    symdelete: Option<&'a SymDeleteIndex<'a>>,
    text_index: &'a dyn TextIndex,
    weights: FusionWeights,
}

impl<'a> SearchFusion<'a> {
    /// Compose a fusion engine. `symdelete` is `None` to run `"b"`-only
    /// deployments with no fuzzy engine at all; `text_index` can be
    /// [`crate::text_index::NoTextIndex`] when no BM25 backend is wired up.
    #[must_use]
    pub fn new(
        graph: &'a GraphStore<'a>,
        interner: &'a IdInterner<'a>,
        labels: &'a LabelIndex<'a>,
        symdelete: Option<&'a SymDeleteIndex<'a>>,
        text_index: &'a dyn TextIndex,
    ) -> Self {
        SearchFusion { graph, interner, labels, symdelete, text_index, weights: FusionWeights::default() }
    }

    /// Override the default [`FusionWeights`].
    #[must_use]
    pub fn with_weights(mut self, weights: FusionWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Resolve `query` to ranked `(qid, score)` pairs, descending by
    /// score with `qid`-ascending tie-break, truncated to `limit`.
    ///
    /// # Errors
    ///
    /// Propagates graph/interner/label-index storage faults.
    pub fn search(
        &self,
        query: &str,
        lang_hint: &str,
        mode: SearchMode,
        limit: usize,
    ) -> Result<Vec<(String, f64)>> {
        if is_identifier_pattern(query) {
            return Ok(vec![(query.to_uppercase(), 1.0)]);
        }
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let lang = if is_ascii(query) { lang_hint } else { "all" };

        let mut label_scores: HashMap<String, f64> = HashMap::new();
        for variant in query_variants(query) {
            for (label, score) in self.gather_label_hits(&variant, lang, mode, limit)? {
                label_scores.entry(label).and_modify(|s| *s = s.max(score)).or_insert(score);
            }
        }

        let mut responds: HashMap<Lid, f64> = HashMap::new();
        for (label, text_fuzzy_score) in label_scores {
            let candidates =
                self.labels.lookup_by_label(self.graph, self.interner, &label, lang, RankKind::Entity, limit)?;
            for (entity, prior) in candidates {
                let score = self.score_entity(entity, query, lang, text_fuzzy_score, prior)?;
                responds.entry(entity).and_modify(|s| *s = s.max(score)).or_insert(score);
            }
        }

        let mut out = Vec::with_capacity(responds.len());
        for (entity, score) in responds {
            let qid = self.interner.lookup_by_lid(entity)?;
            out.push((qid, score));
        }
        out.sort_by(|a, b| {
            b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then_with(|| a.0.cmp(&b.0))
        });
        out.truncate(limit);
        Ok(out)
    }

    fn gather_label_hits(
        &self,
        variant: &str,
        lang: &str,
        mode: SearchMode,
        limit: usize,
    ) -> Result<Vec<(String, f64)>> {
        let mut text_hits = if mode.wants_text() {
            self.text_index.search(variant, lang, limit)
        } else {
            Vec::new()
        };
        min_max_normalize(&mut text_hits);

        let mut fuzzy_hits = if mode.wants_fuzzy() {
            self.fuzzy_hits(variant)?
        } else {
            Vec::new()
        };
        min_max_normalize(&mut fuzzy_hits);

        let mut merged: HashMap<String, f64> = HashMap::new();
        for (label, score) in text_hits {
            let weighted = score * TEXT_SOURCE_WEIGHT;
            merged.entry(label).and_modify(|s| *s = s.max(weighted)).or_insert(weighted);
        }
        for (label, score) in fuzzy_hits {
            let weighted = score * FUZZY_SOURCE_WEIGHT;
            merged.entry(label).and_modify(|s| *s = s.max(weighted)).or_insert(weighted);
        }
        Ok(merged.into_iter().collect())
    }

    fn fuzzy_hits(&self, variant: &str) -> Result<Vec<(String, f64)>> {
        let Some(symdelete) = self.symdelete else { return Ok(Vec::new()) };
        let mut hits = Vec::new();
        for label_lid in symdelete.candidates(variant)? {
            let label = self.labels.label_for_lid(kgdb_labels::LabelLid::new(label_lid))?;
            let score = strsim::normalized_levenshtein(variant, &label);
            hits.push((label, score));
        }
        Ok(hits)
    }

    fn score_entity(&self, entity: Lid, query: &str, lang: &str, text_fuzzy: f64, prior: f64) -> Result<f64> {
        let w = &self.weights;
        if lang == "en" {
            let main_label_sim = match self.graph.get_label(EntityRef::Lid(entity))? {
                Some(label) => strsim::normalized_levenshtein(&label, query),
                None => 0.0,
            };
            let label_en_sim = closest_similarity(query, &self.labels.labels_for_entity(entity, "en")?);
            Ok(text_fuzzy * w.text + prior * w.prior + main_label_sim * w.main_label + label_en_sim * w.label)
        } else {
            let label_all_sim = closest_similarity(query, &self.labels.labels_for_entity(entity, "all")?);
            Ok(text_fuzzy * w.text + prior * w.prior + label_all_sim * w.label)
        }
    }
}

fn closest_similarity(query: &str, labels: &[String]) -> f64 {
    labels.iter().map(|l| strsim::normalized_levenshtein(l, query)).fold(0.0, f64::max)
}

fn min_max_normalize(pairs: &mut [(String, f64)]) {
    if pairs.is_empty() {
        return;
    }
    let min = pairs.iter().map(|(_, s)| *s).fold(f64::INFINITY, f64::min);
    let max = pairs.iter().map(|(_, s)| *s).fold(f64::NEG_INFINITY, f64::max);
    let div = max - min;
    for (_, score) in pairs.iter_mut() {
        *score = if div <= 0.0 { 1.0 } else { (*score - min) / div };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parses_single_letter_flags() {
        assert_eq!(SearchMode::from_flag("a"), Some(SearchMode::Both));
        assert_eq!(SearchMode::from_flag("b"), Some(SearchMode::TextOnly));
        assert_eq!(SearchMode::from_flag("f"), Some(SearchMode::FuzzyOnly));
        assert_eq!(SearchMode::from_flag("z"), None);
    }

    #[test]
    fn normalize_handles_degenerate_scores() {
        let mut pairs = vec![("a".to_string(), 5.0), ("b".to_string(), 5.0)];
        min_max_normalize(&mut pairs);
        assert!(pairs.iter().all(|(_, s)| (*s - 1.0).abs() < 1e-9));
    }

    #[test]
    fn normalize_spreads_scores_into_unit_interval() {
        let mut pairs = vec![("a".to_string(), 1.0), ("b".to_string(), 3.0), ("c".to_string(), 5.0)];
        min_max_normalize(&mut pairs);
        assert!((pairs[0].1 - 0.0).abs() < 1e-9);
        assert!((pairs[2].1 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn closest_similarity_picks_the_best_match() {
        let labels = vec!["Tokyo".to_string(), "Kyoto".to_string()];
        let sim = closest_similarity("Tokyo", &labels);
        assert!((sim - 1.0).abs() < 1e-9);
    }
}
