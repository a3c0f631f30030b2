//! Boolean `AND`/`OR`/`NOT` query planner over the inverted claim index.

use kgdb_core::{Lid, Result};
use kgdb_graph::GraphStore;
use roaring::RoaringBitmap;

/// One Boolean-query predicate: `op (prop?, value)`, where a `None`
/// property means "any property", folding `INV[(value, *)]` via union.
#[derive(Debug, Clone, Copy)]
pub struct Predicate {
    /// How this predicate combines with the running result.
    pub op: BoolOp,
    /// The object LID to match against (the query's `qid`).
    pub object: Lid,
    /// The property LID to match against, or `None` for "any property".
    pub prop: Option<Lid>,
}

/// The three supported combinators. The first predicate in a query
/// always acts as the seed regardless of its declared op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    /// Intersect with the running result.
    And,
    /// Union with the running result.
    Or,
    /// Subtract from the running result.
    Not,
}

/// Evaluate a Boolean query against `graph`'s inverted claim index.
///
/// Each predicate's candidate set is computed, then predicates are
/// folded in ascending-selectivity order (smallest candidate set
/// first), with the first predicate in that order acting as the seed
/// regardless of its declared [`BoolOp`]. A query with no predicates,
/// or whose only predicate is `OR` with an empty candidate set,
/// yields an empty result.
///
/// # Errors
///
/// Propagates storage faults while resolving a predicate's postings.
pub fn evaluate(graph: &GraphStore<'_>, predicates: &[Predicate]) -> Result<RoaringBitmap> {
    if predicates.is_empty() {
        return Ok(RoaringBitmap::new());
    }

    let mut candidates: Vec<(BoolOp, RoaringBitmap)> = Vec::with_capacity(predicates.len());
    for predicate in predicates {
        let set = resolve_candidates(graph, predicate)?;
        candidates.push((predicate.op, set));
    }

    candidates.sort_by_key(|(_, set)| set.len());

    let mut iter = candidates.into_iter();
    let (_, mut result) = iter.next().expect("checked non-empty above");
    for (op, set) in iter {
        match op {
            BoolOp::And => result &= set,
            BoolOp::Or => result |= set,
            BoolOp::Not => result -= set,
        }
    }
    Ok(result)
}

fn resolve_candidates(graph: &GraphStore<'_>, predicate: &Predicate) -> Result<RoaringBitmap> {
    match predicate.prop {
        Some(prop) => graph.get_claims_entity_inverse(predicate.object.into(), prop),
        None => {
            let mut union = RoaringBitmap::new();
            for (_, subjects) in graph.get_all_claims_entity_inverse(predicate.object.into())? {
                union |= subjects;
            }
            Ok(union)
        }
    }
}
