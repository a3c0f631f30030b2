//! Pluggable seam for the external BM25 text index. Out of scope per
//! the storage substrate's boundaries — `SearchFusion` depends on a
//! trait so it can fuse text-index hits without owning one.

/// A ranked text search over the label vocabulary's surface forms.
/// Implementations return `(label, score)` pairs already scored on
/// their own scale; `SearchFusion` min-max normalizes before fusing.
pub trait TextIndex {
    /// Search for `query` in `lang` (`"en"` or `"all"`), returning up
    /// to `limit` `(label, score)` hits.
    fn search(&self, query: &str, lang: &str, limit: usize) -> Vec<(String, f64)>;
}

/// A [`TextIndex`] that is never reachable — `SearchFusion` degrades
/// to the fuzzy/prior-only branch, matching the
/// `ExternalServiceError` behavior (§7).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTextIndex;

impl TextIndex for NoTextIndex {
    fn search(&self, _query: &str, _lang: &str, _limit: usize) -> Vec<(String, f64)> {
        Vec::new()
    }
}
