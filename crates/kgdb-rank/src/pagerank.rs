//! Power-iteration PageRank over a weighted directed graph, with
//! teleport, personalization, and dangling-node handling.
//!
//! Implements `x <- alpha * W^T * D^-1 * x + s * (z^T * x)` where `D`
//! is the out-degree diagonal, `s` is the (possibly personalized)
//! teleport distribution, and `z` carries dangling-node mass back
//! into the teleport term. The graph is transposed once up front so
//! rank flows backward along edges (from object to subject).

use sprs::{CsMat, TriMat};

/// Power-iteration parameters.
#[derive(Debug, Clone, Copy)]
pub struct PageRankConfig {
    /// Damping factor.
    pub alpha: f64,
    /// L1 convergence tolerance.
    pub tol: f64,
    /// Hard iteration cap.
    pub max_iter: usize,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        PageRankConfig { alpha: 0.85, tol: 1e-6, max_iter: 1000 }
    }
}

/// Summary statistics over a score vector, used to normalize scores
/// into `[0, 1]` downstream (`LabelIndex`'s ranked-list normalization).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRankStats {
    /// Smallest score.
    pub min: f64,
    /// Largest score.
    pub max: f64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
}

impl PageRankStats {
    /// Compute summary statistics over `scores`. Returns all-zero
    /// stats for an empty vector.
    #[must_use]
    pub fn from_scores(scores: &[f64]) -> Self {
        if scores.is_empty() {
            return PageRankStats { min: 0.0, max: 0.0, mean: 0.0, std: 0.0 };
        }
        let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        let variance =
            scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / scores.len() as f64;
        PageRankStats { min, max, mean, std: variance.sqrt() }
    }

    /// Min-max normalize `score` into `[0, 1]` using this stats'
    /// `min`/`max`. Returns `0.0` if `max == min` (a degenerate,
    /// single-valued score distribution).
    #[must_use]
    pub fn normalize(&self, score: f64) -> f64 {
        let div = self.max - self.min;
        if div <= 0.0 {
            0.0
        } else {
            (score - self.min) / div
        }
    }
}

/// The full result of a [`compute`] run.
#[derive(Debug, Clone)]
pub struct PageRankResult {
    /// Per-node score, indexed by LID.
    pub scores: Vec<f64>,
    /// Summary statistics over `scores`.
    pub stats: PageRankStats,
    /// Iterations actually run (`< max_iter` if convergence was reached).
    pub iterations: usize,
}

/// Run power-iteration PageRank over `w`, an `n x n` adjacency matrix
/// where `w[i][j]` is the edge weight `i -> j`.
///
/// `personalize` is an optional teleport distribution of length `n`
/// (normalized internally); `None` means uniform teleport. Isolated
/// nodes (no outbound or inbound edges) converge to the minimum score
/// in the final vector, since they only ever receive teleport mass.
#[must_use]
pub fn compute(w: &CsMat<f64>, n: usize, personalize: Option<&[f64]>) -> PageRankResult {
    compute_with_config(w, n, personalize, PageRankConfig::default())
}

/// [`compute`] with explicit [`PageRankConfig`].
#[must_use]
pub fn compute_with_config(
    w: &CsMat<f64>,
    n: usize,
    personalize: Option<&[f64]>,
    config: PageRankConfig,
) -> PageRankResult {
    if n == 0 {
        return PageRankResult {
            scores: Vec::new(),
            stats: PageRankStats::from_scores(&[]),
            iterations: 0,
        };
    }

    let out_degree = row_sums(w, n);
    let teleport = normalize_distribution(personalize, n);

    let wt = transpose(w, n);

    let mut x = teleport.clone();
    let mut iterations = 0;
    for _ in 0..config.max_iter {
        iterations += 1;
        let mut dangling_mass = 0.0;
        let scaled: Vec<f64> = (0..n)
            .map(|i| {
                if out_degree[i] > 0.0 {
                    x[i] / out_degree[i]
                } else {
                    dangling_mass += x[i];
                    0.0
                }
            })
            .collect();

        let mut next = sparse_matvec(&wt, &scaled, n);
        for (i, slot) in next.iter_mut().enumerate() {
            *slot = config.alpha * *slot + (config.alpha * dangling_mass + (1.0 - config.alpha)) * teleport[i];
        }

        let delta: f64 = next.iter().zip(&x).map(|(a, b)| (a - b).abs()).sum();
        x = next;
        if delta < config.tol {
            break;
        }
    }

    let stats = PageRankStats::from_scores(&x);
    PageRankResult { scores: x, stats, iterations }
}

fn transpose(w: &CsMat<f64>, n: usize) -> CsMat<f64> {
    let mut tri = TriMat::new((n, n));
    let csr = w.to_csr();
    for (row, vec) in csr.outer_iterator().enumerate() {
        for (col, &weight) in vec.iter() {
            tri.add_triplet(col, row, weight);
        }
    }
    tri.to_csr()
}

fn row_sums(w: &CsMat<f64>, n: usize) -> Vec<f64> {
    let mut sums = vec![0.0; n];
    let csr = w.to_csr();
    for (row, vec) in csr.outer_iterator().enumerate() {
        sums[row] = vec.iter().map(|(_, v)| v).sum();
    }
    sums
}

fn normalize_distribution(personalize: Option<&[f64]>, n: usize) -> Vec<f64> {
    match personalize {
        Some(p) if p.len() == n => {
            let total: f64 = p.iter().sum();
            if total > 0.0 {
                p.iter().map(|v| v / total).collect()
            } else {
                uniform(n)
            }
        }
        _ => uniform(n),
    }
}

fn uniform(n: usize) -> Vec<f64> {
    vec![1.0 / n as f64; n]
}

fn sparse_matvec(m: &CsMat<f64>, x: &[f64], n: usize) -> Vec<f64> {
    let mut out = vec![0.0; n];
    let csr = m.to_csr();
    for (row, vec) in csr.outer_iterator().enumerate() {
        let mut acc = 0.0;
        for (col, &weight) in vec.iter() {
            acc += weight * x[col];
        }
        out[row] = acc;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csr::EdgeListBuilder;

    #[test]
    fn two_node_cycle_converges_to_equal_scores() {
        let mut builder = EdgeListBuilder::new();
        builder.push(0, 1, 1.0);
        builder.push(1, 0, 1.0);
        let w = builder.build(2);
        let result = compute(&w, 2, None);
        assert!((result.scores[0] - 0.5).abs() < 1e-5);
        assert!((result.scores[1] - 0.5).abs() < 1e-5);
    }

    #[test]
    fn dangling_node_still_gets_a_score() {
        let mut builder = EdgeListBuilder::new();
        builder.push(0, 1, 1.0);
        let w = builder.build(2);
        let result = compute(&w, 2, None);
        assert!(result.scores[1] > 0.0);
        assert!(result.scores.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn stats_normalize_into_unit_interval() {
        let stats = PageRankStats::from_scores(&[0.1, 0.5, 0.9]);
        assert_eq!(stats.min, 0.1);
        assert_eq!(stats.max, 0.9);
        assert!((stats.normalize(0.9) - 1.0).abs() < 1e-9);
        assert!((stats.normalize(0.1) - 0.0).abs() < 1e-9);
    }

    #[test]
    fn empty_graph_yields_empty_result() {
        let builder = EdgeListBuilder::new();
        let w = builder.build(0);
        let result = compute(&w, 0, None);
        assert!(result.scores.is_empty());
    }
}
