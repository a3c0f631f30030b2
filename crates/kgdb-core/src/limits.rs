//! Size and work limits enforced across the storage and search layers.
//!
//! Defaults mirror the values named in the specification (`buff_limit`
//! ~1GiB capped at ~10% of RAM, `LIMIT_SEARCH`, `LIMIT_SEARCH_ES`,
//! `LIMIT_GEN_CAN`, PageRank's `tol`/`max_iter`/`alpha`). Grouped here
//! rather than scattered as magic numbers so `kgdb-cli` can print them
//! and tests can shrink them the way `Limits::with_small_limits` does
//! for the teacher's value-size limits.

/// One gibibyte, in bytes.
pub const SIZE_1GB: u64 = 1 << 30;

/// Five gibibytes — the mmap growth increment on capacity exhaustion.
pub const MAP_GROW_STEP: u64 = 5 * SIZE_1GB;

/// Size and work limits shared by the storage and search substrate.
#[derive(Debug, Clone, PartialEq)]
pub struct Limits {
    /// Aggregate write-buffer byte budget before a flush is forced.
    pub buff_limit: u64,
    /// Initial mmap size for a newly created store.
    pub initial_map_size: u64,
    /// Top-N results returned by `LabelIndex::lookup_by_label`.
    pub limit_search: usize,
    /// Work bound (hit cap) for the boolean/text query planners.
    pub limit_search_es: usize,
    /// Candidate cap for fuzzy/generation-style lookups.
    pub limit_gen_can: usize,
    /// Default result count `SearchFusion::search` returns.
    pub fusion_limit: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            buff_limit: SIZE_1GB,
            initial_map_size: 10 * SIZE_1GB,
            limit_search: 50,
            limit_search_es: 1000,
            limit_gen_can: 50,
            fusion_limit: 20,
        }
    }
}

impl Limits {
    /// Small limits for fast unit tests that need to exercise buffer
    /// flush / capacity-growth code paths without allocating gigabytes.
    #[must_use]
    pub fn with_small_limits() -> Self {
        Limits {
            buff_limit: 4096,
            initial_map_size: 1 << 20,
            limit_search: 10,
            limit_search_es: 100,
            limit_gen_can: 10,
            fusion_limit: 5,
        }
    }

    /// Clamp a requested write-buffer byte budget to at most ~10% of
    /// the host's total physical memory, matching the source's
    /// `psutil.virtual_memory().total // 10` cap.
    #[must_use]
    pub fn clamp_buff_limit(requested: u64, total_ram_bytes: u64) -> u64 {
        let ram_cap = total_ram_bytes / 10;
        requested.min(ram_cap.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_spec_buff_limit() {
        assert_eq!(Limits::default().buff_limit, SIZE_1GB);
    }

    #[test]
    fn clamp_caps_at_ten_percent_of_ram() {
        let clamped = Limits::clamp_buff_limit(SIZE_1GB, 2 * SIZE_1GB);
        assert_eq!(clamped, 2 * SIZE_1GB / 10);
    }

    #[test]
    fn clamp_passes_through_when_below_cap() {
        let clamped = Limits::clamp_buff_limit(1024, 100 * SIZE_1GB);
        assert_eq!(clamped, 1024);
    }

    #[test]
    fn small_limits_are_smaller_than_default() {
        let small = Limits::with_small_limits();
        let default = Limits::default();
        assert!(small.buff_limit < default.buff_limit);
        assert!(small.initial_map_size < default.initial_map_size);
    }
}
