//! Local identifier — the dense 32-bit integer every column keys and
//! references entities by once they've passed through the interner.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A dense, monotonically-allocated 32-bit entity identifier.
///
/// LIDs are assigned by `kgdb-interner::IdInterner` in first-seen order
/// and are never reused. All downstream columns (`kgdb-graph`,
/// `kgdb-invindex`, `kgdb-rank`, `kgdb-labels`) key and reference
/// entities by `Lid`; only ingress/egress translate to and from the
/// source string id (QID/PID/Wikipedia title/DBpedia resource name).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Lid(u32);

impl Lid {
    /// Wrap a raw `u32` as a `Lid`.
    #[inline]
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Lid(raw)
    }

    /// The raw integer value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Interpret an `i64` (as produced by some value encodings) as a
    /// `Lid`, returning `None` for negative or non-representable input.
    ///
    /// Mirrors the original `get_id` guard: "an invalid lid (non-numeric
    /// or negative) returns not found without I/O".
    #[must_use]
    pub fn from_signed(raw: i64) -> Option<Self> {
        u32::try_from(raw).ok().map(Lid)
    }
}

impl fmt::Display for Lid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Lid {
    fn from(raw: u32) -> Self {
        Lid(raw)
    }
}

impl From<Lid> for u32 {
    fn from(lid: Lid) -> Self {
        lid.0
    }
}
