//! `LabelLid`: the vocabulary's own dense integer id space.
//!
//! The label vocabulary (`LABEL_LID`/`LID_LABEL`) is a second,
//! independent interner from the entity one in `kgdb-interner` — a
//! normalized label string gets its own id, never an entity `Lid`.
//! Keeping the two as distinct types means a label id can never be
//! passed where an entity id is expected (or vice versa) without the
//! compiler catching it.

use std::fmt;

/// A dense 32-bit id assigned to one normalized label string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LabelLid(u32);

impl LabelLid {
    /// Wrap a raw `u32` as a `LabelLid`.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        LabelLid(raw)
    }

    /// The raw integer value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for LabelLid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for LabelLid {
    fn from(raw: u32) -> Self {
        LabelLid(raw)
    }
}

impl From<LabelLid> for u32 {
    fn from(lid: LabelLid) -> Self {
        lid.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_numeric() {
        let mut lids = vec![LabelLid::new(3), LabelLid::new(1)];
        lids.sort();
        assert_eq!(lids, vec![LabelLid::new(1), LabelLid::new(3)]);
    }

    #[test]
    fn display_matches_raw_value() {
        assert_eq!(LabelLid::new(9).to_string(), "9");
    }
}
