//! Shared error model.
//!
//! `NotFound` and `InvalidInput` are not raised on the read path — they
//! are folded into absent results by callers. Only I/O and capacity
//! faults are meant to surface as `Err`; the variants exist so that
//! ingestion loops and query planners can report *why* a lookup came
//! back empty without resorting to exceptions.

use thiserror::Error;

/// Result type alias used throughout kgdb.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for kgdb's storage and search substrate.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested key, LID, or id does not exist. Returned as an
    /// empty/absent value by the public read API rather than raised;
    /// kept as a variant so internal layers can distinguish "no row"
    /// from "row present but undecodable".
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed input: an id that doesn't match the QID/PID pattern,
    /// an empty query string, a non-numeric LID.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A stored value could not be deserialized under its column's
    /// declared encoding. Fatal for the query, not for the store.
    #[error("decode error in column {column}: {reason}")]
    DecodeError {
        /// Column the failing value was read from.
        column: String,
        /// Decoder-reported reason.
        reason: String,
    },

    /// The backing mmap could not grow to satisfy a write after one
    /// retry at `+5GiB`.
    #[error("capacity exceeded: {0}")]
    CapacityError(String),

    /// Underlying file/mmap I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The external BM25 text index was unreachable. `SearchFusion`
    /// degrades to the fuzzy/prior-only branch when this occurs; it is
    /// still surfaced so callers can log a warning.
    #[error("external text index unavailable: {0}")]
    ExternalServiceError(String),
}

impl Error {
    /// True for faults that a caller may retry (capacity growth, I/O
    /// hiccups); false for faults whose retry would just repeat them.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::CapacityError(_) | Error::IoError(_))
    }

    /// True for the two "read miss" variants that the domain API
    /// converts into empty results instead of propagating.
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Error::NotFound(_) | Error::InvalidInput(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_absent_not_retryable() {
        let err = Error::NotFound("Q999999".into());
        assert!(err.is_absent());
        assert!(!err.is_retryable());
    }

    #[test]
    fn capacity_error_is_retryable() {
        let err = Error::CapacityError("map full after retry".into());
        assert!(err.is_retryable());
        assert!(!err.is_absent());
    }

    #[test]
    fn decode_error_display_includes_column() {
        let err = Error::DecodeError {
            column: "CLAIMS_ENT".into(),
            reason: "bad msgpack header".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("CLAIMS_ENT"));
        assert!(msg.contains("bad msgpack header"));
    }

    #[test]
    fn io_error_converts_via_from() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::IoError(_)));
        assert!(err.is_retryable());
    }
}
