//! Exit codes (§6): 0 success, 2 invalid input, 3 missing dump, 4
//! capacity/IO error.

use kgdb_core::Error;

pub const SUCCESS: i32 = 0;
pub const INVALID_INPUT: i32 = 2;
pub const MISSING_DUMP: i32 = 3;
pub const CAPACITY_OR_IO: i32 = 4;

/// Map a [`kgdb_core::Error`] surfaced out of a stage runner to its exit code.
pub fn from_error(err: &Error) -> i32 {
    match err {
        Error::InvalidInput(_) | Error::DecodeError { .. } => INVALID_INPUT,
        Error::CapacityError(_) | Error::IoError(_) | Error::ExternalServiceError(_) => CAPACITY_OR_IO,
        Error::NotFound(_) => INVALID_INPUT,
    }
}
