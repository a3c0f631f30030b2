//! `download` — a thin stub. Fetching dumps over HTTP is an external
//! collaborator this CLI doesn't implement; the stage only validates
//! that the operator has already staged the file.

use std::path::Path;
use tracing::info;

/// Validate that `path` exists and is non-empty.
///
/// # Errors
///
/// Returns [`kgdb_core::Error::NotFound`] if `path` is missing or empty,
/// mapped by the caller to exit code 3 (missing dump).
pub fn run(path: &Path) -> kgdb_core::Result<()> {
    let metadata = std::fs::metadata(path)
        .map_err(|_| kgdb_core::Error::NotFound(format!("dump not found: {}", path.display())))?;
    if metadata.len() == 0 {
        return Err(kgdb_core::Error::NotFound(format!("dump is empty: {}", path.display())));
    }
    info!(path = %path.display(), bytes = metadata.len(), "dump already staged");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, kgdb_core::Error::NotFound(_)));
    }

    #[test]
    fn empty_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.json");
        std::fs::File::create(&path).unwrap();
        let err = run(&path).unwrap_err();
        assert!(matches!(err, kgdb_core::Error::NotFound(_)));
    }

    #[test]
    fn non_empty_file_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"[]").unwrap();
        assert!(run(&path).is_ok());
    }
}
