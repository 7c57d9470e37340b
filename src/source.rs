use std::{fs, path::Path};

use tracing::info;

use crate::error::SourceError;

pub const SOURCE_EXTENSION: &str = "gs";

/// Read a Goose source file. Only `.gs` files are accepted.
pub fn read(path: &Path) -> Result<String, SourceError> {
    if path.extension().and_then(|e| e.to_str()) != Some(SOURCE_EXTENSION) {
        return Err(SourceError::BadExtension(path.to_path_buf()));
    }
    info!(path = %path.display(), "reading source");
    fs::read_to_string(path).map_err(|error| SourceError::Io {
        path: path.to_path_buf(),
        error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_other_extensions() {
        for p in ["prog.txt", "prog", "prog.gs.bak", "gs"] {
            assert!(matches!(read(Path::new(p)), Err(SourceError::BadExtension(_))), "{p}");
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read(Path::new("definitely/not/here.gs")).unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
        assert!(err.to_string().contains("here.gs"));
    }

    #[test]
    fn reads_gs_file() {
        let path = std::env::temp_dir().join(format!("goose-source-{}.gs", std::process::id()));
        fs::write(&path, "x = 1").unwrap();
        assert_eq!(read(&path).unwrap(), "x = 1");
        fs::remove_file(&path).unwrap();
    }
}
