//! Reading and writing markdown documents

use crate::error::{Error, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Extension appended to save paths that have none.
pub const DEFAULT_EXTENSION: &str = "md";

/// Read a whole document as UTF-8.
pub fn read_document(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path).map_err(|source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Loaded {} ({} bytes)", path.display(), content.len());
    Ok(content)
}

/// Write a whole document as UTF-8, replacing any existing file.
pub fn write_document(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|source| Error::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Saved {} ({} bytes)", path.display(), content.len());
    Ok(())
}

/// Append `.md` when the chosen path has no extension.
pub fn ensure_markdown_extension(path: PathBuf) -> PathBuf {
    if path.extension().is_some() {
        path
    } else {
        path.with_extension(DEFAULT_EXTENSION)
    }
}

/// Title-bar name of a document path.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read_is_byte_identical() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.md");
        let content = "# Notes\r\n\n- æøå 🎉\n\n```\nx=1\n```\n";

        write_document(&path, content).unwrap();
        assert_eq!(read_document(&path).unwrap(), content);
        assert_eq!(fs::read(&path).unwrap(), content.as_bytes());
    }

    #[test]
    fn test_read_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = read_document(&temp.path().join("missing.md"));
        assert!(matches!(result, Err(Error::FileRead { .. })));
    }

    #[test]
    fn test_read_invalid_utf8() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("binary.md");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        assert!(matches!(read_document(&path), Err(Error::FileRead { .. })));
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("no/such/dir/file.md");
        assert!(matches!(
            write_document(&path, "x"),
            Err(Error::FileWrite { .. })
        ));
    }

    #[test]
    fn test_ensure_markdown_extension() {
        assert_eq!(
            ensure_markdown_extension(PathBuf::from("/tmp/notes")),
            PathBuf::from("/tmp/notes.md")
        );
        assert_eq!(
            ensure_markdown_extension(PathBuf::from("/tmp/notes.txt")),
            PathBuf::from("/tmp/notes.txt")
        );
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(Path::new("/a/b/readme.md")), "readme.md");
    }
}
