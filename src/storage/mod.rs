//! Storage module for persisting scraped content
//!
//! Scraped content lands in a plain directory tree. Writes overwrite any
//! existing file; binary writes go through a temporary sibling file so a
//! failed write never leaves a truncated document behind.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Creates `path` and any missing parents; succeeds if it already exists
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

/// Writes UTF-8 text to `path`, replacing any existing file
pub fn write_text(path: &Path, content: &str) -> io::Result<()> {
    write_bytes(path, content.as_bytes())
}

/// Writes bytes to `path`, replacing any existing file
///
/// The content is written to `<path>.part` first and renamed into place.
pub fn write_bytes(path: &Path, content: &[u8]) -> io::Result<()> {
    let partial = partial_path(path);

    if let Err(e) = fs::write(&partial, content) {
        let _ = fs::remove_file(&partial);
        return Err(e);
    }

    if let Err(e) = fs::rename(&partial, path) {
        let _ = fs::remove_file(&partial);
        return Err(e);
    }

    Ok(())
}

/// Turns an entity name into a single path component
///
/// Path separators are replaced so a scraped name cannot point outside its
/// parent directory; `.` and `..` are escaped the same way.
///
/// # Example
///
/// ```
/// use site_scrapers::storage::file_name;
///
/// assert_eq!(file_name("cat-abounawes"), "cat-abounawes");
/// assert_eq!(file_name("a/b"), "a_b");
/// ```
pub fn file_name(entity: &str) -> String {
    let name: String = entity
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect();

    match name.as_str() {
        "" | "." | ".." => name.replace('.', "_") + "_",
        _ => name,
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut partial = path.as_os_str().to_owned();
    partial.push(".part");
    PathBuf::from(partial)
}
