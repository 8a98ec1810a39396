//! Directory listing.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Regular files directly inside `dir`, sorted by name.
///
/// Subdirectories are not descended into.
pub fn list_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}
