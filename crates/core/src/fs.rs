//! Filesystem utilities

use std::fs;
use std::path::Path;

use log::debug;

/// Check if a path is a regular file
pub fn is_file(path: &str) -> bool {
    Path::new(path).is_file()
}

/// List the entry names of a directory, sorted.
///
/// Returns `None` when the directory is missing or unreadable. Used to report
/// what was found next to a missing dataset file.
pub fn list_dir(path: &Path) -> Option<Vec<String>> {
    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("unable to read directory {}: {}", path.display(), e);
            return None;
        }
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    Some(names)
}
