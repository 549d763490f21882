use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use log::{debug, warn};

use crate::error::DiscoverError;

/// List the `*.csv` files directly inside `dir`, as absolute paths.
///
/// Hidden files are not matched and subdirectories are not entered. The
/// result is sorted so repeated runs visit files in the same order. A
/// directory that does not exist yields an empty list.
pub fn discover_csv_files(dir: &Path) -> Result<Vec<PathBuf>, DiscoverError> {
    let dir = std::path::absolute(dir).map_err(|source| DiscoverError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    if !dir.is_dir() {
        warn!("input directory {} does not exist", dir.display());
        return Ok(Vec::new());
    }

    let dir_str = dir
        .to_str()
        .ok_or_else(|| DiscoverError::NotUtf8(dir.clone()))?;
    let pattern = format!("{}/*.csv", Pattern::escape(dir_str));
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };

    let mut files = Vec::new();
    for entry in glob::glob_with(&pattern, options)? {
        let path = entry?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    debug!("found {} CSV files in {}", files.len(), dir.display());
    Ok(files)
}
