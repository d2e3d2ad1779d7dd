use crate::deploy::error::{DeployError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Immediate subdirectories of `path`, sorted by file name.
///
/// Symlinks are not followed, so a linked directory is not a candidate.
pub fn subdirectories(path: &Path) -> Result<Vec<PathBuf>> {
    let mut directories = Vec::new();
    for entry in WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| DeployError::Discovery {
            path: path.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_dir() {
            directories.push(entry.into_path());
        }
    }
    Ok(directories)
}
