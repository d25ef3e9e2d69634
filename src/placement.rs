use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlacementError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Copies `src` into `dest_dir/file_name`, creating the destination
/// directory tree if needed. Returns the final path.
pub fn place(src: &Path, dest_dir: &Path, file_name: &str) -> Result<PathBuf, PlacementError> {
    fs::create_dir_all(dest_dir)?;
    let dest = dest_dir.join(file_name);
    fs::copy(src, &dest)?;
    Ok(dest)
}
