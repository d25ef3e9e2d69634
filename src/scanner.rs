use crate::media::MediaFile;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Invalid path: {path}")]
    InvalidPath { path: String },

    #[error("Progress template error: {0}")]
    Template(#[from] indicatif::style::TemplateError),
}

/// Recursively walks `root`, returning every regular file with a
/// recognized image or video extension. Unreadable directory entries are
/// skipped silently, matching walkdir's lossy traversal.
pub fn discover_media(root: &Path) -> Result<Vec<MediaFile>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::InvalidPath {
            path: format!("{} is not a directory", root.display()),
        });
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.green} {msg}")?);
    spinner.set_message("Scanning for media…");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if path.is_file() {
            if let Some(file) = MediaFile::from_path(path) {
                files.push(file);
            }
        }
        spinner.tick();
    }
    spinner.finish_with_message("Scan complete");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaKind;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn finds_media_recursively_and_skips_the_rest() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("trip").join("day1");
        fs::create_dir_all(&nested).unwrap();

        fs::write(dir.path().join("top.jpg"), b"x").unwrap();
        fs::write(nested.join("clip.mp4"), b"x").unwrap();
        fs::write(nested.join("notes.txt"), b"x").unwrap();
        fs::write(nested.join("no_extension"), b"x").unwrap();

        let mut files = discover_media(dir.path()).unwrap();
        files.sort_by(|a, b| a.path.cmp(&b.path));

        assert_eq!(files.len(), 2);
        assert!(files.iter().any(|f| f.kind == MediaKind::Image));
        assert!(files.iter().any(|f| f.kind == MediaKind::Video));
    }

    #[test]
    fn empty_directory_yields_no_files() {
        let dir = TempDir::new().unwrap();
        assert!(discover_media(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_root_is_an_error() {
        let result = discover_media(Path::new("/no/such/directory"));
        assert!(matches!(result, Err(ScanError::InvalidPath { .. })));
    }
}
