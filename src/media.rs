use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "bmp", "tiff"];
const VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "m4v", "avi", "mov", "mkv"];

/// Broad media category decided from the file extension alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_lowercase();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Image)
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Video)
        } else {
            None
        }
    }
}

/// A candidate file discovered during enumeration. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct MediaFile {
    pub path: PathBuf,
    pub kind: MediaKind,
    pub extension: String,
}

impl MediaFile {
    /// Classifies `path` by extension. Files with no extension or an
    /// unrecognized one return `None` and are ignored by the run.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        let kind = MediaKind::from_extension(&extension)?;
        Some(Self {
            path: path.to_path_buf(),
            kind,
            extension,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_image_extensions() {
        for ext in ["jpg", "jpeg", "png", "gif", "bmp", "tiff"] {
            assert_eq!(MediaKind::from_extension(ext), Some(MediaKind::Image));
        }
    }

    #[test]
    fn classifies_video_extensions() {
        for ext in ["mp4", "m4v", "avi", "mov", "mkv"] {
            assert_eq!(MediaKind::from_extension(ext), Some(MediaKind::Video));
        }
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(MediaKind::from_extension("JPG"), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_extension("Mp4"), Some(MediaKind::Video));
    }

    #[test]
    fn unknown_extensions_are_ignored() {
        assert_eq!(MediaKind::from_extension("txt"), None);
        assert_eq!(MediaKind::from_extension("pdf"), None);
        assert!(MediaFile::from_path(Path::new("notes.txt")).is_none());
        assert!(MediaFile::from_path(Path::new("no_extension")).is_none());
    }

    #[test]
    fn media_file_keeps_lowercase_extension() {
        let file = MediaFile::from_path(Path::new("/photos/IMG_0001.JPG")).unwrap();
        assert_eq!(file.kind, MediaKind::Image);
        assert_eq!(file.extension, "jpg");
    }
}
