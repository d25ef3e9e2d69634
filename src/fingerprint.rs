use image::ImageReader;
use image_hasher::{HashAlg, Hasher, HasherConfig};
use std::fmt;
use std::fmt::Write as _;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FingerprintError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    Decode(#[from] image::ImageError),
}

/// Perceptual fingerprint of an image. Equal fingerprints are treated as
/// duplicates; visually near-identical images tend to share one. Not
/// injective and not cryptographic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let hex = bytes.iter().fold(String::new(), |mut out, byte| {
            let _ = write!(out, "{:02x}", byte);
            out
        });
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Computes mean-hash fingerprints for image files.
pub struct Fingerprinter {
    hasher: Hasher,
}

impl Fingerprinter {
    pub fn new() -> Self {
        Self {
            hasher: HasherConfig::new().hash_alg(HashAlg::Mean).to_hasher(),
        }
    }

    pub fn fingerprint_file(&self, path: &Path) -> Result<Fingerprint, FingerprintError> {
        let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        Ok(self.fingerprint_image(&img))
    }

    pub fn fingerprint_image(&self, img: &image::DynamicImage) -> Fingerprint {
        Fingerprint::from_bytes(self.hasher.hash_image(img).as_bytes())
    }
}

impl Default for Fingerprinter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};
    use std::fs;
    use tempfile::TempDir;

    fn write_gradient(path: &Path, invert: bool) {
        let img = ImageBuffer::from_fn(64, 64, |x, y| {
            let intensity = ((x + y) % 256) as u8;
            let intensity = if invert { 255 - intensity } else { intensity };
            Rgb([intensity, intensity, intensity])
        });
        img.save(path).unwrap();
    }

    #[test]
    fn fingerprint_renders_lowercase_hex() {
        let fp = Fingerprint::from_bytes(&[0x0f, 0xa0, 0x3c]);
        assert_eq!(fp.to_string(), "0fa03c");
        assert!(fp.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn identical_images_share_a_fingerprint() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("first.png");
        let second = dir.path().join("second.png");
        write_gradient(&first, false);
        write_gradient(&second, false);

        let fingerprinter = Fingerprinter::new();
        let left = fingerprinter.fingerprint_file(&first).unwrap();
        let right = fingerprinter.fingerprint_file(&second).unwrap();
        assert_eq!(left, right);
    }

    #[test]
    fn distinct_images_differ() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("first.png");
        let second = dir.path().join("second.png");
        write_gradient(&first, false);
        write_gradient(&second, true);

        let fingerprinter = Fingerprinter::new();
        let left = fingerprinter.fingerprint_file(&first).unwrap();
        let right = fingerprinter.fingerprint_file(&second).unwrap();
        assert_ne!(left, right);
    }

    #[test]
    fn unreadable_image_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.jpg");
        fs::write(&path, b"this is not image data").unwrap();

        let fingerprinter = Fingerprinter::new();
        assert!(fingerprinter.fingerprint_file(&path).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let fingerprinter = Fingerprinter::new();
        assert!(fingerprinter
            .fingerprint_file(Path::new("/no/such/image.png"))
            .is_err());
    }
}
