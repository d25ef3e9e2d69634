use crate::fingerprint::{Fingerprint, FingerprintError, Fingerprinter};
use crate::media::{MediaFile, MediaKind};
use crate::metadata::CaptureDate;
use crate::registry::{Classification, DuplicateRegistry};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Fingerprint computation error: {0}")]
    Fingerprint(#[from] FingerprintError),
}

/// Which output subdirectory a file lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputArea {
    Images,
    Videos,
}

impl OutputArea {
    pub fn dir_name(&self) -> &'static str {
        match self {
            OutputArea::Images => "images",
            OutputArea::Videos => "videos",
        }
    }
}

/// Destination decided for one file. Placement does the actual copying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementPlan {
    pub area: OutputArea,
    pub file_name: String,
    pub is_duplicate: bool,
}

/// Builds the destination filename for an image sighting. Pure: the same
/// (date, fingerprint, classification, extension) always yields the same
/// string.
pub fn image_file_name(
    date: &CaptureDate,
    fingerprint: &Fingerprint,
    classification: &Classification,
    extension: &str,
) -> String {
    match classification {
        Classification::FirstSeen => format!("{date}-{fingerprint}.{extension}"),
        Classification::Duplicate { ordinal, .. } => {
            format!("{date}-{fingerprint}_duplicate_{ordinal}.{extension}")
        }
    }
}

/// Builds the destination filename for a video, keyed by a freshly
/// generated token so that no two videos ever collide.
pub fn video_file_name(date: &CaptureDate, token: &Uuid, extension: &str) -> String {
    format!("{date}-{token}.{extension}")
}

/// Decides the destination for one file.
///
/// Images are fingerprinted and serialized through the shared registry;
/// two different images that happen to share a fingerprint are treated
/// as duplicates of each other. That lossy equality is the intended
/// semantics of the similarity hash, so no byte-level comparison is
/// layered on top. Videos skip fingerprinting entirely.
pub fn plan_destination(
    file: &MediaFile,
    date: &CaptureDate,
    registry: &DuplicateRegistry,
    fingerprinter: &Fingerprinter,
) -> Result<PlacementPlan, PipelineError> {
    match file.kind {
        MediaKind::Image => {
            let fingerprint = fingerprinter.fingerprint_file(&file.path)?;
            let classification = registry.classify(fingerprint.clone(), &file.path);

            if let Classification::Duplicate { ordinal, original } = &classification {
                log::info!(
                    "duplicate image: {} is duplicate #{} of {}",
                    file.path.display(),
                    ordinal,
                    original.display()
                );
            }

            let is_duplicate = matches!(classification, Classification::Duplicate { .. });
            Ok(PlacementPlan {
                area: OutputArea::Images,
                file_name: image_file_name(date, &fingerprint, &classification, &file.extension),
                is_duplicate,
            })
        }
        MediaKind::Video => Ok(PlacementPlan {
            area: OutputArea::Videos,
            file_name: video_file_name(date, &Uuid::new_v4(), &file.extension),
            is_duplicate: false,
        }),
    }
}
