use crate::fingerprint::Fingerprinter;
use crate::media::{MediaFile, MediaKind};
use crate::metadata;
use crate::pipeline;
use crate::placement;
use crate::registry::DuplicateRegistry;
use crate::scanner::{self, ScanError};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;

const HISTORY_FILE: &str = ".snapsort-history.jsonl";

#[derive(Debug, Error)]
pub enum OrganizeError {
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Worker pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Progress template error: {0}")]
    Template(#[from] indicatif::style::TemplateError),
}

/// Settings for one organizing run.
#[derive(Debug, Clone)]
pub struct OrganizerConfig {
    pub source: PathBuf,
    pub output: PathBuf,
    pub workers: usize,
}

/// Default worker count: half the logical CPUs, at least one.
pub fn default_workers() -> usize {
    (num_cpus::get() / 2).max(1)
}

/// One file that could not be classified or placed. Never aborts the run.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub path: String,
    pub reason: String,
}

/// Aggregated outcome of a run.
#[derive(Debug, Default, Serialize)]
pub struct RunSummary {
    pub images_placed: usize,
    pub duplicates_found: usize,
    pub videos_placed: usize,
    pub failures: Vec<FileFailure>,
}

#[derive(Serialize)]
struct HistoryRecord<'a> {
    timestamp: String,
    source: String,
    images_placed: usize,
    duplicates_found: usize,
    videos_placed: usize,
    failures: &'a [FileFailure],
}

enum FileOutcome {
    Image { duplicate: bool },
    Video,
    Failed(FileFailure),
}

/// Runs the whole pipeline: discovery, parallel classification, and
/// placement. The duplicate registry lives exactly as long as one
/// organizer and is shared by every worker of the run.
pub struct Organizer {
    config: OrganizerConfig,
    registry: DuplicateRegistry,
    fingerprinter: Fingerprinter,
}

impl Organizer {
    pub fn new(config: OrganizerConfig) -> Self {
        Self {
            config,
            registry: DuplicateRegistry::new(),
            fingerprinter: Fingerprinter::new(),
        }
    }

    pub fn run(&self) -> Result<RunSummary, OrganizeError> {
        let files = scanner::discover_media(&self.config.source)?;

        for area in [pipeline::OutputArea::Images, pipeline::OutputArea::Videos] {
            std::fs::create_dir_all(self.config.output.join(area.dir_name()))?;
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.config.workers)
            .build()?;

        let bar = ProgressBar::new(files.len() as u64);
        bar.set_style(ProgressStyle::with_template(
            "{bar:40.cyan/blue} {pos}/{len} {msg}",
        )?);
        bar.set_message("Organizing…");

        let outcomes: Vec<FileOutcome> = pool.install(|| {
            files
                .par_iter()
                .map(|file| {
                    let outcome = self.process_file(file);
                    bar.inc(1);
                    outcome
                })
                .collect()
        });
        bar.finish_with_message("Done");

        let mut summary = RunSummary::default();
        for outcome in outcomes {
            match outcome {
                FileOutcome::Image { duplicate } => {
                    summary.images_placed += 1;
                    if duplicate {
                        summary.duplicates_found += 1;
                    }
                }
                FileOutcome::Video => summary.videos_placed += 1,
                FileOutcome::Failed(failure) => summary.failures.push(failure),
            }
        }

        if let Err(e) = self.append_history(&summary) {
            log::warn!("could not record run history: {}", e);
        }

        Ok(summary)
    }

    /// Classifies and places a single file. Any failure is captured as an
    /// outcome for the summary; it never propagates to sibling files.
    fn process_file(&self, file: &MediaFile) -> FileOutcome {
        let date = metadata::extract_capture_date(&file.path, file.kind);

        let plan =
            match pipeline::plan_destination(file, &date, &self.registry, &self.fingerprinter) {
                Ok(plan) => plan,
                Err(e) => {
                    log::warn!("skipping {}: {}", file.path.display(), e);
                    return FileOutcome::Failed(FileFailure {
                        path: file.path.display().to_string(),
                        reason: e.to_string(),
                    });
                }
            };

        let dest_dir = self.config.output.join(plan.area.dir_name());
        match placement::place(&file.path, &dest_dir, &plan.file_name) {
            Ok(dest) => {
                log::debug!("copied {} -> {}", file.path.display(), dest.display());
                match file.kind {
                    MediaKind::Image => FileOutcome::Image {
                        duplicate: plan.is_duplicate,
                    },
                    MediaKind::Video => FileOutcome::Video,
                }
            }
            Err(e) => {
                log::warn!("could not place {}: {}", file.path.display(), e);
                FileOutcome::Failed(FileFailure {
                    path: file.path.display().to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    fn append_history(&self, summary: &RunSummary) -> Result<(), OrganizeError> {
        let record = HistoryRecord {
            timestamp: Utc::now().to_rfc3339(),
            source: self.config.source.display().to_string(),
            images_placed: summary.images_placed,
            duplicates_found: summary.duplicates_found,
            videos_placed: summary.videos_placed,
            failures: &summary.failures,
        };

        let mut out = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.config.output.join(HISTORY_FILE))?;
        writeln!(
            out,
            "{}",
            serde_json::to_string(&record).map_err(std::io::Error::other)?
        )?;
        Ok(())
    }
}
