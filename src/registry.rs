use crate::fingerprint::Fingerprint;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Outcome of classifying one fingerprint sighting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// This fingerprint has not been seen before; the file becomes the
    /// canonical original.
    FirstSeen,
    /// The fingerprint was already registered. `ordinal` is the 1-based
    /// duplicate number and `original` the canonical first-seen path.
    Duplicate { ordinal: u64, original: PathBuf },
}

struct RegistryEntry {
    original: PathBuf,
    duplicate_count: u64,
}

/// Concurrency-safe mapping from fingerprint to canonical original and
/// running duplicate counter. One instance is shared by all workers of a
/// run and dropped when the run ends.
///
/// For a given fingerprint, exactly one caller ever observes `FirstSeen`,
/// and duplicate ordinals come out gap-free starting at 1 no matter how
/// calls interleave across threads.
pub struct DuplicateRegistry {
    entries: Mutex<HashMap<Fingerprint, RegistryEntry>>,
}

impl DuplicateRegistry {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Atomically records a sighting of `fingerprint` by the file at
    /// `path`. The whole check-and-increment runs under one lock so two
    /// callers can never both see `FirstSeen` or receive the same
    /// ordinal. This operation cannot fail.
    pub fn classify(&self, fingerprint: Fingerprint, path: &Path) -> Classification {
        // A poisoned lock still holds consistent counts; keep going.
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        match entries.entry(fingerprint) {
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                let ordinal = entry.duplicate_count;
                entry.duplicate_count += 1;
                Classification::Duplicate {
                    ordinal,
                    original: entry.original.clone(),
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(RegistryEntry {
                    original: path.to_path_buf(),
                    duplicate_count: 1,
                });
                Classification::FirstSeen
            }
        }
    }

    /// Number of distinct fingerprints seen so far.
    pub fn distinct_fingerprints(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

impl Default for DuplicateRegistry {
    fn default() -> Self {
        Self::new()
    }
}
