//! Bucketing of recognized clips into recordings.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::models::{ClipFile, MediaKind, RecordingNumber};
use crate::naming;

/// All chapters of one recording of one media kind.
///
/// Members share `number` and `kind` and are held in playback order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipGroup {
    pub number: RecordingNumber,
    pub kind: MediaKind,
    clips: Vec<ClipFile>,
}

impl ClipGroup {
    fn new(number: RecordingNumber, kind: MediaKind) -> Self {
        Self {
            number,
            kind,
            clips: Vec::new(),
        }
    }

    /// Chapters in ascending order.
    pub fn clips(&self) -> &[ClipFile] {
        &self.clips
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// A group needs reassembly only when it was split into chapters.
    pub fn is_mergeable(&self) -> bool {
        self.clips.len() > 1
    }

    /// First chapter, whose encoding names the merged output.
    pub fn first(&self) -> Option<&ClipFile> {
        self.clips.first()
    }

    /// Current paths in concatenation order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.clips.iter().map(|c| c.path.clone()).collect()
    }

    /// Sort by chapter number. File name breaks ties (two encodings of the
    /// same chapter) so the order never depends on directory listing order.
    fn sort(&mut self) {
        self.clips.sort_by(|a, b| {
            a.chapter
                .cmp(&b.chapter)
                .then_with(|| a.source_path.cmp(&b.source_path))
        });
    }

    /// Drop clips that repeat an earlier chapter and encoding, such as
    /// `GH010042.mp4` next to `GH010042.MP4`. Run after `sort`, so the
    /// first spelling in path order is kept. Returns the dropped clips.
    fn dedupe(&mut self) -> Vec<ClipFile> {
        let mut kept: Vec<ClipFile> = Vec::with_capacity(self.clips.len());
        let mut dropped = Vec::new();

        for clip in self.clips.drain(..) {
            let repeated = kept
                .iter()
                .any(|k| k.chapter == clip.chapter && k.encoding == clip.encoding);
            if repeated {
                dropped.push(clip);
            } else {
                kept.push(clip);
            }
        }

        self.clips = kept;
        dropped
    }
}

/// Recordings found in one directory snapshot, per media kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipCatalog {
    groups: BTreeMap<MediaKind, BTreeMap<RecordingNumber, ClipGroup>>,
}

impl Default for ClipCatalog {
    fn default() -> Self {
        Self {
            groups: MediaKind::all()
                .iter()
                .map(|kind| (*kind, BTreeMap::new()))
                .collect(),
        }
    }
}

impl ClipCatalog {
    /// Create an empty catalog with every media kind present.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from directory entries.
    ///
    /// Files that do not follow the naming convention are skipped.
    pub fn build<I, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut catalog = Self::new();
        let mut skipped = 0usize;

        for entry in entries {
            match naming::parse_path(entry.as_ref()) {
                Some(clip) => catalog.insert(clip),
                None => skipped += 1,
            }
        }

        for groups in catalog.groups.values_mut() {
            for group in groups.values_mut() {
                group.sort();
                for duplicate in group.dedupe() {
                    tracing::warn!(
                        "Ignoring {}: recording {} already has this chapter",
                        duplicate.source_path.display(),
                        group.number
                    );
                    skipped += 1;
                }
            }
        }

        tracing::debug!(
            "Catalogued {} clips, skipped {} entries",
            catalog.clip_count(),
            skipped
        );

        catalog
    }

    fn insert(&mut self, clip: ClipFile) {
        self.groups
            .entry(clip.kind)
            .or_default()
            .entry(clip.number.clone())
            .or_insert_with(|| ClipGroup::new(clip.number.clone(), clip.kind))
            .clips
            .push(clip);
    }

    /// Groups of one kind, ordered by recording number.
    pub fn groups(&self, kind: MediaKind) -> impl Iterator<Item = &ClipGroup> {
        self.groups.get(&kind).into_iter().flat_map(|g| g.values())
    }

    /// Look up a single group.
    pub fn group(&self, kind: MediaKind, number: &RecordingNumber) -> Option<&ClipGroup> {
        self.groups.get(&kind)?.get(number)
    }

    /// Whether no clip of `kind` was found.
    pub fn is_empty(&self, kind: MediaKind) -> bool {
        self.groups.get(&kind).map_or(true, |g| g.is_empty())
    }

    /// Whether at least one recording of `kind` is split into chapters.
    pub fn can_merge(&self, kind: MediaKind) -> bool {
        self.groups(kind).any(ClipGroup::is_mergeable)
    }

    /// Total number of recognized clips across all kinds.
    pub fn clip_count(&self) -> usize {
        self.groups
            .values()
            .flat_map(|g| g.values())
            .map(ClipGroup::len)
            .sum()
    }

    /// Replace the clip at `index` of a group with a new record.
    ///
    /// The replacement must describe the same chapter; group order is fixed
    /// at build time and never recomputed. Returns the previous record.
    pub fn replace_clip(
        &mut self,
        kind: MediaKind,
        number: &RecordingNumber,
        index: usize,
        clip: ClipFile,
    ) -> Option<ClipFile> {
        let slot = self
            .groups
            .get_mut(&kind)?
            .get_mut(number)?
            .clips
            .get_mut(index)?;

        if slot.chapter != clip.chapter || slot.number != clip.number || slot.kind != clip.kind {
            return None;
        }

        Some(std::mem::replace(slot, clip))
    }
}
