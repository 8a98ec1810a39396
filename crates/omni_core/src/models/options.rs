//! Per-run action selection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::enums::{MediaKind, QualityProfile};

/// Actions chosen for one run.
///
/// Built once before any processing starts and never changed afterwards.
/// Steps read it through the pipeline context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOptions {
    /// Stitch every `.360` clip to equirectangular.
    pub convert: bool,
    /// Merge the converted artifacts of chaptered `.360` recordings.
    pub merge_converted: bool,
    /// Merge chaptered recordings as-is, per media kind.
    pub merge_raw: BTreeMap<MediaKind, bool>,
    /// Codec tier for stitching.
    pub quality: QualityProfile,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            convert: false,
            merge_converted: false,
            merge_raw: MediaKind::all().iter().map(|k| (*k, false)).collect(),
            quality: QualityProfile::default(),
        }
    }
}

impl RunOptions {
    /// Start a builder with nothing selected.
    pub fn builder() -> RunOptionsBuilder {
        RunOptionsBuilder {
            options: Self::default(),
        }
    }

    /// Whether a raw merge was requested for `kind`.
    pub fn wants_raw_merge(&self, kind: MediaKind) -> bool {
        self.merge_raw.get(&kind).copied().unwrap_or(false)
    }

    /// Whether the run has anything to do.
    pub fn is_empty(&self) -> bool {
        !self.convert && !self.merge_converted && !self.merge_raw.values().any(|v| *v)
    }
}

/// Builder for [`RunOptions`].
pub struct RunOptionsBuilder {
    options: RunOptions,
}

impl RunOptionsBuilder {
    pub fn convert(mut self, convert: bool) -> Self {
        self.options.convert = convert;
        self
    }

    pub fn merge_converted(mut self, merge: bool) -> Self {
        self.options.merge_converted = merge;
        self
    }

    pub fn merge_raw(mut self, kind: MediaKind, merge: bool) -> Self {
        self.options.merge_raw.insert(kind, merge);
        self
    }

    pub fn quality(mut self, quality: QualityProfile) -> Self {
        self.options.quality = quality;
        self
    }

    pub fn build(self) -> RunOptions {
        self.options
    }
}
