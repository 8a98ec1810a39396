//! Reassembly planning for chaptered recordings.
//!
//! A chaptered recording is rebuilt by joining its chapters in ascending
//! order with a stream copy. Every chapter of one recording comes from the
//! same camera session, so codec parameters match and no re-encode is needed.

use std::io;
use std::path::{self, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::grouping::{ClipCatalog, ClipGroup};
use crate::models::{EncodingTag, MediaKind, RecordingNumber};

/// One concatenation to perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergePlan {
    pub number: RecordingNumber,
    pub kind: MediaKind,
    /// Inputs in chapter order.
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
}

impl MergePlan {
    /// Plan a single group.
    ///
    /// Returns `None` for groups with a single chapter, which are already
    /// complete recordings.
    pub fn for_group(group: &ClipGroup, output_dir: &Path, suffix: Option<&str>) -> Option<Self> {
        if !group.is_mergeable() {
            return None;
        }
        let first = group.first()?;
        let suffix = suffix.unwrap_or_else(|| group.kind.extension());

        Some(Self {
            number: group.number.clone(),
            kind: group.kind,
            inputs: group.paths(),
            output: output_dir.join(merged_file_name(first.encoding, &group.number, suffix)),
        })
    }

    /// Render the input list for ffmpeg's concat demuxer.
    ///
    /// The demuxer resolves relative entries against the list file's own
    /// directory, so every input is written as an absolute path.
    pub fn concat_list(&self) -> io::Result<String> {
        let mut list = String::new();
        for input in &self.inputs {
            let input = path::absolute(input)?;
            list.push_str(&format!("file '{}'\n", escape_concat_path(&input)));
        }
        Ok(list)
    }

    /// Name of the list file written for this plan.
    pub fn list_file_name(&self) -> String {
        let stem = self
            .output
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.number.to_string());
        format!("{}.concat.txt", stem)
    }
}

/// Output name for a merged recording: `G<enc>--<number>-merged<suffix>`.
pub fn merged_file_name(encoding: EncodingTag, number: &RecordingNumber, suffix: &str) -> String {
    format!("G{}--{}-merged{}", encoding, number, suffix)
}

/// Plan every mergeable group of `kind`, in recording-number order.
///
/// `suffix` overrides the output extension, for merging artifacts whose
/// container changed during conversion.
pub fn plan_merges(
    catalog: &ClipCatalog,
    kind: MediaKind,
    output_dir: &Path,
    suffix: Option<&str>,
) -> Vec<MergePlan> {
    catalog
        .groups(kind)
        .filter_map(|group| MergePlan::for_group(group, output_dir, suffix))
        .collect()
}

/// Quote a path for a concat list entry.
///
/// Inside single quotes the only special character is `'` itself, which has
/// to close the quote, be escaped, and reopen it.
fn escape_concat_path(path: &Path) -> String {
    path.to_string_lossy().replace('\'', r"'\''")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(s: &str) -> RecordingNumber {
        RecordingNumber::parse(s).unwrap()
    }

    #[test]
    fn merged_name_matches_convention() {
        assert_eq!(
            merged_file_name(EncodingTag::H, &number("0042"), ".mov"),
            "GH--0042-merged.mov"
        );
        assert_eq!(
            merged_file_name(EncodingTag::Unmarked, &number("0100"), ".360"),
            "G--0100-merged.360"
        );
    }

    #[test]
    fn plans_only_chaptered_groups() {
        let catalog =
            ClipCatalog::build(["in/GH020042.360", "in/GH010042.360", "in/GH010043.360"]);
        let plans = plan_merges(&catalog, MediaKind::Spherical, Path::new("out"), None);

        assert_eq!(plans.len(), 1);
        let plan = &plans[0];
        assert_eq!(plan.number.as_str(), "0042");
        assert_eq!(
            plan.inputs,
            vec![PathBuf::from("in/GH010042.360"), PathBuf::from("in/GH020042.360")]
        );
        assert_eq!(plan.output, PathBuf::from("out/GH--0042-merged.360"));
    }

    #[test]
    fn singleton_group_is_never_planned() {
        let catalog = ClipCatalog::build(["GH010043.360"]);
        let group = catalog.groups(MediaKind::Spherical).next().unwrap();
        assert!(MergePlan::for_group(group, Path::new("out"), Some(".mov")).is_none());
        assert!(plan_merges(&catalog, MediaKind::Spherical, Path::new("out"), None).is_empty());
    }

    #[test]
    fn suffix_override_changes_extension() {
        let catalog = ClipCatalog::build(["GX010007.LRV", "GX020007.LRV"]);
        let plans = plan_merges(&catalog, MediaKind::LowRes, Path::new("out"), None);
        assert_eq!(plans[0].output, PathBuf::from("out/GX--0007-merged.LRV"));

        let plans = plan_merges(&catalog, MediaKind::LowRes, Path::new("out"), Some(".mov"));
        assert_eq!(plans[0].output, PathBuf::from("out/GX--0007-merged.mov"));
    }

    #[test]
    fn concat_list_quotes_paths() {
        let catalog = ClipCatalog::build(["/clips/GH010042.mp4", "/it's/GH020042.mp4"]);
        let plans = plan_merges(&catalog, MediaKind::Mp4, Path::new("/out"), None);

        assert_eq!(
            plans[0].concat_list().unwrap(),
            "file '/clips/GH010042.mp4'\nfile '/it'\\''s/GH020042.mp4'\n"
        );
        assert_eq!(plans[0].list_file_name(), "GH--0042-merged.concat.txt");
    }

    #[test]
    fn concat_list_resolves_relative_inputs() {
        let catalog = ClipCatalog::build(["card/GH020042.mp4", "./card/GH010042.mp4"]);
        let plans = plan_merges(&catalog, MediaKind::Mp4, Path::new("card/Converted"), None);
        let list = plans[0].concat_list().unwrap();

        let cwd = std::env::current_dir().unwrap();
        let entries: Vec<PathBuf> = list
            .lines()
            .map(|line| {
                let quoted = line.strip_prefix("file '").unwrap();
                PathBuf::from(quoted.strip_suffix('\'').unwrap())
            })
            .collect();

        assert_eq!(entries.len(), 2);
        for entry in &entries {
            assert!(entry.is_absolute(), "{} is relative", entry.display());
            assert!(entry.starts_with(&cwd));
        }
        assert!(entries[0].ends_with("card/GH010042.mp4"));
        assert!(entries[1].ends_with("card/GH020042.mp4"));
    }
}
