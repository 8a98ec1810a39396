//! Which questions make sense for a catalog.
//!
//! A question is only offered when answering yes could do something: merges
//! need at least one chaptered recording, and `.360` recordings are merged
//! either converted or raw depending on the convert answer.

use crate::grouping::ClipCatalog;
use crate::models::{MediaKind, RunOptionsBuilder};

/// One yes/no question put to the user before a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptOffer {
    Convert,
    MergeConverted,
    MergeRaw(MediaKind),
}

impl PromptOffer {
    pub fn question(&self) -> String {
        match self {
            PromptOffer::Convert => "Convert .360 files to .mov?".to_string(),
            PromptOffer::MergeConverted => "Merge converted .mov files?".to_string(),
            PromptOffer::MergeRaw(kind) => format!("Merge {} files?", kind.extension()),
        }
    }

    /// Record the answer in the options being built.
    pub fn apply(&self, builder: RunOptionsBuilder, accepted: bool) -> RunOptionsBuilder {
        match self {
            PromptOffer::Convert => builder.convert(accepted),
            PromptOffer::MergeConverted => builder.merge_converted(accepted),
            PromptOffer::MergeRaw(kind) => builder.merge_raw(*kind, accepted),
        }
    }
}

/// Whether conversion is offered at all.
pub fn offers_conversion(catalog: &ClipCatalog) -> bool {
    !catalog.is_empty(MediaKind::Spherical)
}

/// Questions that follow the convert decision, in asking order.
pub fn available_prompts(catalog: &ClipCatalog, convert: bool) -> Vec<PromptOffer> {
    let mut offers = Vec::new();

    if catalog.can_merge(MediaKind::Spherical) {
        offers.push(if convert {
            PromptOffer::MergeConverted
        } else {
            PromptOffer::MergeRaw(MediaKind::Spherical)
        });
    }

    for kind in [MediaKind::Mp4, MediaKind::LowRes] {
        if catalog.can_merge(kind) {
            offers.push(PromptOffer::MergeRaw(kind));
        }
    }

    offers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RunOptions;

    #[test]
    fn nothing_offered_for_empty_catalog() {
        let catalog = ClipCatalog::default();
        assert!(!offers_conversion(&catalog));
        assert!(available_prompts(&catalog, false).is_empty());
    }

    #[test]
    fn singletons_only_offer_conversion() {
        let catalog = ClipCatalog::build(["GH010042.360", "GH010043.mp4"]);
        assert!(offers_conversion(&catalog));
        assert!(available_prompts(&catalog, true).is_empty());
    }

    #[test]
    fn spherical_merge_depends_on_convert_answer() {
        let catalog = ClipCatalog::build(["GH010042.360", "GH020042.360"]);
        assert_eq!(
            available_prompts(&catalog, true),
            vec![PromptOffer::MergeConverted]
        );
        assert_eq!(
            available_prompts(&catalog, false),
            vec![PromptOffer::MergeRaw(MediaKind::Spherical)]
        );
    }

    #[test]
    fn offers_follow_kind_order() {
        let catalog = ClipCatalog::build([
            "GH010042.LRV",
            "GH020042.LRV",
            "GH010042.mp4",
            "GH020042.mp4",
        ]);
        assert!(!offers_conversion(&catalog));
        assert_eq!(
            available_prompts(&catalog, false),
            vec![
                PromptOffer::MergeRaw(MediaKind::Mp4),
                PromptOffer::MergeRaw(MediaKind::LowRes),
            ]
        );
    }

    #[test]
    fn answers_build_options() {
        let builder = RunOptions::builder();
        let builder = PromptOffer::Convert.apply(builder, true);
        let builder = PromptOffer::MergeConverted.apply(builder, true);
        let builder = PromptOffer::MergeRaw(MediaKind::Mp4).apply(builder, false);
        let options = builder.build();

        assert!(options.convert);
        assert!(options.merge_converted);
        assert!(!options.wants_raw_merge(MediaKind::Mp4));
        assert_eq!(
            PromptOffer::MergeRaw(MediaKind::LowRes).question(),
            "Merge .LRV files?"
        );
    }
}
