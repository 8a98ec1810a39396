//! Interactive questions asked before a run.

use std::io::{self, BufRead, Write};

use omni_core::grouping::ClipCatalog;
use omni_core::models::{QualityProfile, RunOptions};
use omni_core::orchestrator::{available_prompts, offers_conversion, PromptOffer};

/// Asks yes/no and quality questions on a line-based terminal.
pub struct Prompter<R, W> {
    input: R,
    output: W,
    assume_yes: bool,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W, assume_yes: bool) -> Self {
        Self {
            input,
            output,
            assume_yes,
        }
    }

    /// `[Y/n]` question. An empty answer or `y` accepts; anything else
    /// declines. End of input declines.
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        if self.assume_yes {
            writeln!(self.output, "{} [Y/n] y", question)?;
            return Ok(true);
        }

        write!(self.output, "{} [Y/n] ", question)?;
        self.output.flush()?;

        Ok(match self.read_answer()? {
            Some(answer) => answer.is_empty() || answer.eq_ignore_ascii_case("y"),
            None => false,
        })
    }

    /// Ask for a quality code until a valid one (or nothing) is entered.
    pub fn quality(&mut self, default: QualityProfile) -> io::Result<QualityProfile> {
        if self.assume_yes {
            return Ok(default);
        }

        loop {
            writeln!(self.output, "Choose a quality setting from the following:")?;
            for profile in QualityProfile::all() {
                let marker = if *profile == default { " [default]" } else { "" };
                writeln!(self.output, "({}) {}{}", profile.code(), profile.name(), marker)?;
            }
            write!(self.output, "Quality: ")?;
            self.output.flush()?;

            let answer = match self.read_answer()? {
                Some(answer) => answer,
                None => return Ok(default),
            };
            if answer.is_empty() {
                return Ok(default);
            }
            match answer.parse::<QualityProfile>() {
                Ok(profile) => return Ok(profile),
                Err(message) => writeln!(self.output, "{}\n", message)?,
            }
        }
    }

    /// Next trimmed line, or `None` at end of input.
    fn read_answer(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

/// Ask every question that applies to `catalog` and collect the answers.
///
/// `quality_override` skips the quality question.
pub fn choose_options<R: BufRead, W: Write>(
    catalog: &ClipCatalog,
    prompter: &mut Prompter<R, W>,
    quality_override: Option<QualityProfile>,
    default_quality: QualityProfile,
) -> io::Result<RunOptions> {
    let mut builder = RunOptions::builder();
    let mut convert = false;

    if offers_conversion(catalog) {
        convert = prompter.confirm(&PromptOffer::Convert.question())?;
        builder = PromptOffer::Convert.apply(builder, convert);

        if convert {
            let quality = match quality_override {
                Some(quality) => quality,
                None => prompter.quality(default_quality)?,
            };
            builder = builder.quality(quality);
        }
    }

    for offer in available_prompts(catalog, convert) {
        let accepted = prompter.confirm(&offer.question())?;
        builder = offer.apply(builder, accepted);
    }

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use omni_core::models::MediaKind;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new(), false)
    }

    fn transcript(p: &Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8_lossy(&p.output).to_string()
    }

    #[test]
    fn confirm_accepts_empty_and_y() {
        let mut p = prompter("\nY\ny\nn\nyes\n");
        assert!(p.confirm("Go?").unwrap());
        assert!(p.confirm("Go?").unwrap());
        assert!(p.confirm("Go?").unwrap());
        assert!(!p.confirm("Go?").unwrap());
        assert!(!p.confirm("Go?").unwrap());
        // Input exhausted
        assert!(!p.confirm("Go?").unwrap());
        assert!(transcript(&p).starts_with("Go? [Y/n] "));
    }

    #[test]
    fn quality_reprompts_on_invalid_input() {
        let mut p = prompter("ultra\nhq\n");
        assert_eq!(p.quality(QualityProfile::LowBandwidth).unwrap(), QualityProfile::High);

        let out = transcript(&p);
        assert!(out.contains("Invalid quality setting: ultra"));
        assert_eq!(out.matches("Quality: ").count(), 2);
        assert!(out.contains("(lb) Low bandwidth [default]"));
    }

    #[test]
    fn quality_defaults_on_empty_answer() {
        let mut p = prompter("\n");
        assert_eq!(
            p.quality(QualityProfile::Standard).unwrap(),
            QualityProfile::Standard
        );
        assert!(transcript(&p).contains("(sq) Standard quality [default]"));
    }

    #[test]
    fn assume_yes_answers_everything() {
        let mut p = Prompter::new(Cursor::new(Vec::new()), Vec::new(), true);
        assert!(p.confirm("Merge .mp4 files?").unwrap());
        assert_eq!(p.quality(QualityProfile::High).unwrap(), QualityProfile::High);
    }

    #[test]
    fn chooses_converted_merge_after_convert() {
        let catalog = ClipCatalog::build(["GH010042.360", "GH020042.360", "GH010043.360"]);
        // convert, quality, merge converted
        let mut p = prompter("y\n444\n\n");
        let options =
            choose_options(&catalog, &mut p, None, QualityProfile::LowBandwidth).unwrap();

        assert!(options.convert);
        assert!(options.merge_converted);
        assert!(!options.wants_raw_merge(MediaKind::Spherical));
        assert_eq!(options.quality, QualityProfile::Finishing);
        assert!(transcript(&p).contains("Merge converted .mov files?"));
    }

    #[test]
    fn declining_convert_offers_raw_merge() {
        let catalog = ClipCatalog::build([
            "GH010042.360",
            "GH020042.360",
            "GH010042.mp4",
            "GH020042.mp4",
        ]);
        let mut p = prompter("n\ny\nn\n");
        let options =
            choose_options(&catalog, &mut p, None, QualityProfile::LowBandwidth).unwrap();

        assert!(!options.convert);
        assert!(options.wants_raw_merge(MediaKind::Spherical));
        assert!(!options.wants_raw_merge(MediaKind::Mp4));
        assert!(!transcript(&p).contains("Quality: "));
    }

    #[test]
    fn quality_override_skips_question() {
        let catalog = ClipCatalog::build(["GH010042.360"]);
        let mut p = prompter("y\n");
        let options = choose_options(
            &catalog,
            &mut p,
            Some(QualityProfile::High),
            QualityProfile::LowBandwidth,
        )
        .unwrap();

        assert_eq!(options.quality, QualityProfile::High);
        assert!(!transcript(&p).contains("Quality: "));
    }
}
