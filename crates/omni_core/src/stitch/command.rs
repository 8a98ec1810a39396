//! ffmpeg command options builder for stitching.
//!
//! Produces the argument list that runs the stitching graph over one `.360`
//! clip and writes an intermediate-codec `.mov`.

use std::path::{Path, PathBuf};

use crate::models::QualityProfile;

use super::errors::StitchResult;
use super::geometry::{SensorGeometry, StreamLayout};
use super::graph::{build_stitch_graph, FilterGraph};

/// Container extension of converted artifacts, including the dot.
pub const CONVERTED_SUFFIX: &str = ".mov";

/// Path of the converted artifact for `input`: `<output_dir>/<stem>.mov`.
pub fn converted_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    output_dir.join(format!("{}{}", stem, CONVERTED_SUFFIX))
}

/// Stitching graph prepared once for a sensor geometry.
#[derive(Debug, Clone)]
pub struct Stitcher {
    geometry: SensorGeometry,
    streams: StreamLayout,
    graph: FilterGraph,
}

impl Stitcher {
    /// Validate the geometry and build its graph.
    pub fn new(geometry: SensorGeometry, streams: StreamLayout) -> StitchResult<Self> {
        geometry.validate()?;
        let graph = build_stitch_graph(&geometry, &streams);
        Ok(Self {
            geometry,
            streams,
            graph,
        })
    }

    pub fn geometry(&self) -> &SensorGeometry {
        &self.geometry
    }

    pub fn graph(&self) -> &FilterGraph {
        &self.graph
    }

    /// ffmpeg arguments converting `input` into `output`.
    pub fn command(&self, quality: QualityProfile, input: &Path, output: &Path) -> Vec<String> {
        StitchCommand::new(&self.graph, &self.streams, quality, input, output).build()
    }
}

impl Default for Stitcher {
    fn default() -> Self {
        let geometry = SensorGeometry::default();
        let streams = StreamLayout::default();
        let graph = build_stitch_graph(&geometry, &streams);
        Self {
            geometry,
            streams,
            graph,
        }
    }
}

/// Builder for the stitching ffmpeg invocation.
pub struct StitchCommand<'a> {
    graph: &'a FilterGraph,
    streams: &'a StreamLayout,
    quality: QualityProfile,
    input: &'a Path,
    output: &'a Path,
}

impl<'a> StitchCommand<'a> {
    pub fn new(
        graph: &'a FilterGraph,
        streams: &'a StreamLayout,
        quality: QualityProfile,
        input: &'a Path,
        output: &'a Path,
    ) -> Self {
        Self {
            graph,
            streams,
            quality,
            input,
            output,
        }
    }

    /// Build the complete argument list (without the program name).
    pub fn build(&self) -> Vec<String> {
        let mut tokens = vec![
            "-i".to_string(),
            self.input.to_string_lossy().to_string(),
            "-y".to_string(),
            "-filter_complex".to_string(),
            self.graph.render(),
        ];

        // Stitched video plus the untouched first audio track
        tokens.push("-map".to_string());
        tokens.push(format!("[{}]", self.graph.output));
        tokens.push("-map".to_string());
        tokens.push(self.streams.audio.clone());

        self.add_codec_options(&mut tokens);

        tokens.push("-f".to_string());
        tokens.push("mov".to_string());
        tokens.push(self.output.to_string_lossy().to_string());

        tokens
    }

    fn add_codec_options(&self, tokens: &mut Vec<String>) {
        tokens.extend(
            [
                "-c:v",
                "dnxhd",
                "-profile:v",
                self.quality.dnxhr_profile().as_str(),
                "-pix_fmt",
                "yuv422p",
                "-c:a",
                "pcm_s16le",
            ]
            .iter()
            .map(|s| s.to_string()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converted_path_swaps_container() {
        assert_eq!(
            converted_path(Path::new("/in/GH010042.360"), Path::new("/in/Converted")),
            PathBuf::from("/in/Converted/GH010042.mov")
        );
    }

    #[test]
    fn builds_full_command() {
        let streams = StreamLayout::default();
        let graph = build_stitch_graph(&SensorGeometry::default(), &streams);
        let input = PathBuf::from("GH010042.360");
        let output = PathBuf::from("out/GH010042.mov");

        let tokens =
            StitchCommand::new(&graph, &streams, QualityProfile::High, &input, &output).build();

        assert_eq!(&tokens[..4], &["-i", "GH010042.360", "-y", "-filter_complex"]);
        assert_eq!(tokens[4], graph.render());
        let rest: Vec<&str> = tokens[5..].iter().map(String::as_str).collect();
        assert_eq!(
            rest,
            vec![
                "-map",
                "[v]",
                "-map",
                "0:a:0",
                "-c:v",
                "dnxhd",
                "-profile:v",
                "dnxhr_hq",
                "-pix_fmt",
                "yuv422p",
                "-c:a",
                "pcm_s16le",
                "-f",
                "mov",
                "out/GH010042.mov",
            ]
        );
    }

    #[test]
    fn quality_only_changes_profile() {
        let streams = StreamLayout::default();
        let graph = build_stitch_graph(&SensorGeometry::default(), &streams);
        let input = PathBuf::from("a.360");
        let output = PathBuf::from("a.mov");

        let lb = StitchCommand::new(&graph, &streams, QualityProfile::LowBandwidth, &input, &output)
            .build();
        let fq = StitchCommand::new(&graph, &streams, QualityProfile::Finishing, &input, &output)
            .build();

        let diff: Vec<(&String, &String)> = lb.iter().zip(fq.iter()).filter(|(a, b)| a != b).collect();
        assert_eq!(diff.len(), 1);
        assert_eq!(diff[0].0, "dnxhr_lb");
        assert_eq!(diff[0].1, "dnxhr_444");
    }

    #[test]
    fn stitcher_rejects_invalid_geometry() {
        let geometry = SensorGeometry {
            flat_width: 600,
            ..SensorGeometry::default()
        };
        assert!(Stitcher::new(geometry, StreamLayout::default()).is_err());
    }

    #[test]
    fn default_stitcher_matches_explicit_graph() {
        let stitcher = Stitcher::default();
        let explicit = Stitcher::new(SensorGeometry::default(), StreamLayout::default()).unwrap();
        assert_eq!(stitcher.graph(), explicit.graph());

        let tokens = stitcher.command(
            QualityProfile::Standard,
            Path::new("GH010043.360"),
            Path::new("GH010043.mov"),
        );
        assert!(tokens.contains(&"dnxhr_sq".to_string()));
        assert_eq!(tokens.last().map(String::as_str), Some("GH010043.mov"));
    }
}
