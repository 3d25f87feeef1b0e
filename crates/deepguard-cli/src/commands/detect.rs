//! Detect command - classify a folder of images and annotate the results.

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, ValueEnum};
use deepguard_adapters::{
    load_text_renderer, resolve_model_path, write_report, BatchStamp, FontConfig,
    FsAnnotationWriter, FsImageFolder, TfliteClassifier,
};
use deepguard_core::{
    AnnotationConfig, AnnotationSummary, Annotator, BandThresholds, BatchReport, DetectionConfig,
    DetectionRecord, Detector, HeaderLayout, ResultOutput,
};
use tracing::{debug, info, warn};

use super::ExitCode;
use crate::config::AppConfig;
use crate::output::{JsonOutput, ProgressBar};

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON Lines (one JSON object per line)
    #[default]
    Jsonl,
    /// Single JSON array
    Json,
}

/// Parse and validate a threshold value (0.0-1.0).
fn parse_threshold(s: &str) -> Result<f32, String> {
    let value: f32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is not in 0.0..=1.0"))
    }
}

/// Shared arguments for detection.
#[derive(Args, Clone, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct DetectArgs {
    /// Folder of face images to classify
    pub folder: Option<PathBuf>,

    /// Path to the `.tflite` detector model
    #[arg(short, long, value_name = "PATH")]
    pub model: Option<PathBuf>,

    /// Confidence at or above which an image is fake (0.0-1.0)
    #[arg(short, long, value_parser = parse_threshold)]
    pub threshold: Option<f32>,

    /// Do not write annotated copies
    #[arg(long)]
    pub no_annotate: bool,

    /// Name of the annotated output subfolder
    #[arg(long, value_name = "NAME")]
    pub output_dir: Option<String>,

    /// Font file for the annotation header
    #[arg(long, value_name = "PATH")]
    pub font: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,

    /// Write confidence_report.json into the output subfolder
    #[arg(long)]
    pub report: bool,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Merged config (populated by `with_config`, not from CLI).
    #[arg(skip)]
    config: AppConfig,
}

impl DetectArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Hardcoded defaults (in accessor methods)
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        // CLI --no-annotate always wins
        if !args.no_annotate {
            args.no_annotate = !config.annotation.enabled.unwrap_or(true);
        }

        args.threshold = args.threshold.or(config.detection.fake_threshold);
        if args.model.is_none() {
            args.model.clone_from(&config.model.path);
        }
        if args.output_dir.is_none() {
            args.output_dir.clone_from(&config.annotation.output_dir);
        }
        if args.font.is_none() {
            args.font.clone_from(&config.annotation.font_path);
        }

        if args.format.is_none() {
            args.format = config
                .output
                .format
                .as_deref()
                .and_then(|s| OutputFormat::from_str(s, true).ok());
        }
        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        if !args.progress {
            args.progress = config.output.progress.unwrap_or(false);
        }
        if !args.report {
            args.report = config.output.report.unwrap_or(false);
        }

        args.config = config.clone();
        args
    }

    /// Detection settings from merged args and config.
    fn detection_config(&self) -> DetectionConfig {
        let defaults = DetectionConfig::default();
        let bands = &self.config.bands;
        let default_bands = BandThresholds::default();

        DetectionConfig {
            fake_threshold: self.threshold.unwrap_or(defaults.fake_threshold),
            bands: BandThresholds {
                medium_low: bands.medium_low.unwrap_or(default_bands.medium_low),
                medium_high: bands.medium_high.unwrap_or(default_bands.medium_high),
                high: bands.high.unwrap_or(default_bands.high),
            },
            extensions: self
                .config
                .detection
                .extensions
                .as_ref()
                .filter(|exts| !exts.is_empty())
                .map_or(defaults.extensions, |exts| {
                    exts.iter()
                        .map(|e| e.trim_start_matches('.').to_lowercase())
                        .collect()
                }),
        }
    }

    /// Annotation settings from merged args and config.
    fn annotation_config(&self) -> AnnotationConfig {
        let defaults = AnnotationConfig::default();
        let section = &self.config.annotation;
        AnnotationConfig {
            header: HeaderLayout {
                height: section.header_height.unwrap_or(defaults.header.height),
                ..defaults.header
            },
            output_dir: self.output_dir.clone().unwrap_or(defaults.output_dir),
            jpeg_quality: section.jpeg_quality.unwrap_or(defaults.jpeg_quality),
        }
    }

    /// Font lookup settings from merged args and config.
    fn font_config(&self) -> FontConfig {
        let defaults = FontConfig::default();
        let section = &self.config.annotation;
        FontConfig {
            path: self.font.clone().unwrap_or(defaults.path),
            name: section.font_name.clone().unwrap_or(defaults.name),
            size: section.font_size.unwrap_or(defaults.size),
        }
    }

    /// Get output format with fallback to JSONL.
    fn format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }
}

/// Result of running the detect command.
#[derive(Debug)]
#[allow(dead_code)] // Fields exposed for programmatic use
pub struct DetectOutcome {
    /// Images that produced a confidence.
    pub scored: usize,
    /// Images that failed.
    pub failed: usize,
    /// Images classified as fake.
    pub fakes: usize,
    /// Annotation counts, absent with `--no-annotate`.
    pub annotation: Option<AnnotationSummary>,
    /// Exit code.
    pub exit_code: ExitCode,
}

/// Run the detect command.
///
/// Expects `args` to have been processed through `with_config()` first
/// to apply configuration file settings.
pub fn run(args: &DetectArgs) -> Result<DetectOutcome> {
    let Some(folder) = args.folder.as_deref() else {
        bail!("No folder specified");
    };
    if !folder.is_dir() {
        bail!("folder not found: {}", folder.display());
    }
    info!("Running detect command on {}", folder.display());

    let detection = args.detection_config();
    if !detection.bands.is_ordered() {
        warn!(
            "Band thresholds are not ascending within [0, 1]: {:?}",
            detection.bands
        );
    }
    let source = FsImageFolder::new(folder);
    let detector = Detector::new(detection);

    // List before loading the model so an empty folder is reported first
    let entries = detector.catalog(&source)?;

    let model_path = resolve_model_path(args.model.as_deref());
    debug!("Using model {}", model_path.display());
    let classifier = TfliteClassifier::load(&model_path)?;

    let show_progress = !args.quiet && (args.progress || std::io::stderr().is_terminal());
    let progress = ProgressBar::new(entries.len() as u64, args.quiet, show_progress);

    let results = detector.run(&source, &entries, &classifier, &progress);

    let mut records = Vec::with_capacity(results.len());
    for (file, prediction) in &results {
        records.push(DetectionRecord::new(file, prediction, detector.config()));
    }
    write_records(&records, args)?;

    let writer = FsAnnotationWriter::new(source.folder(), &args.annotation_config());
    let annotation = if args.no_annotate {
        debug!("Annotation disabled");
        None
    } else {
        let renderer = load_text_renderer(&args.font_config());
        let summary = Annotator::new(detector.config().clone(), args.annotation_config())
            .annotate(&source, &results, renderer.as_ref(), &writer)?;
        if !args.quiet {
            eprintln!(
                "Annotated {} images ({} skipped, {} failed) to {}",
                summary.annotated,
                summary.skipped,
                summary.failed,
                writer.dir().display()
            );
        }
        Some(summary)
    };

    if args.report {
        let stamp = BatchStamp::now();
        let report = BatchReport::new(
            stamp.batch_id,
            stamp.created_at,
            classifier.path().display().to_string(),
            &results,
            detector.config(),
        );
        let path = write_report(writer.dir(), &report)?;
        info!("Wrote report to {}", path.display());
    }

    let fakes = records.iter().filter(|r| r.is_fake()).count();
    let exit_code = if fakes > 0 {
        ExitCode::FakeDetected
    } else {
        ExitCode::Success
    };

    Ok(DetectOutcome {
        scored: results.scored_count(),
        failed: results.failed_count(),
        fakes,
        annotation,
        exit_code,
    })
}

fn write_records(records: &[DetectionRecord], args: &DetectArgs) -> Result<()> {
    let output = JsonOutput::stdout();
    match args.format() {
        OutputFormat::Jsonl => {
            for record in records {
                output.write(record)?;
            }
        }
        OutputFormat::Json => output.write_array(records, args.pretty)?,
    }
    output.flush()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config(toml: &str) -> AppConfig {
        toml::from_str(toml).unwrap()
    }

    #[test]
    fn test_parse_threshold() {
        assert_eq!(parse_threshold("0.5"), Ok(0.5));
        assert!(parse_threshold("1.5")
            .unwrap_err()
            .contains("not in 0.0..=1.0"));
        assert!(parse_threshold("abc")
            .unwrap_err()
            .contains("not a valid number"));
    }

    #[test]
    fn test_defaults_without_config() {
        let args = DetectArgs::with_config(DetectArgs::default(), &AppConfig::default());
        let detection = args.detection_config();
        assert!((detection.fake_threshold - 0.5).abs() < f32::EPSILON);
        assert_eq!(detection.bands, BandThresholds::default());
        assert_eq!(args.annotation_config(), AnnotationConfig::default());
        assert_eq!(args.format(), OutputFormat::Jsonl);
        assert!(!args.no_annotate);
    }

    #[test]
    fn test_config_fills_unset_args() {
        let cfg = config(
            r"
[detection]
fake_threshold = 0.7
extensions = ['.PNG', 'webp']

[bands]
high = 0.9

[model]
path = 'm.tflite'

[annotation]
enabled = false
output_dir = 'marked'
jpeg_quality = 80
header_height = 100

[output]
format = 'json'
report = true
",
        );
        let args = DetectArgs::with_config(DetectArgs::default(), &cfg);
        let detection = args.detection_config();

        assert!((detection.fake_threshold - 0.7).abs() < f32::EPSILON);
        assert_eq!(detection.extensions, vec!["png", "webp"]);
        assert!((detection.bands.high - 0.9).abs() < f32::EPSILON);
        assert_eq!(args.model, Some(PathBuf::from("m.tflite")));
        assert!(args.no_annotate);
        assert!(args.report);
        assert_eq!(args.format(), OutputFormat::Json);

        let annotation = args.annotation_config();
        assert_eq!(annotation.output_dir, "marked");
        assert_eq!(annotation.jpeg_quality, 80);
        assert_eq!(annotation.header.height, 100);
        assert_eq!(annotation.header.first_line_y, 10);
    }

    #[test]
    fn test_cli_wins_over_config() {
        let cfg = config(
            r"
[detection]
fake_threshold = 0.7

[model]
path = 'config.tflite'

[annotation]
output_dir = 'marked'
",
        );
        let cli = DetectArgs {
            threshold: Some(0.2),
            model: Some(PathBuf::from("cli.tflite")),
            output_dir: Some("cli_out".to_string()),
            ..DetectArgs::default()
        };
        let args = DetectArgs::with_config(cli, &cfg);

        assert!((args.detection_config().fake_threshold - 0.2).abs() < f32::EPSILON);
        assert_eq!(args.model, Some(PathBuf::from("cli.tflite")));
        assert_eq!(args.annotation_config().output_dir, "cli_out");
    }

    #[test]
    fn test_font_config_layering() {
        let cfg = config(
            r"
[annotation]
font_name = 'Other.ttf'
font_size = 24.0
",
        );
        let cli = DetectArgs {
            font: Some(PathBuf::from("/tmp/cli.ttf")),
            ..DetectArgs::default()
        };
        let font = DetectArgs::with_config(cli, &cfg).font_config();
        assert_eq!(font.path, PathBuf::from("/tmp/cli.ttf"));
        assert_eq!(font.name, "Other.ttf");
        assert!((font.size - 24.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_missing_folder_is_error() {
        let args = DetectArgs {
            folder: Some(PathBuf::from("/nonexistent/faces")),
            ..DetectArgs::default()
        };
        let err = run(&args).unwrap_err();
        assert!(err.to_string().contains("folder not found"));
    }
}
