//! Configuration file support for deepguard.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/deepguard/config.toml` (lowest priority)
//! - Project-local: `.deepguard.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, warn};

/// Project-local config file name.
const PROJECT_CONFIG: &str = ".deepguard.toml";

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Decision threshold and file selection.
    pub detection: DetectionSection,
    /// Colour band boundaries.
    pub bands: BandsSection,
    /// Model settings.
    pub model: ModelSection,
    /// Annotated output settings.
    pub annotation: AnnotationSection,
    /// Output formatting settings.
    pub output: OutputSection,
}

/// Detection configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct DetectionSection {
    /// Confidence at or above which an image is fake (0.0-1.0).
    pub fake_threshold: Option<f32>,
    /// Accepted image extensions.
    pub extensions: Option<Vec<String>>,
}

/// Band boundary configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct BandsSection {
    /// Lower bound of the medium-low band.
    pub medium_low: Option<f32>,
    /// Lower bound of the medium-high band.
    pub medium_high: Option<f32>,
    /// Lower bound of the high band.
    pub high: Option<f32>,
}

/// Model configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ModelSection {
    /// Path to the `.tflite` model.
    pub path: Option<PathBuf>,
}

/// Annotation configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AnnotationSection {
    /// Write annotated copies.
    pub enabled: Option<bool>,
    /// Output subfolder name.
    pub output_dir: Option<String>,
    /// Header height in pixels.
    pub header_height: Option<u32>,
    /// JPEG quality (1-100).
    pub jpeg_quality: Option<u8>,
    /// Font file tried first.
    pub font_path: Option<PathBuf>,
    /// Font file name searched in the font directories.
    pub font_name: Option<String>,
    /// Text height in pixels.
    pub font_size: Option<f32>,
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Output format: "json" or "jsonl".
    pub format: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
    /// Show progress bar.
    pub progress: Option<bool>,
    /// Write `confidence_report.json`.
    pub report: Option<bool>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/deepguard/config.toml`
    /// 2. Project-local: `.deepguard.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are logged as warnings.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        for problem in config.validate() {
            warn!("{problem}");
        }

        config
    }

    /// Lists configuration values outside their accepted range.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let unit = |name: &str, value: Option<f32>, problems: &mut Vec<String>| {
            if let Some(v) = value {
                if !(0.0..=1.0).contains(&v) {
                    problems.push(format!("{name} must be 0.0-1.0, got {v}"));
                }
            }
        };

        unit(
            "detection.fake_threshold",
            self.detection.fake_threshold,
            &mut problems,
        );
        unit("bands.medium_low", self.bands.medium_low, &mut problems);
        unit("bands.medium_high", self.bands.medium_high, &mut problems);
        unit("bands.high", self.bands.high, &mut problems);

        if let (Some(low), Some(mid), Some(high)) = (
            self.bands.medium_low,
            self.bands.medium_high,
            self.bands.high,
        ) {
            if !(low <= mid && mid <= high) {
                problems.push(format!(
                    "bands must be ordered medium_low <= medium_high <= high, got {low}, {mid}, {high}"
                ));
            }
        }

        if let Some(q) = self.annotation.jpeg_quality {
            if !(1..=100).contains(&q) {
                problems.push(format!("annotation.jpeg_quality must be 1-100, got {q}"));
            }
        }

        if let Some(ref exts) = self.detection.extensions {
            if exts.is_empty() {
                problems.push("detection.extensions must not be empty".to_string());
            }
        }

        if let Some(ref f) = self.output.format {
            if f != "json" && f != "jsonl" {
                problems.push(format!(
                    "output.format must be 'json' or 'jsonl', got '{f}'"
                ));
            }
        }

        problems
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    pub fn merge(&mut self, other: Self) {
        // Detection
        self.detection.fake_threshold = other
            .detection
            .fake_threshold
            .or(self.detection.fake_threshold);
        self.detection.extensions = other
            .detection
            .extensions
            .or_else(|| self.detection.extensions.take());

        // Bands
        self.bands.medium_low = other.bands.medium_low.or(self.bands.medium_low);
        self.bands.medium_high = other.bands.medium_high.or(self.bands.medium_high);
        self.bands.high = other.bands.high.or(self.bands.high);

        // Model
        self.model.path = other.model.path.or_else(|| self.model.path.take());

        // Annotation
        let (mine, theirs) = (&mut self.annotation, other.annotation);
        mine.enabled = theirs.enabled.or(mine.enabled);
        mine.output_dir = theirs.output_dir.or_else(|| mine.output_dir.take());
        mine.header_height = theirs.header_height.or(mine.header_height);
        mine.jpeg_quality = theirs.jpeg_quality.or(mine.jpeg_quality);
        mine.font_path = theirs.font_path.or_else(|| mine.font_path.take());
        mine.font_name = theirs.font_name.or_else(|| mine.font_name.take());
        mine.font_size = theirs.font_size.or(mine.font_size);

        // Output
        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
        self.output.progress = other.output.progress.or(self.output.progress);
        self.output.report = other.output.report.or(self.output.report);
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("deepguard").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.deepguard.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(PROJECT_CONFIG))
        .find(|path| path.exists())
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.detection.fake_threshold.is_none());
        assert!(config.model.path.is_none());
        assert!(config.annotation.enabled.is_none());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r"
[detection]
fake_threshold = 0.6
extensions = ['jpg', 'png']

[bands]
medium_low = 0.2
medium_high = 0.4
high = 0.8

[model]
path = 'models/custom.tflite'

[annotation]
enabled = false
output_dir = 'marked'
header_height = 100
jpeg_quality = 90
font_path = '/fonts/a.ttf'
font_name = 'a.ttf'
font_size = 20.0

[output]
format = 'json'
pretty = true
progress = false
report = true
";
        let config: AppConfig = toml::from_str(toml).expect("parse full config");

        assert_eq!(config.detection.fake_threshold, Some(0.6));
        assert_eq!(
            config.detection.extensions,
            Some(vec!["jpg".to_string(), "png".to_string()])
        );
        assert_eq!(config.bands.high, Some(0.8));
        assert_eq!(
            config.model.path,
            Some(PathBuf::from("models/custom.tflite"))
        );
        assert_eq!(config.annotation.enabled, Some(false));
        assert_eq!(config.annotation.output_dir.as_deref(), Some("marked"));
        assert_eq!(config.annotation.jpeg_quality, Some(90));
        assert_eq!(config.output.format, Some("json".to_string()));
        assert_eq!(config.output.report, Some(true));
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_merge_preserves_base_when_override_is_none() {
        let mut base: AppConfig = toml::from_str(
            r"
[detection]
fake_threshold = 0.5

[model]
path = 'base.tflite'

[annotation]
jpeg_quality = 80
",
        )
        .expect("parse base");

        let override_config: AppConfig = toml::from_str(
            r"
[detection]
fake_threshold = 0.7

[annotation]
output_dir = 'out'
",
        )
        .expect("parse override");

        base.merge(override_config);

        assert_eq!(base.detection.fake_threshold, Some(0.7));
        assert_eq!(base.model.path, Some(PathBuf::from("base.tflite")));
        assert_eq!(base.annotation.jpeg_quality, Some(80));
        assert_eq!(base.annotation.output_dir.as_deref(), Some("out"));
    }

    #[test]
    fn test_merge_empty_override_preserves_base() {
        let mut base: AppConfig = toml::from_str(
            r"
[output]
format = 'json'
",
        )
        .expect("parse base");

        base.merge(AppConfig::default());

        assert_eq!(base.output.format, Some("json".to_string()));
    }

    #[test]
    fn test_validate_reports_every_problem() {
        let config: AppConfig = toml::from_str(
            r"
[detection]
fake_threshold = 1.5

[bands]
medium_low = 0.6
medium_high = 0.5
high = 0.7

[annotation]
jpeg_quality = 0

[output]
format = 'xml'
",
        )
        .expect("parse invalid");

        let problems = config.validate();
        assert_eq!(problems.len(), 4);
        assert!(problems[0].contains("detection.fake_threshold"));
        assert!(problems.iter().any(|p| p.contains("ordered")));
        assert!(problems.iter().any(|p| p.contains("jpeg_quality")));
        assert!(problems.iter().any(|p| p.contains("'xml'")));
    }

    #[test]
    fn test_find_config_in_parents() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(PROJECT_CONFIG), "").unwrap();

        let found = find_config_in_parents(&nested).unwrap();
        assert_eq!(found, dir.path().join(PROJECT_CONFIG));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let config: AppConfig = toml::from_str(
            r"
[detection]
fake_threshold = 0.4
legacy_option = true
",
        )
        .expect("parse with unknown key");
        assert_eq!(config.detection.fake_threshold, Some(0.4));
    }
}
