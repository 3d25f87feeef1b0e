//! Filesystem writers for annotated images and the confidence report.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use deepguard_core::{AnnotationConfig, AnnotationSink, BatchReport, ImageEntry};
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name of the confidence report.
pub const REPORT_FILE: &str = "confidence_report.json";

/// Writes annotated images into an output folder under their original names.
#[derive(Debug, Clone)]
pub struct FsAnnotationWriter {
    dir: PathBuf,
    jpeg_quality: u8,
}

impl FsAnnotationWriter {
    /// Creates a writer for `folder/<output_dir>`.
    #[must_use]
    pub fn new(folder: &Path, config: &AnnotationConfig) -> Self {
        Self {
            dir: folder.join(&config.output_dir),
            jpeg_quality: config.jpeg_quality.clamp(1, 100),
        }
    }

    /// Returns the output folder.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl AnnotationSink for FsAnnotationWriter {
    fn prepare(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))
    }

    fn save(&self, entry: &ImageEntry, image: &RgbImage) -> Result<()> {
        // keep the on-disk name, `entry.name` may be a lossy rendering of it
        let file_name = entry
            .path
            .file_name()
            .unwrap_or_else(|| OsStr::new(&entry.name));
        let path = self.dir.join(file_name);
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        if ext == "jpg" || ext == "jpeg" {
            let file = File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let encoder = JpegEncoder::new_with_quality(BufWriter::new(file), self.jpeg_quality);
            image
                .write_with_encoder(encoder)
                .with_context(|| format!("Failed to encode {}", path.display()))?;
        } else {
            image
                .save(&path)
                .with_context(|| format!("Failed to save {}", path.display()))?;
        }

        debug!("Saved {}", path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

/// Identifier and timestamp of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchStamp {
    /// Run identifier, `batch-YYYYMMDD-HHMMSS`.
    pub batch_id: String,
    /// RFC 3339 creation time.
    pub created_at: String,
}

impl BatchStamp {
    /// Stamps the current local time.
    #[must_use]
    pub fn now() -> Self {
        Self::at(Local::now())
    }

    /// Stamps the given time.
    #[must_use]
    pub fn at(time: DateTime<Local>) -> Self {
        Self {
            batch_id: format!("batch-{}", time.format("%Y%m%d-%H%M%S")),
            created_at: time.to_rfc3339(),
        }
    }
}

/// Writes `report` as pretty JSON to `dir/confidence_report.json`.
///
/// # Errors
///
/// Returns an error if the folder or file cannot be written.
pub fn write_report(dir: &Path, report: &BatchReport) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(REPORT_FILE);
    let file =
        File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), report)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote confidence report to {}", path.display());
    Ok(path)
}
