//! Confidence bands and fake/real verdicts.

use std::fmt;

use image::Rgb;
use serde::{Deserialize, Serialize};

/// Neutral colour used when no confidence is available.
pub const UNKNOWN_COLOR: Rgb<u8> = Rgb([128, 128, 128]);

/// Display category derived from a confidence value.
///
/// Bands only drive colour coding. They are independent of the fake/real
/// decision, which uses its own threshold (see [`Verdict`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceBand {
    /// Below 30%.
    Low,
    /// 30% up to (not including) 50%.
    MediumLow,
    /// 50% up to (not including) 70%.
    MediumHigh,
    /// 70% and above.
    High,
}

impl ConfidenceBand {
    /// Classifies a confidence into a band using the given thresholds.
    ///
    /// Each threshold is inclusive on its upper band: a confidence equal to
    /// `medium_high` is `MediumHigh`, never `MediumLow`.
    #[must_use]
    pub fn classify(confidence: f32, thresholds: &BandThresholds) -> Self {
        if confidence < thresholds.medium_low {
            Self::Low
        } else if confidence < thresholds.medium_high {
            Self::MediumLow
        } else if confidence < thresholds.high {
            Self::MediumHigh
        } else {
            Self::High
        }
    }

    /// Text colour for this band.
    #[must_use]
    pub const fn color(self) -> Rgb<u8> {
        match self {
            Self::Low => Rgb([0, 180, 0]),
            Self::MediumLow => Rgb([255, 200, 0]),
            Self::MediumHigh => Rgb([255, 140, 0]),
            Self::High => Rgb([255, 0, 0]),
        }
    }
}

impl fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Low => "low",
            Self::MediumLow => "medium-low",
            Self::MediumHigh => "medium-high",
            Self::High => "high",
        };
        f.write_str(name)
    }
}

/// Lower bounds of the three upper bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandThresholds {
    /// Lower bound of [`ConfidenceBand::MediumLow`].
    pub medium_low: f32,
    /// Lower bound of [`ConfidenceBand::MediumHigh`].
    pub medium_high: f32,
    /// Lower bound of [`ConfidenceBand::High`].
    pub high: f32,
}

impl BandThresholds {
    /// Returns true if the thresholds are within `[0, 1]` and ascending.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        (0.0..=1.0).contains(&self.medium_low)
            && (0.0..=1.0).contains(&self.high)
            && self.medium_low <= self.medium_high
            && self.medium_high <= self.high
    }
}

impl Default for BandThresholds {
    fn default() -> Self {
        Self {
            medium_low: 0.30,
            medium_high: 0.50,
            high: 0.70,
        }
    }
}

/// Predicted label for an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Confidence below the fake threshold.
    Real,
    /// Confidence at or above the fake threshold.
    Fake,
}

impl Verdict {
    /// Decides the label for a confidence. The threshold itself counts as fake.
    #[must_use]
    pub fn from_confidence(confidence: f32, fake_threshold: f32) -> Self {
        if confidence >= fake_threshold {
            Self::Fake
        } else {
            Self::Real
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real => f.write_str("Real"),
            Self::Fake => f.write_str("Fake"),
        }
    }
}
