//! Tone analysis module
//!
//! Computes brightness and contrast statistics from the grayscale image and
//! a histogram-based key split (low/mid/high) whose proportions sum to 1.

use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::util::grayscale;

/// Brightness below this is categorized dark
pub const BRIGHTNESS_DARK_THRESHOLD: f64 = 0.3;

/// Brightness below this (and above dark) is categorized medium
pub const BRIGHTNESS_MEDIUM_THRESHOLD: f64 = 0.7;

/// Contrast below this is categorized low
pub const CONTRAST_LOW_THRESHOLD: f64 = 0.3;

/// Contrast below this (and above low) is categorized medium
pub const CONTRAST_MEDIUM_THRESHOLD: f64 = 0.6;

/// Contrast normalization divisor: half the grayscale range
const CONTRAST_DIVISOR: f64 = 127.5;

/// Brightness categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrightnessCategory {
    Dark,
    Medium,
    Bright,
}

/// Contrast categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContrastCategory {
    Low,
    Medium,
    High,
}

/// Normalized brightness with its category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrightnessRecord {
    /// Mean grayscale value normalized to [0,1]
    pub value: f64,
    pub category: BrightnessCategory,
}

/// Normalized contrast with its category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContrastRecord {
    /// Grayscale standard deviation normalized by half the range
    pub value: f64,
    pub category: ContrastCategory,
}

/// Histogram key split: proportions of pixels in the low (bins 0-63), mid
/// (64-191) and high (192-255) luminance bands; the three sum to 1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyProportions {
    pub low_key: f64,
    pub mid_tone: f64,
    pub high_key: f64,
}

/// Complete tone analysis result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToneAnalysis {
    pub brightness: BrightnessRecord,
    pub contrast: ContrastRecord,
    pub key: KeyProportions,
}

/// Analyze brightness, contrast and key proportions
///
/// Total over all images; an empty image reports zero brightness/contrast
/// with the full key weight in the low band.
pub fn analyze_tone(image: &RgbImage) -> ToneAnalysis {
    let gray = grayscale(image);
    let total = gray.width() as u64 * gray.height() as u64;

    let mut histogram = [0u64; 256];
    let mut sum = 0u64;
    for p in gray.pixels() {
        histogram[p.0[0] as usize] += 1;
        sum += p.0[0] as u64;
    }

    if total == 0 {
        return ToneAnalysis {
            brightness: BrightnessRecord {
                value: 0.0,
                category: BrightnessCategory::Dark,
            },
            contrast: ContrastRecord {
                value: 0.0,
                category: ContrastCategory::Low,
            },
            key: KeyProportions {
                low_key: 1.0,
                mid_tone: 0.0,
                high_key: 0.0,
            },
        };
    }

    let mean = sum as f64 / total as f64;
    let variance = gray
        .pixels()
        .map(|p| {
            let d = p.0[0] as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / total as f64;

    let brightness_value = mean / 255.0;
    let contrast_value = variance.sqrt() / CONTRAST_DIVISOR;

    let low: u64 = histogram[0..64].iter().sum();
    let high: u64 = histogram[192..256].iter().sum();
    let mid = total - low - high;

    ToneAnalysis {
        brightness: BrightnessRecord {
            value: brightness_value,
            category: categorize_brightness(brightness_value),
        },
        contrast: ContrastRecord {
            value: contrast_value,
            category: categorize_contrast(contrast_value),
        },
        key: KeyProportions {
            low_key: low as f64 / total as f64,
            mid_tone: mid as f64 / total as f64,
            high_key: high as f64 / total as f64,
        },
    }
}

fn categorize_brightness(value: f64) -> BrightnessCategory {
    if value < BRIGHTNESS_DARK_THRESHOLD {
        BrightnessCategory::Dark
    } else if value < BRIGHTNESS_MEDIUM_THRESHOLD {
        BrightnessCategory::Medium
    } else {
        BrightnessCategory::Bright
    }
}

fn categorize_contrast(value: f64) -> ContrastCategory {
    if value < CONTRAST_LOW_THRESHOLD {
        ContrastCategory::Low
    } else if value < CONTRAST_MEDIUM_THRESHOLD {
        ContrastCategory::Medium
    } else {
        ContrastCategory::High
    }
}
