//! Color harmony analysis module
//!
//! Classifies how the dominant hues relate on the color wheel and scores the
//! palette with a continuous harmony value. Classification matches pairwise
//! circular hue differences against the canonical intervals; the score
//! blends a fixed per-type base with a consistency factor derived from the
//! saturation/value spread of the sampled colors.
//!
//! The tolerance bands and base scores are hand-tuned values kept as named
//! constants; they can be adjusted through the config layer but are not
//! derived from anything.

use serde::{Deserialize, Serialize};

use crate::util::{hex_to_rgb, mean_std, rgb_to_hsv};

// ============================================================
// Constants
// ============================================================

/// At most this many dominant colors are sampled
const MAX_COLORS: usize = 5;

/// Hues closer than this collapse into one distinct hue
const TOLERANCE_MONO: f64 = 15.0;

/// Tolerance around the 180-degree complementary interval
const TOLERANCE_COMPLEMENTARY: f64 = 15.0;

/// Tolerance around the 120-degree triadic interval
const TOLERANCE_TRIADIC: f64 = 12.0;

/// Tolerance around the 90-degree tetradic interval (270 degrees collapses
/// to 90 under wrap-around)
const TOLERANCE_TETRADIC: f64 = 12.0;

/// Tolerance around the 30/60-degree analogous intervals
const TOLERANCE_ANALOGOUS: f64 = 10.0;

/// Base score weight in the 70/30 blend with consistency
const BASE_WEIGHT: f64 = 0.7;

/// Saturation below which the palette reads as neutral
const NEUTRAL_SATURATION: f64 = 0.12;

/// Per-type base scores, strictly decreasing with hue dispersion so the
/// harmony score is monotone over increasingly spread palettes
const BASE_MONOCHROMATIC: f64 = 0.9;
const BASE_ANALOGOUS: f64 = 0.8;
const BASE_TETRADIC: f64 = 0.7;
const BASE_TRIADIC: f64 = 0.6;
const BASE_COMPLEMENTARY: f64 = 0.5;
const BASE_DISCORDANT: f64 = 0.3;

// ============================================================
// Data Structures
// ============================================================

/// Harmony type labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HarmonyType {
    Monochromatic,
    Analogous,
    Complementary,
    Triadic,
    Tetradic,
    Discordant,
}

impl HarmonyType {
    /// Fixed base score for this harmony type
    pub fn base_score(self) -> f64 {
        match self {
            HarmonyType::Monochromatic => BASE_MONOCHROMATIC,
            HarmonyType::Analogous => BASE_ANALOGOUS,
            HarmonyType::Tetradic => BASE_TETRADIC,
            HarmonyType::Triadic => BASE_TRIADIC,
            HarmonyType::Complementary => BASE_COMPLEMENTARY,
            HarmonyType::Discordant => BASE_DISCORDANT,
        }
    }
}

/// Palette temperature from average hue bucket membership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Temperature {
    Warm,
    Cool,
    Mixed,
    Neutral,
}

/// Color harmony analysis result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarmonyAnalysis {
    #[serde(rename = "type")]
    pub harmony_type: HarmonyType,
    /// Blended harmony score in [0,1]
    pub score: f64,
    pub temperature: Temperature,
    /// Distinct hues after collapsing near-identical ones
    pub distinct_hues: usize,
}

// ============================================================
// Analysis
// ============================================================

/// Analyze harmony of a dominant-color palette
///
/// Accepts up to five `#rrggbb` strings; unparseable entries are skipped.
/// Total over all inputs: an empty palette reads as monochromatic.
pub fn analyze_harmony(dominant_colors: &[String]) -> HarmonyAnalysis {
    let hsv: Vec<(f64, f64, f64)> = dominant_colors
        .iter()
        .take(MAX_COLORS)
        .filter_map(|hex| hex_to_rgb(hex))
        .map(|[r, g, b]| {
            let (h, s, v) = rgb_to_hsv(r, g, b);
            (h as f64, s as f64, v as f64)
        })
        .collect();

    let hues: Vec<f64> = hsv.iter().map(|&(h, _, _)| h).collect();
    let diffs = pairwise_hue_differences(&hues);
    let distinct = distinct_hue_count(&hues);

    let harmony_type = classify_harmony(&diffs, distinct);

    let saturations: Vec<f64> = hsv.iter().map(|&(_, s, _)| s).collect();
    let values: Vec<f64> = hsv.iter().map(|&(_, _, v)| v).collect();
    let (sat_mean, sat_std) = mean_std(&saturations);
    let (_, val_std) = mean_std(&values);

    // Tighter saturation/value spread reads as a more deliberate palette
    let consistency = 1.0 - (sat_std + val_std).min(1.0);
    let score = BASE_WEIGHT * harmony_type.base_score() + (1.0 - BASE_WEIGHT) * consistency;

    HarmonyAnalysis {
        harmony_type,
        score,
        temperature: classify_temperature(&hues, sat_mean),
        distinct_hues: distinct,
    }
}

/// Circular difference between two hues in degrees, in [0, 180]
#[inline]
pub fn circular_hue_difference(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs() % 360.0;
    diff.min(360.0 - diff)
}

fn pairwise_hue_differences(hues: &[f64]) -> Vec<f64> {
    let mut diffs = Vec::new();
    for i in 0..hues.len() {
        for j in i + 1..hues.len() {
            diffs.push(circular_hue_difference(hues[i], hues[j]));
        }
    }
    diffs
}

fn distinct_hue_count(hues: &[f64]) -> usize {
    let mut representatives: Vec<f64> = Vec::new();
    for &h in hues {
        if !representatives
            .iter()
            .any(|&r| circular_hue_difference(r, h) < TOLERANCE_MONO)
        {
            representatives.push(h);
        }
    }
    representatives.len()
}

fn classify_harmony(diffs: &[f64], distinct_hues: usize) -> HarmonyType {
    if distinct_hues <= 2 && diffs.iter().all(|&d| d < TOLERANCE_MONO) {
        return HarmonyType::Monochromatic;
    }

    let near = |target: f64, tolerance: f64| diffs.iter().any(|&d| (d - target).abs() <= tolerance);

    if near(180.0, TOLERANCE_COMPLEMENTARY) {
        HarmonyType::Complementary
    } else if near(120.0, TOLERANCE_TRIADIC) {
        HarmonyType::Triadic
    } else if near(90.0, TOLERANCE_TETRADIC) {
        HarmonyType::Tetradic
    } else if near(30.0, TOLERANCE_ANALOGOUS) || near(60.0, TOLERANCE_ANALOGOUS) {
        HarmonyType::Analogous
    } else {
        HarmonyType::Discordant
    }
}

fn classify_temperature(hues: &[f64], saturation_mean: f64) -> Temperature {
    if hues.is_empty() || saturation_mean < NEUTRAL_SATURATION {
        return Temperature::Neutral;
    }

    // Warm bucket: reds through yellows; cool bucket: greens through violets
    let warm = hues.iter().filter(|&&h| h < 90.0 || h >= 330.0).count();
    let cool = hues.len() - warm;

    match (warm, cool) {
        (_, 0) => Temperature::Warm,
        (0, _) => Temperature::Cool,
        _ => Temperature::Mixed,
    }
}
