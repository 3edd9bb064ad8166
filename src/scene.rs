//! Scene classification module
//!
//! Assigns a coarse scene category from HSV histogram proportions. The
//! classifier is an ordered rule list with first-match-wins semantics; each
//! branch computes its own confidence (a thresholded linear function of the
//! relevant proportions, capped below 0.9) and a set of qualitative
//! attribute tags.

use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::util::rgb_to_hsv;

// ============================================================
// Constants
// ============================================================

// Hue bands in degrees
const BLUE_HUE: (f32, f32) = (200.0, 260.0);
const GREEN_HUE: (f32, f32) = (70.0, 170.0);
// Red wraps around 0/360
const RED_HUE_LOW: (f32, f32) = (0.0, 20.0);
const RED_HUE_HIGH: (f32, f32) = (340.0, 360.0);

/// Saturation below this counts toward the low-saturation proportion
const SATURATION_LOW: f32 = 0.25;
/// Saturation above this counts toward the high-saturation proportion
const SATURATION_HIGH: f32 = 0.6;
/// Value below this counts toward the low-value proportion
const VALUE_LOW: f32 = 0.25;
/// Value above this counts toward the high-value proportion
const VALUE_HIGH: f32 = 0.7;

/// Confidence scores never reach this cap
const CONFIDENCE_CAP: f64 = 0.9;

// Branch thresholds (hand-tuned; see config overrides)
const NATURE_GREEN_MIN: f64 = 0.15;
const NATURE_BLUE_MIN: f64 = 0.1;
const VEGETATION_RICH_MIN: f64 = 0.25;
const SKY_VISIBLE_MIN: f64 = 0.2;
const URBAN_COLOR_MAX: f64 = 0.15;
const URBAN_LOW_SAT_MIN: f64 = 0.5;
const INDOOR_LOW_SAT_MIN: f64 = 0.6;
const INDOOR_COLOR_MAX: f64 = 0.2;
const SUNSET_RED_MIN: f64 = 0.15;
const SUNSET_BLUE_MIN: f64 = 0.1;
const SUNSET_HIGH_SAT_MIN: f64 = 0.3;
const NIGHT_LOW_VALUE_MIN: f64 = 0.5;
const NIGHT_LOW_SAT_MIN: f64 = 0.4;
const WATER_BLUE_MIN: f64 = 0.4;
const WATER_HIGH_VALUE_MIN: f64 = 0.4;
const WATER_SAT_RANGE: (f64, f64) = (0.15, 0.65);
const STUDIO_LOW_SAT_MIN: f64 = 0.5;
const STUDIO_HIGH_VALUE_MIN: f64 = 0.5;
// Dark-image guard on the urban/indoor branches so night stays reachable
const DAYLIT_LOW_VALUE_MAX: f64 = 0.5;

// ============================================================
// Data Structures
// ============================================================

/// Scene categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneType {
    OutdoorNature,
    Urban,
    Indoor,
    SunsetSunrise,
    Night,
    Water,
    Studio,
    Unknown,
}

/// HSV histogram proportions the rules evaluate
///
/// `blue`, `green` and `red` partition only part of the hue circle, so they
/// sum to at most 1; the saturation and value splits are fractions of all
/// pixels.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneSignals {
    pub blue: f64,
    pub green: f64,
    pub red: f64,
    pub saturation_low: f64,
    pub saturation_high: f64,
    pub saturation_mean: f64,
    pub value_low: f64,
    pub value_high: f64,
}

/// Scene classification result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneAnalysis {
    #[serde(rename = "type")]
    pub scene_type: SceneType,
    /// Branch confidence in [0, 0.9)
    pub confidence: f64,
    /// Qualitative attribute tags supporting the classification
    pub attributes: Vec<String>,
    /// The raw proportions the decision was made from
    pub signals: SceneSignals,
}

// ============================================================
// Classification
// ============================================================

/// Classify the scene category of an image
pub fn classify_scene(image: &RgbImage) -> SceneAnalysis {
    let signals = compute_signals(image);
    let (scene_type, confidence, attributes) = apply_rules(&signals);

    SceneAnalysis {
        scene_type,
        confidence,
        attributes,
        signals,
    }
}

/// A scene rule: returns the classification when its predicate matches
type SceneRule = fn(&SceneSignals) -> Option<(SceneType, f64, Vec<String>)>;

/// Ordered rule list, first match wins
const RULES: &[SceneRule] = &[
    rule_outdoor_nature,
    rule_urban,
    rule_indoor,
    rule_sunset_sunrise,
    rule_night,
    rule_water,
    rule_studio,
];

fn apply_rules(signals: &SceneSignals) -> (SceneType, f64, Vec<String>) {
    for rule in RULES {
        if let Some(result) = rule(signals) {
            return result;
        }
    }
    (SceneType::Unknown, 0.3, Vec::new())
}

fn cap(confidence: f64) -> f64 {
    confidence.min(CONFIDENCE_CAP - 0.01)
}

fn rule_outdoor_nature(s: &SceneSignals) -> Option<(SceneType, f64, Vec<String>)> {
    if s.green > NATURE_GREEN_MIN && s.blue > NATURE_BLUE_MIN {
        let confidence = cap(0.4 + s.green + s.blue);
        let mut attributes = Vec::new();
        if s.green >= VEGETATION_RICH_MIN {
            attributes.push("vegetation_rich".to_string());
        }
        if s.blue >= SKY_VISIBLE_MIN {
            attributes.push("sky_visible".to_string());
        }
        if s.saturation_high > 0.3 {
            attributes.push("saturated_landscape".to_string());
        }
        return Some((SceneType::OutdoorNature, confidence, attributes));
    }
    None
}

fn rule_urban(s: &SceneSignals) -> Option<(SceneType, f64, Vec<String>)> {
    if s.blue + s.green < URBAN_COLOR_MAX
        && s.saturation_low > URBAN_LOW_SAT_MIN
        && s.value_low < DAYLIT_LOW_VALUE_MAX
    {
        let confidence = cap(0.3 + s.saturation_low - (s.blue + s.green));
        let attributes = vec!["muted_palette".to_string(), "built_environment".to_string()];
        return Some((SceneType::Urban, confidence, attributes));
    }
    None
}

fn rule_indoor(s: &SceneSignals) -> Option<(SceneType, f64, Vec<String>)> {
    if s.saturation_low > INDOOR_LOW_SAT_MIN
        && s.blue + s.green < INDOOR_COLOR_MAX
        && s.value_low < DAYLIT_LOW_VALUE_MAX
    {
        let confidence = cap(0.3 + s.saturation_low / 2.0);
        let attributes = vec!["artificial_light".to_string()];
        return Some((SceneType::Indoor, confidence, attributes));
    }
    None
}

fn rule_sunset_sunrise(s: &SceneSignals) -> Option<(SceneType, f64, Vec<String>)> {
    if s.red > SUNSET_RED_MIN && s.blue > SUNSET_BLUE_MIN && s.saturation_high > SUNSET_HIGH_SAT_MIN
    {
        let confidence = cap(0.4 + s.red + s.saturation_high / 2.0);
        let attributes = vec!["warm_sky".to_string(), "golden_hour".to_string()];
        return Some((SceneType::SunsetSunrise, confidence, attributes));
    }
    None
}

fn rule_night(s: &SceneSignals) -> Option<(SceneType, f64, Vec<String>)> {
    if s.value_low > NIGHT_LOW_VALUE_MIN && s.saturation_low > NIGHT_LOW_SAT_MIN {
        let confidence = cap(0.3 + s.value_low / 2.0);
        let attributes = vec!["low_light".to_string()];
        return Some((SceneType::Night, confidence, attributes));
    }
    None
}

fn rule_water(s: &SceneSignals) -> Option<(SceneType, f64, Vec<String>)> {
    let (sat_lo, sat_hi) = WATER_SAT_RANGE;
    if s.blue > WATER_BLUE_MIN
        && s.value_high > WATER_HIGH_VALUE_MIN
        && s.saturation_mean >= sat_lo
        && s.saturation_mean <= sat_hi
    {
        let confidence = cap(0.4 + s.blue / 2.0);
        let attributes = vec!["aquatic".to_string()];
        return Some((SceneType::Water, confidence, attributes));
    }
    None
}

fn rule_studio(s: &SceneSignals) -> Option<(SceneType, f64, Vec<String>)> {
    if s.saturation_low > STUDIO_LOW_SAT_MIN && s.value_high > STUDIO_HIGH_VALUE_MIN {
        let confidence = cap(0.3 + s.value_high / 2.0);
        let attributes = vec!["clean_backdrop".to_string(), "even_lighting".to_string()];
        return Some((SceneType::Studio, confidence, attributes));
    }
    None
}

fn compute_signals(image: &RgbImage) -> SceneSignals {
    let total = image.width() as u64 * image.height() as u64;
    if total == 0 {
        return SceneSignals::default();
    }

    let mut blue = 0u64;
    let mut green = 0u64;
    let mut red = 0u64;
    let mut sat_low = 0u64;
    let mut sat_high = 0u64;
    let mut val_low = 0u64;
    let mut val_high = 0u64;
    let mut sat_sum = 0.0f64;

    let in_band = |h: f32, band: (f32, f32)| h >= band.0 && h <= band.1;

    for p in image.pixels() {
        let (h, s, v) = rgb_to_hsv(p.0[0], p.0[1], p.0[2]);

        if in_band(h, BLUE_HUE) {
            blue += 1;
        } else if in_band(h, GREEN_HUE) {
            green += 1;
        } else if in_band(h, RED_HUE_LOW) || in_band(h, RED_HUE_HIGH) {
            red += 1;
        }

        if s < SATURATION_LOW {
            sat_low += 1;
        } else if s > SATURATION_HIGH {
            sat_high += 1;
        }
        if v < VALUE_LOW {
            val_low += 1;
        } else if v > VALUE_HIGH {
            val_high += 1;
        }
        sat_sum += s as f64;
    }

    let n = total as f64;
    SceneSignals {
        blue: blue as f64 / n,
        green: green as f64 / n,
        red: red as f64 / n,
        saturation_low: sat_low as f64 / n,
        saturation_high: sat_high as f64 / n,
        saturation_mean: sat_sum / n,
        value_low: val_low as f64 / n,
        value_high: val_high as f64 / n,
    }
}
