//! Style synthesis module
//!
//! Combines tone, saturation and color-diversity signals into a single style
//! label via an ordered rule list. An externally supplied style description
//! can replace the label, but only when the heuristic landed on the `mixed`
//! fallback; a confidently determined style is never overridden.

use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::harmony::circular_hue_difference;
use crate::tone::{BrightnessCategory, ContrastCategory, ToneAnalysis};
use crate::util::{hex_to_rgb, rgb_to_hsv};

/// Saturation above which a palette reads as vibrant (with enough contrast)
const VIBRANT_SATURATION: f64 = 0.5;
const VIBRANT_CONTRAST: f64 = 0.4;

/// Top dominant colors checked for the monochromatic flag
const MONO_COLOR_SAMPLE: usize = 3;

/// Pairwise hue tolerance for the monochromatic flag (degrees)
const MONO_HUE_TOLERANCE: f64 = 36.0;

/// Saturation below which a bright image reads as minimalist
const MINIMALIST_SATURATION: f64 = 0.3;

/// Thresholds for the supplemental colorful/rich/bold rules
const COLORFUL_SATURATION: f64 = 0.45;
const COLORFUL_MIN_HUES: usize = 4;
const RICH_SATURATION: f64 = 0.5;
const BOLD_SATURATION: f64 = 0.4;

/// Fallback label; the only one external keywords may replace
pub const FALLBACK_STYLE: &str = "mixed";

/// Keyword vocabulary scanned in external style descriptions. First match in
/// this order wins when the heuristic result was the fallback.
pub const STYLE_KEYWORDS: &[&str] = &[
    "vibrant",
    "dramatic",
    "monochromatic",
    "minimalist",
    "balanced",
    "colorful",
    "rich",
    "bold",
    "noir",
    "cinematic",
    "vintage",
    "retro",
    "pastel",
    "moody",
    "elegant",
    "grunge",
];

/// Style synthesis result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleAnalysis {
    /// The assigned style label
    pub style: String,
    /// Mean HSV saturation of the image in [0,1]
    pub saturation: f64,
    pub vibrant: bool,
    pub monochromatic: bool,
    /// True when an external keyword replaced the fallback label
    pub external_override: bool,
}

/// Synthesize a style label from tone, saturation and dominant colors
///
/// `external_style` is an optional free-text style description from an
/// outside collaborator; it is scanned for [`STYLE_KEYWORDS`] and applied
/// only when the heuristic result is [`FALLBACK_STYLE`].
pub fn synthesize_style(
    image: &RgbImage,
    tone: &ToneAnalysis,
    dominant_colors: &[String],
    external_style: Option<&str>,
) -> StyleAnalysis {
    let saturation = mean_saturation(image);
    let monochromatic = is_monochromatic(dominant_colors);
    let distinct_hues = count_distinct_hues(dominant_colors);
    let vibrant = saturation > VIBRANT_SATURATION && tone.contrast.value > VIBRANT_CONTRAST;

    let brightness = tone.brightness.category;
    let contrast = tone.contrast.category;

    // Ordered rule ladder, first match wins
    let style = if vibrant && contrast == ContrastCategory::High {
        "vibrant"
    } else if brightness == BrightnessCategory::Dark && contrast == ContrastCategory::High {
        "dramatic"
    } else if monochromatic {
        "monochromatic"
    } else if brightness == BrightnessCategory::Bright && saturation < MINIMALIST_SATURATION {
        "minimalist"
    } else if brightness == BrightnessCategory::Medium && contrast == ContrastCategory::Medium {
        "balanced"
    } else if saturation > COLORFUL_SATURATION && distinct_hues >= COLORFUL_MIN_HUES {
        "colorful"
    } else if saturation > RICH_SATURATION && brightness == BrightnessCategory::Medium {
        "rich"
    } else if saturation > BOLD_SATURATION && contrast == ContrastCategory::High {
        "bold"
    } else {
        FALLBACK_STYLE
    };

    let (style, external_override) = apply_external_override(style, external_style);

    StyleAnalysis {
        style,
        saturation,
        vibrant,
        monochromatic,
        external_override,
    }
}

/// Replace the fallback label with the first matched external keyword
fn apply_external_override(heuristic: &str, external_style: Option<&str>) -> (String, bool) {
    if heuristic != FALLBACK_STYLE {
        return (heuristic.to_string(), false);
    }
    let Some(description) = external_style else {
        return (heuristic.to_string(), false);
    };

    let lower = description.to_lowercase();
    for keyword in STYLE_KEYWORDS {
        if lower.contains(keyword) {
            return ((*keyword).to_string(), true);
        }
    }
    (heuristic.to_string(), false)
}

fn mean_saturation(image: &RgbImage) -> f64 {
    let total = image.width() as u64 * image.height() as u64;
    if total == 0 {
        return 0.0;
    }
    let sum: f64 = image
        .pixels()
        .map(|p| rgb_to_hsv(p.0[0], p.0[1], p.0[2]).1 as f64)
        .sum();
    sum / total as f64
}

/// All pairwise hue differences among the top dominant colors stay within
/// the tolerance
fn is_monochromatic(dominant_colors: &[String]) -> bool {
    let hues = sample_hues(dominant_colors, MONO_COLOR_SAMPLE);
    if hues.len() < 2 {
        return false;
    }
    for i in 0..hues.len() {
        for j in i + 1..hues.len() {
            if circular_hue_difference(hues[i], hues[j]) >= MONO_HUE_TOLERANCE {
                return false;
            }
        }
    }
    true
}

fn count_distinct_hues(dominant_colors: &[String]) -> usize {
    let hues = sample_hues(dominant_colors, dominant_colors.len());
    let mut representatives: Vec<f64> = Vec::new();
    for h in hues {
        if !representatives
            .iter()
            .any(|&r| circular_hue_difference(r, h) < MONO_HUE_TOLERANCE)
        {
            representatives.push(h);
        }
    }
    representatives.len()
}

fn sample_hues(dominant_colors: &[String], limit: usize) -> Vec<f64> {
    dominant_colors
        .iter()
        .take(limit)
        .filter_map(|hex| hex_to_rgb(hex))
        .map(|[r, g, b]| rgb_to_hsv(r, g, b).0 as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tone::analyze_tone;
    use image::Rgb;

    fn colors(hex: &[&str]) -> Vec<String> {
        hex.iter().map(|s| s.to_string()).collect()
    }

    /// Saturated bright-yellow/dark-red split: vibrant + high contrast
    fn vibrant_image() -> RgbImage {
        let mut img = RgbImage::from_pixel(40, 40, Rgb([255, 255, 0]));
        for y in 0..40 {
            for x in 20..40 {
                img.put_pixel(x, y, Rgb([200, 0, 0]));
            }
        }
        img
    }

    #[test]
    fn test_vibrant() {
        let img = vibrant_image();
        let tone = analyze_tone(&img);
        let style = synthesize_style(&img, &tone, &colors(&["#ffff00", "#c80000"]), None);

        assert!(style.vibrant);
        assert_eq!(style.style, "vibrant");
        assert!(!style.external_override);
    }

    #[test]
    fn test_dramatic() {
        // Dark with a bright sliver: dark brightness, high contrast
        let mut img = RgbImage::from_pixel(40, 40, Rgb([5, 5, 5]));
        for y in 0..40 {
            for x in 0..8 {
                img.put_pixel(x, y, Rgb([250, 250, 250]));
            }
        }
        let tone = analyze_tone(&img);
        assert_eq!(tone.brightness.category, BrightnessCategory::Dark);
        assert_eq!(tone.contrast.category, ContrastCategory::High);

        let style = synthesize_style(&img, &tone, &colors(&["#050505", "#fafafa"]), None);
        assert_eq!(style.style, "dramatic");
    }

    #[test]
    fn test_monochromatic() {
        // Mid-brightness, low contrast, similar hues
        let img = RgbImage::from_pixel(40, 40, Rgb([100, 120, 160]));
        let tone = analyze_tone(&img);

        let style = synthesize_style(
            &img,
            &tone,
            &colors(&["#6478a0", "#5a6e96", "#64828c"]),
            None,
        );
        assert!(style.monochromatic);
        assert_eq!(style.style, "monochromatic");
    }

    #[test]
    fn test_minimalist() {
        let img = RgbImage::from_pixel(40, 40, Rgb([245, 245, 245]));
        let tone = analyze_tone(&img);

        let style = synthesize_style(&img, &tone, &colors(&["#f5f5f5"]), None);
        assert_eq!(style.style, "minimalist");
        assert!(style.saturation < 0.1);
    }

    #[test]
    fn test_mixed_fallback() {
        // Bright but saturated: falls through every confident rule
        let img = RgbImage::from_pixel(40, 40, Rgb([250, 210, 60]));
        let tone = analyze_tone(&img);

        let style = synthesize_style(
            &img,
            &tone,
            &colors(&["#fad23c", "#3cfa50", "#3c50fa"]),
            None,
        );
        assert_eq!(style.style, FALLBACK_STYLE);
    }

    #[test]
    fn test_external_override_applies_to_fallback_only() {
        let img = RgbImage::from_pixel(40, 40, Rgb([250, 210, 60]));
        let tone = analyze_tone(&img);
        let palette = colors(&["#fad23c", "#3cfa50", "#3c50fa"]);

        // Heuristic lands on mixed: the noir keyword takes over
        let style = synthesize_style(
            &img,
            &tone,
            &palette,
            Some("A gritty noir look with harsh shadows"),
        );
        assert_eq!(style.style, "noir");
        assert!(style.external_override);
    }

    #[test]
    fn test_external_never_overrides_confident_result() {
        let img = vibrant_image();
        let tone = analyze_tone(&img);

        let style = synthesize_style(
            &img,
            &tone,
            &colors(&["#ffff00", "#c80000"]),
            Some("A gritty noir look with harsh shadows"),
        );
        assert_eq!(style.style, "vibrant");
        assert!(!style.external_override);
    }

    #[test]
    fn test_external_override_first_keyword_wins() {
        let (style, overridden) =
            apply_external_override(FALLBACK_STYLE, Some("bold, cinematic, noir"));
        assert_eq!(style, "bold");
        assert!(overridden);
    }

    #[test]
    fn test_no_keyword_match_keeps_fallback() {
        let (style, overridden) =
            apply_external_override(FALLBACK_STYLE, Some("an ordinary photograph"));
        assert_eq!(style, FALLBACK_STYLE);
        assert!(!overridden);
    }

    #[test]
    fn test_is_monochromatic_tolerance() {
        assert!(is_monochromatic(&colors(&["#ff0000", "#ff2000"])));
        assert!(!is_monochromatic(&colors(&["#ff0000", "#00ff00"])));
        // Fewer than two parseable colors is not monochromatic
        assert!(!is_monochromatic(&colors(&["#ff0000"])));
        assert!(!is_monochromatic(&[]));
    }

    #[test]
    fn test_empty_image_saturation() {
        let img = RgbImage::new(0, 0);
        assert_eq!(mean_saturation(&img), 0.0);
    }
}
