//! Composition analysis module
//!
//! Locates the dominant subject via edge and contour detection and
//! classifies the framing as centered, rule-of-thirds or other. Finding no
//! contours at all is a normal outcome reported as `unknown`, not an error.
//!
//! # Example
//!
//! ```rust
//! use image::{Rgb, RgbImage};
//! use imagesense::composition::{analyze_composition, CompositionType};
//!
//! let img = RgbImage::from_pixel(64, 64, Rgb([180, 180, 180]));
//! let result = analyze_composition(&img);
//! assert_eq!(result.composition_type, CompositionType::Unknown);
//! ```

use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::edge::{canny, find_contours, gaussian_blur_5x5};
use crate::util::grayscale;

/// Canny thresholds used for subject detection
const CANNY_LOW: f32 = 50.0;
const CANNY_HIGH: f32 = 150.0;

/// Central band for "centered" classification (both axes)
const CENTER_BAND: (f64, f64) = (0.3, 0.7);

/// Distance tolerance around the 1/3 and 2/3 gridlines
const THIRDS_TOLERANCE: f64 = 0.1;

/// Framing classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionType {
    Centered,
    RuleOfThirds,
    Other,
    /// No contours found; subject position is unknown
    Unknown,
}

/// Subject center as fractions of image width/height
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SubjectPosition {
    pub x: f64,
    pub y: f64,
}

/// Composition analysis result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositionAnalysis {
    #[serde(rename = "type")]
    pub composition_type: CompositionType,
    pub subject_position: Option<SubjectPosition>,
}

/// Locate the dominant subject and classify framing
///
/// Grayscale conversion, 5x5 Gaussian blur to suppress noise, Canny edge
/// detection, external contours; the maximum-area contour is taken as the
/// subject and its bounding-box center drives classification. Deterministic:
/// repeated runs on the same image yield the same result.
pub fn analyze_composition(image: &RgbImage) -> CompositionAnalysis {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return CompositionAnalysis {
            composition_type: CompositionType::Unknown,
            subject_position: None,
        };
    }

    let gray = grayscale(image);
    let blurred = gaussian_blur_5x5(&gray);
    let edges = canny(&blurred, CANNY_LOW, CANNY_HIGH);
    let contours = find_contours(&edges);

    let Some(subject) = contours.into_iter().max_by_key(|c| c.area) else {
        return CompositionAnalysis {
            composition_type: CompositionType::Unknown,
            subject_position: None,
        };
    };

    let (cx, cy) = subject.center();
    let rel_x = cx / width as f64;
    let rel_y = cy / height as f64;

    CompositionAnalysis {
        composition_type: classify_position(rel_x, rel_y),
        subject_position: Some(SubjectPosition { x: rel_x, y: rel_y }),
    }
}

fn classify_position(rel_x: f64, rel_y: f64) -> CompositionType {
    let (lo, hi) = CENTER_BAND;
    if (lo..=hi).contains(&rel_x) && (lo..=hi).contains(&rel_y) {
        return CompositionType::Centered;
    }

    let near_third = |v: f64| {
        (v - 1.0 / 3.0).abs() < THIRDS_TOLERANCE || (v - 2.0 / 3.0).abs() < THIRDS_TOLERANCE
    };
    if near_third(rel_x) && near_third(rel_y) {
        return CompositionType::RuleOfThirds;
    }

    CompositionType::Other
}
