//! Object and face heuristic detection module
//!
//! Combines several cheap detectors into boolean likelihoods and a free-form
//! tag list: a pluggable face detector, a contour-density text heuristic,
//! HSV color-range masks for vegetation and sky, and Hough line geometry for
//! buildings. An externally supplied tag list can add evidence (and only
//! add: external tags never retract a heuristic-set flag).
//!
//! Face detection sits behind the [`FaceDetector`] trait so callers can plug
//! in a real model-backed detector; the built-in [`SkinRegionDetector`] is a
//! deterministic skin-mask heuristic with no model dependency.

use image::{GrayImage, RgbImage};
use serde::{Deserialize, Serialize};

use crate::edge::{canny, find_contours, hough_lines};
use crate::util::{grayscale, rgb_to_hsv};

// ============================================================
// Constants
// ============================================================

/// Contour area range counted as text-like
const TEXT_CONTOUR_AREA: (usize, usize) = (10, 300);

/// Text-like contour count above which text presence is assumed
const TEXT_CONTOUR_COUNT: usize = 50;

/// Fraction of image area a color mask must cover
const MASK_AREA_THRESHOLD: f64 = 0.15;

/// Angular tolerance (degrees) for vertical/horizontal line classification
const LINE_AXIS_TOLERANCE: f32 = 10.0;

/// Vertical and horizontal line counts both must exceed this for buildings
const BUILDING_LINE_COUNT: usize = 3;

/// Canny thresholds for contour and line extraction
const CANNY_LOW: f32 = 50.0;
const CANNY_HIGH: f32 = 150.0;

/// Hough vote threshold as a fraction of the smaller image dimension
const HOUGH_VOTE_FRACTION: f64 = 0.5;

// ============================================================
// Face detection seam
// ============================================================

/// A face bounding box in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Face detector seam
///
/// Implementations must be deterministic for a given image.
pub trait FaceDetector {
    /// Detect face bounding boxes in a grayscale image
    ///
    /// The RGB image is supplied as well for detectors that use color cues.
    fn detect_faces(&self, image: &RgbImage, gray: &GrayImage) -> Vec<FaceBox>;
}

/// Built-in heuristic face detector
///
/// Masks skin-tone pixels in HSV, groups them into connected regions and
/// keeps regions with face-like area and aspect ratio. Returns no boxes on
/// solid-color frames. Precision is modest; the point is a dependable
/// zero-model default behind the [`FaceDetector`] seam.
#[derive(Debug, Clone)]
pub struct SkinRegionDetector {
    /// Minimum region area as a fraction of image area
    pub min_area_fraction: f64,
    /// Maximum region area as a fraction of image area
    pub max_area_fraction: f64,
    /// Accepted width/height aspect ratio range
    pub aspect_range: (f64, f64),
}

impl Default for SkinRegionDetector {
    fn default() -> Self {
        Self {
            min_area_fraction: 0.005,
            max_area_fraction: 0.6,
            aspect_range: (0.5, 1.8),
        }
    }
}

impl SkinRegionDetector {
    fn is_skin(h: f32, s: f32, v: f32) -> bool {
        let hue_match = h <= 50.0 || h >= 340.0;
        hue_match && (0.15..=0.75).contains(&s) && v >= 0.3
    }
}

impl FaceDetector for SkinRegionDetector {
    fn detect_faces(&self, image: &RgbImage, _gray: &GrayImage) -> Vec<FaceBox> {
        let (width, height) = image.dimensions();
        let total = width as f64 * height as f64;
        if total == 0.0 {
            return Vec::new();
        }

        // Skin mask as a pseudo edge image so component grouping is shared
        let mut mask = GrayImage::new(width, height);
        for (x, y, p) in image.enumerate_pixels() {
            let (h, s, v) = rgb_to_hsv(p.0[0], p.0[1], p.0[2]);
            if Self::is_skin(h, s, v) {
                mask.put_pixel(x, y, image::Luma([255]));
            }
        }

        find_contours(&mask)
            .into_iter()
            .filter(|region| {
                let area_fraction = region.area as f64 / total;
                if area_fraction < self.min_area_fraction
                    || area_fraction > self.max_area_fraction
                {
                    return false;
                }
                let aspect = region.width() as f64 / region.height() as f64;
                let (lo, hi) = self.aspect_range;
                // A face-like region also fills most of its bounding box
                let fill = region.area as f64 / (region.width() as f64 * region.height() as f64);
                aspect >= lo && aspect <= hi && fill > 0.5
            })
            .map(|region| FaceBox {
                x: region.min_x,
                y: region.min_y,
                width: region.width(),
                height: region.height(),
            })
            .collect()
    }
}

// ============================================================
// Detection result
// ============================================================

/// Object and face presence likelihoods with supporting tags
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectDetection {
    pub face_likely: bool,
    pub person_likely: bool,
    pub text_likely: bool,
    pub vegetation_likely: bool,
    pub sky_likely: bool,
    pub building_likely: bool,
    pub vehicle_likely: bool,
    /// Free-form tag list (heuristic tags plus deduplicated external tags)
    pub detected_objects: Vec<String>,
    /// Number of face boxes the detector returned
    pub face_count: usize,
}

/// Run all object heuristics over an image
///
/// `external_tags` is an optional tag list from an outside collaborator;
/// each tag is case-insensitively deduplicated into `detected_objects` and
/// mapped through keyword families to set likelihood flags. External tags
/// only ever add evidence.
pub fn detect_objects(
    image: &RgbImage,
    detector: &dyn FaceDetector,
    external_tags: &[String],
) -> ObjectDetection {
    let mut result = ObjectDetection::default();
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        merge_external_tags(&mut result, external_tags);
        return result;
    }

    let gray = grayscale(image);

    // Faces
    let faces = detector.detect_faces(image, &gray);
    result.face_count = faces.len();
    if !faces.is_empty() {
        result.face_likely = true;
        result.person_likely = true;
        result.detected_objects.push("face".to_string());
    }

    // Text: many small contours
    let edges = canny(&gray, CANNY_LOW, CANNY_HIGH);
    let small_contours = find_contours(&edges)
        .iter()
        .filter(|c| c.area > TEXT_CONTOUR_AREA.0 && c.area < TEXT_CONTOUR_AREA.1)
        .count();
    if small_contours > TEXT_CONTOUR_COUNT {
        result.text_likely = true;
        result.detected_objects.push("text".to_string());
    }

    // Vegetation and sky via color-range masks
    let total = (width as u64 * height as u64) as f64;
    let mut vegetation = 0u64;
    let mut sky = 0u64;
    for p in image.pixels() {
        let (h, s, v) = rgb_to_hsv(p.0[0], p.0[1], p.0[2]);
        if (70.0..=170.0).contains(&h) && s > 0.15 && v > 0.15 {
            vegetation += 1;
        }
        if (200.0..=260.0).contains(&h) && s > 0.1 && v > 0.4 {
            sky += 1;
        }
    }
    if vegetation as f64 / total > MASK_AREA_THRESHOLD {
        result.vegetation_likely = true;
        result.detected_objects.push("vegetation".to_string());
    }
    if sky as f64 / total > MASK_AREA_THRESHOLD {
        result.sky_likely = true;
        result.detected_objects.push("sky".to_string());
    }

    // Buildings via line geometry
    let vote_threshold = ((width.min(height) as f64 * HOUGH_VOTE_FRACTION) as u32).max(10);
    let lines = hough_lines(&edges, vote_threshold);
    let vertical = lines
        .iter()
        .filter(|l| l.is_vertical(LINE_AXIS_TOLERANCE))
        .count();
    let horizontal = lines
        .iter()
        .filter(|l| l.is_horizontal(LINE_AXIS_TOLERANCE))
        .count();
    if vertical > BUILDING_LINE_COUNT && horizontal > BUILDING_LINE_COUNT {
        result.building_likely = true;
        result.detected_objects.push("building".to_string());
    }

    merge_external_tags(&mut result, external_tags);
    result
}

/// Keyword families mapping external tags to likelihood flags
const KEYWORD_FAMILIES: &[(&[&str], KeywordTarget)] = &[
    (&["person", "people", "man", "woman", "child", "human"], KeywordTarget::Person),
    (&["face", "portrait", "selfie"], KeywordTarget::Face),
    (&["text", "sign", "writing", "letter", "caption"], KeywordTarget::Text),
    (
        &["tree", "plant", "grass", "flower", "forest", "nature", "vegetation"],
        KeywordTarget::Vegetation,
    ),
    (
        &["building", "architecture", "house", "tower", "skyscraper", "bridge"],
        KeywordTarget::Building,
    ),
    (
        &["car", "vehicle", "truck", "bus", "motorcycle", "bicycle", "boat"],
        KeywordTarget::Vehicle,
    ),
    (&["sky", "cloud", "sunset", "sunrise"], KeywordTarget::Sky),
];

#[derive(Debug, Clone, Copy)]
enum KeywordTarget {
    Person,
    Face,
    Text,
    Vegetation,
    Building,
    Vehicle,
    Sky,
}

fn merge_external_tags(result: &mut ObjectDetection, external_tags: &[String]) {
    for tag in external_tags {
        let tag = tag.trim();
        if tag.is_empty() {
            continue;
        }
        let lower = tag.to_lowercase();

        // Case-insensitive dedup into the detected list
        if !result
            .detected_objects
            .iter()
            .any(|existing| existing.to_lowercase() == lower)
        {
            result.detected_objects.push(lower.clone());
        }

        for (keywords, target) in KEYWORD_FAMILIES {
            if keywords.iter().any(|k| lower.contains(k)) {
                match target {
                    KeywordTarget::Person => result.person_likely = true,
                    KeywordTarget::Face => {
                        result.face_likely = true;
                        result.person_likely = true;
                    }
                    KeywordTarget::Text => result.text_likely = true,
                    KeywordTarget::Vegetation => result.vegetation_likely = true,
                    KeywordTarget::Building => result.building_likely = true,
                    KeywordTarget::Vehicle => result.vehicle_likely = true,
                    KeywordTarget::Sky => result.sky_likely = true,
                }
            }
        }
    }
}
