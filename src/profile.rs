//! Feature profile assembly module
//!
//! Orchestrates the individual analyzers over one decoded image and merges
//! their outputs, plus an optional externally fetched insight record, into a
//! single [`FeatureProfile`]. The analyzers are pure functions of the image
//! (style and objects additionally consume the color/tone outputs and the
//! insight record), so execution order does not affect the result.
//!
//! Failure policy: if any analyzer fails, the whole analysis fails and no
//! profile is returned. Partial profiles would be misleading conditioning
//! input for downstream generation. An insight fetch failure is the one
//! non-fatal case: analysis proceeds with the empty record.
//!
//! # Example
//!
//! ```rust,no_run
//! use imagesense::profile::ProfileAnalyzer;
//! use std::path::Path;
//!
//! let analyzer = ProfileAnalyzer::default();
//! let profile = analyzer.analyze_path(Path::new("photo.jpg"), None).unwrap();
//! println!("style: {}", profile.style.style);
//! ```

use image::RgbImage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::color::{extract_dominant_colors, ColorError, ColorExtractOptions};
use crate::composition::{analyze_composition, CompositionAnalysis};
use crate::harmony::{analyze_harmony, HarmonyAnalysis};
use crate::insight::{ExternalInsight, InsightSource};
use crate::objects::{detect_objects, FaceDetector, ObjectDetection, SkinRegionDetector};
use crate::scene::{classify_scene, SceneAnalysis};
use crate::style::{synthesize_style, StyleAnalysis};
use crate::texture::{analyze_texture, TextureAnalysis};
use crate::tone::{analyze_tone, BrightnessRecord, ContrastRecord, KeyProportions};
use crate::util::load_image;

/// Analysis error types
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Input image missing or undecodable
    #[error("Failed to load image: {0}")]
    ImageLoad(String),

    /// Image decoded to zero pixels
    #[error("Image has no pixels")]
    EmptyImage,

    /// Color extraction failed
    #[error("Color extraction failed: {0}")]
    Color(#[from] ColorError),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Image dimensions record
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// The aggregate visual feature profile of one image
///
/// Every numeric sub-score is normalized to [0,1] except the raw
/// statistical magnitudes (entropy, GLCM contrast/dissimilarity, gradient
/// strength), which are unbounded non-negative floats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureProfile {
    pub dimensions: Dimensions,
    /// Dominant colors as `#rrggbb`, ordered by descending pixel frequency
    pub dominant_colors: Vec<String>,
    pub composition: CompositionAnalysis,
    pub brightness: BrightnessRecord,
    pub contrast: ContrastRecord,
    pub key: KeyProportions,
    pub has_faces: bool,
    pub face_count: usize,
    pub style: StyleAnalysis,
    pub texture: TextureAnalysis,
    pub objects: ObjectDetection,
    pub scene: SceneAnalysis,
    pub harmony: HarmonyAnalysis,
    /// External insight record; empty default when absent or fetch failed
    #[serde(default)]
    pub insight: ExternalInsight,
}

/// Options for profile analysis
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    /// Dominant color extraction options
    pub color: ColorExtractOptions,
}

impl AnalyzeOptions {
    /// Create a new options builder
    pub fn builder() -> AnalyzeOptionsBuilder {
        AnalyzeOptionsBuilder::default()
    }
}

/// Builder for AnalyzeOptions
#[derive(Debug, Default)]
pub struct AnalyzeOptionsBuilder {
    options: AnalyzeOptions,
}

impl AnalyzeOptionsBuilder {
    /// Set color extraction options
    pub fn color(mut self, color: ColorExtractOptions) -> Self {
        self.options.color = color;
        self
    }

    /// Set the dominant color count
    pub fn color_count(mut self, count: usize) -> Self {
        self.options.color.color_count = count;
        self
    }

    /// Build the options
    pub fn build(self) -> AnalyzeOptions {
        self.options
    }
}

/// Profile analyzer: the assembly point for all feature analyzers
///
/// Holds the analysis options and the face detector seam. The insight
/// source, being the only potentially network-bound collaborator, is passed
/// per call with caller-owned lifecycle.
pub struct ProfileAnalyzer {
    options: AnalyzeOptions,
    face_detector: Box<dyn FaceDetector + Send + Sync>,
}

impl Default for ProfileAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzeOptions::default())
    }
}

impl ProfileAnalyzer {
    /// Create an analyzer with the given options and the built-in face
    /// detector
    pub fn new(options: AnalyzeOptions) -> Self {
        Self {
            options,
            face_detector: Box::new(SkinRegionDetector::default()),
        }
    }

    /// Create an analyzer with a custom face detector
    pub fn with_face_detector(
        options: AnalyzeOptions,
        face_detector: Box<dyn FaceDetector + Send + Sync>,
    ) -> Self {
        Self {
            options,
            face_detector,
        }
    }

    /// Analyze an image file, optionally fetching external insight
    ///
    /// An insight fetch failure is logged and analysis continues with the
    /// empty record; any analyzer failure aborts the whole profile.
    pub fn analyze_path(
        &self,
        image_path: &Path,
        insight_source: Option<&dyn InsightSource>,
    ) -> Result<FeatureProfile> {
        let image = load_image(image_path)
            .map_err(AnalysisError::ImageLoad)?
            .to_rgb8();

        let insight = insight_source.and_then(|source| match source.fetch(image_path) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, "insight fetch failed; continuing without insight");
                None
            }
        });

        self.analyze_image(&image, insight)
    }

    /// Analyze a decoded image with an optional pre-fetched insight record
    pub fn analyze_image(
        &self,
        image: &RgbImage,
        insight: Option<ExternalInsight>,
    ) -> Result<FeatureProfile> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(AnalysisError::EmptyImage);
        }
        let insight = insight.unwrap_or_default();

        debug!(width, height, "analyzing image");

        let dominant_colors = extract_dominant_colors(image, &self.options.color)?;
        let tone = analyze_tone(image);
        let composition = analyze_composition(image);
        let texture = analyze_texture(image);
        let scene = classify_scene(image);
        let harmony = analyze_harmony(&dominant_colors);

        let objects = detect_objects(
            image,
            self.face_detector.as_ref(),
            &insight.detected_objects,
        );

        let external_style = (!insight.style_description.is_empty())
            .then_some(insight.style_description.as_str());
        let style = synthesize_style(image, &tone, &dominant_colors, external_style);

        debug!(
            style = %style.style,
            scene = ?scene.scene_type,
            texture = ?texture.texture_type,
            "analysis complete"
        );

        Ok(FeatureProfile {
            dimensions: Dimensions { width, height },
            dominant_colors,
            composition,
            brightness: tone.brightness,
            contrast: tone.contrast,
            key: tone.key,
            has_faces: objects.face_likely,
            face_count: objects.face_count,
            style,
            texture,
            objects,
            scene,
            harmony,
            insight,
        })
    }

    /// Analyze a batch of image files in parallel
    ///
    /// Per-file failures are reported individually; one bad file does not
    /// abort the batch.
    pub fn analyze_batch(
        &self,
        image_paths: &[PathBuf],
    ) -> Vec<(PathBuf, Result<FeatureProfile>)> {
        image_paths
            .par_iter()
            .map(|path| (path.clone(), self.analyze_path(path, None)))
            .collect()
    }
}
