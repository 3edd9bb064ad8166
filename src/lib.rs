//! # imagesense
//!
//! Visual feature profiling for reference images.
//!
//! Reduces a raster image to a structured, multi-dimensional
//! [`FeatureProfile`](profile::FeatureProfile) describing its visual
//! characteristics, for use as conditioning input to a downstream
//! image-generation step.
//!
//! # Features
//!
//! - **Dominant colors** ([`color`]) - k-means palette extraction
//! - **Composition** ([`composition`]) - subject location and framing
//! - **Tone** ([`tone`]) - brightness, contrast and key proportions
//! - **Texture** ([`texture`]) - entropy, GLCM, LBP and frequency analysis
//! - **Scene** ([`scene`]) - HSV-histogram scene classification
//! - **Objects** ([`objects`]) - face/text/vegetation/sky/building heuristics
//! - **Color harmony** ([`harmony`]) - hue-wheel harmony type and score
//! - **Style** ([`style`]) - style label synthesis with external override
//! - **External insight** ([`insight`]) - semantic insight merge from a
//!   vision-capable collaborator
//! - **Profile assembly** ([`profile`]) - all of the above in one call
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use imagesense::ProfileAnalyzer;
//! use std::path::Path;
//!
//! let analyzer = ProfileAnalyzer::default();
//! let profile = analyzer.analyze_path(Path::new("photo.jpg"), None).unwrap();
//! println!("{}", serde_json::to_string_pretty(&profile).unwrap());
//! ```
//!
//! All analyzers are pure functions of the decoded image: nothing persists
//! between calls and no analyzer mutates its input. If any analyzer fails,
//! the whole analysis fails; there are no partial profiles.

pub mod cli;
pub mod color;
pub mod composition;
pub mod config;
pub mod edge;
pub mod harmony;
pub mod insight;
pub mod objects;
pub mod profile;
pub mod scene;
pub mod style;
pub mod texture;
pub mod tone;
pub mod util;

// Re-exports for convenience
pub use cli::{
    create_progress_bar, create_spinner, AnalyzeArgs, BatchArgs, Cli, Commands, ExitCode,
};
pub use color::{extract_dominant_colors, ColorError, ColorExtractOptions};
pub use composition::{analyze_composition, CompositionAnalysis, CompositionType};
pub use config::{Config, ConfigError};
pub use harmony::{analyze_harmony, HarmonyAnalysis, HarmonyType, Temperature};
pub use insight::{
    extract_insight, ExternalInsight, InsightError, InsightSource, JsonInsightSource,
};
pub use objects::{
    detect_objects, FaceBox, FaceDetector, ObjectDetection, SkinRegionDetector,
};
pub use profile::{
    AnalysisError, AnalyzeOptions, Dimensions, FeatureProfile, ProfileAnalyzer,
};
pub use scene::{classify_scene, SceneAnalysis, SceneType};
pub use style::{synthesize_style, StyleAnalysis};
pub use texture::{analyze_texture, TextureAnalysis, TextureScale, TextureType};
pub use tone::{analyze_tone, BrightnessCategory, ContrastCategory, ToneAnalysis};
