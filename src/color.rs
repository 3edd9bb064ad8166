//! Dominant color extraction module
//!
//! Reduces an image to a small ordered set of representative colors via
//! iterative cluster-center refinement (k-means). Cluster centers are ranked
//! by pixel membership and surfaced as lowercase hex strings.
//!
//! # Example
//!
//! ```rust
//! use image::{Rgb, RgbImage};
//! use imagesense::color::{extract_dominant_colors, ColorExtractOptions};
//!
//! let img = RgbImage::from_pixel(32, 32, Rgb([200, 40, 40]));
//! let colors = extract_dominant_colors(&img, &ColorExtractOptions::default()).unwrap();
//! assert!(!colors.is_empty());
//! assert!(colors[0].starts_with('#'));
//! ```

use image::RgbImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::util::rgb_to_hex;

/// Default number of dominant colors to extract
pub const DEFAULT_COLOR_COUNT: usize = 5;

/// Iteration cap for cluster refinement
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Convergence epsilon: refinement stops once no center moves further than
/// this distance between iterations
pub const DEFAULT_CONVERGENCE_EPSILON: f32 = 0.2;

/// Default pixel sampling step (both axes) to bound clustering cost
pub const DEFAULT_SAMPLE_STEP: u32 = 2;

/// Default RNG seed for center initialization; a fixed seed keeps results
/// reproducible across runs
pub const DEFAULT_SEED: u64 = 0x5eed_c0de;

/// Color extraction error types
#[derive(Debug, Error)]
pub enum ColorError {
    #[error("Image has no pixels")]
    EmptyImage,

    #[error("Invalid color count: {0}")]
    InvalidColorCount(usize),
}

pub type Result<T> = std::result::Result<T, ColorError>;

/// Options for dominant color extraction
#[derive(Debug, Clone)]
pub struct ColorExtractOptions {
    /// Number of cluster centers (dominant colors) to produce
    pub color_count: usize,
    /// Maximum refinement iterations
    pub max_iterations: usize,
    /// Convergence epsilon on center movement
    pub convergence_epsilon: f32,
    /// Sampling step over image pixels
    pub sample_step: u32,
    /// RNG seed for center initialization
    pub seed: u64,
}

impl Default for ColorExtractOptions {
    fn default() -> Self {
        Self {
            color_count: DEFAULT_COLOR_COUNT,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            convergence_epsilon: DEFAULT_CONVERGENCE_EPSILON,
            sample_step: DEFAULT_SAMPLE_STEP,
            seed: DEFAULT_SEED,
        }
    }
}

impl ColorExtractOptions {
    /// Create a new options builder
    pub fn builder() -> ColorExtractOptionsBuilder {
        ColorExtractOptionsBuilder::default()
    }

    /// Options tuned for fast extraction on large images
    pub fn fast() -> Self {
        Self {
            sample_step: 4,
            max_iterations: 30,
            ..Default::default()
        }
    }
}

/// Builder for ColorExtractOptions
#[derive(Debug, Default)]
pub struct ColorExtractOptionsBuilder {
    options: ColorExtractOptions,
}

impl ColorExtractOptionsBuilder {
    /// Set the number of dominant colors
    pub fn color_count(mut self, count: usize) -> Self {
        self.options.color_count = count;
        self
    }

    /// Set the iteration cap
    pub fn max_iterations(mut self, iterations: usize) -> Self {
        self.options.max_iterations = iterations;
        self
    }

    /// Set the convergence epsilon
    pub fn convergence_epsilon(mut self, epsilon: f32) -> Self {
        self.options.convergence_epsilon = epsilon.abs();
        self
    }

    /// Set the pixel sampling step
    pub fn sample_step(mut self, step: u32) -> Self {
        self.options.sample_step = step.max(1);
        self
    }

    /// Set the RNG seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.options.seed = seed;
        self
    }

    /// Build the options
    pub fn build(self) -> ColorExtractOptions {
        self.options
    }
}

/// Extract dominant colors from an image, ordered by descending pixel
/// membership, as lowercase `#rrggbb` strings
///
/// Fewer unique colors than `color_count` is not an error: refinement still
/// terminates and duplicate centers may appear in the result.
pub fn extract_dominant_colors(
    image: &RgbImage,
    options: &ColorExtractOptions,
) -> Result<Vec<String>> {
    if options.color_count == 0 {
        return Err(ColorError::InvalidColorCount(0));
    }

    let pixels = sample_pixels(image, options.sample_step);
    if pixels.is_empty() {
        return Err(ColorError::EmptyImage);
    }

    let k = options.color_count;
    let mut rng = StdRng::seed_from_u64(options.seed);

    // Initialize centers from randomly drawn pixels
    let mut centers: Vec<[f32; 3]> = (0..k)
        .map(|_| pixels[rng.random_range(0..pixels.len())])
        .collect();

    let mut assignments = vec![0usize; pixels.len()];
    for _ in 0..options.max_iterations {
        // Assignment step
        for (i, px) in pixels.iter().enumerate() {
            assignments[i] = nearest_center(px, &centers);
        }

        // Update step
        let mut sums = vec![[0.0f64; 3]; k];
        let mut counts = vec![0usize; k];
        for (i, px) in pixels.iter().enumerate() {
            let c = assignments[i];
            sums[c][0] += px[0] as f64;
            sums[c][1] += px[1] as f64;
            sums[c][2] += px[2] as f64;
            counts[c] += 1;
        }

        let mut max_shift = 0.0f32;
        for c in 0..k {
            if counts[c] == 0 {
                // Empty cluster: re-seed from a random pixel so refinement
                // stays total even with fewer unique colors than k
                centers[c] = pixels[rng.random_range(0..pixels.len())];
                continue;
            }
            let new_center = [
                (sums[c][0] / counts[c] as f64) as f32,
                (sums[c][1] / counts[c] as f64) as f32,
                (sums[c][2] / counts[c] as f64) as f32,
            ];
            max_shift = max_shift.max(distance(&centers[c], &new_center));
            centers[c] = new_center;
        }

        if max_shift < options.convergence_epsilon {
            break;
        }
    }

    // Final membership count for ranking
    let mut counts = vec![0usize; k];
    for px in &pixels {
        counts[nearest_center(px, &centers)] += 1;
    }

    let mut ranked: Vec<(usize, [f32; 3])> = counts.into_iter().zip(centers).collect();
    ranked.sort_by(|a, b| b.0.cmp(&a.0));

    Ok(ranked
        .into_iter()
        .map(|(_, c)| {
            rgb_to_hex(
                c[0].round().clamp(0.0, 255.0) as u8,
                c[1].round().clamp(0.0, 255.0) as u8,
                c[2].round().clamp(0.0, 255.0) as u8,
            )
        })
        .collect())
}

fn sample_pixels(image: &RgbImage, step: u32) -> Vec<[f32; 3]> {
    let step = step.max(1);
    let (w, h) = image.dimensions();
    let mut pixels = Vec::with_capacity(((w / step + 1) * (h / step + 1)) as usize);
    for y in (0..h).step_by(step as usize) {
        for x in (0..w).step_by(step as usize) {
            let p = image.get_pixel(x, y);
            pixels.push([p.0[0] as f32, p.0[1] as f32, p.0[2] as f32]);
        }
    }
    pixels
}

fn nearest_center(pixel: &[f32; 3], centers: &[[f32; 3]]) -> usize {
    let mut best = 0;
    let mut best_dist = f32::MAX;
    for (i, c) in centers.iter().enumerate() {
        let d = distance_sq(pixel, c);
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

#[inline]
fn distance_sq(a: &[f32; 3], b: &[f32; 3]) -> f32 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}

#[inline]
fn distance(a: &[f32; 3], b: &[f32; 3]) -> f32 {
    distance_sq(a, b).sqrt()
}
