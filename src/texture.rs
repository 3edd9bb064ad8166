//! Texture analysis module
//!
//! Derives first- and second-order texture statistics from the grayscale
//! image: Shannon entropy, gray-level co-occurrence statistics, edge density
//! at two Canny threshold pairs, Sobel gradient strength, local binary
//! pattern uniformity and a frequency-domain energy split. Texture type is
//! assigned by an explicit ordered rule list (first match wins) so the
//! tie-break order stays auditable.
//!
//! # Features
//!
//! - GLCM contrast/dissimilarity/homogeneity/energy/correlation averaged
//!   over distances {1,3,5} and angles {0, 45, 90, 135} degrees
//! - 8-neighbor LBP histogram uniformity
//! - Radix-2 FFT magnitude spectrum split into a low-frequency disc and a
//!   high-frequency annulus

use image::imageops::{self, FilterType};
use image::{GrayImage, RgbImage};
use serde::{Deserialize, Serialize};

use crate::edge::{canny, sobel_gradients};
use crate::util::grayscale;

// ============================================================
// Constants
// ============================================================

/// Longest-edge cap; larger images are downscaled before analysis
pub const MAX_ANALYSIS_EDGE: u32 = 512;

/// Gray levels for GLCM quantization (256 / 8)
const GLCM_LEVELS: usize = 32;

/// Pixel distances for co-occurrence pairs
const GLCM_DISTANCES: [i64; 3] = [1, 3, 5];

/// Canny threshold pairs for the two edge-density measurements
const CANNY_PAIR_LOW: (f32, f32) = (50.0, 150.0);
const CANNY_PAIR_HIGH: (f32, f32) = (100.0, 200.0);

/// Side length of the square resample the FFT runs on
const FFT_SIZE: usize = 128;

/// Radius of the low-frequency disc (DC bin excluded)
const LOW_FREQ_RADIUS: f64 = 16.0;

/// Outer radius of the high-frequency annulus (Nyquist)
const HIGH_FREQ_RADIUS: f64 = 64.0;

/// Energy factor separating fine from coarse texture scale
const SCALE_DOMINANCE: f64 = 1.5;

// Decision thresholds for the texture-type rule list
const HIGHLY_DETAILED_ENTROPY: f64 = 7.0;
const HIGHLY_DETAILED_EDGE_DENSITY: f64 = 0.15;
const DETAILED_ENTROPY: f64 = 6.0;
const DETAILED_EDGE_DENSITY: f64 = 0.10;
const SMOOTH_HOMOGENEITY: f64 = 0.85;
const SMOOTH_CONTRAST: f64 = 5.0;
const SMOOTH_MIN_ENTROPY: f64 = 1.0;
const PATTERNED_ENERGY: f64 = 0.4;
const PATTERNED_LBP_UNIFORMITY: f64 = 0.25;
const PATTERNED_MIN_ENTROPY: f64 = 2.0;
const TEXTURED_DISSIMILARITY: f64 = 1.5;
const TEXTURED_MIN_ENTROPY: f64 = 4.0;
const FLAT_CONTRAST: f64 = 2.0;
const FLAT_HOMOGENEITY: f64 = 0.8;
const COMPLEX_FREQUENCY_RATIO: f64 = 1.3;
const COMPLEX_MIN_ENTROPY: f64 = 5.0;
const GRAINY_EDGE_DENSITY: f64 = 0.25;
const GRAINY_HOMOGENEITY: f64 = 0.4;
const UNIFORM_MAX_ENTROPY: f64 = 1.0;

// ============================================================
// Data Structures
// ============================================================

/// Texture type labels, assigned first-match-wins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureType {
    HighlyDetailed,
    Detailed,
    Smooth,
    Patterned,
    Textured,
    Flat,
    Complex,
    Grainy,
    Uniform,
    Mixed,
}

/// Texture scale from the frequency-domain energy split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureScale {
    Fine,
    Medium,
    Coarse,
}

/// Raw texture statistics
///
/// Entropy, GLCM contrast/dissimilarity and gradient strength are unbounded
/// non-negative magnitudes; the remaining fields are normalized to [0,1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextureMetrics {
    /// Shannon entropy of the grayscale histogram (bits)
    pub entropy: f64,
    pub glcm_contrast: f64,
    pub glcm_dissimilarity: f64,
    pub glcm_homogeneity: f64,
    pub glcm_energy: f64,
    pub glcm_correlation: f64,
    /// Edge pixel fraction at Canny (50,150)
    pub edge_density_low: f64,
    /// Edge pixel fraction at Canny (100,200)
    pub edge_density_high: f64,
    /// Mean Sobel gradient magnitude
    pub gradient_strength: f64,
    /// Sum of squared LBP histogram frequencies
    pub lbp_uniformity: f64,
    /// Spectrum energy inside the low-frequency disc
    pub low_freq_energy: f64,
    /// Spectrum energy inside the high-frequency annulus
    pub high_freq_energy: f64,
    /// high / low energy; defined as 0 when low energy is 0
    pub frequency_ratio: f64,
}

/// Complete texture analysis result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextureAnalysis {
    #[serde(flatten)]
    pub metrics: TextureMetrics,
    #[serde(rename = "type")]
    pub texture_type: TextureType,
    pub scale: TextureScale,
}

// ============================================================
// Analysis
// ============================================================

/// Analyze texture characteristics of an image
///
/// Total over all non-empty images; an empty image yields zeroed metrics
/// classified as `uniform`.
pub fn analyze_texture(image: &RgbImage) -> TextureAnalysis {
    let gray = downscaled_gray(image);

    let metrics = if gray.width() == 0 || gray.height() == 0 {
        TextureMetrics {
            entropy: 0.0,
            glcm_contrast: 0.0,
            glcm_dissimilarity: 0.0,
            glcm_homogeneity: 1.0,
            glcm_energy: 1.0,
            glcm_correlation: 1.0,
            edge_density_low: 0.0,
            edge_density_high: 0.0,
            gradient_strength: 0.0,
            lbp_uniformity: 1.0,
            low_freq_energy: 0.0,
            high_freq_energy: 0.0,
            frequency_ratio: 0.0,
        }
    } else {
        compute_metrics(&gray)
    };

    let texture_type = classify_texture(&metrics);
    let scale = classify_scale(&metrics);

    TextureAnalysis {
        metrics,
        texture_type,
        scale,
    }
}

/// Classify texture type by the ordered rule list, first match wins
pub fn classify_texture(m: &TextureMetrics) -> TextureType {
    type Rule = (TextureType, fn(&TextureMetrics) -> bool);

    const RULES: &[Rule] = &[
        (TextureType::HighlyDetailed, |m| {
            m.entropy > HIGHLY_DETAILED_ENTROPY && m.edge_density_high > HIGHLY_DETAILED_EDGE_DENSITY
        }),
        (TextureType::Detailed, |m| {
            m.entropy > DETAILED_ENTROPY && m.edge_density_low > DETAILED_EDGE_DENSITY
        }),
        (TextureType::Smooth, |m| {
            m.glcm_homogeneity > SMOOTH_HOMOGENEITY
                && m.glcm_contrast < SMOOTH_CONTRAST
                && m.entropy >= SMOOTH_MIN_ENTROPY
        }),
        (TextureType::Patterned, |m| {
            m.glcm_energy > PATTERNED_ENERGY
                && m.lbp_uniformity > PATTERNED_LBP_UNIFORMITY
                && m.entropy >= PATTERNED_MIN_ENTROPY
        }),
        (TextureType::Textured, |m| {
            m.glcm_dissimilarity > TEXTURED_DISSIMILARITY && m.entropy >= TEXTURED_MIN_ENTROPY
        }),
        (TextureType::Flat, |m| {
            m.glcm_contrast < FLAT_CONTRAST && m.glcm_homogeneity > FLAT_HOMOGENEITY
        }),
        (TextureType::Complex, |m| {
            m.frequency_ratio > COMPLEX_FREQUENCY_RATIO && m.entropy >= COMPLEX_MIN_ENTROPY
        }),
        (TextureType::Grainy, |m| {
            m.edge_density_low > GRAINY_EDGE_DENSITY && m.glcm_homogeneity < GRAINY_HOMOGENEITY
        }),
        (TextureType::Uniform, |m| m.entropy < UNIFORM_MAX_ENTROPY),
    ];

    for (label, predicate) in RULES {
        if predicate(m) {
            return *label;
        }
    }
    TextureType::Mixed
}

/// Classify texture scale from the frequency energy split
pub fn classify_scale(m: &TextureMetrics) -> TextureScale {
    if m.high_freq_energy > SCALE_DOMINANCE * m.low_freq_energy && m.high_freq_energy > 0.0 {
        TextureScale::Fine
    } else if m.low_freq_energy > SCALE_DOMINANCE * m.high_freq_energy && m.low_freq_energy > 0.0 {
        TextureScale::Coarse
    } else {
        TextureScale::Medium
    }
}

fn downscaled_gray(image: &RgbImage) -> GrayImage {
    let gray = grayscale(image);
    let (w, h) = gray.dimensions();
    let longest = w.max(h);
    if longest <= MAX_ANALYSIS_EDGE || longest == 0 {
        return gray;
    }
    let factor = MAX_ANALYSIS_EDGE as f64 / longest as f64;
    let nw = ((w as f64 * factor).round() as u32).max(1);
    let nh = ((h as f64 * factor).round() as u32).max(1);
    imageops::resize(&gray, nw, nh, FilterType::Triangle)
}

fn compute_metrics(gray: &GrayImage) -> TextureMetrics {
    let entropy = shannon_entropy(gray);
    let glcm = glcm_statistics(gray);
    let edge_density_low = edge_density(gray, CANNY_PAIR_LOW);
    let edge_density_high = edge_density(gray, CANNY_PAIR_HIGH);
    let gradient_strength = sobel_gradients(gray).mean_magnitude();
    let lbp_uniformity = lbp_uniformity(gray);
    let (low_freq_energy, high_freq_energy) = frequency_energy_split(gray);

    let frequency_ratio = if low_freq_energy > 0.0 {
        high_freq_energy / low_freq_energy
    } else {
        0.0
    };

    TextureMetrics {
        entropy,
        glcm_contrast: glcm.contrast,
        glcm_dissimilarity: glcm.dissimilarity,
        glcm_homogeneity: glcm.homogeneity,
        glcm_energy: glcm.energy,
        glcm_correlation: glcm.correlation,
        edge_density_low,
        edge_density_high,
        gradient_strength,
        lbp_uniformity,
        low_freq_energy,
        high_freq_energy,
        frequency_ratio,
    }
}

/// Shannon entropy (bits) of the 256-bin grayscale histogram
fn shannon_entropy(gray: &GrayImage) -> f64 {
    let total = gray.width() as u64 * gray.height() as u64;
    if total == 0 {
        return 0.0;
    }

    let mut histogram = [0u64; 256];
    for p in gray.pixels() {
        histogram[p.0[0] as usize] += 1;
    }

    histogram
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total as f64;
            -p * p.log2()
        })
        .sum()
}

struct GlcmStats {
    contrast: f64,
    dissimilarity: f64,
    homogeneity: f64,
    energy: f64,
    correlation: f64,
}

/// GLCM statistics averaged over the distance/angle grid
///
/// Gray values are quantized to `GLCM_LEVELS`; each matrix is symmetric and
/// normalized before the statistics are read off.
fn glcm_statistics(gray: &GrayImage) -> GlcmStats {
    // Angle offsets (dx, dy) for 0, 45, 90, 135 degrees at unit distance
    const ANGLES: [(i64, i64); 4] = [(1, 0), (1, 1), (0, 1), (-1, 1)];

    let (width, height) = gray.dimensions();
    let quantized: Vec<u8> = gray.pixels().map(|p| p.0[0] >> 3).collect();

    let mut sums = GlcmStats {
        contrast: 0.0,
        dissimilarity: 0.0,
        homogeneity: 0.0,
        energy: 0.0,
        correlation: 0.0,
    };
    let mut combos = 0usize;

    for &distance in &GLCM_DISTANCES {
        for &(ax, ay) in &ANGLES {
            let (dx, dy) = (ax * distance, ay * distance);
            let mut matrix = vec![0u64; GLCM_LEVELS * GLCM_LEVELS];
            let mut pairs = 0u64;

            for y in 0..height as i64 {
                for x in 0..width as i64 {
                    let nx = x + dx;
                    let ny = y + dy;
                    if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                        continue;
                    }
                    let a = quantized[(y * width as i64 + x) as usize] as usize;
                    let b = quantized[(ny * width as i64 + nx) as usize] as usize;
                    // Symmetric matrix: count both orientations
                    matrix[a * GLCM_LEVELS + b] += 1;
                    matrix[b * GLCM_LEVELS + a] += 1;
                    pairs += 2;
                }
            }

            if pairs == 0 {
                continue;
            }

            let stats = glcm_props(&matrix, pairs);
            sums.contrast += stats.contrast;
            sums.dissimilarity += stats.dissimilarity;
            sums.homogeneity += stats.homogeneity;
            sums.energy += stats.energy;
            sums.correlation += stats.correlation;
            combos += 1;
        }
    }

    if combos == 0 {
        return GlcmStats {
            contrast: 0.0,
            dissimilarity: 0.0,
            homogeneity: 1.0,
            energy: 1.0,
            correlation: 1.0,
        };
    }

    let n = combos as f64;
    GlcmStats {
        contrast: sums.contrast / n,
        dissimilarity: sums.dissimilarity / n,
        homogeneity: sums.homogeneity / n,
        energy: sums.energy / n,
        correlation: sums.correlation / n,
    }
}

fn glcm_props(matrix: &[u64], pairs: u64) -> GlcmStats {
    let norm = 1.0 / pairs as f64;

    let mut contrast = 0.0;
    let mut dissimilarity = 0.0;
    let mut homogeneity = 0.0;
    let mut asm = 0.0;

    let mut mean_i = 0.0;
    for i in 0..GLCM_LEVELS {
        for j in 0..GLCM_LEVELS {
            let p = matrix[i * GLCM_LEVELS + j] as f64 * norm;
            if p == 0.0 {
                continue;
            }
            let d = i as f64 - j as f64;
            contrast += p * d * d;
            dissimilarity += p * d.abs();
            homogeneity += p / (1.0 + d * d);
            asm += p * p;
            mean_i += p * i as f64;
        }
    }

    // The symmetric matrix makes the row and column marginals identical
    let mut var_i = 0.0;
    for i in 0..GLCM_LEVELS {
        for j in 0..GLCM_LEVELS {
            let p = matrix[i * GLCM_LEVELS + j] as f64 * norm;
            if p == 0.0 {
                continue;
            }
            let di = i as f64 - mean_i;
            var_i += p * di * di;
        }
    }

    let correlation = if var_i > 0.0 {
        let mut cov = 0.0;
        for i in 0..GLCM_LEVELS {
            for j in 0..GLCM_LEVELS {
                let p = matrix[i * GLCM_LEVELS + j] as f64 * norm;
                if p == 0.0 {
                    continue;
                }
                cov += p * (i as f64 - mean_i) * (j as f64 - mean_i);
            }
        }
        cov / var_i
    } else {
        // Constant image: perfectly correlated by definition
        1.0
    };

    GlcmStats {
        contrast,
        dissimilarity,
        homogeneity,
        energy: asm.sqrt(),
        correlation,
    }
}

/// Fraction of pixels marked as edges at the given Canny threshold pair
fn edge_density(gray: &GrayImage, thresholds: (f32, f32)) -> f64 {
    let total = gray.width() as u64 * gray.height() as u64;
    if total == 0 {
        return 0.0;
    }
    let edges = canny(gray, thresholds.0, thresholds.1);
    let count = edges.pixels().filter(|p| p.0[0] != 0).count();
    count as f64 / total as f64
}

/// Uniformity (sum of squared bin frequencies) of the 8-neighbor LBP
/// histogram
fn lbp_uniformity(gray: &GrayImage) -> f64 {
    let (width, height) = gray.dimensions();
    if width < 3 || height < 3 {
        return 1.0;
    }

    // Clockwise from the top-left neighbor
    const NEIGHBORS: [(i64, i64); 8] = [
        (-1, -1),
        (0, -1),
        (1, -1),
        (1, 0),
        (1, 1),
        (0, 1),
        (-1, 1),
        (-1, 0),
    ];

    let mut histogram = [0u64; 256];
    let mut total = 0u64;

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let center = gray.get_pixel(x, y).0[0];
            let mut pattern = 0u8;
            for (bit, &(dx, dy)) in NEIGHBORS.iter().enumerate() {
                let neighbor = gray
                    .get_pixel((x as i64 + dx) as u32, (y as i64 + dy) as u32)
                    .0[0];
                if neighbor >= center {
                    pattern |= 1 << bit;
                }
            }
            histogram[pattern as usize] += 1;
            total += 1;
        }
    }

    if total == 0 {
        return 1.0;
    }

    histogram
        .iter()
        .map(|&c| {
            let p = c as f64 / total as f64;
            p * p
        })
        .sum()
}

// ============================================================
// Frequency-domain split
// ============================================================

/// Magnitude-spectrum energy inside the low-frequency disc and the
/// high-frequency annulus
///
/// The image is resampled to `FFT_SIZE` square before the transform; the DC
/// bin is excluded so the split reflects structure, not overall brightness.
fn frequency_energy_split(gray: &GrayImage) -> (f64, f64) {
    let resized = imageops::resize(
        gray,
        FFT_SIZE as u32,
        FFT_SIZE as u32,
        FilterType::Triangle,
    );

    // Row-major complex grid
    let mut grid: Vec<(f64, f64)> = resized.pixels().map(|p| (p.0[0] as f64, 0.0)).collect();

    // Rows
    let mut row = vec![(0.0, 0.0); FFT_SIZE];
    for y in 0..FFT_SIZE {
        row.copy_from_slice(&grid[y * FFT_SIZE..(y + 1) * FFT_SIZE]);
        fft_in_place(&mut row);
        grid[y * FFT_SIZE..(y + 1) * FFT_SIZE].copy_from_slice(&row);
    }

    // Columns
    let mut col = vec![(0.0, 0.0); FFT_SIZE];
    for x in 0..FFT_SIZE {
        for y in 0..FFT_SIZE {
            col[y] = grid[y * FFT_SIZE + x];
        }
        fft_in_place(&mut col);
        for y in 0..FFT_SIZE {
            grid[y * FFT_SIZE + x] = col[y];
        }
    }

    let mut low = 0.0;
    let mut high = 0.0;
    for y in 0..FFT_SIZE {
        for x in 0..FFT_SIZE {
            if x == 0 && y == 0 {
                continue; // DC
            }
            // Wrap-around distance from the spectrum center
            let fx = x.min(FFT_SIZE - x) as f64;
            let fy = y.min(FFT_SIZE - y) as f64;
            let radius = (fx * fx + fy * fy).sqrt();

            let (re, im) = grid[y * FFT_SIZE + x];
            let magnitude = (re * re + im * im).sqrt();

            if radius <= LOW_FREQ_RADIUS {
                low += magnitude;
            } else if radius <= HIGH_FREQ_RADIUS {
                high += magnitude;
            }
        }
    }

    (low, high)
}

/// Iterative radix-2 Cooley-Tukey FFT; length must be a power of two
fn fft_in_place(buffer: &mut [(f64, f64)]) {
    let n = buffer.len();
    debug_assert!(n.is_power_of_two());

    // Bit-reversal permutation
    let mut j = 0usize;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j |= bit;
        if i < j {
            buffer.swap(i, j);
        }
    }

    let mut len = 2;
    while len <= n {
        let angle = -2.0 * std::f64::consts::PI / len as f64;
        let (w_re, w_im) = (angle.cos(), angle.sin());

        for start in (0..n).step_by(len) {
            let mut cur = (1.0, 0.0);
            for k in 0..len / 2 {
                let (a_re, a_im) = buffer[start + k];
                let (b_re, b_im) = buffer[start + k + len / 2];
                let t_re = b_re * cur.0 - b_im * cur.1;
                let t_im = b_re * cur.1 + b_im * cur.0;

                buffer[start + k] = (a_re + t_re, a_im + t_im);
                buffer[start + k + len / 2] = (a_re - t_re, a_im - t_im);

                cur = (cur.0 * w_re - cur.1 * w_im, cur.0 * w_im + cur.1 * w_re);
            }
        }
        len <<= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn uniform_image(value: u8) -> RgbImage {
        RgbImage::from_pixel(64, 64, Rgb([value, value, value]))
    }

    /// Checkerboard with 2x2-pixel cells
    fn checkerboard(size: u32) -> RgbImage {
        let mut img = RgbImage::new(size, size);
        for y in 0..size {
            for x in 0..size {
                let v = if (x / 2 + y / 2) % 2 == 0 { 0 } else { 255 };
                img.put_pixel(x, y, Rgb([v, v, v]));
            }
        }
        img
    }

    /// Deterministic pseudo-random noise image (LCG)
    fn noise_image(size: u32) -> RgbImage {
        let mut img = RgbImage::new(size, size);
        let mut state = 0x2545_f491_4f6c_dd1du64;
        for y in 0..size {
            for x in 0..size {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let v = (state >> 33) as u8;
                img.put_pixel(x, y, Rgb([v, v, v]));
            }
        }
        img
    }

    #[test]
    fn test_uniform_image_is_flat() {
        let analysis = analyze_texture(&uniform_image(180));

        assert!(analysis.metrics.glcm_contrast < 2.0);
        assert!(analysis.metrics.glcm_homogeneity > 0.8);
        assert_eq!(analysis.texture_type, TextureType::Flat);
        assert!(analysis.metrics.entropy < 0.01);
        assert_eq!(analysis.metrics.edge_density_low, 0.0);
    }

    #[test]
    fn test_checkerboard_metrics() {
        let analysis = analyze_texture(&checkerboard(64));

        // Two equally likely gray values: exactly one bit of entropy
        assert!((analysis.metrics.entropy - 1.0).abs() < 0.01);
        assert!(analysis.metrics.glcm_contrast > 2.0);
        assert!(analysis.metrics.glcm_homogeneity < 0.8);
        assert!(analysis.metrics.gradient_strength > 10.0);
    }

    #[test]
    fn test_noise_image_has_high_entropy() {
        let analysis = analyze_texture(&noise_image(128));

        assert!(analysis.metrics.entropy > 6.0, "entropy = {}", analysis.metrics.entropy);
        assert!(analysis.metrics.glcm_homogeneity < 0.5);
    }

    #[test]
    fn test_frequency_ratio_defined_for_degenerate_input() {
        let analysis = analyze_texture(&uniform_image(0));
        // All spectrum energy sits in the (excluded) DC bin
        assert_eq!(analysis.metrics.frequency_ratio, 0.0);
        assert_eq!(analysis.scale, TextureScale::Medium);
    }

    #[test]
    fn test_checkerboard_scale_is_fine() {
        let analysis = analyze_texture(&checkerboard(128));
        assert!(analysis.metrics.high_freq_energy > analysis.metrics.low_freq_energy);
        assert_eq!(analysis.scale, TextureScale::Fine);
    }

    #[test]
    fn test_empty_image_is_total() {
        let img = RgbImage::new(0, 0);
        let analysis = analyze_texture(&img);
        assert_eq!(analysis.texture_type, TextureType::Flat);
        assert_eq!(analysis.metrics.frequency_ratio, 0.0);
    }

    #[test]
    fn test_large_image_is_downscaled() {
        // Mostly checking the cap path does not panic and stays consistent
        let img = RgbImage::from_pixel(700, 300, Rgb([90, 90, 90]));
        let analysis = analyze_texture(&img);
        assert_eq!(analysis.texture_type, TextureType::Flat);
    }

    // ============================================================
    // Rule-list ordering (classification in isolation)
    // ============================================================

    fn base_metrics() -> TextureMetrics {
        TextureMetrics {
            entropy: 0.0,
            glcm_contrast: 100.0,
            glcm_dissimilarity: 0.0,
            glcm_homogeneity: 0.5,
            glcm_energy: 0.0,
            glcm_correlation: 0.0,
            edge_density_low: 0.0,
            edge_density_high: 0.0,
            gradient_strength: 0.0,
            lbp_uniformity: 0.0,
            low_freq_energy: 1.0,
            high_freq_energy: 1.0,
            frequency_ratio: 1.0,
        }
    }

    #[test]
    fn test_rule_highly_detailed_wins_over_detailed() {
        let m = TextureMetrics {
            entropy: 7.5,
            edge_density_high: 0.2,
            edge_density_low: 0.3,
            ..base_metrics()
        };
        assert_eq!(classify_texture(&m), TextureType::HighlyDetailed);
    }

    #[test]
    fn test_rule_detailed() {
        let m = TextureMetrics {
            entropy: 6.5,
            edge_density_low: 0.15,
            ..base_metrics()
        };
        assert_eq!(classify_texture(&m), TextureType::Detailed);
    }

    #[test]
    fn test_rule_smooth_requires_some_entropy() {
        let m = TextureMetrics {
            entropy: 2.0,
            glcm_homogeneity: 0.9,
            glcm_contrast: 1.0,
            ..base_metrics()
        };
        assert_eq!(classify_texture(&m), TextureType::Smooth);

        // Zero entropy falls through smooth to flat
        let m = TextureMetrics {
            entropy: 0.0,
            glcm_homogeneity: 0.9,
            glcm_contrast: 1.0,
            ..base_metrics()
        };
        assert_eq!(classify_texture(&m), TextureType::Flat);
    }

    #[test]
    fn test_rule_patterned() {
        let m = TextureMetrics {
            entropy: 3.0,
            glcm_energy: 0.6,
            lbp_uniformity: 0.4,
            ..base_metrics()
        };
        assert_eq!(classify_texture(&m), TextureType::Patterned);
    }

    #[test]
    fn test_rule_textured() {
        let m = TextureMetrics {
            entropy: 4.5,
            glcm_dissimilarity: 3.0,
            ..base_metrics()
        };
        assert_eq!(classify_texture(&m), TextureType::Textured);
    }

    #[test]
    fn test_rule_complex() {
        let m = TextureMetrics {
            entropy: 5.5,
            frequency_ratio: 2.0,
            ..base_metrics()
        };
        assert_eq!(classify_texture(&m), TextureType::Complex);
    }

    #[test]
    fn test_rule_grainy() {
        let m = TextureMetrics {
            entropy: 3.0,
            edge_density_low: 0.3,
            glcm_homogeneity: 0.3,
            ..base_metrics()
        };
        assert_eq!(classify_texture(&m), TextureType::Grainy);
    }

    #[test]
    fn test_rule_uniform() {
        let m = TextureMetrics {
            entropy: 0.5,
            ..base_metrics()
        };
        assert_eq!(classify_texture(&m), TextureType::Uniform);
    }

    #[test]
    fn test_rule_fallback_mixed() {
        let m = TextureMetrics {
            entropy: 3.0,
            ..base_metrics()
        };
        assert_eq!(classify_texture(&m), TextureType::Mixed);
    }

    #[test]
    fn test_scale_thresholds() {
        let mut m = base_metrics();
        m.low_freq_energy = 1.0;
        m.high_freq_energy = 2.0;
        assert_eq!(classify_scale(&m), TextureScale::Fine);

        m.low_freq_energy = 2.0;
        m.high_freq_energy = 1.0;
        assert_eq!(classify_scale(&m), TextureScale::Coarse);

        m.low_freq_energy = 1.0;
        m.high_freq_energy = 1.2;
        assert_eq!(classify_scale(&m), TextureScale::Medium);
    }

    #[test]
    fn test_fft_parseval_on_impulse() {
        // FFT of a unit impulse is flat with magnitude 1 everywhere
        let mut buffer = vec![(0.0, 0.0); 8];
        buffer[0] = (1.0, 0.0);
        fft_in_place(&mut buffer);
        for &(re, im) in &buffer {
            assert!((re - 1.0).abs() < 1e-9);
            assert!(im.abs() < 1e-9);
        }
    }

    #[test]
    fn test_fft_of_constant_concentrates_in_dc() {
        let mut buffer = vec![(1.0, 0.0); 8];
        fft_in_place(&mut buffer);
        assert!((buffer[0].0 - 8.0).abs() < 1e-9);
        for &(re, im) in &buffer[1..] {
            assert!(re.abs() < 1e-9);
            assert!(im.abs() < 1e-9);
        }
    }
}
