//! Edge and contour primitives
//!
//! Shared low-level operations over grayscale images: Gaussian smoothing,
//! Sobel gradients, Canny edge detection, external contour extraction and a
//! standard Hough line accumulator. The composition, texture and object
//! analyzers all build on these.

use image::{GrayImage, Luma};

/// Gradient field computed by the Sobel operator
#[derive(Debug)]
pub struct GradientField {
    /// Gradient magnitudes, row-major
    pub magnitude: Vec<f32>,
    /// Gradient directions in radians, row-major
    pub direction: Vec<f32>,
    /// Field width
    pub width: u32,
    /// Field height
    pub height: u32,
}

impl GradientField {
    /// Mean gradient magnitude across the field
    pub fn mean_magnitude(&self) -> f64 {
        if self.magnitude.is_empty() {
            return 0.0;
        }
        self.magnitude.iter().map(|&m| m as f64).sum::<f64>() / self.magnitude.len() as f64
    }
}

/// An external contour: an 8-connected component of edge pixels
#[derive(Debug, Clone)]
pub struct Contour {
    /// Number of edge pixels in the component
    pub area: usize,
    /// Bounding box (min_x, min_y, max_x, max_y), inclusive
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl Contour {
    /// Bounding-box width in pixels
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    /// Bounding-box height in pixels
    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    /// Bounding-box center in pixel coordinates
    pub fn center(&self) -> (f64, f64) {
        (
            self.min_x as f64 + self.width() as f64 / 2.0,
            self.min_y as f64 + self.height() as f64 / 2.0,
        )
    }
}

/// A line detected by the Hough accumulator
#[derive(Debug, Clone, Copy)]
pub struct HoughLine {
    /// Normal angle theta in degrees (0-179); 0 = vertical line, 90 = horizontal
    pub theta: f32,
    /// Signed distance from the origin in pixels
    pub rho: f32,
    /// Accumulator votes backing this line
    pub votes: u32,
}

impl HoughLine {
    /// Whether the line runs within `tolerance` degrees of vertical
    pub fn is_vertical(&self, tolerance: f32) -> bool {
        self.theta <= tolerance || self.theta >= 180.0 - tolerance
    }

    /// Whether the line runs within `tolerance` degrees of horizontal
    pub fn is_horizontal(&self, tolerance: f32) -> bool {
        (self.theta - 90.0).abs() <= tolerance
    }
}

/// 5x5 Gaussian blur (binomial kernel, sigma ~= 1.1)
pub fn gaussian_blur_5x5(gray: &GrayImage) -> GrayImage {
    const KERNEL: [u32; 5] = [1, 4, 6, 4, 1];
    const KERNEL_SUM: u32 = 16;

    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
        return gray.clone();
    }

    // Separable pass: horizontal then vertical
    let mut tmp = vec![0u32; (width * height) as usize];
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0u32;
            for (k, &weight) in KERNEL.iter().enumerate() {
                let sx = (x as i64 + k as i64 - 2).clamp(0, width as i64 - 1) as u32;
                acc += weight * gray.get_pixel(sx, y).0[0] as u32;
            }
            tmp[(y * width + x) as usize] = acc / KERNEL_SUM;
        }
    }

    let mut out = GrayImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0u32;
            for (k, &weight) in KERNEL.iter().enumerate() {
                let sy = (y as i64 + k as i64 - 2).clamp(0, height as i64 - 1) as u32;
                acc += weight * tmp[(sy * width + x) as usize];
            }
            out.put_pixel(x, y, Luma([(acc / KERNEL_SUM) as u8]));
        }
    }
    out
}

/// Sobel gradient magnitudes and directions
pub fn sobel_gradients(gray: &GrayImage) -> GradientField {
    let (width, height) = gray.dimensions();
    let mut magnitude = vec![0.0f32; (width * height) as usize];
    let mut direction = vec![0.0f32; (width * height) as usize];

    if width < 3 || height < 3 {
        return GradientField {
            magnitude,
            direction,
            width,
            height,
        };
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let gx = gray.get_pixel(x + 1, y - 1).0[0] as i32
                + 2 * gray.get_pixel(x + 1, y).0[0] as i32
                + gray.get_pixel(x + 1, y + 1).0[0] as i32
                - gray.get_pixel(x - 1, y - 1).0[0] as i32
                - 2 * gray.get_pixel(x - 1, y).0[0] as i32
                - gray.get_pixel(x - 1, y + 1).0[0] as i32;

            let gy = gray.get_pixel(x - 1, y + 1).0[0] as i32
                + 2 * gray.get_pixel(x, y + 1).0[0] as i32
                + gray.get_pixel(x + 1, y + 1).0[0] as i32
                - gray.get_pixel(x - 1, y - 1).0[0] as i32
                - 2 * gray.get_pixel(x, y - 1).0[0] as i32
                - gray.get_pixel(x + 1, y - 1).0[0] as i32;

            let idx = (y * width + x) as usize;
            magnitude[idx] = ((gx * gx + gy * gy) as f32).sqrt();
            direction[idx] = (gy as f32).atan2(gx as f32);
        }
    }

    GradientField {
        magnitude,
        direction,
        width,
        height,
    }
}

/// Canny edge detection
///
/// Gaussian smoothing, Sobel gradients, non-maximum suppression and double
/// thresholding with hysteresis. Returns a binary image (0 or 255).
pub fn canny(gray: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage {
    let (width, height) = gray.dimensions();
    let mut edges = GrayImage::new(width, height);
    if width < 3 || height < 3 {
        return edges;
    }

    let blurred = gaussian_blur_5x5(gray);
    let grad = sobel_gradients(&blurred);

    // Non-maximum suppression along the quantized gradient direction
    let mut thin = vec![0.0f32; (width * height) as usize];
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let idx = (y * width + x) as usize;
            let mag = grad.magnitude[idx];
            if mag == 0.0 {
                continue;
            }

            let angle = grad.direction[idx].to_degrees();
            let angle = if angle < 0.0 { angle + 180.0 } else { angle };

            let (dx, dy): (i64, i64) = if !(22.5..157.5).contains(&angle) {
                (1, 0)
            } else if angle < 67.5 {
                (1, 1)
            } else if angle < 112.5 {
                (0, 1)
            } else {
                (1, -1)
            };

            let n1 = grad.magnitude[((y as i64 + dy) as u32 * width + (x as i64 + dx) as u32) as usize];
            let n2 = grad.magnitude[((y as i64 - dy) as u32 * width + (x as i64 - dx) as u32) as usize];
            if mag >= n1 && mag >= n2 {
                thin[idx] = mag;
            }
        }
    }

    // Double threshold with hysteresis: strong pixels seed a flood fill
    // through weak neighbors
    const STRONG: u8 = 255;
    const WEAK: u8 = 128;

    let mut marks = vec![0u8; (width * height) as usize];
    let mut stack = Vec::new();
    for (idx, &mag) in thin.iter().enumerate() {
        if mag >= high_threshold {
            marks[idx] = STRONG;
            stack.push(idx);
        } else if mag >= low_threshold {
            marks[idx] = WEAK;
        }
    }

    while let Some(idx) = stack.pop() {
        let x = (idx as u32) % width;
        let y = (idx as u32) / width;
        for dy in -1i64..=1 {
            for dx in -1i64..=1 {
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                    continue;
                }
                let nidx = (ny as u32 * width + nx as u32) as usize;
                if marks[nidx] == WEAK {
                    marks[nidx] = STRONG;
                    stack.push(nidx);
                }
            }
        }
    }

    for y in 0..height {
        for x in 0..width {
            let idx = (y * width + x) as usize;
            if marks[idx] == STRONG {
                edges.put_pixel(x, y, Luma([255]));
            }
        }
    }
    edges
}

/// Extract external contours as 8-connected components of edge pixels
///
/// Components are returned unsorted; callers pick by area as needed.
pub fn find_contours(edges: &GrayImage) -> Vec<Contour> {
    let (width, height) = edges.dimensions();
    let mut visited = vec![false; (width * height) as usize];
    let mut contours = Vec::new();

    for start_y in 0..height {
        for start_x in 0..width {
            let start_idx = (start_y * width + start_x) as usize;
            if visited[start_idx] || edges.get_pixel(start_x, start_y).0[0] == 0 {
                continue;
            }

            let mut area = 0usize;
            let (mut min_x, mut min_y) = (start_x, start_y);
            let (mut max_x, mut max_y) = (start_x, start_y);

            let mut stack = vec![(start_x, start_y)];
            visited[start_idx] = true;

            while let Some((x, y)) = stack.pop() {
                area += 1;
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);

                for dy in -1i64..=1 {
                    for dx in -1i64..=1 {
                        let nx = x as i64 + dx;
                        let ny = y as i64 + dy;
                        if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                            continue;
                        }
                        let (nx, ny) = (nx as u32, ny as u32);
                        let nidx = (ny * width + nx) as usize;
                        if !visited[nidx] && edges.get_pixel(nx, ny).0[0] != 0 {
                            visited[nidx] = true;
                            stack.push((nx, ny));
                        }
                    }
                }
            }

            contours.push(Contour {
                area,
                min_x,
                min_y,
                max_x,
                max_y,
            });
        }
    }

    contours
}

/// Hough line accumulator over a binary edge image
///
/// Theta resolution is 1 degree over [0, 180), rho resolution 1 pixel. Lines
/// whose accumulator cell reaches `vote_threshold` and is a local maximum in
/// its 3x3 neighborhood are returned, strongest first.
pub fn hough_lines(edges: &GrayImage, vote_threshold: u32) -> Vec<HoughLine> {
    let (width, height) = edges.dimensions();
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let max_rho = ((width * width + height * height) as f64).sqrt().ceil() as i64;
    let rho_bins = (2 * max_rho + 1) as usize;
    const THETA_BINS: usize = 180;

    // Precompute the sinusoid tables once
    let mut cos_table = [0.0f64; THETA_BINS];
    let mut sin_table = [0.0f64; THETA_BINS];
    for (t, (c, s)) in cos_table.iter_mut().zip(sin_table.iter_mut()).enumerate() {
        let rad = (t as f64).to_radians();
        *c = rad.cos();
        *s = rad.sin();
    }

    let mut accumulator = vec![0u32; THETA_BINS * rho_bins];
    for y in 0..height {
        for x in 0..width {
            if edges.get_pixel(x, y).0[0] == 0 {
                continue;
            }
            for t in 0..THETA_BINS {
                let rho = (x as f64 * cos_table[t] + y as f64 * sin_table[t]).round() as i64;
                let rho_idx = (rho + max_rho) as usize;
                accumulator[t * rho_bins + rho_idx] += 1;
            }
        }
    }

    let mut lines = Vec::new();
    for t in 0..THETA_BINS {
        for r in 0..rho_bins {
            let votes = accumulator[t * rho_bins + r];
            if votes < vote_threshold {
                continue;
            }

            // 3x3 local maximum suppression in accumulator space
            let mut is_peak = true;
            'outer: for dt in -1i64..=1 {
                for dr in -1i64..=1 {
                    if dt == 0 && dr == 0 {
                        continue;
                    }
                    let nt = t as i64 + dt;
                    let nr = r as i64 + dr;
                    if nt < 0 || nr < 0 || nt >= THETA_BINS as i64 || nr >= rho_bins as i64 {
                        continue;
                    }
                    if accumulator[nt as usize * rho_bins + nr as usize] > votes {
                        is_peak = false;
                        break 'outer;
                    }
                }
            }

            if is_peak {
                lines.push(HoughLine {
                    theta: t as f32,
                    rho: (r as i64 - max_rho) as f32,
                    votes,
                });
            }
        }
    }

    lines.sort_by(|a, b| b.votes.cmp(&a.votes));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(width: u32, height: u32) -> GrayImage {
        GrayImage::new(width, height)
    }

    #[test]
    fn test_blur_preserves_uniform_image() {
        let img = GrayImage::from_pixel(16, 16, Luma([120]));
        let blurred = gaussian_blur_5x5(&img);
        for p in blurred.pixels() {
            assert_eq!(p.0[0], 120);
        }
    }

    #[test]
    fn test_sobel_zero_on_flat_image() {
        let img = GrayImage::from_pixel(16, 16, Luma([200]));
        let grad = sobel_gradients(&img);
        assert!(grad.mean_magnitude() < 1e-6);
    }

    #[test]
    fn test_sobel_detects_vertical_step() {
        let mut img = blank(16, 16);
        for y in 0..16 {
            for x in 8..16 {
                img.put_pixel(x, y, Luma([255]));
            }
        }
        let grad = sobel_gradients(&img);
        assert!(grad.mean_magnitude() > 1.0);
    }

    #[test]
    fn test_canny_flat_image_has_no_edges() {
        let img = GrayImage::from_pixel(32, 32, Luma([77]));
        let edges = canny(&img, 50.0, 150.0);
        assert!(edges.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn test_canny_finds_square_outline() {
        let mut img = blank(64, 64);
        for y in 16..48 {
            for x in 16..48 {
                img.put_pixel(x, y, Luma([255]));
            }
        }
        let edges = canny(&img, 50.0, 150.0);
        let edge_count = edges.pixels().filter(|p| p.0[0] != 0).count();
        assert!(edge_count > 50, "expected outline edges, got {}", edge_count);
    }

    #[test]
    fn test_find_contours_empty() {
        let edges = blank(10, 10);
        assert!(find_contours(&edges).is_empty());
    }

    #[test]
    fn test_find_contours_two_components() {
        let mut edges = blank(20, 20);
        edges.put_pixel(2, 2, Luma([255]));
        edges.put_pixel(3, 3, Luma([255]));
        edges.put_pixel(15, 15, Luma([255]));

        let contours = find_contours(&edges);
        assert_eq!(contours.len(), 2);

        let largest = contours.iter().max_by_key(|c| c.area).unwrap();
        assert_eq!(largest.area, 2);
        let (cx, cy) = largest.center();
        assert!(cx > 2.0 && cx < 4.5);
        assert!(cy > 2.0 && cy < 4.5);
    }

    #[test]
    fn test_hough_detects_vertical_line() {
        let mut edges = blank(40, 40);
        for y in 0..40 {
            edges.put_pixel(20, y, Luma([255]));
        }

        let lines = hough_lines(&edges, 30);
        assert!(!lines.is_empty());
        assert!(lines[0].is_vertical(10.0));
        assert!(!lines[0].is_horizontal(10.0));
    }

    #[test]
    fn test_hough_detects_horizontal_line() {
        let mut edges = blank(40, 40);
        for x in 0..40 {
            edges.put_pixel(x, 20, Luma([255]));
        }

        let lines = hough_lines(&edges, 30);
        assert!(!lines.is_empty());
        assert!(lines[0].is_horizontal(10.0));
    }

    #[test]
    fn test_hough_empty_image() {
        let edges = blank(40, 40);
        assert!(hough_lines(&edges, 20).is_empty());
    }
}
