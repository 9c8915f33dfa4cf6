//! Gridded scalar signal field.
//!
//! Random fields are built the way RF heatmaps usually are faked: uniform
//! noise, a separable Gaussian blur to give it spatial correlation, then a
//! linear rescale into a dBm-like range.

use rand::Rng;

use crate::core::{DomainBounds, WorldPoint};

/// Scalar field stored on a regular grid, sampled nearest-cell.
#[derive(Clone, Debug)]
pub struct SignalField {
    values: Vec<f32>,
    width: usize,
    height: usize,
    resolution: f32,
    origin: WorldPoint,
}

impl SignalField {
    /// Build a field by evaluating `f` at every cell centre.
    pub fn from_fn<F>(bounds: DomainBounds, resolution: f32, f: F) -> Self
    where
        F: Fn(WorldPoint) -> f32,
    {
        let (width, height) = Self::dimensions(&bounds, resolution);
        let mut values = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let center = WorldPoint::new(
                    bounds.min.x + (x as f32 + 0.5) * resolution,
                    bounds.min.y + (y as f32 + 0.5) * resolution,
                );
                values.push(f(center));
            }
        }
        Self {
            values,
            width,
            height,
            resolution,
            origin: bounds.min,
        }
    }

    /// Generate a smoothed random field with values in `[value_min, value_max]`.
    ///
    /// `sigma` is the blur standard deviation in domain units.
    pub fn generate<R: Rng>(
        bounds: DomainBounds,
        resolution: f32,
        sigma: f32,
        value_min: f32,
        value_max: f32,
        rng: &mut R,
    ) -> Self {
        let (width, height) = Self::dimensions(&bounds, resolution);
        let noise: Vec<f32> = (0..width * height).map(|_| rng.random::<f32>()).collect();

        let sigma_cells = sigma / resolution;
        let smoothed = if sigma_cells > 0.0 {
            let kernel = gaussian_kernel(sigma_cells);
            let rows = convolve_rows(&noise, width, height, &kernel);
            convolve_cols(&rows, width, height, &kernel)
        } else {
            noise
        };

        let values = rescale(&smoothed, value_min, value_max);
        Self {
            values,
            width,
            height,
            resolution,
            origin: bounds.min,
        }
    }

    fn dimensions(bounds: &DomainBounds, resolution: f32) -> (usize, usize) {
        let width = (bounds.width() / resolution).ceil().max(1.0) as usize;
        let height = (bounds.height() / resolution).ceil().max(1.0) as usize;
        (width, height)
    }

    /// Value of the cell containing `point`; points outside are clamped.
    pub fn sample(&self, point: WorldPoint) -> f32 {
        let fx = ((point.x - self.origin.x) / self.resolution).floor();
        let fy = ((point.y - self.origin.y) / self.resolution).floor();
        let x = (fx.max(0.0) as usize).min(self.width - 1);
        let y = (fy.max(0.0) as usize).min(self.height - 1);
        self.values[y * self.width + x]
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resolution(&self) -> f32 {
        self.resolution
    }

    /// (min, max) over all cells
    pub fn range(&self) -> (f32, f32) {
        self.values
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }
}

/// Normalised 1D Gaussian kernel truncated at 4 sigma.
fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (4.0 * sigma).ceil() as i32;
    let denom = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (-radius..=radius)
        .map(|i| (-((i * i) as f32) / denom).exp())
        .collect();
    let sum: f32 = kernel.iter().sum();
    for k in &mut kernel {
        *k /= sum;
    }
    kernel
}

/// Mirror an out-of-range index back into `0..n` (half-sample symmetric).
fn reflect(mut i: i32, n: usize) -> usize {
    let n = n as i32;
    loop {
        if i < 0 {
            i = -i - 1;
        } else if i >= n {
            i = 2 * n - i - 1;
        } else {
            return i as usize;
        }
    }
}

fn convolve_rows(src: &[f32], width: usize, height: usize, kernel: &[f32]) -> Vec<f32> {
    let radius = (kernel.len() / 2) as i32;
    let mut out = vec![0.0; src.len()];
    for y in 0..height {
        let row = &src[y * width..(y + 1) * width];
        for x in 0..width {
            out[y * width + x] = kernel
                .iter()
                .enumerate()
                .map(|(k, w)| w * row[reflect(x as i32 + k as i32 - radius, width)])
                .sum();
        }
    }
    out
}

fn convolve_cols(src: &[f32], width: usize, height: usize, kernel: &[f32]) -> Vec<f32> {
    let radius = (kernel.len() / 2) as i32;
    let mut out = vec![0.0; src.len()];
    for y in 0..height {
        for x in 0..width {
            out[y * width + x] = kernel
                .iter()
                .enumerate()
                .map(|(k, w)| w * src[reflect(y as i32 + k as i32 - radius, height) * width + x])
                .sum();
        }
    }
    out
}

fn rescale(values: &[f32], lo: f32, hi: f32) -> Vec<f32> {
    let (min, max) = values
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(a, b), &v| {
            (a.min(v), b.max(v))
        });
    let span = max - min;
    if span <= f32::EPSILON {
        return vec![(lo + hi) / 2.0; values.len()];
    }
    values
        .iter()
        .map(|v| (v - min) / span * (hi - lo) + lo)
        .collect()
}
