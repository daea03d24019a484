// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Non-local-means colour denoising.
//
// The image is split into luma and chroma planes (full-range YCbCr). Every
// pixel becomes a weighted mean of the pixels in its search window, weighted
// by how similar their surrounding template patches are. Patch distances are
// computed per search offset with a summed-area table, so the cost is
// O(width * height * search_window²) independent of the template size.

use belegwerk_core::config::DenoiseConfig;
use image::{Rgb, RgbImage};
use tracing::{debug, info, instrument};

/// Planar full-range YCbCr image.
struct Planes {
    width: usize,
    height: usize,
    y: Vec<f32>,
    cb: Vec<f32>,
    cr: Vec<f32>,
}

impl Planes {
    fn from_rgb(image: &RgbImage) -> Self {
        let (width, height) = (image.width() as usize, image.height() as usize);
        let mut planes = Self {
            width,
            height,
            y: Vec::with_capacity(width * height),
            cb: Vec::with_capacity(width * height),
            cr: Vec::with_capacity(width * height),
        };
        for p in image.pixels() {
            let [r, g, b] = p.0.map(f32::from);
            planes.y.push(0.299 * r + 0.587 * g + 0.114 * b);
            planes.cb.push(128.0 - 0.168_736 * r - 0.331_264 * g + 0.5 * b);
            planes.cr.push(128.0 + 0.5 * r - 0.418_688 * g - 0.081_312 * b);
        }
        planes
    }

    fn to_rgb(&self) -> RgbImage {
        let to_u8 = |v: f32| v.round().clamp(0.0, 255.0) as u8;
        RgbImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let i = y as usize * self.width + x as usize;
            let (l, cb, cr) = (self.y[i], self.cb[i] - 128.0, self.cr[i] - 128.0);
            Rgb([
                to_u8(l + 1.402 * cr),
                to_u8(l - 0.344_136 * cb - 0.714_136 * cr),
                to_u8(l + 1.772 * cb),
            ])
        })
    }
}

/// Denoise a colour image with non-local means.
///
/// `luma_strength` and `color_strength` control how quickly patch weights
/// fall off with distance for the luma and chroma planes respectively.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn denoise_colored(image: &RgbImage, params: &DenoiseConfig) -> RgbImage {
    let src = Planes::from_rgb(image);
    let (w, h) = (src.width, src.height);
    if w == 0 || h == 0 {
        return image.clone();
    }

    let template_radius = (params.template_window / 2) as isize;
    let search_radius = (params.search_window / 2) as isize;
    let luma_h2 = (params.luma_strength as f64).powi(2);
    let color_h2 = (params.color_strength as f64).powi(2);

    let n = w * h;
    let mut luma_weight = vec![0.0f64; n];
    let mut color_weight = vec![0.0f64; n];
    let mut y_acc = vec![0.0f64; n];
    let mut cb_acc = vec![0.0f64; n];
    let mut cr_acc = vec![0.0f64; n];

    let mut luma_diff = vec![0.0f64; n];
    let mut color_diff = vec![0.0f64; n];
    let mut luma_table = SummedArea::new(w, h);
    let mut color_table = SummedArea::new(w, h);
    let mut neighbour = vec![0usize; n];

    for dy in -search_radius..=search_radius {
        for dx in -search_radius..=search_radius {
            // Squared differences between each pixel and its offset partner.
            for py in 0..h {
                let qy = clamp_index(py as isize + dy, h);
                for px in 0..w {
                    let qx = clamp_index(px as isize + dx, w);
                    let i = py * w + px;
                    let j = qy * w + qx;
                    neighbour[i] = j;
                    let dl = (src.y[i] - src.y[j]) as f64;
                    let dcb = (src.cb[i] - src.cb[j]) as f64;
                    let dcr = (src.cr[i] - src.cr[j]) as f64;
                    luma_diff[i] = dl * dl;
                    color_diff[i] = (dcb * dcb + dcr * dcr) / 2.0;
                }
            }
            luma_table.rebuild(&luma_diff);
            color_table.rebuild(&color_diff);

            for py in 0..h {
                for px in 0..w {
                    let i = py * w + px;
                    let j = neighbour[i];
                    let d_luma = luma_table.window_mean(px, py, template_radius);
                    let d_color = color_table.window_mean(px, py, template_radius);

                    let wl = (-d_luma / luma_h2).exp();
                    let wc = (-d_color / color_h2).exp();
                    luma_weight[i] += wl;
                    color_weight[i] += wc;
                    y_acc[i] += wl * src.y[j] as f64;
                    cb_acc[i] += wc * src.cb[j] as f64;
                    cr_acc[i] += wc * src.cr[j] as f64;
                }
            }
        }
    }

    // The zero offset always contributes weight 1, so no divisor is zero.
    let out = Planes {
        width: w,
        height: h,
        y: y_acc.iter().zip(&luma_weight).map(|(v, wt)| (v / wt) as f32).collect(),
        cb: cb_acc.iter().zip(&color_weight).map(|(v, wt)| (v / wt) as f32).collect(),
        cr: cr_acc.iter().zip(&color_weight).map(|(v, wt)| (v / wt) as f32).collect(),
    };
    debug!(
        template = params.template_window,
        search = params.search_window,
        "Non-local means accumulated"
    );
    info!("Denoising complete");
    out.to_rgb()
}

fn clamp_index(v: isize, len: usize) -> usize {
    v.clamp(0, len as isize - 1) as usize
}

/// Summed-area table with a zero row and column in front.
struct SummedArea {
    width: usize,
    height: usize,
    table: Vec<f64>,
}

impl SummedArea {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            table: vec![0.0; (width + 1) * (height + 1)],
        }
    }

    fn rebuild(&mut self, values: &[f64]) {
        let stride = self.width + 1;
        for y in 0..self.height {
            let mut row_sum = 0.0;
            for x in 0..self.width {
                row_sum += values[y * self.width + x];
                self.table[(y + 1) * stride + x + 1] = row_sum + self.table[y * stride + x + 1];
            }
        }
    }

    /// Mean over the square window of `radius` around (cx, cy), clipped to
    /// the image.
    fn window_mean(&self, cx: usize, cy: usize, radius: isize) -> f64 {
        let stride = self.width + 1;
        let x0 = (cx as isize - radius).max(0) as usize;
        let y0 = (cy as isize - radius).max(0) as usize;
        let x1 = ((cx as isize + radius + 1) as usize).min(self.width);
        let y1 = ((cy as isize + radius + 1) as usize).min(self.height);
        let area = ((x1 - x0) * (y1 - y0)) as f64;
        let sum = self.table[y1 * stride + x1] - self.table[y0 * stride + x1]
            - self.table[y1 * stride + x0]
            + self.table[y0 * stride + x0];
        sum / area
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_params() -> DenoiseConfig {
        DenoiseConfig {
            search_window: 7,
            template_window: 3,
            ..DenoiseConfig::default()
        }
    }

    /// Deterministic noise in [-amplitude, amplitude].
    fn noisy_gray(width: u32, height: u32, base: u8, amplitude: i32) -> RgbImage {
        let mut state = 0x2545_f491u32;
        RgbImage::from_fn(width, height, |_, _| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let noise = (state >> 24) as i32 % (2 * amplitude + 1) - amplitude;
            let v = (base as i32 + noise).clamp(0, 255) as u8;
            Rgb([v, v, v])
        })
    }

    fn luma_std(image: &RgbImage) -> f64 {
        let values: Vec<f64> = image.pixels().map(|p| p.0[1] as f64).collect();
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64).sqrt()
    }

    #[test]
    fn flat_image_is_unchanged() {
        let image = RgbImage::from_pixel(16, 12, Rgb([120, 130, 140]));
        let out = denoise_colored(&image, &small_params());
        for (a, b) in image.pixels().zip(out.pixels()) {
            for c in 0..3 {
                assert!((a.0[c] as i32 - b.0[c] as i32).abs() <= 1);
            }
        }
    }

    #[test]
    fn reduces_noise_on_flat_region() {
        let image = noisy_gray(24, 24, 128, 8);
        let out = denoise_colored(&image, &small_params());
        let before = luma_std(&image);
        let after = luma_std(&out);
        assert!(after < before * 0.6, "std before {before}, after {after}");
    }

    #[test]
    fn preserves_strong_edges() {
        let image = RgbImage::from_fn(30, 20, |x, _| {
            if x < 15 { Rgb([50, 50, 50]) } else { Rgb([200, 200, 200]) }
        });
        let out = denoise_colored(&image, &small_params());
        for y in 0..20 {
            assert!((out.get_pixel(3, y).0[0] as i32 - 50).abs() <= 1);
            assert!((out.get_pixel(14, y).0[0] as i32 - 50).abs() <= 1);
            assert!((out.get_pixel(15, y).0[0] as i32 - 200).abs() <= 1);
            assert!((out.get_pixel(27, y).0[0] as i32 - 200).abs() <= 1);
        }
    }

    #[test]
    fn window_mean_clips_at_borders() {
        let mut table = SummedArea::new(3, 3);
        table.rebuild(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        assert!((table.window_mean(1, 1, 1) - 5.0).abs() < 1e-12);
        // Top-left corner window covers {1, 2, 4, 5}.
        assert!((table.window_mean(0, 0, 1) - 3.0).abs() < 1e-12);
    }
}
