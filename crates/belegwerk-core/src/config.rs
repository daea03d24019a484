// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan pipeline configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BelegwerkError, Result};

/// Fixed parameters of the detection and enhancement pipeline.
///
/// The defaults reproduce the tuned receipt-scanning behaviour. A config is
/// built once at startup and handed to the pipeline constructor; nothing in
/// the pipeline reads global state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Side length of the Gaussian blur kernel (odd).
    pub blur_kernel_size: u32,
    /// Lower hysteresis threshold of the edge detector.
    pub canny_low: f32,
    /// Upper hysteresis threshold of the edge detector.
    pub canny_high: f32,
    /// Side length of the square dilation element (odd).
    pub dilate_kernel_size: u32,
    /// Number of dilation passes.
    pub dilate_iterations: u32,
    /// Boundaries enclosing less than this many square pixels are ignored.
    pub min_contour_area: f64,
    /// Polygon simplification tolerance as a fraction of the perimeter.
    pub approx_epsilon_ratio: f64,
    /// Line width of the contour drawn on the detection preview.
    pub preview_line_width: u32,
    /// RGB colour of the contour drawn on the detection preview.
    pub preview_color: [u8; 3],
    /// JPEG quality of the encoded detection preview.
    pub preview_quality: u8,
    /// JPEG quality of the encoded processed receipt.
    pub output_quality: u8,
    /// Largest rectified image, in pixels, a contour may ask for.
    pub max_output_pixels: u64,
    /// Non-local-means denoising parameters.
    pub denoise: DenoiseConfig,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            blur_kernel_size: 5,
            canny_low: 50.0,
            canny_high: 150.0,
            dilate_kernel_size: 5,
            dilate_iterations: 1,
            min_contour_area: 1000.0,
            approx_epsilon_ratio: 0.02,
            preview_line_width: 3,
            preview_color: [0, 255, 0],
            preview_quality: 95,
            output_quality: 95,
            max_output_pixels: 100_000_000,
            denoise: DenoiseConfig::default(),
        }
    }
}

/// Strength and window sizes for non-local-means denoising.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DenoiseConfig {
    /// Filter strength for the luminance channel.
    pub luma_strength: f32,
    /// Filter strength for the two chroma channels.
    pub color_strength: f32,
    /// Side length of the compared patches (odd).
    pub template_window: u32,
    /// Side length of the neighbourhood searched for similar patches (odd).
    pub search_window: u32,
}

impl Default for DenoiseConfig {
    fn default() -> Self {
        Self {
            luma_strength: 10.0,
            color_strength: 10.0,
            template_window: 7,
            search_window: 21,
        }
    }
}

impl ScanConfig {
    /// Read a JSON config file. Missing fields take their default values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        check_odd_kernel("blur_kernel_size", self.blur_kernel_size)?;
        check_odd_kernel("dilate_kernel_size", self.dilate_kernel_size)?;
        check_odd_kernel("denoise.template_window", self.denoise.template_window)?;
        check_odd_kernel("denoise.search_window", self.denoise.search_window)?;

        if !(self.canny_low >= 0.0 && self.canny_low <= self.canny_high) {
            return Err(BelegwerkError::Config(format!(
                "canny thresholds must satisfy 0 <= low <= high (got {} / {})",
                self.canny_low, self.canny_high
            )));
        }
        if !(self.min_contour_area >= 0.0) {
            return Err(BelegwerkError::Config(format!(
                "min_contour_area must be non-negative (got {})",
                self.min_contour_area
            )));
        }
        if !(self.approx_epsilon_ratio > 0.0 && self.approx_epsilon_ratio < 1.0) {
            return Err(BelegwerkError::Config(format!(
                "approx_epsilon_ratio must lie in (0, 1) (got {})",
                self.approx_epsilon_ratio
            )));
        }
        if self.preview_line_width == 0 {
            return Err(BelegwerkError::Config(
                "preview_line_width must be at least 1".into(),
            ));
        }
        for (name, quality) in [
            ("preview_quality", self.preview_quality),
            ("output_quality", self.output_quality),
        ] {
            if !(1..=100).contains(&quality) {
                return Err(BelegwerkError::Config(format!(
                    "{name} must lie in 1..=100 (got {quality})"
                )));
            }
        }
        if self.max_output_pixels == 0 {
            return Err(BelegwerkError::Config(
                "max_output_pixels must be at least 1".into(),
            ));
        }
        if !(self.denoise.luma_strength > 0.0 && self.denoise.color_strength > 0.0) {
            return Err(BelegwerkError::Config(
                "denoise strengths must be positive".into(),
            ));
        }
        Ok(())
    }
}

fn check_odd_kernel(name: &str, size: u32) -> Result<()> {
    if size == 0 || size % 2 == 0 {
        return Err(BelegwerkError::Config(format!(
            "{name} must be a positive odd number (got {size})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        ScanConfig::default().validate().unwrap();
    }

    #[test]
    fn even_kernel_is_rejected() {
        let config = ScanConfig {
            blur_kernel_size: 4,
            ..ScanConfig::default()
        };
        assert!(matches!(config.validate(), Err(BelegwerkError::Config(_))));
    }

    #[test]
    fn inverted_canny_thresholds_are_rejected() {
        let config = ScanConfig {
            canny_low: 200.0,
            canny_high: 100.0,
            ..ScanConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_output_budget_is_rejected() {
        let config = ScanConfig {
            max_output_pixels: 0,
            ..ScanConfig::default()
        };
        assert!(matches!(config.validate(), Err(BelegwerkError::Config(_))));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: ScanConfig =
            serde_json::from_str(r#"{ "min_contour_area": 2500.0 }"#).unwrap();
        assert_eq!(config.min_contour_area, 2500.0);
        assert_eq!(config.blur_kernel_size, 5);
        assert_eq!(config.denoise.search_window, 21);
        assert_eq!(config.max_output_pixels, 100_000_000);
    }

    #[test]
    fn save_then_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.json");
        let config = ScanConfig {
            output_quality: 80,
            ..ScanConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(ScanConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn load_rejects_invalid_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.json");
        std::fs::write(&path, r#"{ "output_quality": 0 }"#).unwrap();
        assert!(matches!(
            ScanConfig::load(&path),
            Err(BelegwerkError::Config(_))
        ));
    }
}
