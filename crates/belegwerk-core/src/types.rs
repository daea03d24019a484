// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Belegwerk receipt scanner.

use serde::{Deserialize, Serialize};

use crate::error::BelegwerkError;

/// A point in source-image pixel coordinates.
///
/// Serialised as a two-element array `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Point2D {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point2D> for [f64; 2] {
    fn from(p: Point2D) -> Self {
        [p.x, p.y]
    }
}

/// Receipt boundary: exactly four corners in the order top-left, top-right,
/// bottom-right, bottom-left.
///
/// Serialised as an array of four `[x, y]` pairs. Deserialising any other
/// number of points fails with [`BelegwerkError::InvalidContour`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point2D>", into = "Vec<Point2D>")]
pub struct Contour {
    corners: [Point2D; 4],
}

impl Contour {
    /// Wrap four corners that are already in canonical order.
    pub const fn from_ordered(corners: [Point2D; 4]) -> Self {
        Self { corners }
    }

    pub fn corners(&self) -> &[Point2D; 4] {
        &self.corners
    }

    pub fn top_left(&self) -> Point2D {
        self.corners[0]
    }

    pub fn top_right(&self) -> Point2D {
        self.corners[1]
    }

    pub fn bottom_right(&self) -> Point2D {
        self.corners[2]
    }

    pub fn bottom_left(&self) -> Point2D {
        self.corners[3]
    }

    /// Corners as `[x, y]` pairs.
    pub fn to_pairs(&self) -> [[f64; 2]; 4] {
        self.corners.map(Into::into)
    }

    /// Build a contour from caller-supplied `[x, y]` pairs in canonical
    /// order. Any count other than four is an
    /// [`InvalidContour`](BelegwerkError::InvalidContour) error.
    pub fn from_pairs(pairs: &[[f64; 2]]) -> crate::error::Result<Self> {
        Self::try_from(pairs.iter().copied().map(Point2D::from).collect::<Vec<_>>())
    }
}

impl TryFrom<Vec<Point2D>> for Contour {
    type Error = BelegwerkError;

    fn try_from(points: Vec<Point2D>) -> Result<Self, Self::Error> {
        let count = points.len();
        let corners: [Point2D; 4] = points
            .try_into()
            .map_err(|_| BelegwerkError::InvalidContour(count))?;
        Ok(Self { corners })
    }
}

impl From<Contour> for Vec<Point2D> {
    fn from(contour: Contour) -> Self {
        contour.corners.to_vec()
    }
}

/// Valid brightness offsets.
pub const BRIGHTNESS_RANGE: std::ops::RangeInclusive<i32> = -100..=100;
/// Valid contrast gains.
pub const CONTRAST_RANGE: std::ops::RangeInclusive<f32> = 0.5..=2.0;

/// Per-request enhancement settings.
///
/// Values are range-checked on construction and on deserialisation; an
/// out-of-range value is rejected, never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EnhancementRecord", into = "EnhancementRecord")]
pub struct EnhancementParams {
    brightness: i32,
    contrast: f32,
    denoise: bool,
}

impl EnhancementParams {
    pub fn new(brightness: i32, contrast: f32, denoise: bool) -> Result<Self, BelegwerkError> {
        if !BRIGHTNESS_RANGE.contains(&brightness) {
            return Err(BelegwerkError::ParameterOutOfRange {
                parameter: "brightness",
                value: brightness as f64,
                min: *BRIGHTNESS_RANGE.start() as f64,
                max: *BRIGHTNESS_RANGE.end() as f64,
            });
        }
        // NaN fails `contains` as well.
        if !CONTRAST_RANGE.contains(&contrast) {
            return Err(BelegwerkError::ParameterOutOfRange {
                parameter: "contrast",
                value: contrast as f64,
                min: *CONTRAST_RANGE.start() as f64,
                max: *CONTRAST_RANGE.end() as f64,
            });
        }
        Ok(Self {
            brightness,
            contrast,
            denoise,
        })
    }

    pub fn brightness(&self) -> i32 {
        self.brightness
    }

    pub fn contrast(&self) -> f32 {
        self.contrast
    }

    pub fn denoise(&self) -> bool {
        self.denoise
    }

    /// True when brightness and contrast leave pixel values untouched.
    pub fn is_neutral_tone(&self) -> bool {
        self.brightness == 0 && self.contrast == 1.0
    }
}

impl Default for EnhancementParams {
    fn default() -> Self {
        Self {
            brightness: 0,
            contrast: 1.0,
            denoise: false,
        }
    }
}

/// Wire form of [`EnhancementParams`]; every field is optional.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
struct EnhancementRecord {
    brightness: i32,
    contrast: f32,
    denoise: bool,
}

impl Default for EnhancementRecord {
    fn default() -> Self {
        let params = EnhancementParams::default();
        params.into()
    }
}

impl TryFrom<EnhancementRecord> for EnhancementParams {
    type Error = BelegwerkError;

    fn try_from(record: EnhancementRecord) -> Result<Self, Self::Error> {
        Self::new(record.brightness, record.contrast, record.denoise)
    }
}

impl From<EnhancementParams> for EnhancementRecord {
    fn from(params: EnhancementParams) -> Self {
        Self {
            brightness: params.brightness,
            contrast: params.contrast,
            denoise: params.denoise,
        }
    }
}
