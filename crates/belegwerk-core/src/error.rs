// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Belegwerk.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error type for all Belegwerk operations.
#[derive(Debug, Error)]
pub enum BelegwerkError {
    // -- Pipeline errors --
    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("no receipt contour found: {0}")]
    NoContourFound(String),

    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("invalid contour: expected 4 points, got {0}")]
    InvalidContour(usize),

    #[error("{parameter} = {value} is outside [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("failed to encode image: {0}")]
    Encode(String),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- External collaborators --
    #[error("receipt storage error: {0}")]
    Storage(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

impl BelegwerkError {
    /// Machine-readable classification for callers that translate errors into
    /// their own responses.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Decode(_) => ErrorKind::DecodeError,
            Self::NoContourFound(_) => ErrorKind::NoContourFound,
            Self::DegenerateGeometry(_) => ErrorKind::DegenerateGeometry,
            Self::InvalidContour(_) => ErrorKind::InvalidContour,
            Self::ParameterOutOfRange { .. } => ErrorKind::ParameterOutOfRange,
            Self::Encode(_) => ErrorKind::EncodeError,
            Self::Config(_) => ErrorKind::InvalidConfig,
            Self::Io(_) | Self::Serialization(_) => ErrorKind::Io,
            Self::Storage(_) | Self::PlatformUnavailable => ErrorKind::Storage,
        }
    }
}

/// Stable error codes, serialised in snake_case (`"no_contour_found"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    DecodeError,
    NoContourFound,
    DegenerateGeometry,
    InvalidContour,
    ParameterOutOfRange,
    EncodeError,
    InvalidConfig,
    Io,
    Storage,
}

impl ErrorKind {
    /// The snake_case code for this kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DecodeError => "decode_error",
            Self::NoContourFound => "no_contour_found",
            Self::DegenerateGeometry => "degenerate_geometry",
            Self::InvalidContour => "invalid_contour",
            Self::ParameterOutOfRange => "parameter_out_of_range",
            Self::EncodeError => "encode_error",
            Self::InvalidConfig => "invalid_config",
            Self::Io => "io",
            Self::Storage => "storage",
        }
    }

    /// Whether the error was caused by the caller's input rather than by the
    /// environment. Input errors are never worth retrying unchanged.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::DecodeError
                | Self::NoContourFound
                | Self::DegenerateGeometry
                | Self::InvalidContour
                | Self::ParameterOutOfRange
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BelegwerkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_codes_match_serde_names() {
        for kind in [
            ErrorKind::DecodeError,
            ErrorKind::NoContourFound,
            ErrorKind::DegenerateGeometry,
            ErrorKind::InvalidContour,
            ErrorKind::ParameterOutOfRange,
            ErrorKind::EncodeError,
            ErrorKind::InvalidConfig,
            ErrorKind::Io,
            ErrorKind::Storage,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.code()));
        }
    }

    #[test]
    fn pipeline_errors_are_input_errors() {
        assert!(BelegwerkError::InvalidContour(3).kind().is_input_error());
        assert!(
            BelegwerkError::NoContourFound("empty mask".into())
                .kind()
                .is_input_error()
        );
        assert!(!BelegwerkError::PlatformUnavailable.kind().is_input_error());
    }

    #[test]
    fn out_of_range_message_names_the_parameter() {
        let err = BelegwerkError::ParameterOutOfRange {
            parameter: "contrast",
            value: 3.0,
            min: 0.5,
            max: 2.0,
        };
        assert_eq!(err.to_string(), "contrast = 3 is outside [0.5, 2]");
    }
}
