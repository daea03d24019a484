// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Base64 data-URL helpers for shipping images inside JSON payloads.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use belegwerk_core::error::{BelegwerkError, Result};

/// MIME type of every image the pipeline encodes.
pub const JPEG_MIME: &str = "image/jpeg";

/// Wrap encoded bytes as `data:<mime>;base64,<payload>`.
pub fn to_data_url(data: &[u8], mime: &str) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(data))
}

/// Decode a data URL or a bare base64 string back to bytes.
///
/// Anything up to and including the first comma is treated as the data-URL
/// prefix and discarded.
pub fn from_data_url(input: &str) -> Result<Vec<u8>> {
    let payload = match input.split_once(',') {
        Some((_, payload)) => payload,
        None => input,
    };
    STANDARD
        .decode(payload.trim())
        .map_err(|err| BelegwerkError::Decode(format!("invalid base64 payload: {err}")))
}
