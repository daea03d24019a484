// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Backend-agnostic trait definitions for receipt storage.
//
// The scanning pipeline never talks to storage itself; callers hand the
// encoded receipt to a `ReceiptStorage` once processing succeeded.

use belegwerk_core::error::Result;
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::default_upload_filename;

/// Record of a stored receipt as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// Backend-specific identifier of the stored file.
    pub id: String,
    /// Link for viewing the file, when the backend offers one.
    pub link: Option<String>,
}

/// Somewhere processed receipts can be kept.
pub trait ReceiptStorage: Send + Sync {
    /// Human-readable backend name (e.g. "Google Drive").
    fn backend_name(&self) -> &str;

    /// Whether the backend currently holds valid credentials.
    fn is_authenticated(&self) -> bool;

    /// Store encoded image bytes under [`upload_name`](Self::upload_name).
    fn upload(&self, data: &[u8], filename: Option<&str>) -> Result<UploadedFile>;

    /// Name an upload is stored under: `filename` when given, otherwise a
    /// local-time `receipt_YYYYMMDD_HHMMSS.jpg`.
    fn upload_name(&self, filename: Option<&str>) -> String {
        match filename {
            Some(name) => name.to_owned(),
            None => default_upload_filename(Local::now()),
        }
    }
}
