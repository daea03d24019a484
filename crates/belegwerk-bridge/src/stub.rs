// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub storage for builds without a configured upload backend.
//
// Every upload returns `PlatformUnavailable`.

use belegwerk_core::error::{BelegwerkError, Result};

use crate::traits::{ReceiptStorage, UploadedFile};

/// Storage returned when no backend is configured.
pub struct StubStorage;

impl ReceiptStorage for StubStorage {
    fn backend_name(&self) -> &str {
        "Unconfigured (stub)"
    }

    fn is_authenticated(&self) -> bool {
        false
    }

    fn upload(&self, data: &[u8], filename: Option<&str>) -> Result<UploadedFile> {
        tracing::warn!(
            name = %self.upload_name(filename),
            bytes = data.len(),
            "ReceiptStorage::upload called on stub storage"
        );
        Err(BelegwerkError::PlatformUnavailable)
    }
}
