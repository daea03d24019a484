// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Belegwerk — Receipt storage bridge abstractions.
//
// Defines the storage trait processed receipts are handed to and the stub
// used when no upload backend is configured.

pub mod stub;
pub mod traits;

use chrono::{DateTime, TimeZone};

pub use traits::{ReceiptStorage, UploadedFile};

/// Storage used when the caller configured no backend.
pub fn receipt_storage() -> Box<dyn ReceiptStorage> {
    Box::new(stub::StubStorage)
}

/// Default name for an uploaded receipt: `receipt_YYYYMMDD_HHMMSS.jpg`.
pub fn default_upload_filename<Tz: TimeZone>(at: DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("receipt_%Y%m%d_%H%M%S.jpg").to_string()
}
