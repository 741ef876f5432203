// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capture timestamps.
//!
//! History dates are UTC instants rendered to a fixed-width text format:
//!
//! ```text
//! YYYY-MM-DD HH:MM:SS.ffffff
//! ```
//!
//! The width is constant, so lexicographic comparison of two rendered
//! timestamps equals chronological comparison. The record store relies on
//! this: `history_date <= t` filters and `ORDER BY history_date DESC` run
//! directly on the text column, on every backend, with no date parsing.

use time::OffsetDateTime;

/// Renders the current UTC instant as a capture timestamp.
#[must_use]
pub fn now() -> String {
    from_datetime(OffsetDateTime::now_utc())
}

/// Renders a UTC instant as a capture timestamp.
#[must_use]
pub fn from_datetime(instant: OffsetDateTime) -> String {
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}.{:06}",
        instant.year(),
        u8::from(instant.month()),
        instant.day(),
        instant.hour(),
        instant.minute(),
        instant.second(),
        instant.microsecond()
    )
}
