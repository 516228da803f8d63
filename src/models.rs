//! Core data structures for extracted records
//!
//! One record type per external source. Records are produced by the
//! extractor, held in the snapshot store, and serialized verbatim by the
//! query surface, so the field names here are the wire format.

use serde::{Deserialize, Serialize};

/// A single course listing extracted from the course source
///
/// Produced one-per-matching-card in source document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Card title, trimmed with internal whitespace collapsed
    pub title: String,

    /// Absolute URL to the course page
    pub url: String,
}

/// A single conference listing extracted from the conference source
///
/// Produced one-per-table-row, filtered to the configured location
/// allow-list. The date is kept as raw display text, not parsed into a
/// calendar type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conference {
    /// Event title from the row's anchor text
    pub title: String,

    /// Raw date text as displayed in the listing
    pub date: String,

    /// Location text from the row
    pub location: String,

    /// Absolute URL to the event page
    pub link: String,
}
