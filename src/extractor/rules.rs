//! Structural selection rules for the two upstream listing formats
//!
//! Selectors are compiled once and shared. The upstream pages are untrusted
//! markup whose structure may change without notice; when a class name
//! drifts, extraction yields zero records and the cache keeps serving the
//! last good snapshot.

use lazy_static::lazy_static;
use scraper::Selector;

// Helper macro to parse selectors safely at startup
macro_rules! parse_selector {
    ($s:expr) => {
        Selector::parse($s).expect(concat!("Invalid CSS selector: ", $s))
    };
}

lazy_static! {
    // Course listing selectors
    static ref COURSE_CARD: Selector = parse_selector!(".cds-ProductCard-header");
    static ref CARD_ANCHOR: Selector = parse_selector!("a");

    // Conference listing selectors
    static ref CONFERENCE_ROW: Selector = parse_selector!(".eventslist tr");
    static ref ROW_DATE: Selector = parse_selector!("td:nth-child(1)");
    static ref ROW_TITLE_ANCHOR: Selector = parse_selector!("td:nth-child(2) a");
    static ref ROW_LOCATION: Selector = parse_selector!("td:nth-child(3)");
}

/// Locations a conference row must mention to be retained
///
/// Matched case-insensitively as substrings of the row's location cell.
pub const CONFERENCE_LOCATIONS: &[&str] = &["bangalore", "bengaluru"];

/// Selectors for the course listing page
pub struct CourseRules {
    /// One matching node per course card
    pub card: &'static Selector,

    /// Anchor nested inside a card, carrying the course href
    pub anchor: &'static Selector,
}

impl CourseRules {
    #[must_use]
    pub fn new() -> Self {
        Self {
            card: &COURSE_CARD,
            anchor: &CARD_ANCHOR,
        }
    }
}

impl Default for CourseRules {
    fn default() -> Self {
        Self::new()
    }
}

/// Selectors for the conference listing table
pub struct ConferenceRules {
    /// One matching node per table row, header row included
    pub row: &'static Selector,

    /// First column: raw date text
    pub date: &'static Selector,

    /// Second column anchor: title text and event href
    pub title_anchor: &'static Selector,

    /// Third column: location text
    pub location: &'static Selector,
}

impl ConferenceRules {
    #[must_use]
    pub fn new() -> Self {
        Self {
            row: &CONFERENCE_ROW,
            date: &ROW_DATE,
            title_anchor: &ROW_TITLE_ANCHOR,
            location: &ROW_LOCATION,
        }
    }
}

impl Default for ConferenceRules {
    fn default() -> Self {
        Self::new()
    }
}

/// Check a location cell against the allow-list
pub fn matches_location(location: &str) -> bool {
    let lowered = location.to_lowercase();
    CONFERENCE_LOCATIONS.iter().any(|l| lowered.contains(l))
}
