//! HTML record extraction
//!
//! Pure functions from raw markup to typed records. No I/O, no state: for a
//! fixed document the same record sequence comes back in the same order on
//! every call.
//!
//! Tolerance policy: a missing sub-element inside a matched node extracts as
//! an empty string, never as an error. Zero matched nodes is a legitimate
//! empty result. Only a document that cannot be loaded at all signals
//! [`ExtractError`].

pub mod rules;

use scraper::{ElementRef, Html};
use url::Url;

use crate::error::ExtractError;
use crate::models::{Conference, Course};

pub use rules::{matches_location, ConferenceRules, CourseRules, CONFERENCE_LOCATIONS};

/// Extract course records from the course listing page
///
/// One record per matching card, in document order. The card's text becomes
/// the title (trimmed, internal whitespace collapsed); the nested anchor's
/// `href` is absolutized against `origin`. A card without an anchor still
/// yields a record whose `url` is the bare origin - observed upstream
/// behavior, kept rather than dropping partial data.
///
/// # Errors
///
/// Returns `ExtractError::InvalidOrigin` if `origin` is not a parseable base URL.
pub fn extract_courses(html: &str, origin: &str) -> Result<Vec<Course>, ExtractError> {
    let base = parse_origin(origin)?;
    let rules = CourseRules::new();
    let document = Html::parse_document(html);

    let courses = document
        .select(rules.card)
        .map(|card| {
            let title = collapse_whitespace(&element_text(&card));
            let href = card
                .select(rules.anchor)
                .next()
                .and_then(|a| a.value().attr("href"));
            let url = absolutize(&base, origin, href);

            Course { title, url }
        })
        .collect();

    Ok(courses)
}

/// Extract conference records from the conference listing table
///
/// The first row is skipped unconditionally as a header - a positional rule,
/// not a content-based one. Remaining rows are read column-wise and filtered
/// to the location allow-list; rows failing the filter are dropped.
///
/// # Errors
///
/// Returns `ExtractError::InvalidOrigin` if `origin` is not a parseable base URL.
pub fn extract_conferences(html: &str, origin: &str) -> Result<Vec<Conference>, ExtractError> {
    let base = parse_origin(origin)?;
    let rules = ConferenceRules::new();
    let document = Html::parse_document(html);

    let conferences = document
        .select(rules.row)
        .skip(1)
        .filter_map(|row| {
            let date = row
                .select(rules.date)
                .next()
                .map(|cell| element_text(&cell).trim().to_string())
                .unwrap_or_default();

            let anchor = row.select(rules.title_anchor).next();
            let title = anchor
                .map(|a| element_text(&a).trim().to_string())
                .unwrap_or_default();
            let href = anchor.and_then(|a| a.value().attr("href"));
            let link = absolutize(&base, origin, href);

            let location = row
                .select(rules.location)
                .next()
                .map(|cell| element_text(&cell).trim().to_string())
                .unwrap_or_default();

            matches_location(&location).then_some(Conference {
                title,
                date,
                location,
                link,
            })
        })
        .collect();

    Ok(conferences)
}

/// Collect all text content under an element
fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>()
}

/// Trim edges and collapse internal whitespace runs to single spaces
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_origin(origin: &str) -> Result<Url, ExtractError> {
    Url::parse(origin).map_err(|e| ExtractError::InvalidOrigin(format!("{origin}: {e}")))
}

/// Resolve an optional href against the source origin
///
/// A missing href falls back to the configured origin verbatim, producing
/// the degenerate-but-valid record documented on [`extract_courses`].
fn absolutize(base: &Url, origin: &str, href: Option<&str>) -> String {
    match href {
        Some(h) => base
            .join(h)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| origin.to_string()),
        None => origin.to_string(),
    }
}
