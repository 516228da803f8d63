//! End-to-end refresh cycle tests
//!
//! Drives the scheduler against mock upstream pages and checks the snapshot
//! store after each cycle, including the staleness guarantee when a source
//! starts failing.

use std::sync::Arc;

use eduscout::cache::SnapshotStore;
use eduscout::config::{Config, SourcePage};
use eduscout::fetcher::PageFetcher;
use eduscout::scheduler::{CycleOutcome, RefreshScheduler};
use eduscout::source::{ConferenceSource, CourseSource};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COURSE_PAGE: &str = r#"<!DOCTYPE html><html><body>
<div class="cds-ProductCard-header"><a href="/learn/algebra">Algebra   for
Teachers</a></div>
<div class="cds-ProductCard-header"><a href="/learn/geometry">Geometry</a></div>
<div class="cds-ProductCard-header"><a href="/learn/logic">Logic</a></div>
</body></html>"#;

const CONFERENCE_PAGE: &str = r#"<!DOCTYPE html><html><body>
<table class="eventslist">
<tr><th>Date</th><th>Event</th><th>Location</th></tr>
<tr><td>10 Jan 2026</td><td><a href="/event/1">EduTech Summit</a></td><td>Bengaluru, Karnataka</td></tr>
<tr><td>11 Jan 2026</td><td><a href="/event/2">National Meet</a></td><td>Mumbai</td></tr>
<tr><td>12 Jan 2026</td><td><a href="/event/3">Teaching Congress</a></td><td>BANGALORE</td></tr>
</table>
</body></html>"#;

const CONFERENCE_PAGE_SECOND: &str = r#"<!DOCTYPE html><html><body>
<table class="eventslist">
<tr><th>Date</th><th>Event</th><th>Location</th></tr>
<tr><td>20 Feb 2026</td><td><a href="/event/9">Spring Workshop</a></td><td>Bengaluru</td></tr>
</table>
</body></html>"#;

struct Harness {
    mock_server: MockServer,
    store: Arc<SnapshotStore>,
    scheduler: RefreshScheduler,
}

async fn build_harness() -> Harness {
    let mock_server = MockServer::start().await;

    let mut config = Config::default();
    config.fetcher.max_retries = 0;
    config.sources.courses = SourcePage {
        url: format!("{}/courses", mock_server.uri()),
        origin: mock_server.uri(),
    };
    config.sources.conferences = SourcePage {
        url: format!("{}/conferences", mock_server.uri()),
        origin: mock_server.uri(),
    };

    let store = Arc::new(SnapshotStore::new());
    let fetcher = Arc::new(
        PageFetcher::new(config.request_timeout(), config.fetcher.user_agent.clone()).unwrap(),
    );
    let courses = CourseSource::new(
        fetcher.clone(),
        config.sources.courses.clone(),
        &config.fetcher,
    );
    let conferences = ConferenceSource::new(
        fetcher,
        config.sources.conferences.clone(),
        &config.fetcher,
    );
    let scheduler =
        RefreshScheduler::new(store.clone(), courses, conferences, &config.refresh).unwrap();

    Harness {
        mock_server,
        store,
        scheduler,
    }
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Boot cycle populates both entries; location filter and whitespace
/// normalization applied on the way in
#[tokio::test]
async fn test_boot_cycle_populates_store() {
    let harness = build_harness().await;
    mount_page(&harness.mock_server, "/courses", COURSE_PAGE).await;
    mount_page(&harness.mock_server, "/conferences", CONFERENCE_PAGE).await;

    let outcome = harness.scheduler.run_cycle().await;

    let CycleOutcome::Completed(report) = outcome else {
        panic!("boot cycle should not be skipped");
    };
    assert_eq!(report.courses.extracted, 3);
    assert!(report.courses.updated);
    assert_eq!(report.conferences.extracted, 2);
    assert!(report.conferences.updated);

    let courses = harness.store.courses.get().await;
    assert_eq!(courses.len(), 3);
    assert_eq!(courses[0].title, "Algebra for Teachers");
    assert!(courses[0].url.ends_with("/learn/algebra"));

    let conferences = harness.store.conferences.get().await;
    let titles: Vec<_> = conferences.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["EduTech Summit", "Teaching Congress"]);
}

/// A later cycle that fails for one source keeps that source's stale
/// snapshot while the other source refreshes normally
#[tokio::test]
async fn test_partial_failure_keeps_stale_snapshot() {
    let harness = build_harness().await;
    mount_page(&harness.mock_server, "/courses", COURSE_PAGE).await;
    mount_page(&harness.mock_server, "/conferences", CONFERENCE_PAGE).await;

    harness.scheduler.run_cycle().await;
    assert_eq!(harness.store.courses.len().await, 3);
    assert_eq!(harness.store.conferences.len().await, 2);

    // Second cycle: courses now fail, conferences serve a new page
    harness.mock_server.reset().await;
    Mock::given(method("GET"))
        .and(path("/courses"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&harness.mock_server)
        .await;
    mount_page(&harness.mock_server, "/conferences", CONFERENCE_PAGE_SECOND).await;

    let outcome = harness.scheduler.run_cycle().await;

    let CycleOutcome::Completed(report) = outcome else {
        panic!("cycle should not be skipped");
    };
    assert_eq!(report.courses.extracted, 0);
    assert!(!report.courses.updated);
    assert!(report.conferences.updated);

    // Courses regressed upstream but the cache must not regress
    let courses = harness.store.courses.get().await;
    assert_eq!(courses.len(), 3);
    assert_eq!(courses[1].title, "Geometry");

    // Conferences reflect the second cycle's result
    let conferences = harness.store.conferences.get().await;
    assert_eq!(conferences.len(), 1);
    assert_eq!(conferences[0].title, "Spring Workshop");
}

/// A page that fetches fine but matches nothing also keeps the stale
/// snapshot; the caller cannot distinguish the two failure shapes
#[tokio::test]
async fn test_empty_page_keeps_stale_snapshot() {
    let harness = build_harness().await;
    mount_page(&harness.mock_server, "/courses", COURSE_PAGE).await;
    mount_page(&harness.mock_server, "/conferences", CONFERENCE_PAGE).await;
    harness.scheduler.run_cycle().await;

    harness.mock_server.reset().await;
    mount_page(
        &harness.mock_server,
        "/courses",
        "<!DOCTYPE html><html><body><p>redesigned page</p></body></html>",
    )
    .await;
    mount_page(&harness.mock_server, "/conferences", CONFERENCE_PAGE).await;

    harness.scheduler.run_cycle().await;

    assert_eq!(harness.store.courses.len().await, 3);
}

/// Repeating a cycle against unchanged pages leaves identical snapshots
#[tokio::test]
async fn test_repeated_cycle_is_idempotent() {
    let harness = build_harness().await;
    mount_page(&harness.mock_server, "/courses", COURSE_PAGE).await;
    mount_page(&harness.mock_server, "/conferences", CONFERENCE_PAGE).await;

    harness.scheduler.run_cycle().await;
    let first = harness.store.courses.get().await;

    harness.scheduler.run_cycle().await;
    let second = harness.store.courses.get().await;

    assert_eq!(first, second);
}
