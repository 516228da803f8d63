//! Refresh scheduling
//!
//! A single background loop drives refresh cycles: one at boot (awaited
//! before the query surface is considered ready) and one per calendar day at
//! a fixed wall-clock boundary. A cycle runs both source jobs concurrently
//! and applies their results to the snapshot store.
//!
//! The scheduler is a two-state machine, [`SchedulerState::Idle`] and
//! [`SchedulerState::Refreshing`]. Overlapping cycles are prevented by an
//! atomic in-progress guard: a tick that fires while a cycle is still
//! running is coalesced rather than run concurrently, so the cache entries
//! never see two writers racing.
//!
//! Cycle outcomes are broadcast as [`RefreshEvent`]s over a tokio channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Local, NaiveTime, TimeZone, Utc};
use tokio::sync::{broadcast, RwLock};

use crate::cache::SnapshotStore;
use crate::config::RefreshConfig;
use crate::source::{ConferenceSource, CourseSource};

/// Externally observable scheduler states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No refresh in progress
    Idle,

    /// One full cycle (both sources) in progress
    Refreshing,
}

/// Outcome of one refresh cycle for one source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceOutcome {
    /// Records the source job produced this cycle
    pub extracted: usize,

    /// Whether the cache entry was replaced (false means stale kept)
    pub updated: bool,
}

/// Summary of one completed refresh cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub courses: SourceOutcome,
    pub conferences: SourceOutcome,
}

/// Result of asking the scheduler to run a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The cycle ran to completion
    Completed(CycleReport),

    /// A cycle was already in progress; this tick was coalesced
    Skipped,
}

/// Events emitted by the scheduler
#[derive(Debug, Clone)]
pub enum RefreshEvent {
    /// A refresh cycle started
    CycleStarted { started_at: DateTime<Utc> },

    /// A refresh cycle finished, success or degrade-to-empty per source
    CycleCompleted {
        report: CycleReport,
        completed_at: DateTime<Utc>,
    },

    /// A scheduled tick fired while a cycle was still running
    TickCoalesced { at: DateTime<Utc> },
}

/// Drives refresh cycles against the snapshot store
pub struct RefreshScheduler {
    store: Arc<SnapshotStore>,
    courses: CourseSource,
    conferences: ConferenceSource,

    /// Daily boundary at which the scheduled cycle fires (local time)
    refresh_time: NaiveTime,

    /// In-progress guard; set for the duration of one cycle
    refreshing: AtomicBool,

    event_sender: broadcast::Sender<RefreshEvent>,
    is_running: Arc<RwLock<bool>>,
}

impl RefreshScheduler {
    /// Create a new scheduler
    ///
    /// # Errors
    ///
    /// Returns a config error if the refresh time is not HH:MM.
    pub fn new(
        store: Arc<SnapshotStore>,
        courses: CourseSource,
        conferences: ConferenceSource,
        config: &RefreshConfig,
    ) -> crate::error::Result<Self> {
        let refresh_time = NaiveTime::parse_from_str(&config.refresh_time, "%H:%M")
            .map_err(|_| {
                crate::error::Error::config(format!(
                    "Invalid refresh_time '{}'. Expected HH:MM",
                    config.refresh_time
                ))
            })?;

        let (event_sender, _) = broadcast::channel(16);

        Ok(Self {
            store,
            courses,
            conferences,
            refresh_time,
            refreshing: AtomicBool::new(false),
            event_sender,
            is_running: Arc::new(RwLock::new(false)),
        })
    }

    /// Subscribe to refresh events
    pub fn subscribe(&self) -> broadcast::Receiver<RefreshEvent> {
        self.event_sender.subscribe()
    }

    /// Current state of the two-state machine
    pub fn state(&self) -> SchedulerState {
        if self.refreshing.load(Ordering::Acquire) {
            SchedulerState::Refreshing
        } else {
            SchedulerState::Idle
        }
    }

    /// Run one full refresh cycle, or coalesce if one is already running
    ///
    /// Both source jobs run concurrently; neither can fail outward, so the
    /// cycle always runs to completion once started. Store writes for the
    /// two sources are independent and order-insensitive.
    pub async fn run_cycle(&self) -> CycleOutcome {
        if self
            .refreshing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("refresh cycle already in progress, coalescing tick");
            let _ = self
                .event_sender
                .send(RefreshEvent::TickCoalesced { at: Utc::now() });
            return CycleOutcome::Skipped;
        }

        tracing::info!("refresh cycle started");
        let _ = self.event_sender.send(RefreshEvent::CycleStarted {
            started_at: Utc::now(),
        });

        let (course_records, conference_records) =
            tokio::join!(self.courses.collect(), self.conferences.collect());

        let report = CycleReport {
            courses: SourceOutcome {
                extracted: course_records.len(),
                updated: self.store.courses.replace_if_non_empty(course_records).await,
            },
            conferences: SourceOutcome {
                extracted: conference_records.len(),
                updated: self
                    .store
                    .conferences
                    .replace_if_non_empty(conference_records)
                    .await,
            },
        };

        self.refreshing.store(false, Ordering::Release);

        tracing::info!(
            courses = report.courses.extracted,
            courses_updated = report.courses.updated,
            conferences = report.conferences.extracted,
            conferences_updated = report.conferences.updated,
            "refresh cycle completed"
        );
        let _ = self.event_sender.send(RefreshEvent::CycleCompleted {
            report,
            completed_at: Utc::now(),
        });

        CycleOutcome::Completed(report)
    }

    /// Duration until the next daily refresh boundary
    pub fn duration_until_refresh(&self) -> Duration {
        let now = Local::now();
        let today = now.date_naive();

        if let Some(target) = Local
            .from_local_datetime(&today.and_time(self.refresh_time))
            .earliest()
        {
            if target > now {
                return target.signed_duration_since(now);
            }
        }

        let tomorrow = today + Duration::days(1);
        Local
            .from_local_datetime(&tomorrow.and_time(self.refresh_time))
            .earliest()
            .map(|target| target.signed_duration_since(now))
            .unwrap_or_else(|| Duration::days(1))
    }

    /// Run the scheduling loop until stopped
    ///
    /// Sleeps until the next daily boundary, runs a cycle, repeats. The boot
    /// cycle is not part of this loop; callers run it explicitly before
    /// starting the loop.
    pub async fn start(&self) {
        *self.is_running.write().await = true;
        tracing::info!(
            refresh_time = %self.refresh_time,
            "refresh scheduler started"
        );

        while *self.is_running.read().await {
            let sleep_duration = self
                .duration_until_refresh()
                .to_std()
                .unwrap_or(std::time::Duration::from_secs(60));

            tokio::select! {
                _ = tokio::time::sleep(sleep_duration) => {
                    self.run_cycle().await;
                }
                _ = self.wait_for_stop() => {
                    break;
                }
            }
        }

        tracing::info!("refresh scheduler stopped");
    }

    /// Stop the scheduling loop
    pub async fn stop(&self) {
        *self.is_running.write().await = false;
    }

    /// Whether the scheduling loop is running
    pub async fn is_running(&self) -> bool {
        *self.is_running.read().await
    }

    async fn wait_for_stop(&self) {
        loop {
            if !*self.is_running.read().await {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        }
    }
}
