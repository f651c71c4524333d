//! Calendar bucketing of verdict-annotated jobs.
//!
//! Projects jobs into month/week/day buckets for presentation. Bucket
//! boundaries are civil-calendar cells anchored at a [`time::Date`]; the
//! engine otherwise works in epoch-relative milliseconds, so cell edges
//! are converted once via Julian day arithmetic.
//!
//! A job lands in every bucket its effective window overlaps — the same
//! half-open rule the detector uses — so a multi-day job repeats across
//! the day cells it touches. Within a bucket, events are ordered by
//! start time with ties broken by job id, stable across re-renders.
//!
//! # Filtering
//!
//! [`DisplayFilter`] narrows only what is *displayed*. Verdicts are
//! computed upstream against the full snapshot, so a conflict with a
//! currently-hidden job still shows on the jobs that remain visible.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month};
use tracing::warn;

use crate::models::{ConflictVerdict, Job, JobStatus, TimeWindow};

/// Milliseconds per civil day.
const MS_PER_DAY: i64 = 86_400_000;
/// Julian day number of 1970-01-01.
const EPOCH_JULIAN_DAY: i64 = 2_440_588;

/// Bucket granularity of the projected view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Granularity {
    /// One day-bucket per calendar day of the anchor's month.
    Month,
    /// Seven day-buckets, Monday through Sunday of the anchor's week.
    Week,
    /// A single bucket covering the anchor day.
    Day,
}

/// One calendar cell and the events that touch it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarBucket {
    /// The cell's time range `[start, end)`.
    pub range: TimeWindow,
    /// Events overlapping the range, ordered by `(start, job id)`.
    pub events: Vec<BucketEvent>,
}

/// A job paired with its conflict verdict, as placed in a bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketEvent {
    /// The displayed job.
    pub job: Job,
    /// The job's verdict, for painting conflict badges.
    pub verdict: ConflictVerdict,
}

/// Status/type pre-filter on what the calendar displays.
///
/// Empty criteria match everything. Filtering happens after detection:
/// compute verdicts over the full snapshot, then narrow the display here.
#[derive(Debug, Clone, Default)]
pub struct DisplayFilter {
    statuses: Vec<JobStatus>,
    job_types: Vec<String>,
}

impl DisplayFilter {
    /// Creates a filter that matches every job.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also accept jobs with the given status.
    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.statuses.push(status);
        self
    }

    /// Also accept jobs of the given category.
    pub fn with_job_type(mut self, job_type: impl Into<String>) -> Self {
        self.job_types.push(job_type.into());
        self
    }

    /// Whether a job passes the filter.
    pub fn matches(&self, job: &Job) -> bool {
        (self.statuses.is_empty() || self.statuses.contains(&job.status))
            && (self.job_types.is_empty() || self.job_types.iter().any(|t| *t == job.job_type))
    }
}

/// Projects jobs into calendar buckets for the requested granularity.
///
/// Each job appears in every bucket its effective window overlaps. A job
/// missing from the verdict map gets a clear verdict; a job whose window
/// is malformed is not placed at all.
pub fn project(
    jobs: &[Job],
    verdicts: &BTreeMap<String, ConflictVerdict>,
    granularity: Granularity,
    anchor: Date,
) -> Vec<CalendarBucket> {
    let mut buckets = match granularity {
        Granularity::Day => day_buckets(anchor, 1),
        Granularity::Week => day_buckets(monday_of(anchor), 7),
        Granularity::Month => {
            let (first, days) = month_span(anchor);
            day_buckets(first, days)
        }
    };

    for job in jobs {
        let window = job.window();
        if !window.is_well_formed() {
            warn!("not placing job {}: non-positive window", job.id);
            continue;
        }
        for bucket in &mut buckets {
            if bucket.range.overlaps(&window) {
                let verdict = verdicts
                    .get(&job.id)
                    .cloned()
                    .unwrap_or_else(|| ConflictVerdict::clear(&job.id));
                bucket.events.push(BucketEvent {
                    job: job.clone(),
                    verdict,
                });
            }
        }
    }

    for bucket in &mut buckets {
        bucket
            .events
            .sort_by(|a, b| (a.job.start_ms, a.job.id.as_str()).cmp(&(b.job.start_ms, b.job.id.as_str())));
    }

    buckets
}

/// [`project`] over the subset of jobs passing `filter`.
///
/// The verdict map must have been computed over the full snapshot;
/// this function never recomputes verdicts, so hiding a job cannot
/// un-report a conflict on a visible one.
pub fn project_filtered(
    jobs: &[Job],
    verdicts: &BTreeMap<String, ConflictVerdict>,
    filter: &DisplayFilter,
    granularity: Granularity,
    anchor: Date,
) -> Vec<CalendarBucket> {
    let visible: Vec<Job> = jobs.iter().filter(|j| filter.matches(j)).cloned().collect();
    project(&visible, verdicts, granularity, anchor)
}

/// Midnight of `date` in epoch-relative milliseconds.
fn day_start_ms(date: Date) -> i64 {
    (i64::from(date.to_julian_day()) - EPOCH_JULIAN_DAY) * MS_PER_DAY
}

/// `count` consecutive empty day-buckets starting at `first`.
fn day_buckets(first: Date, count: i64) -> Vec<CalendarBucket> {
    let start = day_start_ms(first);
    (0..count)
        .map(|i| CalendarBucket {
            range: TimeWindow::new(start + i * MS_PER_DAY, start + (i + 1) * MS_PER_DAY),
            events: Vec::new(),
        })
        .collect()
}

/// Monday of the week containing `anchor`.
fn monday_of(anchor: Date) -> Date {
    let offset = i64::from(anchor.weekday().number_days_from_monday());
    anchor.checked_sub(Duration::days(offset)).unwrap_or(anchor)
}

/// First day of the anchor's month and the month's length in days.
fn month_span(anchor: Date) -> (Date, i64) {
    let first = anchor.replace_day(1).unwrap_or(anchor);
    let next_first = match first.month() {
        Month::December => Date::from_calendar_date(first.year() + 1, Month::January, 1),
        month => Date::from_calendar_date(first.year(), month.next(), 1),
    }
    .unwrap_or(first);
    let days = i64::from(next_first.to_julian_day()) - i64::from(first.to_julian_day());
    (first, days.max(1))
}
