//! Job (booking) model.
//!
//! A job is a time-boxed unit of work for a client — a shoot, an install,
//! a delivery run — and the unit against which conflicts are evaluated.
//! The job owns its time window; equipment reservations carry windows of
//! their own, while team assignments span the job's window.
//!
//! # Time Representation
//! All times are in milliseconds relative to a reference epoch, already
//! normalized to one timezone by the data layer. A job without an explicit
//! end is treated as lasting two hours for every computation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::TimeWindow;

/// Implied duration for jobs without an explicit end: 2 hours.
pub const DEFAULT_JOB_DURATION_MS: i64 = 2 * 60 * 60 * 1000;

/// A scheduled job.
///
/// Owned and mutated by the booking data layer; the conflict engine only
/// ever reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Unique job identifier.
    pub id: String,
    /// Owning client identifier.
    #[serde(default)]
    pub client_id: String,
    /// Human-readable title.
    #[serde(default)]
    pub title: String,
    /// Job category (e.g., "wedding", "portrait").
    #[serde(rename = "type", default)]
    pub job_type: String,
    /// Lifecycle status.
    #[serde(default)]
    pub status: JobStatus,
    /// Start time (ms).
    #[serde(rename = "start")]
    pub start_ms: i64,
    /// End time (ms). `None` = implied 2-hour duration.
    #[serde(rename = "end", default)]
    pub end_ms: Option<i64>,
    /// Domain-specific key-value metadata.
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

/// Job lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Booked but not yet confirmed by the client.
    #[default]
    Scheduled,
    /// Confirmed by the client.
    Confirmed,
    /// Work underway (shooting, editing).
    InProduction,
    /// Finished work awaiting handover.
    DeliveryPending,
    /// Delivered and closed.
    Completed,
    /// Called off. Whether cancelled jobs still claim resources is a
    /// detector policy, not a property of the job itself.
    Cancelled,
}

impl Job {
    /// Creates a new job starting at the given time.
    pub fn new(id: impl Into<String>, start_ms: i64) -> Self {
        Self {
            id: id.into(),
            client_id: String::new(),
            title: String::new(),
            job_type: String::new(),
            status: JobStatus::Scheduled,
            start_ms,
            end_ms: None,
            attributes: HashMap::new(),
        }
    }

    /// Sets the owning client.
    pub fn with_client(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the job category.
    pub fn with_job_type(mut self, job_type: impl Into<String>) -> Self {
        self.job_type = job_type.into();
        self
    }

    /// Sets the lifecycle status.
    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets an explicit end time (ms).
    pub fn with_end(mut self, end_ms: i64) -> Self {
        self.end_ms = Some(end_ms);
        self
    }

    /// Adds a domain-specific attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Effective end time: the explicit end, or start + 2 hours.
    #[inline]
    pub fn effective_end_ms(&self) -> i64 {
        self.end_ms
            .unwrap_or(self.start_ms + DEFAULT_JOB_DURATION_MS)
    }

    /// The job's effective time window `[start, effective_end)`.
    ///
    /// May be malformed if upstream data carries `end <= start`; callers
    /// check [`TimeWindow::is_well_formed`] before using it for overlap.
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start_ms, self.effective_end_ms())
    }

    /// Whether the job has been called off.
    pub fn is_cancelled(&self) -> bool {
        self.status == JobStatus::Cancelled
    }
}
