//! Conflict verdict model.
//!
//! The detector's per-job output: double-booking flags plus the ids
//! needed to explain *why* — which resources are contended and which
//! other jobs are involved. A verdict is a derived projection of the
//! input snapshot: recomputed on demand, never persisted, and stale the
//! moment any input collection changes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Conflict flags for one job.
///
/// The id sets are ordered so that two runs over an unchanged snapshot
/// serialize identically; consumers must not read meaning into order
/// beyond that.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictVerdict {
    /// The job this verdict describes.
    pub job_id: String,
    /// Whether any of the job's equipment reservations is double-booked.
    pub has_resource_conflict: bool,
    /// Whether any assigned team member is double-booked.
    pub has_team_conflict: bool,
    /// Resources contended with another job.
    pub conflicting_resource_ids: BTreeSet<String>,
    /// Other jobs involved in any conflict with this one.
    pub conflicting_job_ids: BTreeSet<String>,
}

impl ConflictVerdict {
    /// A verdict reporting no conflicts.
    pub fn clear(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            ..Self::default()
        }
    }

    /// Whether the job is double-booked on any claim.
    pub fn has_any_conflict(&self) -> bool {
        self.has_resource_conflict || self.has_team_conflict
    }

    /// Records a resource double-booking against another job.
    pub(crate) fn record_resource_conflict(&mut self, resource_id: &str, other_job_id: &str) {
        self.has_resource_conflict = true;
        self.conflicting_resource_ids.insert(resource_id.to_string());
        self.conflicting_job_ids.insert(other_job_id.to_string());
    }

    /// Records a team double-booking against another job.
    pub(crate) fn record_team_conflict(&mut self, other_job_id: &str) {
        self.has_team_conflict = true;
        self.conflicting_job_ids.insert(other_job_id.to_string());
    }
}
