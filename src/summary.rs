//! Dashboard-level conflict rollup.
//!
//! Aggregates a verdict map into the figures an alert widget needs:
//! how many jobs are double-booked, on which kind of claim, and which
//! resources are the most contended.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Resource conflicts | Jobs with at least one double-booked reservation |
//! | Team conflicts | Jobs with at least one double-booked member |
//! | Conflict rate | Conflicted jobs / total jobs |
//! | Contention by resource | Jobs flagged per resource id |

use std::collections::BTreeMap;

use crate::models::ConflictVerdict;

/// Aggregate conflict figures over one verdict map.
#[derive(Debug, Clone)]
pub struct ConflictSummary {
    /// Jobs in the snapshot.
    pub total_jobs: usize,
    /// Jobs with a resource conflict.
    pub resource_conflict_count: usize,
    /// Jobs with a team conflict.
    pub team_conflict_count: usize,
    /// Jobs with any conflict.
    pub conflicted_job_count: usize,
    /// Fraction of jobs conflicted (0.0..1.0).
    pub conflict_rate: f64,
    /// Number of flagged jobs per contended resource.
    pub contention_by_resource: BTreeMap<String, usize>,
    /// Ids of all conflicted jobs, sorted.
    pub conflicted_job_ids: Vec<String>,
}

impl ConflictSummary {
    /// Computes the rollup from a batch verdict map.
    pub fn calculate(verdicts: &BTreeMap<String, ConflictVerdict>) -> Self {
        let mut resource_conflict_count = 0;
        let mut team_conflict_count = 0;
        let mut contention_by_resource: BTreeMap<String, usize> = BTreeMap::new();
        let mut conflicted_job_ids = Vec::new();

        for verdict in verdicts.values() {
            if verdict.has_resource_conflict {
                resource_conflict_count += 1;
            }
            if verdict.has_team_conflict {
                team_conflict_count += 1;
            }
            if verdict.has_any_conflict() {
                conflicted_job_ids.push(verdict.job_id.clone());
            }
            for resource_id in &verdict.conflicting_resource_ids {
                *contention_by_resource.entry(resource_id.clone()).or_insert(0) += 1;
            }
        }

        let total_jobs = verdicts.len();
        let conflicted_job_count = conflicted_job_ids.len();
        let conflict_rate = if total_jobs == 0 {
            0.0
        } else {
            conflicted_job_count as f64 / total_jobs as f64
        };

        Self {
            total_jobs,
            resource_conflict_count,
            team_conflict_count,
            conflicted_job_count,
            conflict_rate,
            contention_by_resource,
            conflicted_job_ids,
        }
    }

    /// Whether no job in the snapshot is double-booked.
    pub fn is_clean(&self) -> bool {
        self.conflicted_job_count == 0
    }
}
