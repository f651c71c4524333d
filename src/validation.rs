//! Snapshot integrity diagnostics.
//!
//! Advisory checks on the input collections, independent of conflict
//! detection. Detects:
//! - Duplicate job IDs
//! - Claims pointing at jobs absent from the snapshot
//! - Non-positive time windows on jobs or reservations
//!
//! The detector itself degrades gracefully on all of these; this module
//! exists so the surrounding application can surface data-quality
//! warnings instead of silently thinning the schedule.

use std::collections::HashSet;

use crate::models::{Job, ResourceReservation, TeamAssignment};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two jobs share the same ID.
    DuplicateJobId,
    /// A reservation or assignment references a job that doesn't exist.
    DanglingJobReference,
    /// A job or reservation window has `end <= start`.
    MalformedWindow,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a booking snapshot.
///
/// Checks:
/// 1. No duplicate job IDs
/// 2. All job windows have positive duration
/// 3. All reservation windows have positive duration
/// 4. All reservation and assignment job references resolve
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_snapshot(
    jobs: &[Job],
    reservations: &[ResourceReservation],
    assignments: &[TeamAssignment],
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut job_ids = HashSet::new();
    for job in jobs {
        if !job_ids.insert(job.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateJobId,
                format!("Duplicate job ID: {}", job.id),
            ));
        }
        if !job.window().is_well_formed() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MalformedWindow,
                format!("Job '{}' has a non-positive window", job.id),
            ));
        }
    }

    for r in reservations {
        if !r.window().is_well_formed() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MalformedWindow,
                format!(
                    "Reservation of '{}' by job '{}' has a non-positive window",
                    r.resource_id, r.job_id
                ),
            ));
        }
        if !job_ids.contains(r.job_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DanglingJobReference,
                format!(
                    "Reservation of '{}' references unknown job '{}'",
                    r.resource_id, r.job_id
                ),
            ));
        }
    }

    for a in assignments {
        if !job_ids.contains(a.job_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DanglingJobReference,
                format!(
                    "Assignment of '{}' references unknown job '{}'",
                    a.member_id, a.job_id
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
