//! Boundary adapter for loosely-typed upstream rows.
//!
//! The generic data client hands over untyped JSON rows; everything past
//! this module works on the typed records in [`crate::models`]. Rows
//! that do not match the expected shape are skipped with a warning —
//! partially-loaded data degrades to a thinner schedule, never a broken
//! view.
//!
//! Field spellings follow the upstream rows: jobs carry `type`, `start`
//! and `end`; reservations carry `reserved_from` and `reserved_until`.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::models::{Job, ResourceReservation, TeamAssignment};

/// Parses job rows, skipping any that do not match the job schema.
pub fn normalize_jobs(rows: &[Value]) -> Vec<Job> {
    normalize_rows(rows, "job")
}

/// Parses reservation rows, skipping malformed ones.
pub fn normalize_reservations(rows: &[Value]) -> Vec<ResourceReservation> {
    normalize_rows(rows, "reservation")
}

/// Parses assignment rows, skipping malformed ones.
pub fn normalize_assignments(rows: &[Value]) -> Vec<TeamAssignment> {
    normalize_rows(rows, "assignment")
}

fn normalize_rows<T: DeserializeOwned>(rows: &[Value], kind: &str) -> Vec<T> {
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        match serde_json::from_value(row.clone()) {
            Ok(record) => records.push(record),
            Err(err) => warn!("skipping malformed {kind} row: {err}"),
        }
    }
    records
}
