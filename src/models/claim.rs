//! Claim models: equipment reservations and team assignments.
//!
//! A claim links one job to one shared resource or one person. Many
//! reservations may reference the same job (multiple pieces of gear) or
//! the same resource (multiple jobs); likewise for assignments.
//!
//! Reservations carry their own explicit window — gear is often booked
//! beyond the job itself for rig and derig time. Assignments have no
//! window of their own: the claimed interval is always the parent job's.

use serde::{Deserialize, Serialize};

use super::TimeWindow;

/// A job's claim on a shared resource for an explicit time window.
///
/// Invariant: `reserved_from < reserved_until`. A violation is malformed
/// upstream data; the detector skips such claims rather than erroring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceReservation {
    /// Claiming job identifier.
    pub job_id: String,
    /// Claimed resource identifier.
    pub resource_id: String,
    /// Reservation start (ms, inclusive).
    #[serde(rename = "reserved_from")]
    pub reserved_from_ms: i64,
    /// Reservation end (ms, exclusive).
    #[serde(rename = "reserved_until")]
    pub reserved_until_ms: i64,
}

/// A job's claim on a team member.
///
/// The claimed interval is the parent job's effective window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamAssignment {
    /// Claiming job identifier.
    pub job_id: String,
    /// Assigned team member identifier.
    pub member_id: String,
}

impl ResourceReservation {
    /// Creates a new reservation.
    pub fn new(
        job_id: impl Into<String>,
        resource_id: impl Into<String>,
        reserved_from_ms: i64,
        reserved_until_ms: i64,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            resource_id: resource_id.into(),
            reserved_from_ms,
            reserved_until_ms,
        }
    }

    /// The reserved window `[from, until)`.
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.reserved_from_ms, self.reserved_until_ms)
    }
}

impl TeamAssignment {
    /// Creates a new assignment.
    pub fn new(job_id: impl Into<String>, member_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            member_id: member_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reservation_window() {
        let r = ResourceReservation::new("J1", "camera-1", 1000, 5000);
        assert_eq!(r.window(), TimeWindow::new(1000, 5000));
        assert!(r.window().is_well_formed());
    }

    #[test]
    fn test_reservation_malformed_window() {
        let r = ResourceReservation::new("J1", "camera-1", 5000, 5000);
        assert!(!r.window().is_well_formed());
    }

    #[test]
    fn test_reservation_wire_format() {
        let r = ResourceReservation::new("J1", "camera-1", 1000, 5000);
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["reserved_from"], 1000);
        assert_eq!(v["reserved_until"], 5000);
    }

    #[test]
    fn test_assignment() {
        let a = TeamAssignment::new("J1", "ana");
        assert_eq!(a.job_id, "J1");
        assert_eq!(a.member_id, "ana");
    }
}
