//! Booking conflict detector.
//!
//! Determines, for each job, whether any of its equipment reservations
//! or team assignments are double-booked against an overlapping window
//! elsewhere in the schedule.
//!
//! # Algorithm
//!
//! 1. Group reservations by `resource_id` and assignments by `member_id`
//!    into hash maps, so each overlap search is bounded to claims on the
//!    same resource or member.
//! 2. Sort each group by `(start, job id)`.
//! 3. Sweep each group once, keeping a list of claims whose windows are
//!    still open; every open claim overlaps the incoming one.
//!
//! This is O(n log n) per group plus one step per overlapping pair,
//! instead of O(n²) over the whole claim set. Batch mode builds the
//! groups once and reuses them for every job.
//!
//! # Overlap Rule
//!
//! Two half-open windows `[s1,e1)` and `[s2,e2)` overlap iff
//! `s1 < e2 && s2 < e1`. Touching windows never conflict.
//!
//! # Fail-soft
//!
//! Malformed windows and claims naming jobs absent from the snapshot are
//! skipped and logged. The detector never returns an error and never
//! panics; bad upstream data degrades to "no conflict reported".

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, warn};

use crate::models::{ConflictVerdict, Job, ResourceReservation, TeamAssignment, TimeWindow};

/// Whether cancelled jobs participate in conflict checks.
///
/// The calendar hides cancelled jobs, but a cancelled job's gear may
/// still be physically booked out, so inclusion is the default and
/// exclusion an explicit choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CancelledPolicy {
    /// Cancelled jobs claim resources and people like any other job.
    #[default]
    Include,
    /// Cancelled jobs are invisible to the detector.
    Exclude,
}

/// Snapshot version tuple `(jobs, reservations, assignments)`.
///
/// The caller bumps a component whenever the corresponding collection
/// changes; [`VerdictCache`] recomputes only on a version change.
pub type SnapshotVersion = (u64, u64, u64);

/// Pure conflict-detection engine over snapshot collections.
///
/// Holds no state beyond its policy knobs: running it twice on an
/// unchanged snapshot yields identical verdicts.
///
/// # Example
///
/// ```
/// use booking_conflicts::detector::ConflictDetector;
/// use booking_conflicts::models::{Job, ResourceReservation};
///
/// let jobs = vec![
///     Job::new("X", 0).with_end(7_200_000),
///     Job::new("Y", 3_600_000).with_end(10_800_000),
/// ];
/// let reservations = vec![
///     ResourceReservation::new("X", "camera-1", 0, 7_200_000),
///     ResourceReservation::new("Y", "camera-1", 3_600_000, 10_800_000),
/// ];
///
/// let verdicts = ConflictDetector::new().compute_all_conflicts(&jobs, &reservations, &[]);
/// assert!(verdicts["X"].has_resource_conflict);
/// assert!(verdicts["Y"].conflicting_job_ids.contains("X"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConflictDetector {
    cancelled_policy: CancelledPolicy,
}

/// A normalized claim inside one resource or member group.
#[derive(Debug, Clone, Copy)]
struct Claim<'a> {
    job_id: &'a str,
    window: TimeWindow,
}

impl ConflictDetector {
    /// Creates a detector with the default policy (cancelled jobs included).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the cancelled-job policy.
    pub fn with_cancelled_policy(mut self, policy: CancelledPolicy) -> Self {
        self.cancelled_policy = policy;
        self
    }

    /// Computes verdicts for every job in the snapshot.
    ///
    /// Returns one verdict per job id, clear verdicts included. The map
    /// and the id sets inside each verdict are ordered, so consecutive
    /// runs over an unchanged snapshot serialize identically.
    pub fn compute_all_conflicts(
        &self,
        jobs: &[Job],
        reservations: &[ResourceReservation],
        assignments: &[TeamAssignment],
    ) -> BTreeMap<String, ConflictVerdict> {
        self.compute_batch(jobs, reservations, assignments, None)
            .unwrap_or_default()
    }

    /// Batch computation with cooperative cancellation.
    ///
    /// Checks `cancel` between per-group sweeps; returns `None` as soon
    /// as it observes the flag. No partial result is ever published —
    /// a stale in-flight computation is abandoned whole.
    pub fn compute_all_conflicts_cancellable(
        &self,
        jobs: &[Job],
        reservations: &[ResourceReservation],
        assignments: &[TeamAssignment],
        cancel: &AtomicBool,
    ) -> Option<BTreeMap<String, ConflictVerdict>> {
        self.compute_batch(jobs, reservations, assignments, Some(cancel))
    }

    /// Computes the verdict for a single job against the snapshot.
    ///
    /// The window is passed explicitly so callers can probe an unsaved
    /// reschedule before committing it. The personnel check runs against
    /// `[target_start, target_end)`; resource checks use each
    /// reservation's own stored window. A target the cancelled policy
    /// excludes reports clear, matching the batch form.
    pub fn compute_conflicts(
        &self,
        target_job_id: &str,
        target_start_ms: i64,
        target_end_ms: i64,
        reservations: &[ResourceReservation],
        assignments: &[TeamAssignment],
        jobs: &[Job],
    ) -> ConflictVerdict {
        let mut verdict = ConflictVerdict::clear(target_job_id);
        let jobs_by_id = index_jobs(jobs);
        if let Some(job) = jobs_by_id.get(target_job_id) {
            if self.excluded(job) {
                return verdict;
            }
        }

        let by_resource = self.group_reservations(reservations, &jobs_by_id);
        for reservation in reservations.iter().filter(|r| r.job_id == target_job_id) {
            let window = reservation.window();
            if !window.is_well_formed() {
                // Already logged while grouping.
                continue;
            }
            let Some(group) = by_resource.get(reservation.resource_id.as_str()) else {
                continue;
            };
            for other in group.iter().filter(|c| c.job_id != target_job_id) {
                if window.overlaps(&other.window) {
                    verdict.record_resource_conflict(&reservation.resource_id, other.job_id);
                }
            }
        }

        let target_window = TimeWindow::new(target_start_ms, target_end_ms);
        if !target_window.is_well_formed() {
            warn!("job {target_job_id}: non-positive probe window, skipping personnel checks");
            return verdict;
        }
        let by_member = self.group_assignments(assignments, &jobs_by_id);
        for assignment in assignments.iter().filter(|a| a.job_id == target_job_id) {
            let Some(group) = by_member.get(assignment.member_id.as_str()) else {
                continue;
            };
            for other in group.iter().filter(|c| c.job_id != target_job_id) {
                if target_window.overlaps(&other.window) {
                    verdict.record_team_conflict(other.job_id);
                }
            }
        }

        verdict
    }

    fn compute_batch(
        &self,
        jobs: &[Job],
        reservations: &[ResourceReservation],
        assignments: &[TeamAssignment],
        cancel: Option<&AtomicBool>,
    ) -> Option<BTreeMap<String, ConflictVerdict>> {
        let jobs_by_id = index_jobs(jobs);
        let mut verdicts: BTreeMap<String, ConflictVerdict> = jobs
            .iter()
            .map(|j| (j.id.clone(), ConflictVerdict::clear(&j.id)))
            .collect();

        let by_resource = self.group_reservations(reservations, &jobs_by_id);
        for (&resource_id, group) in &by_resource {
            if is_cancelled(cancel) {
                return None;
            }
            sweep_group(group, |a, b| {
                if let Some(v) = verdicts.get_mut(a) {
                    v.record_resource_conflict(resource_id, b);
                }
                if let Some(v) = verdicts.get_mut(b) {
                    v.record_resource_conflict(resource_id, a);
                }
            });
        }

        let by_member = self.group_assignments(assignments, &jobs_by_id);
        for group in by_member.values() {
            if is_cancelled(cancel) {
                return None;
            }
            sweep_group(group, |a, b| {
                if let Some(v) = verdicts.get_mut(a) {
                    v.record_team_conflict(b);
                }
                if let Some(v) = verdicts.get_mut(b) {
                    v.record_team_conflict(a);
                }
            });
        }

        Some(verdicts)
    }

    /// Groups reservations by resource, each group sorted by `(start, job id)`.
    ///
    /// Malformed windows and reservations naming jobs absent from the
    /// snapshot contribute no claim.
    fn group_reservations<'a>(
        &self,
        reservations: &'a [ResourceReservation],
        jobs_by_id: &HashMap<&'a str, &'a Job>,
    ) -> HashMap<&'a str, Vec<Claim<'a>>> {
        let mut groups: HashMap<&str, Vec<Claim<'_>>> = HashMap::new();
        for r in reservations {
            let window = r.window();
            if !window.is_well_formed() {
                warn!(
                    "skipping reservation of {} by job {}: non-positive window",
                    r.resource_id, r.job_id
                );
                continue;
            }
            let Some(job) = jobs_by_id.get(r.job_id.as_str()) else {
                debug!(
                    "skipping reservation of {} by job {}: job absent from snapshot",
                    r.resource_id, r.job_id
                );
                continue;
            };
            if self.excluded(job) {
                continue;
            }
            groups.entry(r.resource_id.as_str()).or_default().push(Claim {
                job_id: r.job_id.as_str(),
                window,
            });
        }
        sort_groups(&mut groups);
        groups
    }

    /// Groups assignments by member; the claim window is the parent
    /// job's effective window.
    fn group_assignments<'a>(
        &self,
        assignments: &'a [TeamAssignment],
        jobs_by_id: &HashMap<&'a str, &'a Job>,
    ) -> HashMap<&'a str, Vec<Claim<'a>>> {
        let mut groups: HashMap<&str, Vec<Claim<'_>>> = HashMap::new();
        for a in assignments {
            let Some(job) = jobs_by_id.get(a.job_id.as_str()) else {
                debug!(
                    "skipping assignment of {} to job {}: job absent from snapshot",
                    a.member_id, a.job_id
                );
                continue;
            };
            if self.excluded(job) {
                continue;
            }
            let window = job.window();
            if !window.is_well_formed() {
                warn!(
                    "skipping assignment of {} to job {}: non-positive job window",
                    a.member_id, a.job_id
                );
                continue;
            }
            groups.entry(a.member_id.as_str()).or_default().push(Claim {
                job_id: a.job_id.as_str(),
                window,
            });
        }
        sort_groups(&mut groups);
        groups
    }

    fn excluded(&self, job: &Job) -> bool {
        self.cancelled_policy == CancelledPolicy::Exclude && job.is_cancelled()
    }
}

/// Version-keyed memoization wrapper around [`ConflictDetector`].
///
/// The detector is a pure function of its inputs, so a verdict map stays
/// valid as long as the snapshot it was computed from is unchanged. The
/// caller keys recomputation on a [`SnapshotVersion`] tuple it bumps on
/// every data change.
#[derive(Debug, Default)]
pub struct VerdictCache {
    detector: ConflictDetector,
    version: Option<SnapshotVersion>,
    verdicts: BTreeMap<String, ConflictVerdict>,
}

impl VerdictCache {
    /// Creates a cache around the given detector.
    pub fn new(detector: ConflictDetector) -> Self {
        Self {
            detector,
            version: None,
            verdicts: BTreeMap::new(),
        }
    }

    /// Returns the verdicts for the given snapshot version, recomputing
    /// only when the version differs from the cached one.
    pub fn verdicts(
        &mut self,
        version: SnapshotVersion,
        jobs: &[Job],
        reservations: &[ResourceReservation],
        assignments: &[TeamAssignment],
    ) -> &BTreeMap<String, ConflictVerdict> {
        if self.version != Some(version) {
            self.verdicts = self
                .detector
                .compute_all_conflicts(jobs, reservations, assignments);
            self.version = Some(version);
        }
        &self.verdicts
    }

    /// Drops the cached verdicts; the next call recomputes.
    pub fn invalidate(&mut self) {
        self.version = None;
        self.verdicts.clear();
    }
}

fn index_jobs(jobs: &[Job]) -> HashMap<&str, &Job> {
    jobs.iter().map(|j| (j.id.as_str(), j)).collect()
}

fn is_cancelled(cancel: Option<&AtomicBool>) -> bool {
    cancel.is_some_and(|c| c.load(Ordering::Relaxed))
}

fn sort_groups(groups: &mut HashMap<&str, Vec<Claim<'_>>>) {
    for group in groups.values_mut() {
        group.sort_by(|a, b| {
            (a.window.start_ms, a.job_id).cmp(&(b.window.start_ms, b.job_id))
        });
    }
}

/// Sweeps one sorted group, invoking `on_pair` for every pair of
/// overlapping claims on different jobs.
///
/// Claims arrive in start order, so a previously seen claim overlaps the
/// incoming one iff its end lies beyond the incoming start; claims whose
/// windows have closed are pruned as the sweep advances. Two claims of
/// the same job never pair, so a job reserving one resource twice does
/// not conflict with itself.
fn sweep_group(claims: &[Claim<'_>], mut on_pair: impl FnMut(&str, &str)) {
    let mut open: Vec<Claim<'_>> = Vec::new();
    for claim in claims {
        open.retain(|o| o.window.end_ms > claim.window.start_ms);
        for o in &open {
            if o.job_id != claim.job_id {
                on_pair(o.job_id, claim.job_id);
            }
        }
        open.push(*claim);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobStatus;

    const HOUR: i64 = 3_600_000;

    fn job(id: &str, start_h: i64, end_h: i64) -> Job {
        Job::new(id, start_h * HOUR).with_end(end_h * HOUR)
    }

    fn reservation(job_id: &str, resource_id: &str, from_h: i64, until_h: i64) -> ResourceReservation {
        ResourceReservation::new(job_id, resource_id, from_h * HOUR, until_h * HOUR)
    }

    #[test]
    fn test_overlapping_reservations_flag_both_jobs() {
        // Job X reserves Camera#1 [10:00,12:00); Job Y reserves it [11:00,13:00)
        let jobs = vec![job("X", 10, 12), job("Y", 11, 13)];
        let reservations = vec![
            reservation("X", "camera-1", 10, 12),
            reservation("Y", "camera-1", 11, 13),
        ];

        let verdicts = ConflictDetector::new().compute_all_conflicts(&jobs, &reservations, &[]);

        assert!(verdicts["X"].has_resource_conflict);
        assert!(verdicts["Y"].has_resource_conflict);
        assert!(verdicts["X"].conflicting_job_ids.contains("Y"));
        assert!(verdicts["Y"].conflicting_job_ids.contains("X"));
        assert!(verdicts["X"].conflicting_resource_ids.contains("camera-1"));
        assert!(verdicts["Y"].conflicting_resource_ids.contains("camera-1"));
    }

    #[test]
    fn test_touching_reservations_do_not_conflict() {
        // [10:00,12:00) and [12:00,14:00) share only the boundary instant
        let jobs = vec![job("X", 10, 12), job("Y", 12, 14)];
        let reservations = vec![
            reservation("X", "camera-1", 10, 12),
            reservation("Y", "camera-1", 12, 14),
        ];

        let verdicts = ConflictDetector::new().compute_all_conflicts(&jobs, &reservations, &[]);

        assert!(!verdicts["X"].has_resource_conflict);
        assert!(!verdicts["Y"].has_resource_conflict);
        assert!(verdicts["X"].conflicting_job_ids.is_empty());
    }

    #[test]
    fn test_member_double_booking() {
        // Ana covers the wedding [10:00,12:00) and the portrait [11:30,13:00)
        let jobs = vec![
            job("X", 10, 12).with_job_type("wedding"),
            Job::new("Y", 11 * HOUR + HOUR / 2)
                .with_end(13 * HOUR)
                .with_job_type("portrait"),
        ];
        let assignments = vec![
            TeamAssignment::new("X", "ana"),
            TeamAssignment::new("Y", "ana"),
        ];

        let verdicts = ConflictDetector::new().compute_all_conflicts(&jobs, &[], &assignments);

        assert!(verdicts["X"].has_team_conflict);
        assert!(verdicts["Y"].has_team_conflict);
        assert!(verdicts["X"].conflicting_job_ids.contains("Y"));
        assert!(verdicts["Y"].conflicting_job_ids.contains("X"));
        assert!(!verdicts["X"].has_resource_conflict);
    }

    #[test]
    fn test_sole_reservation_is_clear() {
        let jobs = vec![job("X", 10, 12), job("Y", 10, 12)];
        let reservations = vec![reservation("X", "drone-1", 10, 12)];

        let verdicts = ConflictDetector::new().compute_all_conflicts(&jobs, &reservations, &[]);

        assert!(!verdicts["X"].has_resource_conflict);
        assert!(!verdicts["Y"].has_resource_conflict);
    }

    #[test]
    fn test_no_claims_is_trivially_clear() {
        let jobs = vec![job("X", 10, 12)];
        let verdicts = ConflictDetector::new().compute_all_conflicts(&jobs, &[], &[]);
        assert!(!verdicts["X"].has_any_conflict());
    }

    #[test]
    fn test_same_job_does_not_self_conflict() {
        // One job books the same camera twice over overlapping windows
        let jobs = vec![job("X", 10, 14)];
        let reservations = vec![
            reservation("X", "camera-1", 10, 12),
            reservation("X", "camera-1", 11, 14),
        ];

        let verdicts = ConflictDetector::new().compute_all_conflicts(&jobs, &reservations, &[]);

        assert!(!verdicts["X"].has_resource_conflict);
        assert!(verdicts["X"].conflicting_job_ids.is_empty());
    }

    #[test]
    fn test_implied_two_hour_duration_in_team_check() {
        // X has no end: effective window [10:00,12:00)
        let jobs = vec![Job::new("X", 10 * HOUR), job("Y", 11, 13)];
        let assignments = vec![
            TeamAssignment::new("X", "ana"),
            TeamAssignment::new("Y", "ana"),
        ];

        let verdicts = ConflictDetector::new().compute_all_conflicts(&jobs, &[], &assignments);
        assert!(verdicts["X"].has_team_conflict);
        assert!(verdicts["Y"].has_team_conflict);
    }

    #[test]
    fn test_implied_duration_boundary_touch() {
        // X implied [10:00,12:00); Y starts exactly at 12:00
        let jobs = vec![Job::new("X", 10 * HOUR), job("Y", 12, 14)];
        let assignments = vec![
            TeamAssignment::new("X", "ana"),
            TeamAssignment::new("Y", "ana"),
        ];

        let verdicts = ConflictDetector::new().compute_all_conflicts(&jobs, &[], &assignments);
        assert!(!verdicts["X"].has_team_conflict);
        assert!(!verdicts["Y"].has_team_conflict);
    }

    #[test]
    fn test_batch_is_idempotent() {
        let jobs = vec![job("X", 10, 12), job("Y", 11, 13), job("Z", 9, 10)];
        let reservations = vec![
            reservation("X", "camera-1", 10, 12),
            reservation("Y", "camera-1", 11, 13),
            reservation("Z", "light-1", 9, 10),
        ];
        let assignments = vec![
            TeamAssignment::new("X", "ana"),
            TeamAssignment::new("Z", "ana"),
        ];

        let detector = ConflictDetector::new();
        let first = detector.compute_all_conflicts(&jobs, &reservations, &assignments);
        let second = detector.compute_all_conflicts(&jobs, &reservations, &assignments);
        assert_eq!(first, second);
    }

    #[test]
    fn test_malformed_reservation_is_skipped() {
        // Zero-length and inverted windows participate in no overlap
        let jobs = vec![job("X", 10, 12), job("Y", 10, 12)];
        let reservations = vec![
            reservation("X", "camera-1", 10, 10),
            reservation("X", "camera-1", 12, 10),
            reservation("Y", "camera-1", 10, 12),
        ];

        let verdicts = ConflictDetector::new().compute_all_conflicts(&jobs, &reservations, &[]);
        assert!(!verdicts["X"].has_resource_conflict);
        assert!(!verdicts["Y"].has_resource_conflict);
    }

    #[test]
    fn test_malformed_job_window_kills_team_claims_only() {
        // X's own window is inverted, so its assignment claims nothing,
        // but its reservations keep their explicit windows.
        let jobs = vec![job("X", 12, 10), job("Y", 10, 13)];
        let reservations = vec![
            reservation("X", "camera-1", 10, 12),
            reservation("Y", "camera-1", 11, 13),
        ];
        let assignments = vec![
            TeamAssignment::new("X", "ana"),
            TeamAssignment::new("Y", "ana"),
        ];

        let verdicts =
            ConflictDetector::new().compute_all_conflicts(&jobs, &reservations, &assignments);
        assert!(verdicts["X"].has_resource_conflict);
        assert!(!verdicts["X"].has_team_conflict);
        assert!(!verdicts["Y"].has_team_conflict);
    }

    #[test]
    fn test_dangling_references_contribute_nothing() {
        let jobs = vec![job("X", 10, 12)];
        let reservations = vec![
            reservation("X", "camera-1", 10, 12),
            reservation("GONE", "camera-1", 10, 12),
        ];
        let assignments = vec![
            TeamAssignment::new("X", "ana"),
            TeamAssignment::new("GONE", "ana"),
        ];

        let verdicts =
            ConflictDetector::new().compute_all_conflicts(&jobs, &reservations, &assignments);
        assert!(!verdicts["X"].has_any_conflict());
        assert!(!verdicts.contains_key("GONE"));
    }

    #[test]
    fn test_cancelled_jobs_participate_by_default() {
        let jobs = vec![
            job("X", 10, 12),
            job("Y", 11, 13).with_status(JobStatus::Cancelled),
        ];
        let reservations = vec![
            reservation("X", "camera-1", 10, 12),
            reservation("Y", "camera-1", 11, 13),
        ];

        let verdicts = ConflictDetector::new().compute_all_conflicts(&jobs, &reservations, &[]);
        assert!(verdicts["X"].has_resource_conflict);
        assert!(verdicts["Y"].has_resource_conflict);
    }

    #[test]
    fn test_cancelled_jobs_excluded_on_request() {
        let jobs = vec![
            job("X", 10, 12),
            job("Y", 11, 13).with_status(JobStatus::Cancelled),
        ];
        let reservations = vec![
            reservation("X", "camera-1", 10, 12),
            reservation("Y", "camera-1", 11, 13),
        ];

        let detector =
            ConflictDetector::new().with_cancelled_policy(CancelledPolicy::Exclude);
        let verdicts = detector.compute_all_conflicts(&jobs, &reservations, &[]);
        assert!(!verdicts["X"].has_resource_conflict);
        // The cancelled job still gets a (clear) verdict
        assert!(!verdicts["Y"].has_resource_conflict);
    }

    #[test]
    fn test_single_job_probe_respects_cancelled_policy() {
        let jobs = vec![
            job("X", 10, 12).with_status(JobStatus::Cancelled),
            job("Y", 11, 13),
        ];
        let reservations = vec![
            reservation("X", "camera-1", 10, 12),
            reservation("Y", "camera-1", 11, 13),
        ];

        let detector =
            ConflictDetector::new().with_cancelled_policy(CancelledPolicy::Exclude);
        let probe =
            detector.compute_conflicts("X", 10 * HOUR, 12 * HOUR, &reservations, &[], &jobs);
        assert!(!probe.has_any_conflict());
    }

    #[test]
    fn test_three_way_contention() {
        let jobs = vec![job("A", 10, 13), job("B", 11, 14), job("C", 12, 15)];
        let reservations = vec![
            reservation("A", "van-1", 10, 13),
            reservation("B", "van-1", 11, 14),
            reservation("C", "van-1", 12, 15),
        ];

        let verdicts = ConflictDetector::new().compute_all_conflicts(&jobs, &reservations, &[]);
        assert!(verdicts["A"].conflicting_job_ids.contains("B"));
        assert!(verdicts["A"].conflicting_job_ids.contains("C"));
        assert!(verdicts["B"].conflicting_job_ids.contains("A"));
        assert!(verdicts["B"].conflicting_job_ids.contains("C"));
        assert!(verdicts["C"].conflicting_job_ids.contains("A"));
        assert!(verdicts["C"].conflicting_job_ids.contains("B"));
    }

    #[test]
    fn test_single_job_probe_matches_batch() {
        let jobs = vec![job("X", 10, 12), job("Y", 11, 13)];
        let reservations = vec![
            reservation("X", "camera-1", 10, 12),
            reservation("Y", "camera-1", 11, 13),
        ];
        let assignments = vec![
            TeamAssignment::new("X", "ana"),
            TeamAssignment::new("Y", "ana"),
        ];

        let detector = ConflictDetector::new();
        let batch = detector.compute_all_conflicts(&jobs, &reservations, &assignments);
        let single = detector.compute_conflicts(
            "X",
            10 * HOUR,
            12 * HOUR,
            &reservations,
            &assignments,
            &jobs,
        );
        assert_eq!(single, batch["X"]);
    }

    #[test]
    fn test_single_job_probe_what_if_window() {
        // Moving X to [13:00,15:00) would clear Ana's double-booking
        let jobs = vec![job("X", 10, 12), job("Y", 11, 13)];
        let assignments = vec![
            TeamAssignment::new("X", "ana"),
            TeamAssignment::new("Y", "ana"),
        ];

        let detector = ConflictDetector::new();
        let now = detector.compute_conflicts("X", 10 * HOUR, 12 * HOUR, &[], &assignments, &jobs);
        assert!(now.has_team_conflict);

        let moved = detector.compute_conflicts("X", 13 * HOUR, 15 * HOUR, &[], &assignments, &jobs);
        assert!(!moved.has_team_conflict);
    }

    #[test]
    fn test_cancellable_abandons_whole() {
        let jobs = vec![job("X", 10, 12), job("Y", 11, 13)];
        let reservations = vec![
            reservation("X", "camera-1", 10, 12),
            reservation("Y", "camera-1", 11, 13),
        ];

        let cancel = AtomicBool::new(true);
        let result = ConflictDetector::new().compute_all_conflicts_cancellable(
            &jobs,
            &reservations,
            &[],
            &cancel,
        );
        assert!(result.is_none());

        let cancel = AtomicBool::new(false);
        let result = ConflictDetector::new().compute_all_conflicts_cancellable(
            &jobs,
            &reservations,
            &[],
            &cancel,
        );
        assert!(result.is_some());
    }

    #[test]
    fn test_verdict_cache_recomputes_on_version_change() {
        let jobs = vec![job("X", 10, 12), job("Y", 11, 13)];
        let reservations = vec![
            reservation("X", "camera-1", 10, 12),
            reservation("Y", "camera-1", 11, 13),
        ];

        let mut cache = VerdictCache::new(ConflictDetector::new());
        let first = cache.verdicts((1, 1, 1), &jobs, &reservations, &[]).clone();
        assert!(first["X"].has_resource_conflict);

        // Same version: the cached map is returned even though the
        // reservations have changed underneath.
        let stale = cache.verdicts((1, 1, 1), &jobs, &[], &[]).clone();
        assert_eq!(stale, first);

        // Bumped version: recomputed against the emptied reservations.
        let fresh = cache.verdicts((1, 2, 1), &jobs, &[], &[]).clone();
        assert!(!fresh["X"].has_resource_conflict);

        cache.invalidate();
        let recomputed = cache.verdicts((1, 2, 1), &jobs, &reservations, &[]).clone();
        assert_eq!(recomputed, first);
    }

    /// Cross-checks the swept batch against a naive pairwise oracle on a
    /// seeded 500-job dataset drawing from a pool of 20 resources and 8
    /// team members.
    #[test]
    fn test_large_batch_matches_naive_oracle() {
        use rand::rngs::SmallRng;
        use rand::{Rng, SeedableRng};

        let mut rng = SmallRng::seed_from_u64(42);
        let mut jobs = Vec::new();
        let mut reservations = Vec::new();
        let mut assignments = Vec::new();

        for i in 0..500 {
            let id = format!("J{i:03}");
            let start = rng.random_range(0..720) * HOUR / 4;
            let duration = rng.random_range(1..=16) * HOUR / 4;
            jobs.push(Job::new(&id, start).with_end(start + duration));

            for _ in 0..rng.random_range(1..=3) {
                let resource = format!("R{:02}", rng.random_range(0..20));
                let from = start - rng.random_range(0..=2) * HOUR / 4;
                let until = start + duration + rng.random_range(0..=2) * HOUR / 4;
                reservations.push(ResourceReservation::new(&id, resource, from, until));
            }
            if rng.random_range(0..3) > 0 {
                let member = format!("M{}", rng.random_range(0..8));
                assignments.push(TeamAssignment::new(&id, member));
            }
        }

        let swept =
            ConflictDetector::new().compute_all_conflicts(&jobs, &reservations, &assignments);
        let naive = naive_conflicts(&jobs, &reservations, &assignments);
        assert_eq!(swept, naive);
    }

    /// O(n²) reference implementation used only to validate the sweep.
    fn naive_conflicts(
        jobs: &[Job],
        reservations: &[ResourceReservation],
        assignments: &[TeamAssignment],
    ) -> BTreeMap<String, ConflictVerdict> {
        let by_id: HashMap<&str, &Job> = jobs.iter().map(|j| (j.id.as_str(), j)).collect();
        let mut verdicts: BTreeMap<String, ConflictVerdict> = jobs
            .iter()
            .map(|j| (j.id.clone(), ConflictVerdict::clear(&j.id)))
            .collect();

        for (i, a) in reservations.iter().enumerate() {
            for b in &reservations[i + 1..] {
                if a.resource_id != b.resource_id
                    || a.job_id == b.job_id
                    || !a.window().is_well_formed()
                    || !b.window().is_well_formed()
                    || !by_id.contains_key(a.job_id.as_str())
                    || !by_id.contains_key(b.job_id.as_str())
                    || !a.window().overlaps(&b.window())
                {
                    continue;
                }
                if let Some(v) = verdicts.get_mut(&a.job_id) {
                    v.record_resource_conflict(&a.resource_id, &b.job_id);
                }
                if let Some(v) = verdicts.get_mut(&b.job_id) {
                    v.record_resource_conflict(&b.resource_id, &a.job_id);
                }
            }
        }

        for (i, a) in assignments.iter().enumerate() {
            for b in &assignments[i + 1..] {
                if a.member_id != b.member_id || a.job_id == b.job_id {
                    continue;
                }
                let (Some(ja), Some(jb)) = (
                    by_id.get(a.job_id.as_str()),
                    by_id.get(b.job_id.as_str()),
                ) else {
                    continue;
                };
                if !ja.window().is_well_formed()
                    || !jb.window().is_well_formed()
                    || !ja.window().overlaps(&jb.window())
                {
                    continue;
                }
                if let Some(v) = verdicts.get_mut(&a.job_id) {
                    v.record_team_conflict(&b.job_id);
                }
                if let Some(v) = verdicts.get_mut(&b.job_id) {
                    v.record_team_conflict(&a.job_id);
                }
            }
        }

        verdicts
    }
}
