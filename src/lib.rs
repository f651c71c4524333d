//! Booking conflict detection engine.
//!
//! Given time-boxed jobs and many-to-many claims on shared resources
//! (equipment) and personnel (team members), determines for every job
//! whether any of its claims are double-booked against an overlapping
//! time window elsewhere in the schedule, and projects the annotated
//! jobs into month/week/day calendar buckets for presentation.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Job`, `ResourceReservation`,
//!   `TeamAssignment`, `ConflictVerdict`, `TimeWindow`
//! - **`detector`**: The conflict engine — claims grouped per resource
//!   and member, sorted, and swept once per group
//! - **`calendar`**: Month/week/day bucketing of verdict-annotated jobs
//! - **`normalize`**: Loosely-typed row → typed record boundary adapter
//! - **`validation`**: Snapshot integrity diagnostics (advisory)
//! - **`summary`**: Dashboard-level conflict rollup
//!
//! # Architecture
//!
//! The detector and the bucketer are synchronous, side-effect-free
//! functions over snapshot collections supplied by the surrounding data
//! layer. Verdicts are derived, never stored. Every malformed or
//! dangling input degrades to "no conflict reported" — the output is an
//! advisory annotation on top of otherwise-functional screens, not a
//! validation gate.
//!
//! # References
//!
//! - Kleinberg & Tardos (2006), "Algorithm Design", Ch. 4 (interval scheduling)
//! - de Berg et al. (2008), "Computational Geometry", Ch. 2 (plane sweep)

pub mod calendar;
pub mod detector;
pub mod models;
pub mod normalize;
pub mod summary;
pub mod validation;
