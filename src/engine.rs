//! Feasibility evaluation and dispatch allocation.
//!
//! This module is the operational core of the crate. Given an immutable
//! [`Classifier`](crate::Classifier), a prioritized batch of missions, and
//! one inventory snapshot, an allocation pass runs:
//!
//! ```text
//! missions ── sort (forced first, then credits desc, stable)
//!                │
//!                v                 per mission
//!        evaluate (feasibility.rs) ── go / no-go + reason
//!                │                    (read-only simulation pool)
//!                v
//!        allocate (allocator.rs)
//!          (1) named requirement lines, declared order
//!          (2) ambulance pass (patients)
//!          (3) water/foam top-up via capability tags
//!          (4) empty commitment -> downgrade to Skip
//!                │
//!                v
//!         Vec<DispatchPlan>
//! ```
//!
//! One "used instance ids" set is threaded through the whole pass; the
//! feasibility evaluator sees it but never mutates it, the allocator owns
//! it. Running the same pass twice over the same snapshot yields identical
//! plans.
//!
//! No condition in here is fatal: unresolved requirement lines are skipped,
//! infeasible or empty-commitment missions degrade to a `Skip` verdict with
//! the reason carried on the plan.

#[path = "engine/allocator.rs"]
mod allocator;
#[path = "engine/feasibility.rs"]
mod feasibility;

pub use allocator::allocate;
pub use feasibility::{Feasibility, evaluate};
