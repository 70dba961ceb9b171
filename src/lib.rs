//! Rule-driven requirement classification and dispatch allocation for
//! browser dispatch-simulation games.
//!
//! The crate takes a snapshot of the world — a catalog of resource-type
//! rules, the player's vehicle inventory, and a batch of scraped open
//! missions — and answers one question: which concrete vehicles should be
//! committed to which mission, and which missions are not worth a dispatch
//! at all.
//!
//! ## Pipeline
//!
//! ```text
//! rule files  ── catalog::load_dir       (catalog/records.rs)
//!                       │
//!                       v
//!              Classifier::compile        (catalog/compile.rs)
//!                - normalized exact index
//!                - compiled pattern-expression rules
//!                - quantity-conversion rules
//!                - capability tags (WATER, FOAM, ...)
//!                       │
//! missions ─────────────┼────────────────────────────┐
//! inventory ────────────┤                            │
//!                       v                            v
//!              engine::evaluate              engine::allocate
//!              (feasibility, read-only)      (greedy commitment,
//!                                             pass-scoped used set)
//!                       │                            │
//!                       └────────────┬───────────────┘
//!                                    v
//!                            Vec<DispatchPlan>
//! ```
//!
//! The classifier is immutable after compile and can be queried from any
//! number of threads. An allocation pass is sequential: it threads one
//! "used instance ids" set through every selection step so that no vehicle
//! is promised to two missions at once. Nothing in the core performs IO;
//! the browser-driving, scraping, and scheduling layers live outside this
//! crate and talk to it through plain data types.

#[macro_use]
mod macros;
mod api;
mod catalog;
mod classifier;
mod engine;

pub use api::{
    DispatchPlan, Inventory, MissionRecord, Options, PriorityClass, RequirementLine, Tank, Verdict,
    plan_dispatch,
};
pub use catalog::{
    CapabilitySet, CatalogData, CatalogError, ExtendPattern, PatternBlock, TypeRecord, load_dir,
};
pub use classifier::{Classifier, TypeId};
pub use engine::{Feasibility, allocate, evaluate};
