//! Rule database loading and compilation.
//!
//! This module holds the *static* side of the engine: everything that is
//! derived once from the declarative rule files and never mutated afterwards.
//!
//! Loading is intentionally split into two phases:
//!
//! 1. **Records** (`records.rs`): deserialize the on-disk rule files into
//!    plain `TypeRecord`s plus the top-level category map, with no
//!    interpretation beyond JSON parsing.
//! 2. **Compile** (`compile.rs`): turn the records into a [`Classifier`] —
//!    build the normalized exact index, compile pattern-expression and
//!    quantity rules, and derive capability tags from keyword sets.
//!
//! ## Failure policy
//!
//! A rule file that cannot be read or parsed is logged and skipped; the load
//! only fails outright when *nothing* usable was found. A single pattern
//! expression that fails to compile as a regex is dropped with a warning and
//! the rest of its record survives. Nothing in this module panics on bad
//! rule data.
//!
//! ## Invariants
//!
//! - Records are sorted by canonical type id before compilation, so index
//!   contents and rule declaration order are independent of directory
//!   iteration order.
//! - The compiled [`Classifier`] is immutable and `Send + Sync`.
//!
//! [`Classifier`]: crate::Classifier

#[path = "catalog/compile.rs"]
mod compile;
#[path = "catalog/records.rs"]
mod records;

pub use compile::CapabilitySet;
pub(crate) use compile::build;
pub use records::{CatalogData, CatalogError, ExtendPattern, PatternBlock, TypeRecord, load_dir};
