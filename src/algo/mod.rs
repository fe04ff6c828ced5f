//! The category consolidation engine: pure, synchronous, no I/O.
//!
//! `normalize` → `clustering` (with `synonyms`) → `naming` → `merge`.

pub mod categories;
pub mod clustering;
pub mod merge;
pub mod naming;
pub mod normalize;
pub mod synonyms;

pub use categories::{ConsolidatedCategory, RawCategories, RawCategoryEntry};
pub use merge::consolidate;
