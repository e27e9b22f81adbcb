//! Deoptscope Index
//!
//! Interval-indexed associative containers mapping text ranges (and
//! file-qualified ranges) to values, with containment, contained-by,
//! intersection, and nearest-containing queries over thousands of entries.
//!
//! [`RangeMap`] is the production container: a single ordered tree under the
//! canonical ordering (ascending start, descending end for ties), which is
//! what every query's early-termination pruning relies on. [`LocationMap`]
//! shards one `RangeMap` per file. The [`strategy`] module keeps the
//! alternative backing stores alive as benchmark subjects behind the
//! [`RangeStore`] trait.

mod location_map;
mod range_map;
pub mod strategy;

pub use location_map::LocationMap;
pub use range_map::RangeMap;
pub use strategy::RangeStore;
