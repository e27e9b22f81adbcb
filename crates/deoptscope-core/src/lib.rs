//! Deoptscope Core
//!
//! Core types and interfaces for the Deoptscope trace-log analysis engine.

pub mod config;
pub mod error;
pub mod location;
pub mod position;
pub mod range;

pub use error::{Error, Result};
pub use location::{FileId, Location};
pub use position::Position;
pub use range::Range;
