//! This module compares a labelling produced by clustering with a reference labelling.
//! The labellings are seen as affectations of data ids to labels, and compared through their contingency table.
//!

pub mod affect;
pub mod contingency;

pub use affect::*;
pub use contingency::*;
