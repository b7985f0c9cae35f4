//! Core metadata types.

mod metadata;

pub use metadata::*;
