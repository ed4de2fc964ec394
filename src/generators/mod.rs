//! Output name generators.

pub mod filename;
pub mod folder;
