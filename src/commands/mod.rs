//! Commands module - CLI command implementations.

pub mod indexes;
pub mod serve;
