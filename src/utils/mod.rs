//! Shared helpers for the generator.

pub mod date;
pub mod exec;
pub mod path;
