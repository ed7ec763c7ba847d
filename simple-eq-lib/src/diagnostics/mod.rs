//! Performance diagnostics.

pub mod bench;
