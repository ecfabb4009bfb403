//! Whole-sweep scenarios over snapshot inventories written to disk.

pub mod fixtures;

mod sweep;
