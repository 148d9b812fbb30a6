//! Utilities for interfacing with the Dock and the per-user directories it
//! keeps its database in.

pub mod dock;
pub mod paths;
