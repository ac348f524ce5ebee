//! Breadth-first shortest paths over the directed exit graph.

mod core;

pub use core::find_path;
