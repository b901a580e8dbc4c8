//! Path resolution, tree mutation, and declarative mapping over JSON-like trees.

/// Tree values, the path mini-language, sentinel-driven rewriting, and the mapper pipeline.
pub mod tree;
