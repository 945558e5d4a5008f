//! Loop analysis and result types
//!
//! - Loop point search and seam synthesis
//! - Result types handed to the pack persistence layer
//! - Sample introspection

pub mod loop_stitcher;
pub mod result;
pub mod summary;
