//! Wire formats for diff batches.

pub mod json;
