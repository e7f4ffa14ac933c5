//! Domain types shared by the embedding pipeline.

pub mod errors;
pub mod model;
