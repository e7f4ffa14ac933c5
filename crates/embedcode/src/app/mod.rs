//! Application layer: the embed pipeline and the document adapter built on it.

pub mod assemble;
pub mod extract;
pub mod meta;
pub mod range;
pub mod render;
pub mod resolve;
