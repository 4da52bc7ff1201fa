//! Graph representation module

pub mod mirrored;

pub use mirrored::{EdgeRecord, EdgeStatus, MirroredGraph};
