//! Console frame buffer type identification library.

#[macro_use]
mod logs;

pub mod cli;
pub mod decode;
pub mod fbio;
pub mod identify;

pub use identify::{Identification, Status, identify};
