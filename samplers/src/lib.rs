//! Image corpus discovery and sampling
//!
//! This crate provides implementations of the `Sampler` trait for:
//!
//! - Recursive image discovery under a root folder ([`Corpus`])
//! - Uniform random selection with replacement ([`RandomSampler`])

#![warn(missing_docs)]
#![warn(clippy::all)]

mod corpus;
mod random;

pub use corpus::{Corpus, IMAGE_EXTENSIONS};
pub use random::RandomSampler;
