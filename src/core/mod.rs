//! Core episode-assembly pipeline.

pub mod classifier;
pub mod embedder;
pub mod grouper;
pub mod merger;
pub mod normalizer;
pub mod parser;
pub mod pipeline;
pub mod validator;
