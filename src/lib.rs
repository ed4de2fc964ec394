//! Episode Organizer Library
//!
//! A library for assembling loosely-named series/anime episode files into a
//! standardized, Plex-ready library layout: one folder per series/season,
//! one merged MKV per episode.

pub mod cli;
pub mod core;
pub mod error;
pub mod generators;
pub mod models;
pub mod preflight;
pub mod services;
pub mod utils;

pub use error::{Error, Result};
