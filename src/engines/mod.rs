//! Speech synthesis engines.
//!
//! This module contains implementations of text-to-speech engines.
//!
//! # Available Engines
//!
//! - `formant` - Rule-based formant synthesis (pure Rust, no model files)

pub mod formant;
