//! Pigment - pixel-processing engine for an image studio
//!
//! Palette sampling and dominant color extraction on decoded images, and
//! brush-stroke mask painting with resampled binary mask export.
//! This library exposes modules for the CLI and for integration testing.

pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
