//! Swatchcast - Library for design-node color extraction and recognition scoring
//!
//! This library provides functionality to:
//! - Parse design-tool node trees (JSON) and pull out solid, gradient, and
//!   semi-transparent paints
//! - Rebuild CSS `linear-gradient(...)` strings from gradient transforms and
//!   stops, with boundary pinning and sparse-gradient smoothing
//! - Canonicalize color notation in model-generated style text
//! - Score how faithfully a vision model's recognized colors match the
//!   reference set, in linear-light XYZ space

pub mod brief;
pub mod cli;
pub mod color;
pub mod config;
pub mod evaluate;
pub mod extract;
pub mod gradient;
pub mod models;
pub mod normalize;
