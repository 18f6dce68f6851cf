//! Data models for design-tool paint data and extracted color sets.
//!
//! The wire shapes mirror the design-tool export JSON: camelCase field
//! names, float channels in [0,1], optional arrays that default to empty,
//! and a `type` discriminator on each paint entry.

use serde::{Deserialize, Serialize};

/// A color as the design tool exports it: float channels in [0,1],
/// alpha optional (missing means opaque).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub a: Option<f64>,
}

impl NormalizedColor {
    /// Opaque color from raw [0,1] channels.
    pub fn opaque(r: f64, g: f64, b: f64) -> Self {
        NormalizedColor { r, g, b, a: None }
    }
}

/// An 8-bit color with unit alpha (1.0 = opaque).
///
/// `a < 1.0` classifies the color as semi-transparent; everything the
/// pipeline emits downstream (hex strings, comparisons) works on this form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "default_alpha")]
    pub a: f64,
}

fn default_alpha() -> f64 {
    1.0
}

impl Rgba {
    /// Opaque 8-bit color.
    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 1.0 }
    }

    /// True when the alpha channel is below fully opaque.
    pub fn is_semi_transparent(&self) -> bool {
        self.a < 1.0
    }

    /// The RGB triple without alpha.
    pub fn triple(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Hue/saturation/brightness, rounded: hue in [0,360), the rest in [0,100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hsb {
    pub h: u16,
    pub s: u8,
    pub b: u8,
}

/// One anchor of a linear gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub position: f64,
    pub color: NormalizedColor,
}

/// A linear gradient as exported: an affine transform matrix (row-major
/// `[a, b, c, d, e, f]`) plus position-sorted stops.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearGradient {
    #[serde(default)]
    pub gradient_transform: Vec<f64>,
    #[serde(default)]
    pub gradient_stops: Vec<GradientStop>,
}

/// One paint layer on a node, keyed by the wire `type` discriminator.
///
/// Paint kinds the pipeline does not handle (radial gradients, image
/// fills, ...) deserialize into `Unknown` and are skipped by extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Paint {
    #[serde(rename = "SOLID")]
    Solid {
        #[serde(skip_serializing_if = "Option::is_none", default)]
        color: Option<NormalizedColor>,
    },
    #[serde(rename = "GRADIENT_LINEAR")]
    GradientLinear(LinearGradient),
    #[serde(other)]
    Unknown,
}

/// A node in the design document tree. Only the color-bearing fields are
/// modeled; every other field in the export is ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DesignNode {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fills: Vec<Paint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub strokes: Vec<Paint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DesignNode>,
}

/// Flat color sets pulled out of a node tree. Also the reference-side
/// input to the fidelity evaluator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedColors {
    pub solid_colors: Vec<Rgba>,
    pub gradients: Vec<LinearGradient>,
    pub semi_transparent_colors: Vec<Rgba>,
}

/// Colors as recognized by the vision model: solid and semi-transparent
/// entries come back numeric, gradients come back as CSS strings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognizedColors {
    pub solid_colors: Vec<Rgba>,
    pub gradients: Vec<String>,
    pub semi_transparent_colors: Vec<Rgba>,
}

/// A semi-transparent color annotated with its `#RRGGBBAA` form for
/// listing in the prompt brief.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemiTransparentEntry {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
    pub hex: String,
}
