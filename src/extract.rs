//! Color extraction from a design-node tree.
//!
//! Walks a node and everything under it, classifying each paint layer on
//! the way: opaque solids, semi-transparent solids, and linear gradients
//! land in separate flat collections. Paint kinds the pipeline does not
//! understand are skipped without comment, and nodes with no color-bearing
//! fields contribute nothing.

use crate::color::quantize_color;
use crate::config::SnapPalette;
use crate::models::{DesignNode, ExtractedColors, Paint};

/// Walks `root` depth-first and collects every paint layer into flat,
/// order-preserving color sets.
///
/// Each node contributes its fills, then its strokes, then its children
/// (first child first). Solid paints are quantized against `palette` and
/// routed by alpha: below fully opaque goes to `semi_transparent_colors`,
/// otherwise `solid_colors`. Linear gradients are carried verbatim for
/// downstream reconstruction; an entry with no stops is dropped. The walk
/// uses an explicit stack, so arbitrarily deep trees cannot overflow the
/// call stack.
///
/// # Examples
///
/// ```
/// use swatchcast::config::SnapPalette;
/// use swatchcast::extract::extract_colors;
/// use swatchcast::models::DesignNode;
///
/// let node: DesignNode = serde_json::from_str(
///     r#"{"fills": [{"type": "SOLID", "color": {"r": 0.25, "g": 0.5, "b": 0.75, "a": 1}}]}"#,
/// )
/// .unwrap();
///
/// let extracted = extract_colors(&node, &SnapPalette::default());
/// assert_eq!(extracted.solid_colors[0].triple(), [64, 128, 191]);
/// ```
pub fn extract_colors(root: &DesignNode, palette: &SnapPalette) -> ExtractedColors {
    let mut out = ExtractedColors::default();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        for paint in node.fills.iter().chain(node.strokes.iter()) {
            collect_paint(paint, palette, &mut out);
        }

        // Children go on in reverse so the first child is popped next.
        for child in node.children.iter().rev() {
            stack.push(child);
        }
    }

    out
}

fn collect_paint(paint: &Paint, palette: &SnapPalette, out: &mut ExtractedColors) {
    match paint {
        Paint::Solid { color: Some(color) } => {
            let rgba = quantize_color(color, palette);
            if rgba.is_semi_transparent() {
                out.semi_transparent_colors.push(rgba);
            } else {
                out.solid_colors.push(rgba);
            }
        }
        // A solid layer with no color carries nothing to extract.
        Paint::Solid { color: None } => {}
        Paint::GradientLinear(gradient) => {
            if !gradient.gradient_stops.is_empty() {
                out.gradients.push(gradient.clone());
            }
        }
        Paint::Unknown => {}
    }
}
