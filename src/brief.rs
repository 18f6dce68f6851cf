//! Prompt color brief for vision-model requests.
//!
//! Before an extracted color set rides along with a screenshot, it is
//! summarized as a compact text block the model can anchor on: solid hex
//! values, smoothed CSS gradients with stop counts, semi-transparent
//! colors in two notations ordered by opacity, HSB tuples, and totals.
//! Redundant notations are deliberate; they measurably improve how often
//! the model echoes exact channel values back.

use crate::color::{rgb_to_hex, rgb_to_hsb, rgba_to_hex_alpha};
use crate::config::SnapPalette;
use crate::gradient::{css_gradient, smooth_gradient};
use crate::models::{ExtractedColors, Rgba, SemiTransparentEntry};

/// Annotates semi-transparent colors with their `#RRGGBBAA` form.
///
/// # Examples
///
/// ```
/// use swatchcast::brief::annotate_semi_transparent;
/// use swatchcast::models::Rgba;
///
/// let entries = annotate_semi_transparent(&[Rgba { r: 17, g: 20, b: 26, a: 0.5 }]);
/// assert_eq!(entries[0].hex, "#11141A80");
/// ```
pub fn annotate_semi_transparent(colors: &[Rgba]) -> Vec<SemiTransparentEntry> {
    colors
        .iter()
        .map(|c| SemiTransparentEntry {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
            hex: rgba_to_hex_alpha(c.r as f64, c.g as f64, c.b as f64, c.a),
        })
        .collect()
}

/// Renders the color brief for one extracted color set.
///
/// The solid hex list and the final count line are always present; the
/// gradient, semi-transparent, and HSB sections appear only when their
/// input sets are non-empty. Gradients are smoothed before rendering so
/// the brief lists the same CSS the reconstruction would produce, and
/// semi-transparent colors are ordered by ascending alpha.
pub fn color_brief(colors: &ExtractedColors, palette: &SnapPalette) -> String {
    let mut lines = vec!["[Color data]".to_string()];

    let solid_hex: Vec<String> = colors
        .solid_colors
        .iter()
        .map(|c| rgb_to_hex(c.r as f64, c.g as f64, c.b as f64))
        .collect();
    lines.push(format!("**Solid colors (hex)**: {}", solid_hex.join(", ")));

    if !colors.gradients.is_empty() {
        let smoothed: Vec<_> = colors
            .gradients
            .iter()
            .map(|g| smooth_gradient(g, palette))
            .collect();

        let details: Vec<String> = smoothed
            .iter()
            .enumerate()
            .map(|(i, g)| format!("Gradient {}: {}", i + 1, css_gradient(g, palette)))
            .collect();
        lines.push(format!("**Gradients**: {}", details.join("; ")));

        let stop_total: usize = smoothed.iter().map(|g| g.gradient_stops.len()).sum();
        lines.push(format!(
            "**Gradient stats**: {} gradients, {} color stops total",
            smoothed.len(),
            stop_total
        ));
    }

    if !colors.semi_transparent_colors.is_empty() {
        let mut entries = annotate_semi_transparent(&colors.semi_transparent_colors);
        entries.sort_by(|a, b| a.a.total_cmp(&b.a));

        let hex_forms: Vec<String> = entries
            .iter()
            .map(|e| format!("{} (opacity: {:.1}%)", e.hex, e.a * 100.0))
            .collect();
        lines.push(format!(
            "**Semi-transparent colors**: {}",
            hex_forms.join(", ")
        ));

        let rgba_forms: Vec<String> = entries
            .iter()
            .map(|e| format!("rgba({},{},{},{:.2})", e.r, e.g, e.b, e.a))
            .collect();
        lines.push(format!(
            "**Semi-transparent colors (rgba)**: {}",
            rgba_forms.join(", ")
        ));
    }

    if !colors.solid_colors.is_empty() {
        let hsb_forms: Vec<String> = colors
            .solid_colors
            .iter()
            .map(|c| {
                let hsb = rgb_to_hsb(c.r as f64, c.g as f64, c.b as f64);
                format!("({}°, {}%, {}%)", hsb.h, hsb.s, hsb.b)
            })
            .collect();
        lines.push(format!("**HSB values**: {}", hsb_forms.join(", ")));
    }

    lines.push(format!(
        "**Color counts**: {} solid, {} semi-transparent",
        colors.solid_colors.len(),
        colors.semi_transparent_colors.len()
    ));

    lines.join("\n")
}
