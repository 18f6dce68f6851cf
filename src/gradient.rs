//! Gradient reconstruction from design-tool exports.
//!
//! A linear gradient arrives as an affine transform matrix plus a list of
//! stops. This module turns that into CSS: the matrix's primary direction
//! becomes a CSS angle, stops get sorted and pinned to the 0% and 100%
//! boundaries, sparse two-stop gradients are densified with interpolated
//! midpoints, and the result renders as a `linear-gradient(...)` string.
//!
//! Densification is a best-effort smoothness heuristic, not recovery of
//! the designer's original ramp; the interpolated stops are plain
//! channel-wise midpoints.

use crate::color::{quantize_color, rgb_to_hex, rgba_to_hex_alpha};
use crate::config::SnapPalette;
use crate::models::{GradientStop, LinearGradient, NormalizedColor};

/// Stops within this distance of position 0 or 1 already count as
/// boundary stops.
const BOUNDARY_TOLERANCE: f64 = 0.01;

/// Position gap above which a midpoint stop is interpolated between two
/// adjacent stops of a sparse gradient.
const SPARSE_GAP: f64 = 0.2;

/// Derives the CSS angle, in degrees `0..360`, from an affine gradient
/// transform `[a, b, c, d, e, f]`.
///
/// The matrix's primary direction is `atan2(b, a)`; CSS measures angles
/// from the bottom-up axis, so the result is `90°` minus that, normalized
/// into range and rounded. A transform with fewer than four entries
/// yields `0`.
///
/// # Examples
///
/// ```
/// use swatchcast::gradient::gradient_angle;
///
/// // Identity transform points along +x, which CSS calls 90deg.
/// assert_eq!(gradient_angle(&[1.0, 0.0, 0.0, 1.0, 0.0, 0.0]), 90);
/// assert_eq!(gradient_angle(&[]), 0);
/// ```
pub fn gradient_angle(transform: &[f64]) -> u16 {
    if transform.len() < 4 {
        return 0;
    }

    let angle = transform[1].atan2(transform[0]).to_degrees();
    let css_angle = 90.0 - angle;
    let css_angle = ((css_angle % 360.0) + 360.0) % 360.0;

    (css_angle.round() as u16) % 360
}

/// Guarantees stops at the 0% and 100% boundaries.
///
/// If the first stop sits past position 0 (beyond a small tolerance), a
/// synthetic stop at 0 with the first stop's color is prepended; the end
/// is handled symmetrically. Stops are assumed pre-sorted ascending by
/// position. An empty slice stays empty.
pub fn ensure_boundary_stops(stops: &[GradientStop]) -> Vec<GradientStop> {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return Vec::new();
    };

    let mut result = stops.to_vec();

    if first.position > BOUNDARY_TOLERANCE {
        result.insert(
            0,
            GradientStop {
                position: 0.0,
                color: first.color,
            },
        );
    }

    if last.position < 1.0 - BOUNDARY_TOLERANCE {
        result.push(GradientStop {
            position: 1.0,
            color: last.color,
        });
    }

    result
}

/// Densifies a sparse gradient by inserting midpoint stops.
///
/// Only gradients with two stops are candidates; three or more stops (or
/// fewer than two) pass through unchanged. For each adjacent pair whose
/// position gap exceeds [`SPARSE_GAP`], a stop is inserted halfway with
/// the channel-wise average of the two quantized endpoint colors and the
/// average of their alphas.
pub fn smooth_gradient(gradient: &LinearGradient, palette: &SnapPalette) -> LinearGradient {
    let stops = &gradient.gradient_stops;
    if stops.len() != 2 {
        return gradient.clone();
    }

    let mut result = Vec::with_capacity(stops.len() * 2 - 1);
    for pair in stops.windows(2) {
        let (current, next) = (pair[0], pair[1]);
        result.push(current);
        if next.position - current.position > SPARSE_GAP {
            result.push(midpoint_stop(&current, &next, palette));
        }
    }
    result.push(stops[stops.len() - 1]);

    LinearGradient {
        gradient_transform: gradient.gradient_transform.clone(),
        gradient_stops: result,
    }
}

/// Midpoint of two stops: positions averaged, colors averaged channel-wise
/// after quantization, then carried back in normalized form.
fn midpoint_stop(a: &GradientStop, b: &GradientStop, palette: &SnapPalette) -> GradientStop {
    let ca = quantize_color(&a.color, palette);
    let cb = quantize_color(&b.color, palette);
    let mid = |x: u8, y: u8| ((x as f64 + y as f64) / 2.0).round() / 255.0;

    GradientStop {
        position: (a.position + b.position) / 2.0,
        color: NormalizedColor {
            r: mid(ca.r, cb.r),
            g: mid(ca.g, cb.g),
            b: mid(ca.b, cb.b),
            a: Some((ca.a + cb.a) / 2.0),
        },
    }
}

/// Renders a gradient as a CSS `linear-gradient(...)` string.
///
/// Stops are sorted by position and pinned to the boundaries first. An
/// opaque stop renders as `#RRGGBB`, a translucent one as `#RRGGBBAA`;
/// positions become percentages rounded to two decimal places.
///
/// # Examples
///
/// ```
/// use swatchcast::config::SnapPalette;
/// use swatchcast::gradient::css_gradient;
/// use swatchcast::models::LinearGradient;
///
/// let gradient: LinearGradient = serde_json::from_str(
///     r#"{
///         "gradientTransform": [0, 1, -1, 0, 0, 0],
///         "gradientStops": [
///             {"position": 0, "color": {"r": 1, "g": 0, "b": 0}},
///             {"position": 1, "color": {"r": 0, "g": 0, "b": 1}}
///         ]
///     }"#,
/// )
/// .unwrap();
///
/// assert_eq!(
///     css_gradient(&gradient, &SnapPalette::default()),
///     "linear-gradient(0deg, #FF0000 0%, #0000FF 100%)",
/// );
/// ```
pub fn css_gradient(gradient: &LinearGradient, palette: &SnapPalette) -> String {
    let angle = gradient_angle(&gradient.gradient_transform);

    let mut stops = gradient.gradient_stops.clone();
    stops.sort_by(|a, b| a.position.total_cmp(&b.position));
    let stops = ensure_boundary_stops(&stops);

    let rendered: Vec<String> = stops
        .iter()
        .map(|stop| {
            let color = quantize_color(&stop.color, palette);
            let color_str = if color.a < 1.0 {
                rgba_to_hex_alpha(color.r as f64, color.g as f64, color.b as f64, color.a)
            } else {
                rgb_to_hex(color.r as f64, color.g as f64, color.b as f64)
            };
            let percent = (stop.position * 10000.0).round() / 100.0;
            format!("{color_str} {percent}%")
        })
        .collect();

    format!("linear-gradient({angle}deg, {})", rendered.join(", "))
}

/// Multi-line human-readable description of a gradient, used in prompt
/// briefs and debug output.
///
/// Lists the angle and each stop in document order (no sorting, no
/// boundary pinning): opaque stops as hex, translucent ones as
/// `rgba(r,g,b,a)` with the alpha at two decimals.
pub fn gradient_preview(gradient: &LinearGradient, palette: &SnapPalette) -> String {
    let angle = gradient_angle(&gradient.gradient_transform);

    let stops: Vec<String> = gradient
        .gradient_stops
        .iter()
        .enumerate()
        .map(|(i, stop)| {
            let color = quantize_color(&stop.color, palette);
            let color_str = if color.a < 1.0 {
                format!("rgba({},{},{},{:.2})", color.r, color.g, color.b, color.a)
            } else {
                rgb_to_hex(color.r as f64, color.g as f64, color.b as f64)
            };
            let percent = (stop.position * 100.0).round() as i32;
            format!("Stop {}: {} at {}%", i + 1, color_str, percent)
        })
        .collect();

    format!("Linear Gradient ({angle}°)\n{}", stops.join("\n"))
}
