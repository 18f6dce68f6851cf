//! Normalization of model-generated color text.
//!
//! Vision models hand colors back in whatever CSS form they feel like:
//! `rgba()` calls, three-digit shorthand, lowercase hex, gradients with
//! bare numbers for angle and stop positions. This module rewrites such
//! text into one canonical shape so that downstream comparisons can rely
//! on string equality:
//!
//! 1. `rgba(r,g,b,a)` becomes an uppercase `#RRGGBBAA`,
//! 2. three-digit `#RGB` shorthand doubles to six digits,
//! 3. six- and eight-digit hex runs are uppercased,
//! 4. `linear-gradient()` gains `deg` on a bare numeric angle and `%` on
//!    bare numeric stop positions.
//!
//! The pass is idempotent: running it over its own output changes
//! nothing. Non-numeric gradient angles such as `to right` pass through
//! untouched.

use crate::color::rgba_to_hex_alpha;

use regex::{Captures, Regex};
use std::sync::LazyLock;

static RGBA_FN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"rgba\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*([0-9]*\.?[0-9]+)\s*\)")
        .unwrap()
});

static HEX3_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#([0-9A-Fa-f]{3})\b").unwrap());

static HEX_LONG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([0-9A-Fa-f]{6,8})\b").unwrap());

static GRADIENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"linear-gradient\(([^,]+),([^)]+)\)").unwrap());

/// Rewrites every color in `text` into canonical form.
///
/// The `rgba()` rule runs first so that by the time the gradient rule
/// fires, gradient arguments contain no nested parentheses and the
/// argument list can be split on commas.
///
/// # Examples
///
/// ```
/// use swatchcast::normalize::standardize_color_format;
///
/// assert_eq!(standardize_color_format("rgba(255, 0, 0, 0.5)"), "#FF000080");
/// assert_eq!(standardize_color_format("#f0a"), "#FF00AA");
/// assert_eq!(
///     standardize_color_format("linear-gradient(90, #ff0000 0, #0000ff 100)"),
///     "linear-gradient(90deg, #FF0000 0%, #0000FF 100%)"
/// );
/// ```
pub fn standardize_color_format(text: &str) -> String {
    let text = RGBA_FN_RE.replace_all(text, rewrite_rgba);
    let text = HEX3_RE.replace_all(&text, rewrite_short_hex);
    let text = HEX_LONG_RE.replace_all(&text, |caps: &Captures| {
        format!("#{}", caps[1].to_uppercase())
    });
    let text = GRADIENT_RE.replace_all(&text, rewrite_gradient);

    text.into_owned()
}

/// Strips a surrounding Markdown code fence, with or without a language
/// tag, and trims the remainder.
pub fn strip_code_fences(text: &str) -> String {
    let mut cleaned = text.trim();

    for prefix in ["```html", "```css", "```"] {
        if let Some(rest) = cleaned.strip_prefix(prefix) {
            cleaned = rest;
            break;
        }
    }
    if let Some(rest) = cleaned.strip_suffix("```") {
        cleaned = rest;
    }

    cleaned.trim().to_string()
}

/// Fence stripping followed by color canonicalization, the full cleanup
/// applied to raw model output before any comparison.
pub fn clean_generated_text(text: &str) -> String {
    standardize_color_format(&strip_code_fences(text))
}

fn rewrite_rgba(caps: &Captures) -> String {
    let channel = |i: usize| caps[i].parse::<f64>();
    match (channel(1), channel(2), channel(3), channel(4)) {
        (Ok(r), Ok(g), Ok(b), Ok(a)) => rgba_to_hex_alpha(r, g, b, a),
        _ => caps[0].to_string(),
    }
}

fn rewrite_short_hex(caps: &Captures) -> String {
    let doubled: String = caps[1]
        .chars()
        .flat_map(|c| {
            let c = c.to_ascii_uppercase();
            [c, c]
        })
        .collect();
    format!("#{doubled}")
}

fn rewrite_gradient(caps: &Captures) -> String {
    let angle = caps[1].trim();
    let angle = if angle.parse::<f64>().is_ok() {
        format!("{angle}deg")
    } else {
        angle.to_string()
    };

    let stops = caps[2]
        .split(',')
        .map(normalize_stop)
        .collect::<Vec<_>>()
        .join(", ");

    format!("linear-gradient({angle}, {stops})")
}

/// Appends `%` when a stop's final whitespace-separated token is a bare
/// number. Internal whitespace collapses to single spaces.
fn normalize_stop(stop: &str) -> String {
    let tokens: Vec<&str> = stop.split_whitespace().collect();
    let needs_percent = tokens
        .last()
        .is_some_and(|last| last.parse::<f64>().is_ok());

    let joined = tokens.join(" ");
    if needs_percent {
        format!("{joined}%")
    } else {
        joined
    }
}
