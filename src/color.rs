//! Color channel conversions and quantization.
//!
//! Design tools hand us colors as normalized `0.0..=1.0` floats; CSS wants
//! 8-bit channels, hex strings, or HSB tuples. Everything in this module is
//! pure math over those representations: quantizing float channels to bytes
//! (with palette snapping, see [`crate::config::SnapPalette`]), hex
//! formatting and parsing, HSB conversion in both directions, and a
//! perceptual difference metric in linear-light XYZ space.

use crate::config::SnapPalette;
use crate::models::{Hsb, NormalizedColor, Rgba};

use thiserror::Error;

/// Nudges float channels upward before rounding so values that sit just
/// below a half-step (a common artifact of float division by 255 upstream)
/// land on the intended byte.
const CHANNEL_EPSILON: f64 = 0.0001;

/// Errors from parsing a hex color string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    /// The input string was empty.
    #[error("empty color string")]
    Empty,

    /// The input did not start with `#`.
    #[error("hex color must start with '#'")]
    MissingHash,

    /// The digit count after `#` was not 3, 4, 6, or 8.
    #[error("invalid hex color length: {0} digits")]
    InvalidLength(usize),

    /// A character after `#` was not a hex digit.
    #[error("invalid hex digit: '{0}'")]
    InvalidHex(char),
}

/// Converts 8-bit channel values (given as floats) to an uppercase
/// `#RRGGBB` string. Channels are rounded to the nearest integer first.
///
/// # Examples
///
/// ```
/// use swatchcast::color::rgb_to_hex;
///
/// assert_eq!(rgb_to_hex(247.0, 248.0, 250.0), "#F7F8FA");
/// assert_eq!(rgb_to_hex(0.0, 0.0, 0.0), "#000000");
/// ```
pub fn rgb_to_hex(r: f64, g: f64, b: f64) -> String {
    format!(
        "#{:02X}{:02X}{:02X}",
        r.round() as u8,
        g.round() as u8,
        b.round() as u8
    )
}

/// Converts 8-bit channels plus a normalized alpha to an uppercase
/// `#RRGGBBAA` string. Alpha is scaled to `0..=255` and rounded.
///
/// # Examples
///
/// ```
/// use swatchcast::color::rgba_to_hex_alpha;
///
/// assert_eq!(rgba_to_hex_alpha(255.0, 0.0, 0.0, 0.5), "#FF000080");
/// ```
pub fn rgba_to_hex_alpha(r: f64, g: f64, b: f64, a: f64) -> String {
    format!(
        "#{:02X}{:02X}{:02X}{:02X}",
        r.round() as u8,
        g.round() as u8,
        b.round() as u8,
        (a * 255.0).round() as u8
    )
}

/// Converts 8-bit channel values to HSB.
///
/// Hue is in degrees `0..360`, saturation and brightness are percentages
/// `0..=100`. All three are rounded to integers. Black and greys report
/// hue 0 and saturation 0.
///
/// # Examples
///
/// ```
/// use swatchcast::color::rgb_to_hsb;
///
/// let red = rgb_to_hsb(255.0, 0.0, 0.0);
/// assert_eq!((red.h, red.s, red.b), (0, 100, 100));
/// ```
pub fn rgb_to_hsb(r: f64, g: f64, b: f64) -> Hsb {
    let r = r / 255.0;
    let g = g / 255.0;
    let b = b / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let hue = if delta == 0.0 {
        0.0
    } else if max == r {
        (((g - b) / delta) % 6.0) * 60.0
    } else if max == g {
        ((b - r) / delta + 2.0) * 60.0
    } else {
        ((r - g) / delta + 4.0) * 60.0
    };
    let hue = if hue < 0.0 { hue + 360.0 } else { hue };

    let saturation = if max == 0.0 { 0.0 } else { delta / max * 100.0 };
    let brightness = max * 100.0;

    Hsb {
        h: (hue.round() as u16) % 360,
        s: saturation.round() as u8,
        b: brightness.round() as u8,
    }
}

/// Converts an HSB triple (hue in degrees, saturation and brightness as
/// percentages) back to 8-bit RGB channels.
///
/// # Examples
///
/// ```
/// use swatchcast::color::hsb_to_rgb;
///
/// assert_eq!(hsb_to_rgb(0.0, 100.0, 100.0), [255, 0, 0]);
/// assert_eq!(hsb_to_rgb(120.0, 100.0, 100.0), [0, 255, 0]);
/// ```
pub fn hsb_to_rgb(h: f64, s: f64, b: f64) -> [u8; 3] {
    let s = s / 100.0;
    let b = b / 100.0;

    let f = |n: f64| {
        let k = (n + h / 60.0) % 6.0;
        b * (1.0 - s * k.min(4.0 - k).clamp(0.0, 1.0))
    };

    [
        (f(5.0) * 255.0).round() as u8,
        (f(3.0) * 255.0).round() as u8,
        (f(1.0) * 255.0).round() as u8,
    ]
}

/// Parses a hex color string into an [`Rgba`].
///
/// Accepts `#RGB`, `#RGBA`, `#RRGGBB`, and `#RRGGBBAA`. Short forms double
/// each digit (`#F80` is `#FF8800`). When no alpha digits are present the
/// alpha defaults to fully opaque.
///
/// # Examples
///
/// ```
/// use swatchcast::color::parse_hex_color;
///
/// let c = parse_hex_color("#4080BF").unwrap();
/// assert_eq!((c.r, c.g, c.b), (64, 128, 191));
/// assert_eq!(c.a, 1.0);
///
/// let translucent = parse_hex_color("#FF000080").unwrap();
/// assert!((translucent.a - 128.0 / 255.0).abs() < 1e-9);
/// ```
pub fn parse_hex_color(input: &str) -> Result<Rgba, ColorError> {
    if input.is_empty() {
        return Err(ColorError::Empty);
    }
    let digits = input.strip_prefix('#').ok_or(ColorError::MissingHash)?;

    match digits.len() {
        3 | 4 => {
            let mut ch = [0u8; 4];
            for (i, c) in digits.chars().enumerate() {
                let v = parse_hex_digit(c)?;
                ch[i] = v * 17;
            }
            let a = if digits.len() == 4 {
                ch[3] as f64 / 255.0
            } else {
                1.0
            };
            Ok(Rgba {
                r: ch[0],
                g: ch[1],
                b: ch[2],
                a,
            })
        }
        6 | 8 => {
            let bytes = digits.as_bytes();
            let r = parse_hex_pair(bytes[0] as char, bytes[1] as char)?;
            let g = parse_hex_pair(bytes[2] as char, bytes[3] as char)?;
            let b = parse_hex_pair(bytes[4] as char, bytes[5] as char)?;
            let a = if digits.len() == 8 {
                parse_hex_pair(bytes[6] as char, bytes[7] as char)? as f64 / 255.0
            } else {
                1.0
            };
            Ok(Rgba { r, g, b, a })
        }
        n => Err(ColorError::InvalidLength(n)),
    }
}

fn parse_hex_digit(c: char) -> Result<u8, ColorError> {
    c.to_digit(16)
        .map(|d| d as u8)
        .ok_or(ColorError::InvalidHex(c))
}

fn parse_hex_pair(hi: char, lo: char) -> Result<u8, ColorError> {
    Ok(parse_hex_digit(hi)? * 16 + parse_hex_digit(lo)?)
}

/// Quantizes a normalized color to 8-bit channels, then snaps the result
/// against the palette's rules.
///
/// Each channel is scaled by 255, nudged by a small epsilon, rounded, and
/// clamped to `0..=255`. The epsilon keeps channels that land fractionally
/// below a half-step (for example `0.984313…`, which scales to
/// `250.99999…`) from rounding down. A missing alpha means opaque.
///
/// # Examples
///
/// ```
/// use swatchcast::color::quantize_color;
/// use swatchcast::config::SnapPalette;
/// use swatchcast::models::NormalizedColor;
///
/// let palette = SnapPalette::default();
/// let c = NormalizedColor { r: 0.25, g: 0.5, b: 0.75, a: Some(1.0) };
/// let q = quantize_color(&c, &palette);
/// assert_eq!((q.r, q.g, q.b), (64, 128, 191));
/// ```
pub fn quantize_color(color: &NormalizedColor, palette: &SnapPalette) -> Rgba {
    let quantize = |v: f64| (v * 255.0 + CHANNEL_EPSILON).round().clamp(0.0, 255.0) as u8;

    let raw = [quantize(color.r), quantize(color.g), quantize(color.b)];
    let [r, g, b] = palette.snap(raw);

    Rgba {
        r,
        g,
        b,
        a: color.a.unwrap_or(1.0),
    }
}

/// Perceptual difference between two 8-bit RGB triples.
///
/// Channels are linearized with the sRGB transfer curve, mapped to CIE XYZ,
/// and compared by Euclidean distance. Identical colors score `0.0`; black
/// against white is the farthest pair at roughly `1.78`. The metric is
/// symmetric in its arguments.
pub fn color_difference(a: [u8; 3], b: [u8; 3]) -> f64 {
    let (x1, y1, z1) = to_xyz(a);
    let (x2, y2, z2) = to_xyz(b);

    ((x1 - x2).powi(2) + (y1 - y2).powi(2) + (z1 - z2).powi(2)).sqrt()
}

/// sRGB electro-optical transfer, then the D65 RGB-to-XYZ matrix.
fn to_xyz(rgb: [u8; 3]) -> (f64, f64, f64) {
    let linearize = |c: u8| {
        let c = c as f64 / 255.0;
        if c > 0.04045 {
            ((c + 0.055) / 1.055).powf(2.4)
        } else {
            c / 12.92
        }
    };

    let r = linearize(rgb[0]);
    let g = linearize(rgb[1]);
    let b = linearize(rgb[2]);

    (
        0.4124 * r + 0.3576 * g + 0.1805 * b,
        0.2126 * r + 0.7152 * g + 0.0722 * b,
        0.0193 * r + 0.1192 * g + 0.9505 * b,
    )
}
