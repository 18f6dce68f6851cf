//! Color recognition scoring.
//!
//! Compares a reference color set (pulled out of the design file) against
//! the colors a vision model reported back. Each pair becomes a
//! [`ColorComparison`] with an XYZ-space difference, a 0-100 accuracy, and
//! a quality band; the pairs aggregate into an [`AccuracyReport`] with
//! per-kind and weighted overall accuracies, a category histogram, and a
//! plain-text summary.
//!
//! A missing counterpart on either side of a pair is never an error: it
//! scores as a worst-case sentinel so aggregate statistics stay
//! computable over partial recognitions.

use crate::color::{color_difference, parse_hex_color, quantize_color, rgb_to_hex};
use crate::config::SnapPalette;
use crate::models::{ExtractedColors, LinearGradient, RecognizedColors, Rgba};

use chrono::{SecondsFormat, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Any `#hex` or `rgb()`/`rgba()` token inside a CSS fragment. Hex runs of
/// invalid length match too and are discarded at parse time.
static COLOR_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"#[0-9A-Fa-f]{3,8}|rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*([0-9]*\.?[0-9]+)\s*)?\)",
    )
    .unwrap()
});

/// Difference recorded for a pair with a missing side. Far beyond any
/// reachable XYZ distance, so it always lands in the worst band.
const MISSING_PAIR_DIFFERENCE: f64 = 100.0;

/// What a compared pair was: the weight of a miss depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComparisonKind {
    Solid,
    Gradient,
    SemiTransparent,
}

impl ComparisonKind {
    /// Aggregation weight. Gradients and semi-transparent colors are
    /// harder to recognize, so their hits and misses count for more.
    fn weight(self) -> f64 {
        match self {
            ComparisonKind::Solid => 1.0,
            ComparisonKind::Gradient => 1.5,
            ComparisonKind::SemiTransparent => 1.2,
        }
    }
}

/// Quality band for one compared pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl Category {
    /// Band by raw XYZ difference.
    pub fn from_difference(difference: f64) -> Self {
        if difference < 2.0 {
            Category::Excellent
        } else if difference < 5.0 {
            Category::Good
        } else if difference < 10.0 {
            Category::Fair
        } else {
            Category::Poor
        }
    }

    /// Band by blended accuracy, for semi-transparent pairs where alpha
    /// fidelity shifts the score.
    fn from_blended(accuracy: f64) -> Self {
        if accuracy >= 95.0 {
            Category::Excellent
        } else if accuracy >= 85.0 {
            Category::Good
        } else if accuracy >= 70.0 {
            Category::Fair
        } else {
            Category::Poor
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Excellent => "excellent",
            Category::Good => "good",
            Category::Fair => "fair",
            Category::Poor => "poor",
        }
    }
}

/// One scored color pair: the XYZ distance (rounded to two decimals), the
/// 0-100 accuracy it maps to, and the quality band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccuracyScore {
    pub accuracy: u8,
    pub difference: f64,
    pub category: Category,
}

/// One reference/recognized pair in a report, with display forms of both
/// sides and a position label naming where the pair came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorComparison {
    #[serde(rename = "type")]
    pub kind: ComparisonKind,
    pub original: String,
    #[serde(rename = "originalRGB")]
    pub original_rgb: [u8; 3],
    pub recognized: String,
    #[serde(rename = "recognizedRGB")]
    pub recognized_rgb: [u8; 3],
    pub difference: f64,
    pub accuracy: u8,
    pub category: Category,
    pub position: String,
}

/// Items per quality band across one evaluation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryHistogram {
    pub excellent: usize,
    pub good: usize,
    pub fair: usize,
    pub poor: usize,
}

/// Aggregate of every comparison in one evaluation run. Immutable
/// snapshot; serializes with the same field names the report consumers
/// expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccuracyReport {
    pub overall_accuracy: u8,
    pub solid_colors_accuracy: u8,
    pub gradients_accuracy: u8,
    pub semi_transparent_accuracy: u8,
    pub accuracy_distribution: CategoryHistogram,
    pub detailed_results: Vec<ColorComparison>,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub improvement: Option<i32>,
}

/// Chart-ready projection of an [`AccuracyReport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub accuracy_by_type: Vec<TypeAccuracy>,
    pub distribution_by_category: Vec<CategoryCount>,
    pub detailed_color_differences: Vec<DifferencePoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeAccuracy {
    #[serde(rename = "type")]
    pub kind: ComparisonKind,
    pub accuracy: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: Category,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifferencePoint {
    pub position: String,
    pub difference: f64,
    pub accuracy: u8,
}

/// Scores one color pair: XYZ distance mapped through a piecewise curve
/// to 0-100, banded by difference.
///
/// # Examples
///
/// ```
/// use swatchcast::evaluate::{evaluate_color_accuracy, Category};
///
/// let score = evaluate_color_accuracy([64, 128, 191], [64, 128, 191]);
/// assert_eq!(score.accuracy, 100);
/// assert_eq!(score.difference, 0.0);
/// assert_eq!(score.category, Category::Excellent);
/// ```
pub fn evaluate_color_accuracy(actual: [u8; 3], predicted: [u8; 3]) -> AccuracyScore {
    let difference = color_difference(actual, predicted);

    AccuracyScore {
        accuracy: accuracy_from_difference(difference).round() as u8,
        difference: (difference * 100.0).round() / 100.0,
        category: Category::from_difference(difference),
    }
}

/// Piecewise map from XYZ distance to a 0-100 score. Breakpoints at
/// differences 2/5/10/20/30 hit accuracies 95/85/70/50/30, linearly
/// interpolated between, with an unbounded decay past 30.
fn accuracy_from_difference(difference: f64) -> f64 {
    if difference <= 0.0 {
        100.0
    } else if difference < 2.0 {
        95.0 + (2.0 - difference) * 2.5
    } else if difference < 5.0 {
        85.0 + (5.0 - difference) * (10.0 / 3.0)
    } else if difference < 10.0 {
        70.0 + (10.0 - difference) * 3.0
    } else if difference < 20.0 {
        50.0 + (20.0 - difference) * 2.0
    } else if difference < 30.0 {
        30.0 + (30.0 - difference) * 2.0
    } else {
        (30.0 - (difference - 30.0) * 0.5).max(0.0)
    }
}

/// Evaluates a full recognition run and assembles the aggregate report.
///
/// Solids pair by index across both lists; gradients pair each reference
/// gradient with the recognized CSS string at the same index, comparing
/// first and last stops only; semi-transparent colors pair by index over
/// the reference list, blending color and alpha fidelity. With a
/// `baseline` report, the relative improvement of the overall accuracy is
/// recorded.
pub fn evaluate_recognition(
    reference: &ExtractedColors,
    recognized: &RecognizedColors,
    palette: &SnapPalette,
    baseline: Option<&AccuracyReport>,
) -> AccuracyReport {
    let solid_results = evaluate_solid_colors(&reference.solid_colors, &recognized.solid_colors);
    let gradient_results = evaluate_gradients(&reference.gradients, &recognized.gradients, palette);
    let semi_results = evaluate_semi_transparent(
        &reference.semi_transparent_colors,
        &recognized.semi_transparent_colors,
    );

    let solid_colors_accuracy = average_accuracy(&solid_results);
    let gradients_accuracy = average_accuracy(&gradient_results);
    let semi_transparent_accuracy = average_accuracy(&semi_results);

    let mut detailed_results = solid_results;
    detailed_results.extend(gradient_results);
    detailed_results.extend(semi_results);

    let overall_accuracy = weighted_overall_accuracy(&detailed_results);
    let accuracy_distribution = category_histogram(&detailed_results);
    let summary = render_summary(
        overall_accuracy,
        solid_colors_accuracy,
        gradients_accuracy,
        semi_transparent_accuracy,
        &accuracy_distribution,
        detailed_results.len(),
    );
    let improvement = baseline.map(|b| improvement_over(b.overall_accuracy, overall_accuracy));

    AccuracyReport {
        overall_accuracy,
        solid_colors_accuracy,
        gradients_accuracy,
        semi_transparent_accuracy,
        accuracy_distribution,
        detailed_results,
        summary,
        improvement,
    }
}

/// Pairs solid colors by index. The longer list drives the loop, so a
/// missing counterpart on either side still produces a (sentinel) record.
pub fn evaluate_solid_colors(reference: &[Rgba], recognized: &[Rgba]) -> Vec<ColorComparison> {
    let count = reference.len().max(recognized.len());
    let mut results = Vec::with_capacity(count);

    for i in 0..count {
        let position = format!("Solid #{}", i + 1);
        let comparison = match (reference.get(i), recognized.get(i)) {
            (Some(ref_color), Some(rec_color)) => {
                let score = evaluate_color_accuracy(ref_color.triple(), rec_color.triple());
                ColorComparison {
                    kind: ComparisonKind::Solid,
                    original: hex_of(ref_color),
                    original_rgb: ref_color.triple(),
                    recognized: hex_of(rec_color),
                    recognized_rgb: rec_color.triple(),
                    difference: score.difference,
                    accuracy: score.accuracy,
                    category: score.category,
                    position,
                }
            }
            (ref_color, rec_color) => sentinel(
                ComparisonKind::Solid,
                ref_color.map(hex_of).unwrap_or_else(|| "N/A".to_string()),
                ref_color.map(Rgba::triple).unwrap_or([0, 0, 0]),
                rec_color.map(hex_of).unwrap_or_else(|| "N/A".to_string()),
                rec_color.map(Rgba::triple).unwrap_or([255, 255, 255]),
                position,
            ),
        };
        results.push(comparison);
    }

    results
}

/// Compares each reference gradient's first and last stops against the
/// endpoint color tokens of the recognized CSS string at the same index.
///
/// Intermediate stops are out of scope; endpoint fidelity stands in for
/// the whole gradient. Reference gradients with fewer than two stops are
/// skipped. A recognized string that is absent or yields no parseable
/// color token scores both endpoints as sentinels.
pub fn evaluate_gradients(
    reference: &[LinearGradient],
    recognized: &[String],
    palette: &SnapPalette,
) -> Vec<ColorComparison> {
    let mut results = Vec::new();

    for (i, gradient) in reference.iter().enumerate() {
        let stops = &gradient.gradient_stops;
        if stops.len() < 2 {
            continue;
        }

        let tokens = recognized
            .get(i)
            .map(|css| parse_css_color_tokens(css))
            .unwrap_or_default();

        let first = quantize_color(&stops[0].color, palette).triple();
        let last = quantize_color(&stops[stops.len() - 1].color, palette).triple();

        results.push(endpoint_comparison(i + 1, "start", first, tokens.first()));
        results.push(endpoint_comparison(i + 1, "end", last, tokens.last()));
    }

    results
}

fn endpoint_comparison(
    index: usize,
    endpoint: &str,
    reference: [u8; 3],
    recognized: Option<&Rgba>,
) -> ColorComparison {
    let reference_hex = rgb_to_hex(reference[0] as f64, reference[1] as f64, reference[2] as f64);
    let original = format!("Gradient {index} {endpoint}: {reference_hex}");
    let position = format!("Gradient {index} {endpoint}");

    match recognized {
        Some(rec_color) => {
            let score = evaluate_color_accuracy(reference, rec_color.triple());
            ColorComparison {
                kind: ComparisonKind::Gradient,
                original,
                original_rgb: reference,
                recognized: format!("Gradient {index} {endpoint}: {}", hex_of(rec_color)),
                recognized_rgb: rec_color.triple(),
                difference: score.difference,
                accuracy: score.accuracy,
                category: score.category,
                position,
            }
        }
        None => sentinel(
            ComparisonKind::Gradient,
            original,
            reference,
            "N/A".to_string(),
            [255, 255, 255],
            position,
        ),
    }
}

/// Pairs semi-transparent colors by index over the reference list,
/// blending color fidelity (70%) with alpha fidelity (30%).
///
/// Alpha fidelity is linear: `max(0, 100 - |Δa| * 100)`. The quality band
/// comes from the blended score rather than the raw difference.
pub fn evaluate_semi_transparent(
    reference: &[Rgba],
    recognized: &[Rgba],
) -> Vec<ColorComparison> {
    let mut results = Vec::with_capacity(reference.len());

    for (i, ref_color) in reference.iter().enumerate() {
        let position = format!("Semi-transparent #{}", i + 1);

        let Some(rec_color) = recognized.get(i) else {
            results.push(sentinel(
                ComparisonKind::SemiTransparent,
                format!(
                    "rgba({},{},{},{})",
                    ref_color.r, ref_color.g, ref_color.b, ref_color.a
                ),
                ref_color.triple(),
                "N/A".to_string(),
                [255, 255, 255],
                position,
            ));
            continue;
        };

        let color_score = evaluate_color_accuracy(ref_color.triple(), rec_color.triple());
        let alpha_accuracy = (100.0 - (ref_color.a - rec_color.a).abs() * 100.0).max(0.0);
        let blended = color_score.accuracy as f64 * 0.7 + alpha_accuracy * 0.3;

        results.push(ColorComparison {
            kind: ComparisonKind::SemiTransparent,
            original: rgba_repr(ref_color),
            original_rgb: ref_color.triple(),
            recognized: rgba_repr(rec_color),
            recognized_rgb: rec_color.triple(),
            difference: color_score.difference,
            accuracy: blended.round() as u8,
            category: Category::from_blended(blended),
            position,
        });
    }

    results
}

/// Pulls every color token out of a CSS fragment, in order of appearance.
///
/// Recognizes `#RGB`/`#RGBA`/`#RRGGBB`/`#RRGGBBAA` and `rgb()`/`rgba()`
/// forms. Tokens that fail to parse (a five-digit hex run, a channel past
/// 255) are dropped rather than reported.
///
/// # Examples
///
/// ```
/// use swatchcast::evaluate::parse_css_color_tokens;
///
/// let tokens = parse_css_color_tokens("linear-gradient(90deg, #FF0000 0%, rgba(0, 0, 255, 0.5) 100%)");
/// assert_eq!(tokens.len(), 2);
/// assert_eq!(tokens[0].triple(), [255, 0, 0]);
/// assert_eq!(tokens[1].a, 0.5);
/// ```
pub fn parse_css_color_tokens(text: &str) -> Vec<Rgba> {
    COLOR_TOKEN_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let token = caps.get(0).map(|m| m.as_str())?;
            if token.starts_with('#') {
                return parse_hex_color(token).ok();
            }

            let channel = |i: usize| caps.get(i)?.as_str().parse::<u8>().ok();
            let r = channel(1)?;
            let g = channel(2)?;
            let b = channel(3)?;
            let a = match caps.get(4) {
                Some(m) => m.as_str().parse::<f64>().ok()?,
                None => 1.0,
            };
            Some(Rgba { r, g, b, a })
        })
        .collect()
}

/// Worst-case record for a pair with a missing side.
fn sentinel(
    kind: ComparisonKind,
    original: String,
    original_rgb: [u8; 3],
    recognized: String,
    recognized_rgb: [u8; 3],
    position: String,
) -> ColorComparison {
    ColorComparison {
        kind,
        original,
        original_rgb,
        recognized,
        recognized_rgb,
        difference: MISSING_PAIR_DIFFERENCE,
        accuracy: 0,
        category: Category::Poor,
        position,
    }
}

fn hex_of(color: &Rgba) -> String {
    rgb_to_hex(color.r as f64, color.g as f64, color.b as f64)
}

fn rgba_repr(color: &Rgba) -> String {
    format!(
        "rgba({},{},{},{:.2})",
        color.r, color.g, color.b, color.a
    )
}

fn average_accuracy(results: &[ColorComparison]) -> u8 {
    if results.is_empty() {
        return 0;
    }
    let sum: u32 = results.iter().map(|r| r.accuracy as u32).sum();
    (sum as f64 / results.len() as f64).round() as u8
}

fn weighted_overall_accuracy(results: &[ColorComparison]) -> u8 {
    if results.is_empty() {
        return 0;
    }

    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    for result in results {
        let weight = result.kind.weight();
        weighted_sum += result.accuracy as f64 * weight;
        weight_total += weight;
    }

    (weighted_sum / weight_total).round() as u8
}

fn category_histogram(results: &[ColorComparison]) -> CategoryHistogram {
    let mut histogram = CategoryHistogram::default();
    for result in results {
        match result.category {
            Category::Excellent => histogram.excellent += 1,
            Category::Good => histogram.good += 1,
            Category::Fair => histogram.fair += 1,
            Category::Poor => histogram.poor += 1,
        }
    }
    histogram
}

fn render_summary(
    overall: u8,
    solid: u8,
    gradient: u8,
    semi: u8,
    distribution: &CategoryHistogram,
    total: usize,
) -> String {
    let denominator = total.max(1) as f64;
    let percent = |count: usize| ((count as f64 / denominator) * 100.0).round() as u32;

    let grade = match overall {
        90..=u8::MAX => "excellent",
        75..=89 => "good",
        60..=74 => "fair",
        _ => "poor",
    };

    format!(
        "Color recognition accuracy report\n\
         =================================\n\
         Overall accuracy: {overall}% (grade: {grade})\n\
         ---------------------------------\n\
         Solid colors: {solid}%\n\
         Gradients: {gradient}%\n\
         Semi-transparent colors: {semi}%\n\
         ---------------------------------\n\
         Distribution:\n\
         - excellent (>=95%): {}% ({})\n\
         - good (85-94%): {}% ({})\n\
         - fair (70-84%): {}% ({})\n\
         - poor (<70%): {}% ({})\n\
         ---------------------------------\n\
         Samples evaluated: {total}\n",
        percent(distribution.excellent),
        distribution.excellent,
        percent(distribution.good),
        distribution.good,
        percent(distribution.fair),
        distribution.fair,
        percent(distribution.poor),
        distribution.poor,
    )
}

/// Relative gain of `current` over `baseline`, in percent. A zero
/// baseline reports the current value itself.
fn improvement_over(baseline: u8, current: u8) -> i32 {
    if baseline == 0 {
        return current as i32;
    }
    let baseline = baseline as f64;
    (((current as f64 - baseline) / baseline) * 100.0).round() as i32
}

#[derive(Serialize)]
struct TimestampedReport<'a> {
    timestamp: String,
    #[serde(flatten)]
    report: &'a AccuracyReport,
}

/// Serializes a report as pretty JSON with an RFC 3339 timestamp, ready
/// to write to disk or attach to a run log.
pub fn export_report(report: &AccuracyReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&TimestampedReport {
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        report,
    })
}

/// Projects a report into the rows chart consumers plot directly.
pub fn chart_data(report: &AccuracyReport) -> ChartData {
    ChartData {
        accuracy_by_type: vec![
            TypeAccuracy {
                kind: ComparisonKind::Solid,
                accuracy: report.solid_colors_accuracy,
            },
            TypeAccuracy {
                kind: ComparisonKind::Gradient,
                accuracy: report.gradients_accuracy,
            },
            TypeAccuracy {
                kind: ComparisonKind::SemiTransparent,
                accuracy: report.semi_transparent_accuracy,
            },
        ],
        distribution_by_category: vec![
            CategoryCount {
                category: Category::Excellent,
                count: report.accuracy_distribution.excellent,
            },
            CategoryCount {
                category: Category::Good,
                count: report.accuracy_distribution.good,
            },
            CategoryCount {
                category: Category::Fair,
                count: report.accuracy_distribution.fair,
            },
            CategoryCount {
                category: Category::Poor,
                count: report.accuracy_distribution.poor,
            },
        ],
        detailed_color_differences: report
            .detailed_results
            .iter()
            .map(|r| DifferencePoint {
                position: r.position.clone(),
                difference: r.difference,
                accuracy: r.accuracy,
            })
            .collect(),
    }
}
