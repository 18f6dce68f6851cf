//! Integration tests for the color pipeline
//!
//! End-to-end coverage from design-node JSON through extraction, gradient
//! reconstruction, prompt briefing, text normalization, and recognition
//! scoring, exercising the same flows the CLI drives without spawning the
//! binary.

use std::fs::File;
use std::io::Write;

use tempfile::TempDir;

use swatchcast::brief::color_brief;
use swatchcast::config::{load_palette, SnapPalette};
use swatchcast::evaluate::evaluate_recognition;
use swatchcast::extract::extract_colors;
use swatchcast::gradient::{css_gradient, smooth_gradient};
use swatchcast::models::{DesignNode, ExtractedColors, RecognizedColors, Rgba};
use swatchcast::normalize::clean_generated_text;

/// A small node tree with every paint route: a near-brand solid on the
/// root, and a gradient, a semi-transparent solid, and a stroked solid on
/// the child.
const FIXTURE: &str = r#"{
    "fills": [
        {
            "type": "SOLID",
            "color": {
                "r": 0.9686274509803922,
                "g": 0.9725490196078431,
                "b": 0.984313725490196,
                "a": 1
            }
        }
    ],
    "children": [
        {
            "fills": [
                {
                    "type": "GRADIENT_LINEAR",
                    "gradientTransform": [1, 0, 0, 1, 0, 0],
                    "gradientStops": [
                        {"position": 0.05, "color": {"r": 1, "g": 0, "b": 0}},
                        {"position": 0.9, "color": {"r": 0, "g": 0, "b": 1}}
                    ]
                },
                {
                    "type": "SOLID",
                    "color": {
                        "r": 0.06666666666666667,
                        "g": 0.08235294117647059,
                        "b": 0.11764705882352941,
                        "a": 0.5
                    }
                }
            ],
            "strokes": [
                {"type": "SOLID", "color": {"r": 0.25, "g": 0.5, "b": 0.75}}
            ]
        }
    ]
}"#;

fn parse_node(json: &str) -> DesignNode {
    serde_json::from_str(json).expect("fixture should parse")
}

fn extract_fixture() -> ExtractedColors {
    extract_colors(&parse_node(FIXTURE), &SnapPalette::default())
}

#[test]
fn test_extraction_quantizes_snaps_and_routes() {
    let colors = extract_fixture();

    // Root fill snaps to the light brand neutral; the stroke follows in
    // document order.
    assert_eq!(
        colors.solid_colors,
        vec![Rgba::opaque(247, 248, 250), Rgba::opaque(64, 128, 191)]
    );

    // The semi-transparent fill snaps to the dark neutral and keeps alpha.
    assert_eq!(
        colors.semi_transparent_colors,
        vec![Rgba { r: 17, g: 20, b: 26, a: 0.5 }]
    );

    // The gradient survives verbatim, stops untouched.
    assert_eq!(colors.gradients.len(), 1);
    let stops = &colors.gradients[0].gradient_stops;
    assert_eq!(stops.len(), 2);
    assert_eq!(stops[0].position, 0.05);
    assert_eq!(stops[1].position, 0.9);
}

#[test]
fn test_extracted_gradient_renders_with_boundary_stops() {
    let colors = extract_fixture();

    assert_eq!(
        css_gradient(&colors.gradients[0], &SnapPalette::default()),
        "linear-gradient(90deg, #FF0000 0%, #FF0000 5%, #0000FF 90%, #0000FF 100%)"
    );
}

#[test]
fn test_smoothed_gradient_gains_midpoint() {
    let colors = extract_fixture();
    let smoothed = smooth_gradient(&colors.gradients[0], &SnapPalette::default());

    assert_eq!(smoothed.gradient_stops.len(), 3);
    assert!((smoothed.gradient_stops[1].position - 0.475).abs() < 1e-12);
    assert_eq!(
        css_gradient(&smoothed, &SnapPalette::default()),
        "linear-gradient(90deg, #FF0000 0%, #FF0000 5%, #800080 47.5%, #0000FF 90%, #0000FF 100%)"
    );
}

#[test]
fn test_brief_covers_every_section() {
    let colors = extract_fixture();
    let brief = color_brief(&colors, &SnapPalette::default());

    assert!(brief.contains("**Solid colors (hex)**: #F7F8FA, #4080BF"));
    assert!(brief.contains("**Gradient stats**: 1 gradients, 3 color stops total"));
    assert!(brief.contains("**Semi-transparent colors**: #11141A80 (opacity: 50.0%)"));
    assert!(brief.contains("**Semi-transparent colors (rgba)**: rgba(17,20,26,0.50)"));
    assert!(brief.contains("**HSB values**: (220°, 1%, 98%), (210°, 66%, 75%)"));
    assert!(brief.contains("**Color counts**: 2 solid, 1 semi-transparent"));
}

#[test]
fn test_perfect_recognition_scores_full_marks() {
    let reference = extract_fixture();
    let recognized = RecognizedColors {
        solid_colors: reference.solid_colors.clone(),
        gradients: vec!["linear-gradient(90deg, #FF0000 0%, #0000FF 100%)".to_string()],
        semi_transparent_colors: reference.semi_transparent_colors.clone(),
    };

    let report = evaluate_recognition(&reference, &recognized, &SnapPalette::default(), None);

    assert_eq!(report.overall_accuracy, 100);
    // Two solids, two gradient endpoints, one semi-transparent color.
    assert_eq!(report.detailed_results.len(), 5);
    assert_eq!(report.accuracy_distribution.excellent, 5);
    assert!(report.summary.contains("grade: excellent"));
    assert_eq!(report.improvement, None);
}

#[test]
fn test_normalized_model_output_feeds_evaluation() {
    // Raw model output: fenced, lowercase, bare numerals.
    let raw = "```css\nlinear-gradient(90, #ff0000 0, #0000ff 100)\n```";
    let cleaned = clean_generated_text(raw);
    assert_eq!(
        cleaned,
        "linear-gradient(90deg, #FF0000 0%, #0000FF 100%)"
    );

    let reference = extract_fixture();
    let recognized = RecognizedColors {
        solid_colors: reference.solid_colors.clone(),
        gradients: vec![cleaned],
        semi_transparent_colors: reference.semi_transparent_colors.clone(),
    };

    let report = evaluate_recognition(&reference, &recognized, &SnapPalette::default(), None);
    assert_eq!(report.overall_accuracy, 100);
}

#[test]
fn test_empty_recognition_degrades_to_sentinels() {
    let reference = extract_fixture();
    let report = evaluate_recognition(
        &reference,
        &RecognizedColors::default(),
        &SnapPalette::default(),
        None,
    );

    assert_eq!(report.overall_accuracy, 0);
    assert_eq!(report.detailed_results.len(), 5);
    assert_eq!(report.accuracy_distribution.poor, 5);
    assert!(report.detailed_results.iter().all(|r| r.accuracy == 0));
    assert!(report.summary.contains("grade: poor"));
}

#[test]
fn test_partial_recognition_weights_by_kind() {
    let reference = ExtractedColors {
        solid_colors: vec![Rgba::opaque(10, 20, 30)],
        gradients: extract_fixture().gradients,
        semi_transparent_colors: vec![Rgba { r: 1, g: 2, b: 3, a: 0.5 }],
    };
    // Solids and semi-transparent match; the gradient goes unrecognized.
    let recognized = RecognizedColors {
        solid_colors: vec![Rgba::opaque(10, 20, 30)],
        gradients: Vec::new(),
        semi_transparent_colors: vec![Rgba { r: 1, g: 2, b: 3, a: 0.5 }],
    };

    let report = evaluate_recognition(&reference, &recognized, &SnapPalette::default(), None);

    assert_eq!(report.solid_colors_accuracy, 100);
    assert_eq!(report.gradients_accuracy, 0);
    assert_eq!(report.semi_transparent_accuracy, 100);
    // (100 * 1.0 + 0 * 1.5 + 0 * 1.5 + 100 * 1.2) / 5.2 rounds to 42.
    assert_eq!(report.overall_accuracy, 42);
}

#[test]
fn test_report_round_trips_through_json() {
    let reference = extract_fixture();
    let recognized = RecognizedColors {
        solid_colors: reference.solid_colors.clone(),
        gradients: vec!["linear-gradient(90deg, #FF0000 0%, #0000FF 100%)".to_string()],
        semi_transparent_colors: reference.semi_transparent_colors.clone(),
    };
    let report = evaluate_recognition(&reference, &recognized, &SnapPalette::default(), None);

    let json = serde_json::to_string(&report).expect("report should serialize");
    let parsed = serde_json::from_str(&json).expect("report should deserialize");
    assert_eq!(report, parsed);
}

#[test]
fn test_custom_palette_file_replaces_builtin_rules() {
    let temp = TempDir::new().expect("should create temp dir");
    let palette_path = temp.path().join("swatch.toml");
    File::create(&palette_path)
        .expect("should create palette file")
        .write_all(
            br#"
[[snap]]
r = [64, 64]
g = [128, 128]
b = [191, 191]
target = [99, 99, 99]
"#,
        )
        .expect("should write palette content");

    let palette = load_palette(Some(&palette_path)).expect("should load palette");
    let colors = extract_colors(&parse_node(FIXTURE), &palette);

    // The stroke hits the custom rule; the root fill no longer snaps
    // because the built-in windows were replaced, not merged.
    assert_eq!(
        colors.solid_colors,
        vec![Rgba::opaque(247, 248, 251), Rgba::opaque(99, 99, 99)]
    );
}
