//! Snap palette configuration and discovery for `swatch.toml`
//!
//! A snap palette is a list of rules that pull near-miss quantized colors
//! onto canonical design-system values. Each rule gives an inclusive window
//! per channel and the target the window collapses to:
//!
//! ```toml
//! [[snap]]
//! r = [246, 248]
//! g = [247, 249]
//! b = [249, 252]
//! target = [247, 248, 250]
//! ```
//!
//! With no `swatch.toml` on disk the built-in palette applies (see
//! [`SnapPalette::default`]). A discovered or explicitly named file replaces
//! the built-in rules entirely, so a file with no `[[snap]]` tables turns
//! snapping off.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read palette: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse swatch.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Palette validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// One snap rule: an inclusive window per channel and the canonical value
/// any color inside the window collapses to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapRule {
    /// Inclusive `[min, max]` window for the red channel
    pub r: [u8; 2],
    /// Inclusive `[min, max]` window for the green channel
    pub g: [u8; 2],
    /// Inclusive `[min, max]` window for the blue channel
    pub b: [u8; 2],
    /// The triple a matching color becomes
    pub target: [u8; 3],
}

impl SnapRule {
    /// Returns true when every channel of `rgb` falls inside this rule's
    /// window. All three channels must match; a single miss leaves the
    /// color alone.
    pub fn matches(&self, rgb: [u8; 3]) -> bool {
        let in_window = |v: u8, w: [u8; 2]| v >= w[0] && v <= w[1];
        in_window(rgb[0], self.r) && in_window(rgb[1], self.g) && in_window(rgb[2], self.b)
    }
}

/// An ordered list of snap rules. The first matching rule wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapPalette {
    /// Snap rules, applied in order
    #[serde(default, rename = "snap")]
    pub rules: Vec<SnapRule>,
}

impl Default for SnapPalette {
    /// The built-in palette: two windows around common design-system
    /// neutrals, a light surface (`#F7F8FA`) and a dark ink (`#11141A`).
    fn default() -> Self {
        Self {
            rules: vec![
                SnapRule {
                    r: [246, 248],
                    g: [247, 249],
                    b: [249, 252],
                    target: [247, 248, 250],
                },
                SnapRule {
                    r: [16, 18],
                    g: [19, 22],
                    b: [25, 31],
                    target: [17, 20, 26],
                },
            ],
        }
    }
}

impl SnapPalette {
    /// A palette with no rules. Snapping becomes a no-op.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Snaps a quantized triple against the rules. The first rule whose
    /// window contains the color wins; a color outside every window is
    /// returned unchanged.
    pub fn snap(&self, rgb: [u8; 3]) -> [u8; 3] {
        for rule in &self.rules {
            if rule.matches(rgb) {
                return rule.target;
            }
        }
        rgb
    }

    /// Checks rule well-formedness, returning one message per problem.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        for (i, rule) in self.rules.iter().enumerate() {
            for (name, window) in [("r", rule.r), ("g", rule.g), ("b", rule.b)] {
                if window[0] > window[1] {
                    errors.push(format!(
                        "snap rule {i}: {name} window [{}, {}] has min above max",
                        window[0], window[1]
                    ));
                }
            }
        }
        errors
    }
}

/// Find swatch.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for swatch.toml
/// 2. Check XDG_CONFIG_HOME/swatchcast/swatch.toml (or ~/.config/swatchcast/swatch.toml)
///
/// # Returns
/// - `Some(path)` if a swatch.toml file is found
/// - `None` if no palette file is found
pub fn find_palette() -> Option<PathBuf> {
    // First try walking up from current directory
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_palette_from(cwd) {
            return Some(path);
        }
    }

    // Fall back to XDG config
    find_xdg_palette()
}

/// Find swatch.toml in the XDG config directory.
///
/// Checks XDG_CONFIG_HOME/swatchcast/swatch.toml or ~/.config/swatchcast/swatch.toml
pub fn find_xdg_palette() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let palette_path = xdg_config.join("swatchcast").join("swatch.toml");
    if palette_path.exists() {
        Some(palette_path)
    } else {
        None
    }
}

/// Find swatch.toml by walking up from a specific directory.
///
/// This is the internal implementation that allows specifying the start
/// directory, useful for testing.
pub fn find_palette_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let palette_path = current.join("swatch.toml");
        if palette_path.exists() {
            return Some(palette_path);
        }

        // Move to parent directory
        if !current.pop() {
            // Reached root, no palette found
            return None;
        }
    }
}

/// Load a snap palette.
///
/// If a path is provided, loads from that file. Otherwise, uses
/// [`find_palette`] to locate one. If no palette file is found, returns the
/// built-in default.
///
/// # Arguments
/// - `path` - Optional path to a swatch.toml file
///
/// # Returns
/// - `Ok(SnapPalette)` on success
/// - `Err(ConfigError)` if the file cannot be read, parsed, or validated
pub fn load_palette(path: Option<&Path>) -> Result<SnapPalette, ConfigError> {
    let palette_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_palette(),
    };

    match palette_path {
        Some(p) => load_palette_file(&p),
        None => Ok(SnapPalette::default()),
    }
}

/// Load a snap palette from a specific file path.
fn load_palette_file(path: &Path) -> Result<SnapPalette, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let palette: SnapPalette = toml::from_str(&contents)?;

    let errors = palette.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors));
    }

    Ok(palette)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_default_palette_windows() {
        let palette = SnapPalette::default();
        assert_eq!(palette.rules.len(), 2);
        assert_eq!(palette.snap([247, 248, 251]), [247, 248, 250]);
        assert_eq!(palette.snap([17, 21, 30]), [17, 20, 26]);
    }

    #[test]
    fn test_snap_windows_are_inclusive() {
        let palette = SnapPalette::default();
        assert_eq!(palette.snap([246, 247, 249]), [247, 248, 250]);
        assert_eq!(palette.snap([248, 249, 252]), [247, 248, 250]);
        assert_eq!(palette.snap([16, 19, 25]), [17, 20, 26]);
        assert_eq!(palette.snap([18, 22, 31]), [17, 20, 26]);
    }

    #[test]
    fn test_snap_requires_every_channel() {
        let palette = SnapPalette::default();
        // Red channel one past its window.
        assert_eq!(palette.snap([249, 248, 250]), [249, 248, 250]);
        // Blue channel one short of its window.
        assert_eq!(palette.snap([17, 20, 24]), [17, 20, 24]);
    }

    #[test]
    fn test_snap_first_match_wins() {
        let palette = SnapPalette {
            rules: vec![
                SnapRule { r: [0, 255], g: [0, 255], b: [0, 255], target: [1, 1, 1] },
                SnapRule { r: [0, 255], g: [0, 255], b: [0, 255], target: [2, 2, 2] },
            ],
        };
        assert_eq!(palette.snap([100, 100, 100]), [1, 1, 1]);
    }

    #[test]
    fn test_empty_palette_is_a_no_op() {
        assert_eq!(SnapPalette::empty().snap([247, 248, 251]), [247, 248, 251]);
    }

    #[test]
    fn test_find_palette_in_current_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let palette_path = temp.path().join("swatch.toml");
        File::create(&palette_path)
            .expect("should create palette file")
            .write_all(b"snap = []")
            .expect("should write palette content");

        let found = find_palette_from(temp.path().to_path_buf());
        assert_eq!(found, Some(palette_path));
    }

    #[test]
    fn test_find_palette_in_parent_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let palette_path = temp.path().join("swatch.toml");
        File::create(&palette_path)
            .expect("should create palette file")
            .write_all(b"snap = []")
            .expect("should write palette content");

        // Create a subdirectory
        let subdir = temp.path().join("mockups").join("dark");
        fs::create_dir_all(&subdir).expect("should create subdirectories");

        let found = find_palette_from(subdir);
        assert_eq!(found, Some(palette_path));
    }

    #[test]
    fn test_find_palette_not_found() {
        let temp = TempDir::new().expect("should create temp dir");
        let found = find_palette_from(temp.path().to_path_buf());
        assert_eq!(found, None);
    }

    #[test]
    fn test_load_palette_from_file() {
        let temp = TempDir::new().expect("should create temp dir");
        let palette_path = temp.path().join("swatch.toml");
        File::create(&palette_path)
            .expect("should create palette file")
            .write_all(
                br#"
[[snap]]
r = [10, 20]
g = [10, 20]
b = [10, 20]
target = [15, 15, 15]
"#,
            )
            .expect("should write palette content");

        let palette = load_palette(Some(&palette_path)).expect("should load valid palette");
        assert_eq!(palette.rules.len(), 1);
        assert_eq!(palette.snap([12, 18, 15]), [15, 15, 15]);
        // A file replaces the built-in rules, so the defaults no longer apply.
        assert_eq!(palette.snap([247, 248, 251]), [247, 248, 251]);
    }

    #[test]
    fn test_load_palette_empty_file_disables_snapping() {
        let temp = TempDir::new().expect("should create temp dir");
        let palette_path = temp.path().join("swatch.toml");
        File::create(&palette_path)
            .expect("should create palette file")
            .write_all(b"")
            .expect("should write palette content");

        let palette = load_palette(Some(&palette_path)).expect("should load empty palette");
        assert!(palette.rules.is_empty());
    }

    #[test]
    fn test_load_palette_missing_file_errors() {
        let temp = TempDir::new().expect("should create temp dir");
        let palette_path = temp.path().join("nonexistent.toml");

        let result = load_palette(Some(&palette_path));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_palette_invalid_toml() {
        let temp = TempDir::new().expect("should create temp dir");
        let palette_path = temp.path().join("swatch.toml");
        File::create(&palette_path)
            .expect("should create palette file")
            .write_all(b"this is not valid toml {{{")
            .expect("should write invalid palette");

        let result = load_palette(Some(&palette_path));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_palette_validation_error() {
        let temp = TempDir::new().expect("should create temp dir");
        let palette_path = temp.path().join("swatch.toml");
        File::create(&palette_path)
            .expect("should create palette file")
            .write_all(
                br#"
[[snap]]
r = [200, 100]
g = [10, 20]
b = [10, 20]
target = [15, 15, 15]
"#,
            )
            .expect("should write invalid palette");

        let result = load_palette(Some(&palette_path));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validate_reports_each_bad_window() {
        let palette = SnapPalette {
            rules: vec![SnapRule {
                r: [200, 100],
                g: [20, 10],
                b: [0, 255],
                target: [0, 0, 0],
            }],
        };
        assert_eq!(palette.validate().len(), 2);
    }
}
