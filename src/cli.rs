//! Command-line interface implementation

use clap::{Parser, Subcommand};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::brief::color_brief;
use crate::config::{load_palette, ConfigError, SnapPalette};
use crate::evaluate::{evaluate_recognition, export_report, AccuracyReport};
use crate::extract::extract_colors;
use crate::models::{DesignNode, ExtractedColors, RecognizedColors};
use crate::normalize::clean_generated_text;

/// Exit codes
const EXIT_SUCCESS: u8 = 0;
const EXIT_ERROR: u8 = 1;
const EXIT_INVALID_ARGS: u8 = 2;

/// Swatchcast - Extract design-node colors, rebuild CSS, score recognition fidelity
#[derive(Parser)]
#[command(name = "swatch")]
#[command(about = "Extract design-node colors, rebuild CSS gradients, and score recognition fidelity")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract colors from a design node JSON tree
    Extract {
        /// Input JSON file containing the design node tree
        input: PathBuf,

        /// Print the prompt color brief instead of JSON
        #[arg(long)]
        brief: bool,

        /// Snap palette file (overrides swatch.toml discovery)
        #[arg(long)]
        palette: Option<PathBuf>,
    },

    /// Score recognized colors against a reference color set
    Evaluate {
        /// Reference color set JSON (extract output)
        #[arg(long)]
        reference: PathBuf,

        /// Recognized color set JSON (vision-model output)
        #[arg(long)]
        recognized: PathBuf,

        /// Earlier report JSON to compute improvement against
        #[arg(long)]
        baseline: Option<PathBuf>,

        /// Write the timestamped report JSON to this path
        #[arg(long)]
        export: Option<PathBuf>,

        /// Snap palette file (overrides swatch.toml discovery)
        #[arg(long)]
        palette: Option<PathBuf>,
    },

    /// Canonicalize color formats in generated style text
    Normalize {
        /// Input text file; reads stdin when omitted
        input: Option<PathBuf>,
    },
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            input,
            brief,
            palette,
        } => run_extract(&input, brief, palette.as_deref()),
        Commands::Evaluate {
            reference,
            recognized,
            baseline,
            export,
            palette,
        } => run_evaluate(
            &reference,
            &recognized,
            baseline.as_deref(),
            export.as_deref(),
            palette.as_deref(),
        ),
        Commands::Normalize { input } => run_normalize(input.as_deref()),
    }
}

/// Execute the extract command
fn run_extract(input: &Path, brief: bool, palette_path: Option<&Path>) -> ExitCode {
    let palette = match resolve_palette(palette_path) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let node: DesignNode = match read_json(input) {
        Ok(n) => n,
        Err(code) => return code,
    };

    let colors = extract_colors(&node, &palette);

    if brief {
        println!("{}", color_brief(&colors, &palette));
        return ExitCode::from(EXIT_SUCCESS);
    }

    match serde_json::to_string_pretty(&colors) {
        Ok(json) => {
            println!("{json}");
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: Failed to serialize colors: {e}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Execute the evaluate command
fn run_evaluate(
    reference: &Path,
    recognized: &Path,
    baseline: Option<&Path>,
    export: Option<&Path>,
    palette_path: Option<&Path>,
) -> ExitCode {
    let palette = match resolve_palette(palette_path) {
        Ok(p) => p,
        Err(code) => return code,
    };
    let reference: ExtractedColors = match read_json(reference) {
        Ok(v) => v,
        Err(code) => return code,
    };
    let recognized: RecognizedColors = match read_json(recognized) {
        Ok(v) => v,
        Err(code) => return code,
    };
    let baseline_report: Option<AccuracyReport> = match baseline {
        Some(path) => match read_json(path) {
            Ok(v) => Some(v),
            Err(code) => return code,
        },
        None => None,
    };

    let report = evaluate_recognition(&reference, &recognized, &palette, baseline_report.as_ref());

    // The summary carries its own trailing newline.
    print!("{}", report.summary);
    if let Some(improvement) = report.improvement {
        println!("Improvement over baseline: {improvement}%");
    }

    if let Some(path) = export {
        let json = match export_report(&report) {
            Ok(j) => j,
            Err(e) => {
                eprintln!("Error: Failed to serialize report: {e}");
                return ExitCode::from(EXIT_ERROR);
            }
        };
        if let Err(e) = fs::write(path, json) {
            eprintln!("Error: Failed to write '{}': {}", path.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
        println!("Exported: {}", path.display());
    }

    ExitCode::from(EXIT_SUCCESS)
}

/// Execute the normalize command
fn run_normalize(input: Option<&Path>) -> ExitCode {
    let text = match input {
        Some(path) => match fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("Error: Cannot read '{}': {}", path.display(), e);
                return ExitCode::from(EXIT_INVALID_ARGS);
            }
        },
        None => {
            let mut buffer = String::new();
            if let Err(e) = std::io::stdin().read_to_string(&mut buffer) {
                eprintln!("Error: Cannot read stdin: {e}");
                return ExitCode::from(EXIT_ERROR);
            }
            buffer
        }
    };

    println!("{}", clean_generated_text(&text));
    ExitCode::from(EXIT_SUCCESS)
}

/// Load the snap palette: an explicit path wins, otherwise discovery, with
/// the built-in defaults as the final fallback.
fn resolve_palette(path: Option<&Path>) -> Result<SnapPalette, ExitCode> {
    load_palette(path).map_err(|e| {
        eprintln!("Error: {e}");
        match e {
            ConfigError::Io(_) => ExitCode::from(EXIT_INVALID_ARGS),
            _ => ExitCode::from(EXIT_ERROR),
        }
    })
}

/// Read and deserialize a JSON file, mapping failures to exit codes.
fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ExitCode> {
    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: Cannot read '{}': {}", path.display(), e);
            return Err(ExitCode::from(EXIT_INVALID_ARGS));
        }
    };

    serde_json::from_str(&contents).map_err(|e| {
        eprintln!("Error: Failed to parse '{}': {}", path.display(), e);
        ExitCode::from(EXIT_ERROR)
    })
}
