//! Handform CLI - Command-line interface for the Handform pose evaluator
//!
//! Commands:
//! - evaluate: Evaluate recorded frames against an exercise (batch mode)
//! - run: Evaluate frames streamed on stdin (streaming mode)
//! - boundaries: Dump the boundary lines for a single frame
//! - validate: Check frame records without evaluating them
//! - sample: Print a canonical sample frame

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use handform::normalizer::FrameNormalizer;
use handform::pipeline::Evaluator;
use handform::report::{FrameRecord, FrameReport, ReportEncoder};
use handform::samples::{self, SAMPLE_NAMES};
use handform::{ComputeError, EvaluationResult, EvaluatorConfig, ExerciseDescriptor, HANDFORM_VERSION};

/// Handform - Per-frame hand pose evaluator for rehabilitation exercises
#[derive(Parser)]
#[command(name = "handform")]
#[command(version = HANDFORM_VERSION)]
#[command(about = "Grade hand landmark frames against therapy exercises", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate recorded frames against an exercise (batch mode)
    Evaluate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Exercise descriptor as JSON, or @path to a JSON file
        #[arg(short, long)]
        exercise: String,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "ndjson")]
        output_format: OutputFormat,

        /// Evaluator configuration file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Evaluate frames streamed on stdin, one report per line (streaming mode)
    Run {
        /// Exercise descriptor as JSON, or @path to a JSON file
        #[arg(short, long)]
        exercise: String,

        /// Evaluator configuration file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Flush output after each record
        #[arg(long, default_value = "true")]
        flush: bool,
    },

    /// Print the boundary lines an exercise uses for one frame
    Boundaries {
        /// Frame record file (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Exercise descriptor as JSON, or @path to a JSON file
        #[arg(short, long)]
        exercise: String,

        /// Evaluator configuration file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate frame records without evaluating them
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Evaluator configuration file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a canonical sample frame
    Sample {
        /// Sample name (open-hand, fist, point-index, point-index-middle-raised, pinch, flat-hand)
        name: String,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one frame record per line)
    Ndjson,
    /// JSON array of frame records
    Json,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (one report per line)
    Ndjson,
    /// JSON array of reports
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), HandformCliError> {
    match cli.command {
        Commands::Evaluate {
            input,
            output,
            exercise,
            input_format,
            output_format,
            config,
        } => cmd_evaluate(
            &input,
            &output,
            &exercise,
            input_format,
            output_format,
            config.as_deref(),
        ),

        Commands::Run {
            exercise,
            config,
            flush,
        } => cmd_run(&exercise, config.as_deref(), flush),

        Commands::Boundaries {
            input,
            exercise,
            config,
        } => cmd_boundaries(&input, &exercise, config.as_deref()),

        Commands::Validate {
            input,
            input_format,
            config,
            json,
        } => cmd_validate(&input, input_format, config.as_deref(), json),

        Commands::Sample { name } => cmd_sample(&name),
    }
}

fn cmd_evaluate(
    input: &Path,
    output: &Path,
    exercise: &str,
    input_format: InputFormat,
    output_format: OutputFormat,
    config: Option<&Path>,
) -> Result<(), HandformCliError> {
    let exercise = load_exercise(exercise)?;
    let evaluator = load_evaluator(config)?;
    let records = parse_records(&read_input(input)?, &input_format)?;

    if records.is_empty() {
        return Err(HandformCliError::NoFrames);
    }

    let encoder = ReportEncoder::new();
    let reports: Vec<FrameReport> = records
        .iter()
        .map(|record| encoder.evaluate(&evaluator, record, &exercise))
        .collect();

    let passed = reports.iter().filter(|r| r.result.passed).count();
    info!(
        frames = reports.len(),
        passed,
        exercise = exercise.exercise_type.as_str(),
        "Batch evaluated"
    );

    let output_data = format_output(&reports, &output_format)?;

    if output.to_string_lossy() == "-" {
        print!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_run(exercise: &str, config: Option<&Path>, flush: bool) -> Result<(), HandformCliError> {
    let exercise = load_exercise(exercise)?;
    let evaluator = load_evaluator(config)?;
    let encoder = ReportEncoder::new();

    if atty::is(atty::Stream::Stdin) {
        warn!("stdin is a terminal; expecting one JSON frame record per line");
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut frames = 0usize;

    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        // A malformed line still yields a report so consumers stay in step
        let report = match FrameRecord::from_json(trimmed) {
            Ok(record) => encoder.evaluate(&evaluator, &record, &exercise),
            Err(e) => {
                warn!(line = frames, "Skipping malformed frame: {e}");
                let record = FrameRecord::new(Vec::new());
                encoder.encode(&record, EvaluationResult::failure(None, &e))
            }
        };
        frames += 1;

        writeln!(stdout, "{}", encoder.encode_to_json(&report)?)?;
        if flush {
            stdout.flush()?;
        }
    }

    stdout.flush()?;
    debug!(frames, "Stream closed");

    Ok(())
}

fn cmd_boundaries(
    input: &Path,
    exercise: &str,
    config: Option<&Path>,
) -> Result<(), HandformCliError> {
    let exercise = load_exercise(exercise)?;
    let evaluator = load_evaluator(config)?;
    let record = FrameRecord::from_json(read_input(input)?.trim())?;

    let boundaries = evaluator.boundaries_for(&record.landmarks, &exercise)?;
    println!("{}", serde_json::to_string_pretty(&boundaries)?);

    Ok(())
}

fn cmd_validate(
    input: &Path,
    input_format: InputFormat,
    config: Option<&Path>,
    json: bool,
) -> Result<(), HandformCliError> {
    let config = load_config(config)?;
    let records = parse_records(&read_input(input)?, &input_format)?;

    let errors: Vec<ValidationErrorDetail> = records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            FrameNormalizer::normalize(&record.landmarks, &config)
                .err()
                .map(|e| ValidationErrorDetail {
                    index,
                    frame_id: record.frame_id.as_ref().map(frame_id_label),
                    error: e.to_string(),
                })
        })
        .collect();

    let report = ValidationReport {
        total_frames: records.len(),
        valid_frames: records.len() - errors.len(),
        invalid_frames: errors.len(),
        errors,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total frames:   {}", report.total_frames);
        println!("Valid frames:   {}", report.valid_frames);
        println!("Invalid frames: {}", report.invalid_frames);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!(
                    "  - Frame {} (index {}): {}",
                    err.frame_id.as_deref().unwrap_or("unknown"),
                    err.index,
                    err.error
                );
            }
        }
    }

    if report.invalid_frames > 0 {
        Err(HandformCliError::ValidationFailed(report.invalid_frames))
    } else {
        Ok(())
    }
}

fn cmd_sample(name: &str) -> Result<(), HandformCliError> {
    let landmarks =
        samples::by_name(name).ok_or_else(|| HandformCliError::UnknownSample(name.to_string()))?;
    let record = FrameRecord::new(landmarks.to_vec());
    println!("{}", serde_json::to_string(&record)?);
    Ok(())
}

// Helper functions

fn read_input(input: &Path) -> Result<String, HandformCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn parse_records(data: &str, format: &InputFormat) -> Result<Vec<FrameRecord>, HandformCliError> {
    match format {
        InputFormat::Ndjson => data
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(n, line)| {
                serde_json::from_str(line.trim()).map_err(|e| {
                    HandformCliError::ParseError(format!("line {}: {}", n + 1, e))
                })
            })
            .collect(),
        InputFormat::Json => Ok(serde_json::from_str(data)?),
    }
}

/// Accept either inline JSON or `@path`
fn load_exercise(arg: &str) -> Result<ExerciseDescriptor, HandformCliError> {
    let json = match arg.strip_prefix('@') {
        Some(path) => fs::read_to_string(path)?,
        None => arg.to_string(),
    };
    let exercise = ExerciseDescriptor::from_json(&json)?;
    exercise.validate()?;
    Ok(exercise)
}

fn load_config(path: Option<&Path>) -> Result<EvaluatorConfig, HandformCliError> {
    match path {
        Some(path) => Ok(EvaluatorConfig::load(path)?),
        None => Ok(EvaluatorConfig::default()),
    }
}

fn load_evaluator(path: Option<&Path>) -> Result<Evaluator, HandformCliError> {
    Ok(Evaluator::with_config(load_config(path)?)?)
}

fn frame_id_label(id: &handform::report::FrameId) -> String {
    match id {
        handform::report::FrameId::Number(n) => n.to_string(),
        handform::report::FrameId::Text(s) => s.clone(),
    }
}

fn format_output(reports: &[FrameReport], format: &OutputFormat) -> Result<String, HandformCliError> {
    match format {
        OutputFormat::Ndjson => {
            let mut lines: Vec<String> = Vec::new();
            for report in reports {
                lines.push(serde_json::to_string(report)?);
            }
            Ok(lines.join("\n") + "\n")
        }
        OutputFormat::Json => Ok(serde_json::to_string(reports)?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(reports)?),
    }
}

// Error types

#[derive(Debug)]
enum HandformCliError {
    Io(io::Error),
    Compute(ComputeError),
    Json(serde_json::Error),
    NoFrames,
    UnknownSample(String),
    ValidationFailed(usize),
    ParseError(String),
}

impl From<io::Error> for HandformCliError {
    fn from(e: io::Error) -> Self {
        HandformCliError::Io(e)
    }
}

impl From<ComputeError> for HandformCliError {
    fn from(e: ComputeError) -> Self {
        HandformCliError::Compute(e)
    }
}

impl From<serde_json::Error> for HandformCliError {
    fn from(e: serde_json::Error) -> Self {
        HandformCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<HandformCliError> for CliError {
    fn from(e: HandformCliError) -> Self {
        match e {
            HandformCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            HandformCliError::Compute(e) => {
                let hint = match &e {
                    ComputeError::ConfigError(_) => "Check the --config file values",
                    ComputeError::UnknownExercise(_) => {
                        "Use one of: isolation, pinch, spread, fist, flat"
                    }
                    ComputeError::InvalidExercise(_) => {
                        "target_fingers take 0-4; pinch_pair takes two of 4, 8, 12, 16, 20"
                    }
                    _ => "Frames need 21 finite landmarks",
                };
                CliError {
                    code: e.tag().as_str().to_uppercase(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            HandformCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            HandformCliError::NoFrames => CliError {
                code: "NO_FRAMES".to_string(),
                message: "No frames found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            HandformCliError::UnknownSample(name) => CliError {
                code: "UNKNOWN_SAMPLE".to_string(),
                message: format!("No sample named '{}'", name),
                hint: Some(format!("Available samples: {}", SAMPLE_NAMES.join(", "))),
            },
            HandformCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} frames failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
            HandformCliError::ParseError(msg) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: msg,
                hint: Some("Check input format".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_frames: usize,
    valid_frames: usize,
    invalid_frames: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    frame_id: Option<String>,
    error: String,
}
