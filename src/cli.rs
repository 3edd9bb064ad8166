//! CLI interface module
//!
//! Provides command-line interface using clap derive macros.

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

/// Exit codes for the CLI
///
/// These codes follow standard Unix conventions and provide specific error
/// categories for scripting and automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    GeneralError = 1,
    /// Argument error
    InvalidArgs = 2,
    /// Input file or directory not found
    InputNotFound = 3,
    /// Output error (write permission etc.)
    OutputError = 4,
    /// Analysis error
    ProcessingError = 5,
}

impl ExitCode {
    /// Convert to process exit code
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Get human-readable description
    pub fn description(self) -> &'static str {
        match self {
            ExitCode::Success => "Success",
            ExitCode::GeneralError => "General error",
            ExitCode::InvalidArgs => "Invalid arguments",
            ExitCode::InputNotFound => "Input file or directory not found",
            ExitCode::OutputError => "Output error (permission denied, disk full, etc.)",
            ExitCode::ProcessingError => "Analysis error",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.code()
    }
}

/// Visual feature profiler for reference images
#[derive(Parser, Debug)]
#[command(name = "imagesense")]
#[command(version)]
#[command(about = "Extract a structured visual feature profile from an image", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a single image and print its feature profile as JSON
    Analyze(AnalyzeArgs),
    /// Analyze every image in a directory
    Batch(BatchArgs),
    /// Show system information
    Info,
}

/// Arguments for the analyze command
#[derive(clap::Args, Debug)]
pub struct AnalyzeArgs {
    /// Input image file
    pub input: PathBuf,

    /// Number of dominant colors to extract
    #[arg(short, long, default_value_t = 5)]
    pub colors: usize,

    /// Path to a pre-fetched external insight record (JSON)
    #[arg(short, long)]
    pub insight: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(short, long)]
    pub pretty: bool,

    /// Configuration file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Arguments for the batch command
#[derive(clap::Args, Debug)]
pub struct BatchArgs {
    /// Input directory of images
    pub input: PathBuf,

    /// Output file for JSON-lines profiles (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of dominant colors to extract
    #[arg(short, long, default_value_t = 5)]
    pub colors: usize,

    /// Number of parallel threads
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Configuration file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl BatchArgs {
    /// Get thread count (default to available CPUs)
    pub fn thread_count(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get)
    }
}

/// Create a styled progress bar for file processing
pub fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )
            .expect("Invalid progress bar template")
            .progress_chars("#>-"),
    );
    pb
}

/// Create a spinner for indeterminate progress
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("Invalid spinner template"),
    );
    pb.set_message(message.to_string());
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse() {
        // Verify CLI can be built
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_display() {
        let mut cmd = Cli::command();
        let help = cmd.render_help().to_string();
        assert!(help.contains("imagesense"));
        assert!(help.contains("analyze"));
        assert!(help.contains("batch"));
    }

    #[test]
    fn test_missing_input_error() {
        let result = Cli::try_parse_from(["imagesense", "analyze"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("required"));
    }

    #[test]
    fn test_option_parsing() {
        let cli = Cli::try_parse_from([
            "imagesense",
            "analyze",
            "photo.png",
            "--colors",
            "8",
            "--pretty",
            "-vv",
        ])
        .unwrap();

        if let Commands::Analyze(args) = cli.command {
            assert_eq!(args.input, PathBuf::from("photo.png"));
            assert_eq!(args.colors, 8);
            assert!(args.pretty);
            assert_eq!(args.verbose, 2);
            assert!(args.insight.is_none());
        } else {
            panic!("Expected Analyze command");
        }
    }

    #[test]
    fn test_default_values() {
        let cli = Cli::try_parse_from(["imagesense", "analyze", "photo.png"]).unwrap();

        if let Commands::Analyze(args) = cli.command {
            assert_eq!(args.colors, 5);
            assert!(!args.pretty);
            assert_eq!(args.verbose, 0);
            assert!(args.config.is_none());
        } else {
            panic!("Expected Analyze command");
        }
    }

    #[test]
    fn test_batch_parsing() {
        let cli = Cli::try_parse_from([
            "imagesense",
            "batch",
            "./images",
            "--output",
            "profiles.jsonl",
            "--threads",
            "4",
            "--quiet",
        ])
        .unwrap();

        if let Commands::Batch(args) = cli.command {
            assert_eq!(args.output, Some(PathBuf::from("profiles.jsonl")));
            assert_eq!(args.thread_count(), 4);
            assert!(args.quiet);
        } else {
            panic!("Expected Batch command");
        }
    }

    #[test]
    fn test_batch_default_threads() {
        let cli = Cli::try_parse_from(["imagesense", "batch", "./images"]).unwrap();
        if let Commands::Batch(args) = cli.command {
            assert!(args.thread_count() >= 1);
        } else {
            panic!("Expected Batch command");
        }
    }

    #[test]
    fn test_info_command() {
        let cli = Cli::try_parse_from(["imagesense", "info"]).unwrap();
        assert!(matches!(cli.command, Commands::Info));
    }

    #[test]
    fn test_progress_bar_display() {
        let pb = create_progress_bar(100);
        assert_eq!(pb.length(), Some(100));

        pb.set_position(50);
        assert_eq!(pb.position(), 50);

        pb.finish_with_message("done");
    }

    #[test]
    fn test_spinner_creation() {
        let spinner = create_spinner("Analyzing...");
        assert_eq!(spinner.message(), "Analyzing...");
        spinner.finish_with_message("Complete");
    }

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.code(), 0);
        assert_eq!(ExitCode::GeneralError.code(), 1);
        assert_eq!(ExitCode::InvalidArgs.code(), 2);
        assert_eq!(ExitCode::InputNotFound.code(), 3);
        assert_eq!(ExitCode::OutputError.code(), 4);
        assert_eq!(ExitCode::ProcessingError.code(), 5);
    }

    #[test]
    fn test_exit_code_descriptions() {
        assert_eq!(ExitCode::Success.description(), "Success");
        assert!(!ExitCode::GeneralError.description().is_empty());
        assert!(!ExitCode::InputNotFound.description().is_empty());
        assert!(!ExitCode::ProcessingError.description().is_empty());
    }

    #[test]
    fn test_exit_code_into_i32() {
        let code: i32 = ExitCode::Success.into();
        assert_eq!(code, 0);

        let code: i32 = ExitCode::ProcessingError.into();
        assert_eq!(code, 5);
    }
}
