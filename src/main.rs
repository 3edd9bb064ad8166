//! imagesense - visual feature profiler for reference images
//!
//! CLI entry point

use clap::Parser;
use imagesense::{
    create_progress_bar, AnalyzeArgs, AnalyzeOptions, BatchArgs, Cli, Commands, Config, ExitCode,
    JsonInsightSource, ProfileAnalyzer,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Image file extensions picked up by the batch command
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp", "gif", "tiff"];

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Analyze(args) => run_analyze(&args),
        Commands::Batch(args) => run_batch(&args),
        Commands::Info => run_info(),
    };

    std::process::exit(match result {
        Ok(()) => ExitCode::Success.code(),
        Err((code, message)) => {
            eprintln!("Error: {}", message);
            code.code()
        }
    });
}

type CommandResult = Result<(), (ExitCode, String)>;

fn load_options(
    config_path: Option<&PathBuf>,
    color_count: usize,
) -> Result<AnalyzeOptions, (ExitCode, String)> {
    let config = match config_path {
        Some(path) => Config::load_from_path(path)
            .map_err(|e| (ExitCode::InvalidArgs, format!("Config error: {}", e)))?,
        None => Config::load().unwrap_or_default(),
    };

    let mut options = AnalyzeOptions::default();
    config.apply(&mut options);
    // CLI flags override file values
    options.color.color_count = color_count;
    Ok(options)
}

fn run_analyze(args: &AnalyzeArgs) -> CommandResult {
    if !args.input.exists() {
        return Err((
            ExitCode::InputNotFound,
            format!("Input file does not exist: {}", args.input.display()),
        ));
    }

    let options = load_options(args.config.as_ref(), args.colors)?;
    let analyzer = ProfileAnalyzer::new(options);

    let insight_source = args.insight.as_ref().map(JsonInsightSource::new);
    let profile = analyzer
        .analyze_path(
            &args.input,
            insight_source
                .as_ref()
                .map(|s| s as &dyn imagesense::InsightSource),
        )
        .map_err(|e| (ExitCode::ProcessingError, e.to_string()))?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&profile)
    } else {
        serde_json::to_string(&profile)
    }
    .map_err(|e| (ExitCode::GeneralError, e.to_string()))?;

    println!("{}", json);
    Ok(())
}

fn run_batch(args: &BatchArgs) -> CommandResult {
    if !args.input.is_dir() {
        return Err((
            ExitCode::InputNotFound,
            format!("Input directory does not exist: {}", args.input.display()),
        ));
    }

    let images = collect_image_files(&args.input)
        .map_err(|e| (ExitCode::GeneralError, e.to_string()))?;
    if images.is_empty() {
        return Err((
            ExitCode::InputNotFound,
            "No image files found in input directory".to_string(),
        ));
    }

    let options = load_options(args.config.as_ref(), args.colors)?;
    let analyzer = ProfileAnalyzer::new(options);

    rayon::ThreadPoolBuilder::new()
        .num_threads(args.thread_count())
        .build_global()
        .ok();

    let start = Instant::now();
    let progress = if args.quiet {
        None
    } else {
        Some(create_progress_bar(images.len() as u64))
    };

    // Analyze chunk by chunk so the progress bar stays honest
    let mut lines = Vec::with_capacity(images.len());
    let mut failures = 0usize;
    for chunk in images.chunks(args.thread_count().max(1)) {
        for (path, result) in analyzer.analyze_batch(chunk) {
            match result {
                Ok(profile) => {
                    let record = serde_json::json!({
                        "file": path,
                        "profile": profile,
                    });
                    lines.push(record.to_string());
                }
                Err(e) => {
                    failures += 1;
                    eprintln!("Failed: {}: {}", path.display(), e);
                }
            }
            if let Some(pb) = &progress {
                pb.inc(1);
            }
        }
    }

    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }

    let output = lines.join("\n");
    match &args.output {
        Some(path) => {
            let mut file = std::fs::File::create(path)
                .map_err(|e| (ExitCode::OutputError, e.to_string()))?;
            writeln!(file, "{}", output).map_err(|e| (ExitCode::OutputError, e.to_string()))?;
        }
        None => println!("{}", output),
    }

    if !args.quiet {
        eprintln!(
            "Analyzed {}/{} images in {}",
            images.len() - failures,
            images.len(),
            imagesense::util::format_duration(start.elapsed())
        );
    }

    if failures == images.len() {
        return Err((
            ExitCode::ProcessingError,
            "All images failed to analyze".to_string(),
        ));
    }
    Ok(())
}

fn run_info() -> CommandResult {
    println!("imagesense {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("System Information");
    println!("  Platform: {}", std::env::consts::OS);
    println!("  Architecture: {}", std::env::consts::ARCH);
    println!("  CPUs: {}", num_cpus::get());
    Ok(())
}

fn collect_image_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                    .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}
