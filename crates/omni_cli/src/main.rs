//! omnistitch - convert and merge chaptered 360 camera recordings.
//!
//! Usage:
//!   omnistitch [INPUT_DIR] [OUTPUT_DIR] [--yes] [--quality CODE]

mod cli;
mod prompt;
mod scan;

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::{CommandFactory, Parser};
use tracing::{debug, info, warn};

use omni_core::config::{ConfigManager, Settings};
use omni_core::grouping::ClipCatalog;
use omni_core::logging::{self, LogLevel, RunLoggerBuilder, WorkerGuard};
use omni_core::models::{MediaKind, RunOptions};
use omni_core::orchestrator::{create_pipeline, Context, RunState};
use omni_core::tools::FfmpegTools;

use cli::Args;
use prompt::{choose_options, Prompter};

fn main() -> ExitCode {
    let args = Args::parse();

    if !args.input_dir.is_dir() {
        eprintln!("input is not a directory\n");
        eprintln!("{}", Args::command().render_help());
        return ExitCode::from(2);
    }

    let settings = match load_settings(&args) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    // Keep the guard alive until exit so the log file is flushed
    let _log_guard = init_tracing(&args, &settings);

    match run(args, settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Stderr plus a daily file in the logs folder, or stderr alone when the
/// logs folder cannot be created.
fn init_tracing(args: &Args, settings: &Settings) -> Option<WorkerGuard> {
    let level = if args.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Warn
    };
    let logs_dir = args.input_dir.join(&settings.paths.logs_folder);

    match logging::init_tracing_with_file(level, &logs_dir) {
        Ok(guard) => Some(guard),
        Err(e) => {
            logging::init_tracing(level);
            warn!("File logging disabled ({}): {}", logs_dir.display(), e);
            None
        }
    }
}

fn run(args: Args, settings: Settings) -> Result<()> {
    info!("omnistitch {}", omni_core::version());
    let input_dir = args.input_dir.clone();

    let files = scan::list_files(&input_dir)
        .with_context(|| format!("listing {}", input_dir.display()))?;
    let catalog = ClipCatalog::build(&files);

    if catalog.clip_count() == 0 {
        println!("No camera files found in {}", input_dir.display());
        return Ok(());
    }
    print_catalog(&catalog);

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout(), args.yes);
    let options = choose_options(
        &catalog,
        &mut prompter,
        args.quality,
        settings.conversion.default_quality,
    )
    .context("reading answers")?;

    if options.is_empty() {
        println!("Nothing to do.");
        return Ok(());
    }

    execute(settings, options, &args, catalog)
}

fn execute(settings: Settings, options: RunOptions, args: &Args, catalog: ClipCatalog) -> Result<()> {
    let input_dir = args.input_dir.clone();
    let output_dir = input_dir.join(
        args.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(&settings.paths.output_folder)),
    );
    let work_dir = input_dir.join(&settings.paths.work_folder);
    let logs_dir = input_dir.join(&settings.paths.logs_folder);

    fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;

    let run_name = format!("omnistitch_{}", chrono::Local::now().format("%Y%m%d_%H%M%S"));
    let logger = RunLoggerBuilder::new(&run_name, &logs_dir)
        .config(settings.log_config(args.verbose))
        .callback(Box::new(|line| println!("{}", line)))
        .build()
        .with_context(|| format!("opening run log in {}", logs_dir.display()))?;
    let logger = Arc::new(logger);

    info!("Writing output to {}", output_dir.display());
    debug!("Run options: {:?}", options);

    let tools = Arc::new(FfmpegTools::from_settings(&settings));
    let pipeline = create_pipeline(&options);
    let ctx = Context::new(
        settings,
        options,
        &run_name,
        input_dir,
        output_dir,
        work_dir,
        Arc::clone(&logger),
        tools,
    );
    let mut state = RunState::new(&run_name, catalog);

    let result = pipeline.run(&ctx, &mut state);
    logger.flush();

    if let Err(e) = result {
        eprintln!("Run log: {}", logger.log_path().display());
        return Err(e.into());
    }

    for file in state.produced_files() {
        println!("  {}", file.display());
    }
    Ok(())
}

fn load_settings(args: &Args) -> Result<Settings> {
    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let mut manager = ConfigManager::new(&config_path);
    manager
        .load_or_create()
        .with_context(|| format!("loading settings from {}", config_path.display()))?;
    Ok(manager.into_settings())
}

fn default_config_path() -> PathBuf {
    match dirs::config_dir() {
        Some(config_dir) => config_dir.join("omnistitch").join("settings.toml"),
        None => PathBuf::from("omnistitch.toml"),
    }
}

fn print_catalog(catalog: &ClipCatalog) {
    for kind in MediaKind::all() {
        let groups: Vec<_> = catalog.groups(*kind).collect();
        if groups.is_empty() {
            continue;
        }
        let chaptered = groups.iter().filter(|g| g.is_mergeable()).count();
        println!(
            "{}: {} recording(s), {} chaptered",
            kind.extension(),
            groups.len(),
            chaptered
        );
    }
}
