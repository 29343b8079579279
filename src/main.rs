//! Headshot - professional headshot generator.

mod cli;

use std::path::Path;
use std::process;

use clap::Parser;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn, Level};

use headshot::catalog::{background_prompt, list_outfits, Background, Gender};
use headshot::config::{self, Config};
use headshot::context::ServiceContext;
use headshot::error::HeadshotError;
use headshot::model::{resolve_model, validate_model};
use headshot::orchestrator::{GenerationState, Orchestrator};
use headshot::output::{resolve_output_path, save_image};
use headshot::params::{parse_background, parse_gender, validate_format};
use headshot::quota::{self, FileQuotaStore, QuotaTracker};
use headshot::selection::GenerationConfig;
use headshot::upload::SourceImage;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), HeadshotError> {
    // Load config
    let config_path = config::discover_config_path(cli.config.as_deref());
    let config = Config::load(&config_path).map_err(HeadshotError::Config)?;

    let quota = QuotaTracker::new(FileQuotaStore::new(config.usage_path()));
    let today = quota::today();

    if cli.quota {
        println!("Generations used today: {}/{}", quota.used_today(&today), quota.limit());
        return Ok(());
    }

    let gender = parse_gender(cli.gender.as_deref().unwrap_or(&config.defaults.gender))?;

    if cli.list_outfits {
        return print_catalog(gender);
    }

    // Resolve settings: CLI flag, then config default
    let selection = build_selection(&cli, &config, gender)?;

    let format = cli.format.clone().unwrap_or_else(|| config.defaults.format.clone());
    validate_format(&format).map_err(HeadshotError::InvalidArgument)?;

    let model_name = cli.model.as_deref().unwrap_or(&config.defaults.model);
    let model = resolve_model(model_name);
    validate_model(&model).map_err(HeadshotError::InvalidArgument)?;

    let image_path = cli
        .image
        .as_deref()
        .ok_or_else(|| HeadshotError::InvalidArgument("Provide a source image".into()))?;
    let image = if image_path.starts_with("data:") {
        SourceImage::from_data_url(image_path)?
    } else {
        SourceImage::load(Path::new(image_path))?
    };

    info!(%model, outfit = selection.outfit().id, background = %selection.background(), "Settings resolved");

    // Create context based on mode (live / recording / replaying)
    let replay_path = std::env::var("HEADSHOT_REPLAY").ok();
    let is_recording = std::env::var("HEADSHOT_REC").is_ok_and(|v| v == "true" || v == "1");

    let (ctx, recording_session) = if let Some(ref cassette_path) = replay_path {
        info!("Replaying from: {cassette_path}");
        (ServiceContext::replaying(Path::new(cassette_path))?, None)
    } else if is_recording {
        info!("Recording mode enabled");
        let (ctx, session) = ServiceContext::recording(&config);
        (ctx, Some(session))
    } else {
        (ServiceContext::live(&config), None)
    };

    let mut orchestrator = Orchestrator::new(selection, quota, ctx.service, model);
    orchestrator.load_image(image);

    let mut progress = orchestrator.subscribe();
    let progress_task = tokio::spawn(async move {
        loop {
            match progress.recv().await {
                Ok(GenerationState::Generating { .. }) => eprintln!("Generating headshot..."),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => warn!("Progress skipped {skipped} updates"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    let mut saved = 0;
    let mut last_error = None;
    for index in 1..=cli.count {
        if index > 1 {
            info!("Regenerating with same settings ({index}/{})", cli.count);
        }
        match orchestrator.generate(&today).await {
            Ok(GenerationState::Succeeded { artifact, .. }) => {
                let path = resolve_output_path(cli.output.as_deref(), &format, index, cli.count);
                match save_image(&artifact, &format, &path) {
                    Ok(()) => {
                        eprintln!("Saved: {}", path.display());
                        saved += 1;
                    }
                    Err(e) => {
                        eprintln!("Failed to save {}: {e}", path.display());
                        last_error = Some(e);
                    }
                }
            }
            Ok(GenerationState::Failed { error, .. }) => {
                if cli.count > 1 {
                    eprintln!("Generation {index} failed: {error}");
                }
                last_error = Some(HeadshotError::Service(error));
            }
            Ok(other) => warn!("Generation ended in unexpected state: {}", other.name()),
            Err(e) => {
                last_error = Some(e);
                break;
            }
        }
    }

    let used = orchestrator.quota().used_today(&today);
    let limit = orchestrator.quota().limit();
    drop(orchestrator);
    if let Err(e) = progress_task.await {
        warn!("Progress reporter failed: {e}");
    }
    info!("Generations used today: {used}/{limit}");

    // Finish recording if active
    if let Some(session) = recording_session {
        match session.finish() {
            Ok(path) => eprintln!("Cassette saved: {}", path.display()),
            Err(e) => warn!("Failed to save cassette: {e}"),
        }
    }

    match last_error {
        Some(e) if saved == 0 => Err(e),
        Some(e) => {
            eprintln!("{e}");
            Ok(())
        }
        None => Ok(()),
    }
}

/// Apply gender, outfit, background, and instruction to a fresh selection.
fn build_selection(
    cli: &Cli,
    config: &Config,
    gender: Gender,
) -> Result<GenerationConfig, HeadshotError> {
    let mut selection = GenerationConfig::new(gender)?;

    if let Some(id) = cli.outfit.as_deref() {
        selection.select_outfit(id)?;
    } else if let Some(id) = config.defaults.outfit.as_deref() {
        // A configured default for the other gender falls back to the first outfit.
        if let Err(e) = selection.select_outfit(id) {
            warn!("Ignoring default outfit: {e}");
        }
    }

    let background = cli.background.as_deref().unwrap_or(&config.defaults.background);
    selection.set_background(parse_background(background)?);

    if let Some(text) = cli.instruction.as_deref() {
        selection.set_custom_instruction(text);
    }
    Ok(selection)
}

fn print_catalog(gender: Gender) -> Result<(), HeadshotError> {
    println!("Outfits for {gender}:");
    for outfit in list_outfits(gender) {
        println!("  {:<16} {:<27} {}", outfit.id, outfit.label, outfit.description);
    }
    println!("Backgrounds:");
    for background in Background::ALL {
        println!("  {:<16} {}", background.tag(), background_prompt(background.tag())?);
    }
    Ok(())
}
