//! aviconv - batch AVI conversion and video inspection
//!
//! Entry point: parses arguments, loads configuration, sets up logging and
//! dispatches to the converter or the inspector.

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{Level, info};
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use aviconv::cli::{Args, Commands};
use aviconv::config::Config;
use aviconv::convert::BatchConverter;
use aviconv::error::AviconvError;
use aviconv::inspect::Inspector;
use aviconv::media::MediaFactory;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if Path::new("aviconv.toml").exists() {
                Config::from_file("aviconv.toml")?
            } else {
                Config::default()
            }
        }
    };

    if let Some(dir) = &args.log_dir {
        config.logging.log_dir = Some(dir.clone());
    }
    if let Some(ffmpeg) = &args.ffmpeg {
        config.media.ffmpeg_path = ffmpeg.clone();
    }
    if let Some(ffprobe) = &args.ffprobe {
        config.media.ffprobe_path = ffprobe.clone();
    }

    // Held until exit so buffered file logs are flushed
    let _guard = setup_logging(args.verbose, config.logging.log_dir.as_deref())?;

    match args.command {
        Commands::Convert {
            profile,
            base_dir,
            input_dir,
            output_dir,
            dry_run,
        } => {
            if let Some(dir) = base_dir {
                config.convert.base_dir = Some(dir);
            }
            if let Some(dir) = input_dir {
                config.convert.input_dir = dir;
            }
            if let Some(dir) = output_dir {
                config.convert.output_dir = dir;
            }

            let profile = config.select_profile(profile.as_deref())?;
            let (input_dir, output_dir) = config.convert_dirs()?;
            info!("Using profile {}", profile);

            let converter = BatchConverter::new(
                MediaFactory::create_transcoder(&config.media),
                MediaFactory::command_builder(&config.media),
                profile,
                &config.convert.extensions,
            )
            .with_dry_run(dry_run);

            let report = converter.run(&input_dir, &output_dir).await?;
            info!(
                "Batch started {} finished: {} succeeded, {} failed, output in {}",
                report.started_at.format("%Y-%m-%d %H:%M:%S"),
                report.succeeded(),
                report.failed(),
                relative_display(&output_dir)
            );
        }
        Commands::Inspect {
            input_dir,
            extension,
        } => {
            if let Some(dir) = input_dir {
                config.inspect.input_dir = dir;
            }
            if let Some(ext) = extension {
                config.inspect.extension = ext;
            }

            let inspector = Inspector::new(
                MediaFactory::create_reader(&config.media),
                &config.inspect.extension,
            );
            let printed = inspector.print_dir(&config.inspect.input_dir).await?;
            info!("Inspected {} videos", printed);
        }
        Commands::Profiles => {
            let profiles = config.profiles();
            println!("\nAvailable Profiles:");
            println!(
                "{:<12} {:<8} {:<5} {:<5} {:<9} {:<8} {:<10}",
                "Name", "Codec", "Q", "FPS", "Size", "Audio", "Rotation"
            );
            println!("{}", "-".repeat(65));

            for profile in &profiles {
                let size = format!("{}x{}", profile.geometry.width, profile.geometry.height);
                let audio = format!("{}/{}ch", profile.audio_sample_rate, profile.audio_channels);
                let rotation = profile
                    .geometry
                    .rotate
                    .map(|r| format!("{:?}", r).to_lowercase())
                    .unwrap_or_else(|| "none".to_string());

                println!(
                    "{:<12} {:<8} {:<5} {:<5} {:<9} {:<8} {:<10}",
                    profile.name,
                    profile.video_codec,
                    profile.quality,
                    profile.frame_rate,
                    size,
                    audio,
                    rotation
                );
            }

            if let Some(selected) = &config.convert.profile {
                println!("\nConfigured default: {}", selected);
            }
        }
        Commands::InitConfig { output, force } => {
            if output.exists() && !force {
                return Err(AviconvError::Config(format!(
                    "{} already exists (use --force to overwrite)",
                    output.display()
                ))
                .into());
            }
            Config::default().save_to_file(&output)?;
            println!("Wrote default configuration to {}", output.display());
        }
    }

    Ok(())
}

/// Setup logging to the console and, if `log_dir` is set, a daily log file
fn setup_logging(verbose: bool, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // Console logs go to stderr; stdout carries the per-file status lines
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = rolling::daily(dir, "aviconv.log");
            let (non_blocking_file, guard) = non_blocking(file_appender);
            let layer = fmt::layer()
                .with_writer(non_blocking_file)
                .with_target(false)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    if let Some(dir) = log_dir {
        info!("Logging to {}", dir.join("aviconv.log").display());
    }

    Ok(guard)
}

/// Path relative to the working directory when that is shorter to read
fn relative_display(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| pathdiff::diff_paths(path, cwd))
        .filter(|rel: &PathBuf| !rel.as_os_str().is_empty())
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}
