use anyhow::Result;
use clap::{CommandFactory, Parser};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use voxnote::app::{run_pipe_command, run_record_command};
use voxnote::audio::device::list_input_devices;
use voxnote::cli::{Cli, Commands};
use voxnote::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => {
            let config = load_config(cli.config.as_deref())?;
            if std::io::stdin().is_terminal() {
                // Mic mode
                run_record_command(
                    config,
                    cli.device,
                    cli.model,
                    cli.sample_rate,
                    cli.output,
                    cli.format,
                    cli.quiet,
                    cli.verbose,
                )
                .await?;
            } else {
                // Pipe mode: stdin has WAV data
                run_pipe_command(
                    config,
                    cli.model,
                    cli.output,
                    cli.format,
                    cli.quiet,
                    cli.verbose,
                )
                .await?;
            }
        }
        Some(Commands::Devices) => {
            list_audio_devices()?;
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "voxnote",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

/// Load configuration from file or use defaults.
///
/// Priority order:
/// 1. Custom config path from CLI (--config)
/// 2. Default config path (~/.config/voxnote/config.toml)
/// 3. Built-in defaults with environment variable overrides
fn load_config(custom_path: Option<&std::path::Path>) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        // Load from custom path
        Config::load(path)?
    } else {
        // Try default path, fall back to defaults
        let default_path = Config::default_path();
        Config::load_or_default(&default_path)
    };

    // Apply environment variable overrides
    Ok(config.with_env_overrides())
}

/// List available audio input devices.
fn list_audio_devices() -> Result<()> {
    let devices = list_input_devices()?;

    if devices.is_empty() {
        eprintln!("No audio input devices found");
        std::process::exit(1);
    }

    println!("Available audio input devices:");
    for device in &devices {
        let rate = match device.default_sample_rate {
            Some(rate) => format!("{} Hz", rate),
            None => "unknown rate".to_string(),
        };
        if device.is_default {
            println!(
                "  [{}] {} ({}) {}",
                device.index,
                device.name,
                rate.dimmed(),
                "(default)".green()
            );
        } else {
            println!("  [{}] {} ({})", device.index, device.name, rate.dimmed());
        }
    }

    Ok(())
}
