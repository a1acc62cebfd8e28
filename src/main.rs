//! Macro keypad configurator CLI
//!
//! Programs button, knob and LED settings into the keypad's flash.

use anyhow::Result;
use clap::Parser;

mod cli;
use cli::{Cli, Commands};

mod commands;

fn setup_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let device = &cli.device;
    match cli.command {
        Commands::List { json } => commands::utility::list(device, json),
        Commands::Names { kind } => commands::utility::names(kind),
        Commands::SetKey {
            action,
            keys,
            layer,
        } => commands::set::set_key(device, &action, &keys, layer),
        Commands::SetMedia {
            action,
            media_key,
            layer,
        } => commands::set::set_media(device, &action, &media_key, layer),
        Commands::SetMouse {
            action,
            button,
            modifiers,
            layer,
        } => commands::set::set_mouse(device, &action, &button, modifiers.as_deref(), layer),
        Commands::SetLed { mode, layer } => commands::set::set_led(device, &mode, layer),
        Commands::Apply { file } => commands::set::apply(device, file),
    }
}
