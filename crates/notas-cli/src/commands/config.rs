//! Config command - show, create and locate the configuration file.

use std::fs;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use notas_core::models::config::NotasConfig;

use super::ConfigLocation;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Write a configuration file with every default filled in
    Init {
        /// Target file (default: the `--config` path or the user config dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show which configuration file is used
    Path,
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let location = ConfigLocation::resolve(config_path);

    match args.command {
        ConfigCommand::Show => {
            if !location.explicit && !location.path.exists() {
                eprintln!(
                    "{} {} does not exist, showing defaults.",
                    style("ℹ").blue(),
                    location.path.display()
                );
            }
            let config = location.load()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigCommand::Init { output, force } => {
            let target = output.unwrap_or(location.path);
            if target.exists() && !force {
                anyhow::bail!(
                    "{} already exists, pass --force to replace it",
                    target.display()
                );
            }
            if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            NotasConfig::default().save(&target)?;
            println!("{} Wrote {}", style("✓").green(), target.display());
        }
        ConfigCommand::Path => {
            let origin = if location.explicit { "--config" } else { "default" };
            let state = if location.path.exists() {
                style("found").green()
            } else {
                style("missing, built-in defaults apply").yellow()
            };
            println!("{} ({}): {}", location.path.display(), origin, state);
        }
    }

    Ok(())
}
