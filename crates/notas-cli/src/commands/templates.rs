//! Templates command - list and show layout templates.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use super::{load_config, load_registry};

/// Arguments for the templates command.
#[derive(Args)]
pub struct TemplatesArgs {
    #[command(subcommand)]
    command: TemplatesCommand,

    /// Extra template directory
    #[arg(long, global = true)]
    templates: Option<PathBuf>,
}

#[derive(Subcommand)]
enum TemplatesCommand {
    /// List registered layouts
    List,

    /// Print one template as JSON
    Show {
        /// Layout key
        key: String,
    },
}

pub async fn run(args: TemplatesArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let registry = load_registry(&config, args.templates.as_deref())?;

    match args.command {
        TemplatesCommand::List => {
            if registry.is_empty() {
                println!("{} No templates registered.", style("ℹ").blue());
            }
            for template in registry.iter() {
                println!(
                    "{}  {} rules  {}",
                    style(&template.layout_key).bold(),
                    template.rules.len(),
                    template.description
                );
            }
        }
        TemplatesCommand::Show { key } => {
            let template = registry
                .get(&key)
                .ok_or_else(|| anyhow::anyhow!("Unknown layout: {}", key))?;
            println!("{}", serde_json::to_string_pretty(template)?);
        }
    }

    Ok(())
}
