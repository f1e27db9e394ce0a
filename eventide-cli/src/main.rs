mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "eventide")]
#[command(about = "Expand recurring event templates into calendar occurrences")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List occurrences in a date range
    Expand {
        /// First day to include (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        from: Option<String>,

        /// Last day to include (YYYY-MM-DD, defaults to the configured window)
        #[arg(long)]
        to: Option<String>,

        /// Template directory (overrides templates_dir from config)
        #[arg(short, long)]
        templates: Option<PathBuf>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show templates and how their rules were understood
    Templates {
        /// Template directory (overrides templates_dir from config)
        #[arg(short, long)]
        templates: Option<PathBuf>,

        /// Include inactive templates
        #[arg(long)]
        all: bool,
    },
    /// Write occurrences as an .ics calendar
    Export {
        /// First day to include (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        from: Option<String>,

        /// Last day to include (YYYY-MM-DD, defaults to the configured window)
        #[arg(long)]
        to: Option<String>,

        /// Template directory (overrides templates_dir from config)
        #[arg(short, long)]
        templates: Option<PathBuf>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Expand {
            from,
            to,
            templates,
            json,
        } => {
            let ctx = commands::Context::load(templates)?;
            let window = ctx.window(from.as_deref(), to.as_deref())?;
            commands::expand::run(&ctx, window, json)
        }
        Commands::Templates { templates, all } => {
            let ctx = commands::Context::load(templates)?;
            commands::templates::run(&ctx, all)
        }
        Commands::Export {
            from,
            to,
            templates,
            output,
        } => {
            let ctx = commands::Context::load(templates)?;
            let window = ctx.window(from.as_deref(), to.as_deref())?;
            commands::export::run(&ctx, window, output)
        }
    }
}
