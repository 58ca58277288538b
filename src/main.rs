use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use urc_qa::runner::{self, Tool};
use urc_qa::utils::config::OutputDirs;
use urc_qa::Config;

#[derive(Parser)]
#[command(name = "urc-qa")]
#[command(version = "0.1.0")]
#[command(about = "Visual QA for the conference website", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// YAML file overriding the built-in configuration
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Origin of the running site, e.g. http://localhost:3000
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Root directory for screenshots and reports
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Show the browser window
    #[arg(long, global = true, default_value = "false")]
    headed: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect white flashes during hover color transitions
    WhiteFlash,

    /// Capture before/during/after hover states of interactive elements
    Hover,

    /// Audit overflow, edge spacing and font sizes across viewports
    Analyze,

    /// Screenshot a long page section by section
    Sections,

    /// Run every tool in sequence
    All,
}

impl Commands {
    fn tools(&self) -> Vec<Tool> {
        match self {
            Commands::WhiteFlash => vec![Tool::WhiteFlash],
            Commands::Hover => vec![Tool::Hover],
            Commands::Analyze => vec![Tool::Analyze],
            Commands::Sections => vec![Tool::Sections],
            Commands::All => Tool::ALL.to_vec(),
        }
    }
}

/// Command-line flags win over the file and the environment
fn apply_cli(config: &mut Config, cli: &Cli) {
    if let Some(url) = &cli.base_url {
        config.base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(root) = &cli.output {
        config.output = OutputDirs::under(root);
    }
    if cli.headed {
        config.headless = false;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    apply_cli(&mut config, &cli);

    println!("{} Target: {}", "▶".green().bold(), config.base_url.cyan());
    log::debug!("config: {:?}", config);

    for tool in cli.command.tools() {
        runner::run_tool(tool, &config).await?;
    }

    println!("\n{} Done", "✓".green().bold());
    Ok(())
}
