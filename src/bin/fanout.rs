//! CLI binary for fanout.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use fanout::config::{AppConfig, QueryOverrides};
use fanout::render;
use fanout_search::Timeframe;
use tracing_subscriber::EnvFilter;

/// fanout: key-free meta-search across several public backends.
#[derive(Parser)]
#[command(name = "fanout", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Search every configured provider and print merged results.
    Search {
        /// Search query.
        query: String,

        /// Restrict to a recent window: day, week or month.
        #[arg(long)]
        timeframe: Option<Timeframe>,

        /// Strict filtering where the provider supports it.
        #[arg(long, value_enum)]
        safesearch: Option<Toggle>,

        /// Per-provider deadline in milliseconds.
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Print JSON instead of markdown.
        #[arg(long)]
        json: bool,

        /// Also print how each provider fared.
        #[arg(long)]
        report: bool,
    },

    /// Print merged autosuggestions for a partial query.
    Suggest {
        /// Partial query.
        query: String,

        /// Print JSON instead of plain lines.
        #[arg(long)]
        json: bool,
    },

    /// Write the default configuration file.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays parseable.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("fanout=info,fanout_search=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Search {
            query,
            timeframe,
            safesearch,
            timeout_ms,
            json,
            report,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let overrides = QueryOverrides {
                timeframe,
                safesearch: safesearch.map(|t| matches!(t, Toggle::On)),
                timeout_ms,
            };
            let aggregation = fanout::run_search(&config, &query, &overrides).await?;

            match (json, report) {
                (true, true) => println!("{}", render::aggregation_json(&aggregation)?),
                (true, false) => println!("{}", render::results_json(&aggregation.results)?),
                (false, _) => {
                    print!("{}", render::results_markdown(query.trim(), &aggregation.results));
                    if report {
                        eprint!("{}", render::outcomes_text(&aggregation.outcomes));
                    }
                }
            }
        }
        Command::Suggest { query, json } => {
            let config = load_config(cli.config.as_deref())?;
            let suggestions = fanout::run_suggest(&config, &query).await?;
            if json {
                println!("{}", render::suggestions_json(&suggestions)?);
            } else {
                print!("{}", render::suggestions_text(&suggestions));
            }
        }
        Command::InitConfig { force } => {
            let path = cli.config.unwrap_or_else(AppConfig::default_path);
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            AppConfig::default().save_to_file(&path)?;
            println!("wrote {}", path.display());
        }
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<AppConfig> {
    let config = AppConfig::load(path)?;
    config.validate()?;
    Ok(config)
}
