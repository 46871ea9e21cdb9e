use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod export;

use commands::SourceKind;
use config::{load_config, DEFAULT_CONFIG_FILE};

#[derive(Parser, Debug)]
#[command(name = "extrato", version, about = "Bank statement parsing, categorization and reports")]
struct Cli {
    /// Runner config file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Process every statement in the input directory and export the report tables
    Run {
        /// Directory with the statement files (overrides `input_dir`)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Directory for the CSV tables (overrides `output_dir`)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Category table in TOML (overrides `rules_file`)
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Rows in the top-description tables (overrides `top_n`)
        #[arg(long)]
        top: Option<usize>,

        /// Statement file type
        #[arg(long, value_enum, default_value_t = SourceKind::Txt)]
        ext: SourceKind,
    },

    /// Print the category a description would get
    Categorize {
        /// Category table in TOML (overrides `rules_file`)
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Transaction description, e.g. "PIX QRS LOJA X"
        #[arg(required = true)]
        description: Vec<String>,
    },

    /// Write a default config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut cfg = load_config(&cli.config)?;
    init_tracing(&cfg.log_filter);

    match cli.command {
        Command::Run { input, output, rules, top, ext } => {
            if let Some(input) = input {
                cfg.input_dir = input;
            }
            if let Some(output) = output {
                cfg.output_dir = output;
            }
            if rules.is_some() {
                cfg.rules_file = rules;
            }
            if let Some(top) = top {
                cfg.top_n = top;
            }

            let report = commands::run(&cfg, ext)?;
            commands::print_report(&report, &cfg.output_dir);
        }

        Command::Categorize { rules, description } => {
            let rules_file = rules.or(cfg.rules_file);
            let table = commands::load_rules(rules_file.as_deref())?;
            println!("{}", table.categorize(&description.join(" ")));
        }

        Command::InitConfig { force } => {
            if config::init_config(&cli.config, force)? {
                println!("Wrote {}", cli.config.display());
            } else {
                println!(
                    "Config already exists: {} (use --force to overwrite)",
                    cli.config.display()
                );
            }
        }
    }

    Ok(())
}
