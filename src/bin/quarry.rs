//! Quarry CLI - convert a repository into a single LLM prompt.

use std::path::Path;

use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use quarry::errors::{exit_code, QuarryError};
use quarry::git::clone_to_temp;
use quarry::output::{dump_to_string, DumpOptions};
use quarry::walker::WalkOptions;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "quarry")]
#[command(about = "Convert a repository into a single LLM prompt")]
#[command(version)]
struct Cli {
    /// Path to the repository to convert: a local directory or a git
    /// repository URL
    #[arg(long, default_value = ".")]
    path: String,

    /// Extract only interfaces (without implementation) for all *.py files
    #[arg(long)]
    interfaces_only: bool,

    /// Include hidden files and directories
    #[arg(long)]
    include_hidden: bool,

    /// Maximum directory depth
    #[arg(long)]
    max_depth: Option<usize>,

    /// Generate shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        generate(shell, &mut Cli::command(), "quarry", &mut std::io::stdout());
        return;
    }

    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        std::process::exit(exit_code(&e));
    }
}

fn run(cli: &Cli) -> Result<(), QuarryError> {
    let walk_options = WalkOptions {
        max_depth: cli.max_depth,
        include_hidden: cli.include_hidden,
        ..Default::default()
    };
    let options = DumpOptions {
        interfaces_only: cli.interfaces_only,
    };

    // A path that is not a local directory is treated as a git URL.
    let path = Path::new(&cli.path);
    let dump = if path.is_dir() {
        dump_to_string(path, &walk_options, &options)?
    } else {
        let checkout = clone_to_temp(&cli.path)?;
        dump_to_string(checkout.path(), &walk_options, &options)?
    };

    println!("{dump}");
    Ok(())
}
