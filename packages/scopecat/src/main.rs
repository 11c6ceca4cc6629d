//! Scopecat keeps settings that follow the folder you are working in.

use color_eyre::{Result, Section};
use tracing::{instrument, level_filters::LevelFilter};

mod cmd;

use clap::{Parser, Subcommand};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Scoped aliases and parameters, kept per folder tree.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(flatten)]
    location: cmd::Location,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create, delete or show command aliases.
    Alias(cmd::alias::Config),

    /// Set, delete or show tool parameters.
    Param(cmd::param::Config),
}

#[instrument]
fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    // Catalog output goes to stdout and stderr directly, so tracing stays
    // quiet unless asked for with `SCOPECAT_LOG` directives.
    //
    // Examples:
    // - `SCOPECAT_LOG=debug` to see lookups, saves and rejected operations
    // - `SCOPECAT_LOG=scopecat::catalog::store=trace` to trace file access
    tracing_subscriber::registry()
        .with(ErrorLayer::default())
        .with(
            fmt::layer()
                .with_level(true)
                .with_file(true)
                .with_line_number(true)
                .with_target(true)
                .with_writer(std::io::stderr)
                .pretty(),
        )
        .with(
            EnvFilter::builder()
                .with_env_var("SCOPECAT_LOG")
                .with_default_directive(LevelFilter::ERROR.into())
                .from_env_lossy(),
        )
        .init();

    match cli.command {
        Commands::Alias(config) => cmd::alias::main(cli.location, config),
        Commands::Param(config) => cmd::param::main(cli.location, config),
    }
    .suggestion("Set `SCOPECAT_LOG=debug` to see what the catalog did.")
}
