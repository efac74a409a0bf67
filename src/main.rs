//! CLI entry point for the Python symbol resolver.
//!
//! `pyresolve` with no subcommand runs the stdin/stdout worker a host editor
//! talks to; the other commands are one-shot helpers around the same pipeline.

use anyhow::Context;
use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use pyresolve::io::ExitCode;
use pyresolve::protocol::encode_response;
use pyresolve::{PythonEngine, Query, Settings, SymbolResolver, Worker, doc_url, logging};
use std::path::PathBuf;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Python symbol resolver
#[derive(Parser)]
#[command(
    name = "pyresolve",
    version = env!("CARGO_PKG_VERSION"),
    about = "Resolve Python source positions to fully-qualified names",
    long_about = "Resolve Python source positions to fully-qualified names.\n\nWithout a subcommand, reads one JSON query per line on stdin and answers each with one JSON line on stdout.",
    styles = clap_cargo_style()
)]
struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level (overrides the configured level)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    /// Serve queries over stdin/stdout until stdin closes
    #[command(about = "Run the line-delimited JSON worker (default)")]
    Serve,

    /// Resolve one position and print the response
    #[command(about = "Resolve a single position and print the JSON response")]
    Resolve {
        /// Python source file
        file: PathBuf,

        /// Line number (1-indexed)
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        line: u32,

        /// Column number (1-indexed)
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        column: u32,

        /// Interpreter whose environment to resolve against
        #[arg(long)]
        python: Option<PathBuf>,
    },

    /// Print the docs.python.org page for a fully-qualified name
    #[command(name = "doc-url", about = "Print the documentation URL for a resolved name")]
    DocUrl {
        /// Fully-qualified name, e.g. builtins.open
        symbol: String,
    },

    /// Display the effective configuration
    #[command(about = "Show the effective configuration")]
    Config,

    /// Initialize project
    #[command(about = "Set up .pyresolve directory with default configuration")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Load configuration
    let mut settings = match &cli.config {
        Some(config_path) => match Settings::load_from(config_path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!(
                    "Configuration error loading from {}: {e}",
                    config_path.display()
                );
                return ExitCode::ConfigError.into();
            }
        },
        None => Settings::load().unwrap_or_else(|e| {
            eprintln!("Configuration error: {e}");
            eprintln!("Using default configuration.");
            Settings::default()
        }),
    };
    if cli.debug {
        settings.debug = true;
    }

    logging::init(settings.log_filter());

    match run(cli.command.unwrap_or(Commands::Serve), &settings) {
        Ok(code) => code.into(),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::GeneralError.into()
        }
    }
}

fn run(command: Commands, settings: &Settings) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Serve => {
            let engine = PythonEngine::from_settings(settings)
                .context("failed to initialize the analysis engine")?;
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();

            tracing::info!("pyresolve {} ready", env!("CARGO_PKG_VERSION"));
            Worker::new(engine)
                .run(stdin.lock(), stdout.lock())
                .context("failed to write response")?;
            Ok(ExitCode::Success)
        }

        Commands::Resolve {
            file,
            line,
            column,
            python,
        } => {
            let engine = PythonEngine::from_settings(settings)
                .context("failed to initialize the analysis engine")?;
            let query = Query {
                file,
                position: pyresolve::Position { line, column },
                file_text: None,
                python_executable: python,
            };

            let result = SymbolResolver::new(engine).resolve(&query);
            if let Err(e) = &result {
                eprintln!("Error: {}", e.detail());
            }
            let name = result.as_ref().ok().and_then(|name| name.as_deref());
            println!("{}", encode_response(name));
            Ok(ExitCode::from_query_result(&result))
        }

        Commands::DocUrl { symbol } => {
            let url = doc_url(&symbol);
            match &url {
                Some(url) => println!("{url}"),
                None => eprintln!("No documentation page for '{symbol}'"),
            }
            Ok(ExitCode::from_option(&url))
        }

        Commands::Config => {
            println!("Current Configuration:");
            println!("{}", "=".repeat(50));
            let toml_str =
                toml::to_string_pretty(settings).context("failed to display configuration")?;
            println!("{toml_str}");
            Ok(ExitCode::Success)
        }

        Commands::Init { force } => match Settings::init_config_file(force) {
            Ok(path) => {
                println!("Created configuration file at: {}", path.display());
                println!("Edit this file to customize your settings.");
                Ok(ExitCode::Success)
            }
            Err(e) => {
                eprintln!("Error: {e}");
                Ok(ExitCode::ConfigError)
            }
        },
    }
}
