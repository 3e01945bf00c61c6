//! CLI module for Scriptorium
//!
//! Provides command-line interface parsing and handling for the
//! scriptorium-server binary. Uses clap for argument parsing and
//! owo-colors for colored terminal output.

pub mod init;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Scriptorium - PDF Question Answering Server
///
/// A retrieval-augmented server that indexes PDF documents and answers
/// questions grounded in their content.
#[derive(Parser, Debug)]
#[command(
    name = "scriptorium-server",
    author = "Dirmacs <build@dirmacs.com>",
    version,
    about = "Scriptorium - PDF Question Answering Server",
    long_about = "A retrieval-augmented server that indexes PDF documents and answers\n\
                  questions grounded in their content, backed by Azure OpenAI.\n\n\
                  Run without arguments to start the server, or use 'init' to scaffold a new project.",
    after_help = "EXAMPLES:\n    \
                  scriptorium-server init              # Scaffold a new project\n    \
                  scriptorium-server                   # Start the server (requires scriptorium.toml)\n    \
                  scriptorium-server --config my.toml  # Use a custom config file\n    \
                  scriptorium-server config --validate # Check the configuration"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "scriptorium.toml", global = true)]
    pub config: PathBuf,

    /// Enable debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new Scriptorium project with configuration files
    ///
    /// Creates scriptorium.toml, a .env template for the Azure OpenAI
    /// API keys and a data/ directory for local state.
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing files without prompting
        #[arg(short, long)]
        force: bool,

        /// Host address for the server
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port for the server
        #[arg(long, default_value = "3000")]
        port: u16,
    },

    /// Show configuration information
    Config {
        /// Show the full configuration
        #[arg(short = 'f', long)]
        full: bool,

        /// Validate the configuration file
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
