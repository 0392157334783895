use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

/// Quill drawing-language interpreter.
///
/// Quill runs small line-oriented drawing programs: typed variables,
/// arrays, loops, methods, and canvas commands like moveto and circle.
///
/// EXAMPLES:
///     quill run picture.qll        Run a program
///     quill run picture.qll --ops  Also list recorded canvas operations
///     quill check picture.qll      Parse without running
///
/// ENVIRONMENT VARIABLES:
///     QUILL_JSON    Set to '1' for JSON diagnostics by default
#[derive(Parser)]
#[command(name = "quill")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a Quill source file
    ///
    /// Parses and executes the program, streaming `write`/`text` output to
    /// stdout. On failure a diagnostic with its stable code and source
    /// line goes to stderr.
    ///
    /// EXAMPLES:
    ///     quill run picture.qll            Run a program
    ///     quill run picture.qll --json     JSON diagnostics
    ///     quill run picture.qll --ops      Print canvas operations
    #[command(visible_alias = "r")]
    Run {
        /// Path to the Quill source file
        file: String,
        /// Output diagnostics in JSON format
        #[arg(long, env = "QUILL_JSON")]
        json: bool,
        /// Print every recorded canvas operation after the run
        #[arg(long)]
        ops: bool,
    },

    /// Parse a Quill source file without running it
    ///
    /// EXAMPLES:
    ///     quill check picture.qll          Report the first parse error
    ///     quill check picture.qll --json   JSON diagnostics
    #[command(visible_alias = "c")]
    Check {
        /// Path to the Quill source file
        file: String,
        /// Output diagnostics in JSON format
        #[arg(long, env = "QUILL_JSON")]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run { file, json, ops } => commands::run::run(&file, json, ops),
        Commands::Check { file, json } => commands::check::check(&file, json),
    }
}
