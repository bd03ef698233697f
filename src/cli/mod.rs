//! CLI module for fauxbuild
//!
//! A thin caller of the library: it builds the demonstration object, times the builders against each other and lists
//! the naming conventions.
//!
//! ## Commands
//!
//! - `demo` - Build the example object through one of its builders
//! - `bench` - Time synthesized builders against the hand-written one
//! - `conventions` - List the naming conventions and how they classify sample names
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Render a library diagnostic, code and help included.
    pub fn diagnostic<D>(diagnostic: D) -> Self
    where
        D: miette::Diagnostic + Send + Sync + 'static,
    {
        Self::failure(format!("{:?}", miette::Report::new(diagnostic)))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Synthesized builders for arbitrary builder contracts
#[derive(Parser, Debug)]
#[command(name = "fauxbuild")]
#[command(version = VERSION)]
#[command(about = "Synthesized builders for arbitrary builder contracts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Which builder `demo` goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DemoBuilder {
    /// Contract described at run time, simple convention
    Dynamic,
    /// `#[contract]` trait, simple-setter convention
    Typed,
    /// Hand-written builder
    Manual,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the example object
    Demo {
        /// Builder to use
        #[arg(long, value_enum, default_value_t = DemoBuilder::Dynamic)]
        builder: DemoBuilder,
        /// Mandatory field, fixed when the builder is created
        #[arg(long, default_value = "X")]
        mandatory: String,
        /// Value for the first optional field
        #[arg(long)]
        optional1: Option<i32>,
        /// Value for the second optional field
        #[arg(long)]
        optional2: Option<char>,
        /// Invoke this extra operation (no arguments) on the dynamic builder before building
        #[arg(long, value_name = "OPERATION")]
        call: Option<String>,
        /// Number of terminal calls
        #[arg(long, default_value_t = 1)]
        builds: usize,
        /// Let the builder be built more than once
        #[arg(long)]
        reusable: bool,
    },

    /// Time synthesized builders against the hand-written one
    Bench {
        /// Objects to build per round (comma-separated)
        #[arg(long = "count", value_delimiter = ',', default_values_t = commands::DEFAULT_COUNTS)]
        counts: Vec<usize>,
    },

    /// List the naming conventions
    Conventions,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Demo {
            builder,
            mandatory,
            optional1,
            optional2,
            call,
            builds,
            reusable,
        } => commands::demo(&commands::DemoRequest {
            builder,
            mandatory,
            optional1,
            optional2,
            call,
            builds,
            reusable,
        }),
        Command::Bench { counts } => commands::bench(&counts),
        Command::Conventions => commands::conventions(),
    }
}

// ============================================================================
// Tests
// ============================================================================
