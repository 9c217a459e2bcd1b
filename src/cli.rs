//! Command-line surface of `jc`.
//!
//! Flags can also be set from the environment. The variable name is the flag
//! name upper-cased with hyphens turned into underscores, so `--version`
//! becomes `VERSION`.

use clap::{CommandFactory, Parser};
use std::convert::Infallible;

/// Version printed by `jc --version`.
pub const VERSION: &str = "1.0.0";

#[derive(Parser, Debug)]
#[command(name = "jc")]
#[command(override_usage = "jc [flags]")]
#[command(about = "jc is a simple tool for compressing JSON.")]
#[command(
    long_about = "jc is a simple tool for compressing JSON.  jc does no input validation.  jc reads from stdin and writes to stdout."
)]
pub struct Cli {
    /// show version
    #[arg(short = 'v', long = "version", env = "VERSION", value_parser = parse_env_bool)]
    pub version: bool,

    /// jc takes no arguments; any given trigger the usage text
    #[arg(hide = true)]
    pub args: Vec<String>,
}

/// What `main` should do after parsing.
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    Compress,
    PrintVersion,
    PrintUsage,
}

impl Cli {
    pub fn action(&self) -> Action {
        if !self.args.is_empty() {
            Action::PrintUsage
        } else if self.version {
            Action::PrintVersion
        } else {
            Action::Compress
        }
    }

    pub fn usage() -> String {
        Cli::command().render_help().to_string()
    }
}

/// Boolean for environment values. Only the usual true spellings count;
/// any other text reads as false rather than failing the invocation.
fn parse_env_bool(value: &str) -> Result<bool, Infallible> {
    Ok(matches!(value, "1" | "t" | "T" | "TRUE" | "true" | "True"))
}

/// One-line description of a parse error, without clap's own prefix.
pub fn describe(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.trim_start_matches("error: ").to_string()
}
