//! # jc
//!
//! A simple tool for compressing JSON. `jc` reads from stdin, drops every
//! whitespace byte that is not inside a quoted string and writes the rest to
//! stdout. It does no input validation.
//!
//! ```text
//! $ printf '{\n  "a" : [1, 2,\t3]\n}' | jc
//! {"a":[1,2,3]}
//! ```
//!
//! Diagnostics go to stderr through `tracing`; set `RUST_LOG=debug` to see
//! the termination summary. The exit status is 0 whenever the stream was
//! processed, even if reading or writing failed along the way.

mod cli;
mod logging;

use std::process::ExitCode;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use tokio::io::BufWriter;
use tracing::{debug, error};

use cli::{Action, Cli};
use jc_stream::{PumpConfig, ShutdownSequencer};

fn main() -> ExitCode {
    logging::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(err) => return fail(&cli::describe(&err)),
    };

    match cli.action() {
        Action::PrintUsage => {
            eprint!("{}", Cli::usage());
            ExitCode::SUCCESS
        }
        Action::PrintVersion => {
            println!("{}", cli::VERSION);
            ExitCode::SUCCESS
        }
        Action::Compress => match compress() {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => fail(&format!("{:#}", err)),
        },
    }
}

fn fail(message: &str) -> ExitCode {
    eprintln!("jc: {}", message);
    eprintln!("Try jc --help for more information.");
    ExitCode::FAILURE
}

/// Pump stdin to stdout until the input ends or a stop signal arrives.
fn compress() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let sequencer = ShutdownSequencer::new(PumpConfig::default());
        let stdout = BufWriter::new(tokio::io::stdout());

        match sequencer.run(tokio::io::stdin(), stdout).await {
            Ok(report) => debug!(
                cause = ?report.pump.cause,
                flushed = report.flushed,
                "jc finished"
            ),
            Err(err) => error!("{}", err),
        }
    });

    Ok(())
}
