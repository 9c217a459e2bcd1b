//! The read, compact, write loop.
//!
//! The pump owns the input and the output for its whole lifetime. It checks
//! the cancellation flag before every read and again once the read returns,
//! so a stop request is honored within one blocking read. A chunk that was
//! read but not yet written when the stop arrives is dropped; a chunk whose
//! write has started is always written in full.

use crate::cancel::CancellationFlag;
use crate::error::{is_broken_pipe, StreamError};
use jc_core::compact::{CarriedState, Compactor};
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error};

/// Chunk size used by the `jc` binary.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Configuration for the pump.
#[derive(Clone, Debug)]
pub struct PumpConfig {
    /// Maximum number of bytes read per chunk.
    pub chunk_size: usize,
}

impl PumpConfig {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }
}

impl Default for PumpConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

/// Why the pump stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminationCause {
    /// The input was exhausted.
    EndOfInput,
    /// Reading the input failed.
    ReadError,
    /// The output's reader closed its end.
    BrokenPipe,
    /// A stop was requested through the cancellation flag.
    Cancelled,
}

impl TerminationCause {
    /// Whether buffered output should still be flushed.
    pub fn flush_required(&self) -> bool {
        !matches!(self, TerminationCause::BrokenPipe)
    }
}

/// Summary of a finished pump run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PumpReport {
    pub cause: TerminationCause,
    /// Carried state after the last compacted chunk.
    pub state: CarriedState,
    /// Number of successful, non-empty reads.
    pub chunks: u64,
    pub bytes_read: u64,
    pub bytes_written: u64,
    /// Write failures other than a broken pipe.
    pub write_errors: u64,
}

/// Drives the compaction state machine from a reader to a writer.
pub struct StreamPump<R, W> {
    reader: R,
    writer: W,
    cancel: CancellationFlag,
    compactor: Compactor,
    buffer: Vec<u8>,
}

impl<R, W> StreamPump<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W, cancel: CancellationFlag, config: PumpConfig) -> Self {
        Self {
            reader,
            writer,
            cancel,
            compactor: Compactor::new(),
            buffer: vec![0; config.chunk_size.max(1)],
        }
    }

    /// Pump until the input ends, the input fails, the output breaks or a
    /// stop is requested.
    pub async fn run(&mut self) -> PumpReport {
        let mut chunks = 0u64;
        let mut bytes_read = 0u64;
        let mut bytes_written = 0u64;
        let mut write_errors = 0u64;

        let cause = loop {
            if self.cancel.is_cancelled() {
                break TerminationCause::Cancelled;
            }

            let n = match self.reader.read(&mut self.buffer).await {
                Ok(0) => break TerminationCause::EndOfInput,
                Ok(n) => n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    error!("{}", StreamError::Read(err));
                    break TerminationCause::ReadError;
                }
            };
            chunks += 1;
            bytes_read += n as u64;

            if self.cancel.is_cancelled() {
                debug!(bytes = n, "stop requested, dropping unwritten chunk");
                break TerminationCause::Cancelled;
            }

            let output = self.compactor.compact(&self.buffer[..n]);
            if output.is_empty() {
                continue;
            }
            match self.writer.write_all(output).await {
                Ok(()) => bytes_written += output.len() as u64,
                Err(err) if is_broken_pipe(&err) => {
                    break TerminationCause::BrokenPipe;
                }
                Err(err) => {
                    write_errors += 1;
                    error!("{}", StreamError::Write(err));
                }
            }
        };

        let report = PumpReport {
            cause,
            state: self.compactor.state(),
            chunks,
            bytes_read,
            bytes_written,
            write_errors,
        };
        debug!(
            cause = ?report.cause,
            chunks = report.chunks,
            bytes_read = report.bytes_read,
            bytes_written = report.bytes_written,
            "stream pump finished"
        );
        report
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}
