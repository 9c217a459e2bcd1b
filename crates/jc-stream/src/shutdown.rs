//! Coordinated shutdown of the stream pump.
//!
//! Two tasks run side by side: a listener waiting for a stop signal and the
//! pump itself. The calling task waits for the pump to finish, stops the
//! listener and then flushes the output, unless the output is already known
//! to be broken.

use crate::cancel::CancellationFlag;
use crate::error::{Result, StreamError};
use crate::pump::{PumpConfig, PumpReport, StreamPump};
use std::future::Future;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error};

/// Outcome of a complete run.
#[derive(Debug)]
pub struct ShutdownReport {
    pub pump: PumpReport,
    /// Whether the final flush ran and succeeded.
    pub flushed: bool,
    pub flush_error: Option<StreamError>,
}

/// Runs the pump and owns the shutdown sequence around it.
#[derive(Clone, Debug, Default)]
pub struct ShutdownSequencer {
    config: PumpConfig,
    cancel: CancellationFlag,
}

impl ShutdownSequencer {
    pub fn new(config: PumpConfig) -> Self {
        Self {
            config,
            cancel: CancellationFlag::new(),
        }
    }

    /// Handle to the flag the pump polls. Cancelling it stops the run.
    pub fn cancellation(&self) -> CancellationFlag {
        self.cancel.clone()
    }

    /// Run until the input ends or the process receives a stop signal.
    pub async fn run<R, W>(&self, reader: R, writer: W) -> Result<ShutdownReport>
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        self.run_until(reader, writer, shutdown_signal()).await
    }

    /// Run until the input ends or `signal` completes.
    pub async fn run_until<R, W, S>(&self, reader: R, writer: W, signal: S) -> Result<ShutdownReport>
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
        S: Future<Output = ()> + Send + 'static,
    {
        let cancel = self.cancel.clone();
        let listener = tokio::spawn(async move {
            signal.await;
            if cancel.cancel() {
                debug!("stop signal received");
            }
        });

        let mut pump = StreamPump::new(reader, writer, self.cancel.clone(), self.config.clone());
        let worker = tokio::spawn(async move {
            let report = pump.run().await;
            (report, pump.into_writer())
        });

        let joined = worker.await;
        listener.abort();
        let (report, mut writer) = joined?;

        if !report.cause.flush_required() {
            return Ok(ShutdownReport {
                pump: report,
                flushed: false,
                flush_error: None,
            });
        }

        let (flushed, flush_error) = match writer.flush().await {
            Ok(()) => (true, None),
            Err(err) => {
                let err = StreamError::Flush(err);
                if err.is_broken_pipe() {
                    debug!("{}", err);
                } else {
                    error!("{}", err);
                }
                (false, Some(err))
            }
        };

        Ok(ShutdownReport {
            pump: report,
            flushed,
            flush_error,
        })
    }
}

/// Completes when the process is asked to stop.
///
/// On Unix that is SIGINT, SIGTERM or SIGPIPE. Elsewhere only Ctrl-C is
/// observed.
#[cfg(unix)]
pub async fn shutdown_signal() {
    use tokio::signal::unix::{signal, Signal, SignalKind};

    fn listen(kind: SignalKind, name: &str) -> Option<Signal> {
        match signal(kind) {
            Ok(stream) => Some(stream),
            Err(err) => {
                error!("failed to listen for {}: {}", name, err);
                None
            }
        }
    }

    async fn recv(stream: &mut Option<Signal>) {
        match stream {
            Some(stream) => {
                stream.recv().await;
            }
            None => std::future::pending().await,
        }
    }

    let mut interrupt = listen(SignalKind::interrupt(), "SIGINT");
    let mut terminate = listen(SignalKind::terminate(), "SIGTERM");
    let mut pipe = listen(SignalKind::pipe(), "SIGPIPE");

    tokio::select! {
        _ = recv(&mut interrupt) => debug!("received SIGINT"),
        _ = recv(&mut terminate) => debug!("received SIGTERM"),
        _ = recv(&mut pipe) => debug!("received SIGPIPE"),
    }
}

#[cfg(not(unix))]
pub async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for Ctrl-C: {}", err);
        std::future::pending::<()>().await;
    }
}
