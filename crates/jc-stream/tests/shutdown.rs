//! Integration tests for the shutdown sequence: signal driven stops, the
//! final flush and broken pipes.

use jc_stream::{PumpConfig, ShutdownSequencer, StreamError, TerminationCause};
use std::io::{self, Cursor};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{duplex, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufWriter};
use tokio::sync::oneshot;

/// Accepts every write but refuses to flush.
struct FailingFlush;

impl AsyncWrite for FailingFlush {
    fn poll_write(self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::Error::new(io::ErrorKind::Other, "disk full")))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

#[tokio::test]
async fn test_buffered_output_is_flushed_at_end_of_input() {
    let (sink, mut drain) = duplex(64 * 1024);
    let input = b"{\n  \"a\" : [1, 2,\t3]\n}".to_vec();

    let report = ShutdownSequencer::new(PumpConfig::new(4))
        .run_until(Cursor::new(input), BufWriter::new(sink), std::future::pending())
        .await
        .unwrap();

    assert_eq!(report.pump.cause, TerminationCause::EndOfInput);
    assert!(report.flushed);

    let mut output = Vec::new();
    drain.read_to_end(&mut output).await.unwrap();
    assert_eq!(output, b"{\"a\":[1,2,3]}".to_vec());
}

#[tokio::test]
async fn test_broken_pipe_skips_flush() {
    let (sink, drain) = duplex(64);
    drop(drain);

    let report = ShutdownSequencer::default()
        .run_until(Cursor::new(b"[1, 2]".to_vec()), sink, std::future::pending())
        .await
        .unwrap();

    assert_eq!(report.pump.cause, TerminationCause::BrokenPipe);
    assert!(!report.flushed);
    assert!(report.flush_error.is_none());
}

#[tokio::test]
async fn test_flush_error_is_reported() {
    let report = ShutdownSequencer::default()
        .run_until(Cursor::new(b"[ 1 ]".to_vec()), FailingFlush, std::future::pending())
        .await
        .unwrap();

    assert_eq!(report.pump.cause, TerminationCause::EndOfInput);
    assert!(!report.flushed);
    match report.flush_error {
        Some(StreamError::Flush(err)) => assert_eq!(err.to_string(), "disk full"),
        other => panic!("expected flush error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_signal_stops_a_blocked_pump() {
    let (mut feed, input) = duplex(1024);
    let (sink, mut drain) = duplex(1024);
    let (fire, signal) = oneshot::channel::<()>();

    let sequencer = ShutdownSequencer::default();
    let flag = sequencer.cancellation();
    let run = tokio::spawn(async move {
        sequencer
            .run_until(input, BufWriter::new(sink), async move {
                let _ = signal.await;
            })
            .await
    });

    fire.send(()).unwrap();
    while !flag.is_cancelled() {
        tokio::task::yield_now().await;
    }

    // The pump only notices the stop once its pending read returns.
    let _ = feed.write_all(b"[1, 2]").await;

    let report = run.await.unwrap().unwrap();
    assert_eq!(report.pump.cause, TerminationCause::Cancelled);
    assert_eq!(report.pump.bytes_written, 0);
    assert!(report.flushed);

    let mut output = Vec::new();
    drain.read_to_end(&mut output).await.unwrap();
    assert!(output.is_empty());
}
