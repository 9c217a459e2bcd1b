//! Diagnostics on stderr.
//!
//! stdout carries the compacted stream, so every log line goes to stderr.
//! Colors are only used when stderr is a terminal.

use std::io::IsTerminal;

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Install the global subscriber. `RUST_LOG` overrides the default `warn`.
pub fn init() {
    let use_ansi = std::io::stderr().is_terminal();

    tracing_subscriber::registry()
        .with(stderr_layer(std::io::stderr, use_ansi))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();
}

fn stderr_layer<S, W>(writer: W, use_ansi: bool) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(use_ansi)
        .with_target(false)
        .without_time()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn render(use_ansi: bool) -> String {
        let captured = Captured::default();
        let sink = captured.clone();
        let subscriber =
            tracing_subscriber::registry().with(stderr_layer(move || sink.clone(), use_ansi));

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(cause = "EndOfInput", "error reading from stdin: gone");
        });

        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_plain_output_has_no_escape_codes() {
        let line = render(false);
        assert!(line.contains("ERROR"));
        assert!(line.contains("error reading from stdin: gone"));
        assert!(!line.contains('\u{1b}'));
    }

    #[test]
    fn test_terminal_output_is_colored() {
        assert!(render(true).contains('\u{1b}'));
    }
}
