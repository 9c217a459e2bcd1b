//! jc stream - pumping stdin through the compactor to stdout
//!
//! # Architecture
//!
//! - [`cancel`] - one-way stop flag shared by the signal listener and the pump
//! - [`pump`] - the read, compact, write loop
//! - [`shutdown`] - signal handling, waiting for the pump and the final flush
//! - [`error`] - error types
//!
//! Cancellation is cooperative. The pump looks at the flag between reads,
//! never in the middle of a chunk, so the worst-case stop latency is one
//! blocking read.

pub mod cancel;
pub mod error;
pub mod pump;
pub mod shutdown;

pub use cancel::CancellationFlag;
pub use error::{Result, StreamError};
pub use pump::{PumpConfig, PumpReport, StreamPump, TerminationCause, DEFAULT_CHUNK_SIZE};
pub use shutdown::{shutdown_signal, ShutdownReport, ShutdownSequencer};
