//! jc core - whitespace removal for JSON byte streams
//!
//! The state machine in [`compact`] drops every newline, carriage return,
//! tab and space that sits outside a quoted string. It never parses or
//! validates the input, so arbitrary bytes pass through untouched.
//!
//! State is threaded explicitly between chunks, which makes the result
//! independent of how the stream was split:
//!
//! ```rust
//! use jc_core::compact::{transform, CarriedState};
//!
//! let (first, state) = transform(b"{ \"a b\"", CarriedState::new());
//! let (second, state) = transform(b" : 1 }", state);
//!
//! assert_eq!([first, second].concat(), b"{\"a b\":1}".to_vec());
//! assert!(!state.in_string());
//! ```

pub mod compact;

pub use compact::{compact_all, is_whitespace, transform, transform_into, CarriedState, Compactor};
