//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements | Connects to       |
//! |------------|------------|-------------------|
//! | `log_sink` | EventSink  | Serial log output |
//!
//! The pin and timer adapters live in [`crate::drivers`].

pub mod log_sink;
