//! # Engine Module
//!
//! The streaming HISTORY→XYZ converter.
//!
//! The converter is a small state machine fed one input line at a time
//! ([`converter`]). Completed output lines go through a chunked in-memory
//! buffer ([`buffer`]) so peak memory stays bounded independent of the
//! trajectory length. Chunk size and I/O buffer capacity are set through
//! [`config`]; frame progress is published through [`progress`].

pub mod buffer;
pub mod config;
pub mod converter;
pub mod error;
pub mod progress;
