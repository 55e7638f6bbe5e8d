//! # dltraj Core Library
//!
//! Streaming conversion and parsing of DL_POLY molecular-dynamics output files.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** Format models and stateless parsers: the
//!   HISTORY header (`levcfg`, `imcon`), extended-XYZ line formatting, the
//!   STATIS reader and the species table mapping force-field labels to elements.
//!
//! - **[`engine`]: The Streaming Core.** The HISTORY→XYZ state machine, the
//!   chunked output buffer, converter configuration and progress reporting.
//!
//! - **[`workflows`]: The Public API.** Path-level entry points that resolve
//!   default file names, open files and run the converter or STATIS reader.

pub mod core;
pub mod engine;
pub mod workflows;
