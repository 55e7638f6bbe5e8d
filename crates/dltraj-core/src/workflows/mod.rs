//! # Workflows Module
//!
//! Path-level entry points.
//!
//! - **Conversion** ([`convert`]) - resolves the HISTORY input and XYZ output
//!   paths, opens both files and streams the trajectory
//! - **Statistics** ([`statis`]) - reads a STATIS file from a directory with a
//!   configurable read chunk size

pub mod convert;
pub mod statis;
