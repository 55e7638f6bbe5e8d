//! # Core Module
//!
//! Stateless building blocks shared by the workflows.
//!
//! - **File formats** ([`io`]) - HISTORY header model, extended-XYZ formatting
//!   and the STATIS reader
//! - **Species resolution** ([`species`]) - force-field label to element symbol
//!   lookup with a built-in table that callers can extend

pub mod io;
pub mod species;
