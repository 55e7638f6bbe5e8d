//! Readers and formatters for the DL_POLY HISTORY and STATIS logs and the
//! extended XYZ output format.

pub mod history;
pub mod statis;
pub mod traits;
pub mod xyz;
