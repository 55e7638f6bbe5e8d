pub mod convert;
pub mod statis;
