extern crate self as blockdag_core;

pub mod assert;
pub mod log;
