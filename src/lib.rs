#![warn(rust_2018_idioms)]

#[macro_use]
extern crate log;

pub mod args;
pub mod buffer;
pub mod consts;
pub mod error;
pub mod file;
pub mod mapping;
pub mod output;
pub mod params;
pub mod probe;

pub use error::{ErrorKind, ProbeError};
pub use probe::{FileOps, MapFile, Probe, ProbeResult, Stage};
