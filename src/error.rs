use std::{fmt, io, path::PathBuf, result};

use nix::errno::Errno;
use thiserror::Error;

pub type Result<T> = result::Result<T, ProbeError>;

/// The step of a probe that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	Create,
	Write,
	Open,
	Read,
	Map,
	Verify,
	Capacity,
	Output,
}

impl fmt::Display for ErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Create => "create",
			Self::Write => "write",
			Self::Open => "open",
			Self::Read => "read",
			Self::Map => "map",
			Self::Verify => "verify",
			Self::Capacity => "capacity",
			Self::Output => "output",
		};
		f.write_str(name)
	}
}

#[derive(Error, Debug)]
pub enum ProbeError {
	#[error("Create file error! {}: {source}", .path.display())]
	Create {
		path: PathBuf,
		#[source]
		source: Errno,
	},

	#[error("Write file error! {0}")]
	Write(#[source] Errno),

	#[error("Write file error! Wrote {written} of {expected} bytes")]
	ShortWrite { written: usize, expected: usize },

	#[error("Open file error! {}: {source}", .path.display())]
	Open {
		path: PathBuf,
		#[source]
		source: Errno,
	},

	#[error("Read file error! {0}")]
	Read(#[source] Errno),

	#[error("Read file error! No bytes returned")]
	EmptyRead,

	#[error("Map file error! {0}")]
	Map(#[source] Errno),

	#[error(
		"Verify file error! Expected {:?}, found {:?}",
		String::from_utf8_lossy(.expected),
		String::from_utf8_lossy(.found)
	)]
	Verify { expected: Vec<u8>, found: Vec<u8> },

	#[error("Output file error! {}: {source}", .path.display())]
	Output {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("Payload of {len} bytes exceeds the {region} of {capacity} bytes")]
	CapacityExceeded {
		len: usize,
		capacity: usize,
		region: &'static str,
	},
}

impl ProbeError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Create { .. } => ErrorKind::Create,
			Self::Write(_) | Self::ShortWrite { .. } => ErrorKind::Write,
			Self::Open { .. } => ErrorKind::Open,
			Self::Read(_) | Self::EmptyRead => ErrorKind::Read,
			Self::Map(_) => ErrorKind::Map,
			Self::Verify { .. } => ErrorKind::Verify,
			Self::CapacityExceeded { .. } => ErrorKind::Capacity,
			Self::Output { .. } => ErrorKind::Output,
		}
	}
}
