use std::{
	convert::Infallible,
	ffi::{CString, NulError},
	fmt,
	num::NonZeroUsize,
	path::PathBuf,
	str::FromStr,
};

use thiserror::Error;

use crate::consts::{CONTENT, MAP_LENGTH, READ_BUFFER_CAPACITY, TEST_FILE_NAME};

#[derive(Debug, Clone)]
pub struct Params {
	/// File that is created, written and read back
	pub path: PathBuf,

	/// Bytes written to the file
	pub payload: Payload,

	/// Capacity of the read-back buffer
	pub read_capacity: usize,

	/// Length of the read-only mapping
	pub map_length: NonZeroUsize,

	/// Compare the read-back content with the payload
	pub verify: bool,

	/// Remove the file after a successful run
	pub remove: bool,

	/// Console output handling
	pub output: Output,
}

impl Default for Params {
	fn default() -> Self {
		Self {
			path: PathBuf::from(TEST_FILE_NAME),
			payload: Default::default(),
			read_capacity: READ_BUFFER_CAPACITY,
			map_length: MAP_LENGTH,
			verify: true,
			remove: false,
			output: Default::default(),
		}
	}
}

#[derive(Error, Debug)]
#[error("Content must not contain NUL bytes (found one at offset {})", .0.nul_position())]
pub struct InvalidPayloadError(#[from] NulError);

/// Text written to the test file, followed by a terminating NUL byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload(CString);

impl Payload {
	pub fn new(content: impl Into<Vec<u8>>) -> Result<Self, InvalidPayloadError> {
		Ok(Self(CString::new(content)?))
	}

	/// The on-disk bytes, including the terminating NUL.
	pub fn as_bytes(&self) -> &[u8] {
		self.0.as_bytes_with_nul()
	}

	/// The content without its terminator.
	pub fn content(&self) -> &[u8] {
		self.0.as_bytes()
	}

	pub fn len(&self) -> usize {
		self.as_bytes().len()
	}

	/// Never true, the terminator is always present.
	pub fn is_empty(&self) -> bool {
		false
	}
}

impl Default for Payload {
	fn default() -> Self {
		Self::new(CONTENT).unwrap()
	}
}

impl fmt::Display for Payload {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0.to_string_lossy())
	}
}

impl FromStr for Payload {
	type Err = InvalidPayloadError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

#[derive(Debug, Clone, Default)]
pub enum Output {
	#[default]
	StdIo,
	File(PathBuf),
	Buffer,
	None,
}

impl FromStr for Output {
	type Err = Infallible;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"none" | "None" => Ok(Self::None),
			p => Ok(Self::File(p.into())),
		}
	}
}
