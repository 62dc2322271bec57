//! A fixed-capacity byte buffer that refuses to grow past its capacity.

use std::fmt;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Buffer bounds exceeded: {requested} bytes requested, {remaining} remaining")]
pub struct BoundsError {
	pub requested: usize,
	pub remaining: usize,
}

/// Scratch buffer with a capacity fixed at construction.
///
/// Bytes are filled either by handing out [`BoundedBuf::spare_mut`] to a
/// syscall and then committing the returned count with [`BoundedBuf::commit`],
/// or by copying with [`BoundedBuf::extend_from_slice`]. Both reject anything
/// that does not fit.
pub struct BoundedBuf {
	data: Box<[u8]>,
	len: usize,
}

impl BoundedBuf {
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			data: vec![0; capacity].into_boxed_slice(),
			len: 0,
		}
	}

	pub fn capacity(&self) -> usize {
		self.data.len()
	}

	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	pub fn remaining(&self) -> usize {
		self.capacity() - self.len
	}

	/// The unfilled tail of the buffer.
	pub fn spare_mut(&mut self) -> &mut [u8] {
		&mut self.data[self.len..]
	}

	/// Marks `n` bytes of the spare region as filled.
	pub fn commit(&mut self, n: usize) -> Result<(), BoundsError> {
		if n > self.remaining() {
			return Err(BoundsError {
				requested: n,
				remaining: self.remaining(),
			});
		}
		self.len += n;
		Ok(())
	}

	pub fn extend_from_slice(&mut self, bytes: &[u8]) -> Result<(), BoundsError> {
		let n = bytes.len();
		if n > self.remaining() {
			return Err(BoundsError {
				requested: n,
				remaining: self.remaining(),
			});
		}
		self.data[self.len..self.len + n].copy_from_slice(bytes);
		self.len += n;
		Ok(())
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.data[..self.len]
	}

	/// The filled bytes up to (not including) the first NUL.
	pub fn text_bytes(&self) -> &[u8] {
		until_nul(self.as_bytes())
	}

	pub fn into_vec(self) -> Vec<u8> {
		let mut data = self.data.into_vec();
		data.truncate(self.len);
		data
	}
}

impl fmt::Debug for BoundedBuf {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("BoundedBuf")
			.field("capacity", &self.capacity())
			.field("data", &String::from_utf8_lossy(self.as_bytes()))
			.finish()
	}
}

/// Cuts `bytes` at the first NUL, or returns all of it if there is none.
pub fn until_nul(bytes: &[u8]) -> &[u8] {
	match bytes.iter().position(|&b| b == 0) {
		Some(end) => &bytes[..end],
		None => bytes,
	}
}
