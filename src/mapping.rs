//! Read-only views of a file's first bytes through `mmap(2)`.

use std::{
	ffi::c_void,
	num::NonZeroUsize,
	os::fd::{AsFd, AsRawFd},
	ptr::NonNull,
	slice,
};

use nix::{
	errno::Errno,
	sys::mman::{MapFlags, ProtFlags, mmap, munmap},
};

use crate::error::{ProbeError, Result};

/// A read-only, private mapping of the start of a file. Unmapped on drop.
///
/// Only the part of the mapping that is backed by file data is exposed.
/// Touching a page past the end of the file raises `SIGBUS`, so an empty
/// file is refused up front.
#[derive(Debug)]
pub struct FileMapping {
	addr: NonNull<c_void>,
	length: NonZeroUsize,
	visible: usize,
}

impl FileMapping {
	/// Maps `length` bytes of `fd` at offset 0. `file_size` bounds the bytes
	/// exposed through [`FileMapping::as_bytes`].
	pub fn new(fd: impl AsFd, length: NonZeroUsize, file_size: u64) -> Result<Self> {
		if file_size == 0 {
			debug!("Refusing to map an empty file");
			return Err(ProbeError::Map(Errno::EINVAL));
		}
		let raw_fd = fd.as_fd().as_raw_fd();

		// nix checks the result against MAP_FAILED, not null.
		let addr = unsafe {
			mmap(
				None,
				length,
				ProtFlags::PROT_READ,
				MapFlags::MAP_PRIVATE,
				fd,
				0,
			)
		}
		.map_err(ProbeError::Map)?;

		let visible = usize::try_from(file_size).map_or(length.get(), |size| size.min(length.get()));
		debug!(
			"Mapped {length} bytes of fd {raw_fd} at {:p} ({visible} backed by the file)",
			addr.as_ptr()
		);
		Ok(Self {
			addr,
			length,
			visible,
		})
	}

	pub fn len(&self) -> usize {
		self.visible
	}

	pub fn is_empty(&self) -> bool {
		self.visible == 0
	}

	/// The mapped bytes that are backed by the file.
	pub fn as_bytes(&self) -> &[u8] {
		// SAFETY: `addr` points to a live PROT_READ mapping of at least `length`
		// bytes, and `visible <= length` lies within the file.
		unsafe { slice::from_raw_parts(self.addr.as_ptr() as *const u8, self.visible) }
	}
}

impl Drop for FileMapping {
	fn drop(&mut self) {
		trace!("Unmapping {:p}", self.addr.as_ptr());
		if let Err(errno) = unsafe { munmap(self.addr, self.length.get()) } {
			warn!("munmap of {:p} failed: {errno}", self.addr.as_ptr());
		}
	}
}
