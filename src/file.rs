//! A scoped file handle over the raw POSIX file calls.
//!
//! The handle owns its descriptor, so it is closed on every path. [`ProbeFile::close`]
//! exists for callers that want to see the result of `close(2)`.

use std::{
	ffi::CString,
	mem::MaybeUninit,
	num::NonZeroUsize,
	os::{
		fd::{AsFd, AsRawFd, BorrowedFd, FromRawFd, IntoRawFd, OwnedFd},
		unix::ffi::OsStrExt,
	},
	path::{Path, PathBuf},
};

use nix::errno::Errno;

use crate::{
	buffer::BoundedBuf,
	error::{ProbeError, Result},
	mapping::FileMapping,
};

/// Converts `path` into a C string. Paths with an interior NUL can't reach the
/// host and are reported as `EINVAL`.
fn path_to_cstring(path: &Path) -> std::result::Result<CString, Errno> {
	CString::new(path.as_os_str().as_bytes()).map_err(|_| Errno::EINVAL)
}

/// A write must hand over the whole buffer in one call.
fn check_written(written: usize, expected: usize) -> Result<()> {
	if written != expected {
		return Err(ProbeError::ShortWrite { written, expected });
	}
	Ok(())
}

#[derive(Debug)]
pub struct ProbeFile {
	fd: OwnedFd,
	path: PathBuf,
}

impl ProbeFile {
	/// Creates `path` (or truncates it if it exists) for writing, like `creat(2)`.
	pub fn create(path: &Path, mode: libc::mode_t) -> Result<Self> {
		let to_error = |source| ProbeError::Create {
			path: path.to_path_buf(),
			source,
		};
		let c_path = path_to_cstring(path).map_err(to_error)?;
		let fd = Errno::result(unsafe { libc::creat(c_path.as_ptr(), mode) }).map_err(to_error)?;
		debug!("Created {} as fd {fd} (mode {mode:#o})", path.display());
		Ok(Self::from_raw(fd, path))
	}

	/// Opens an existing `path` read-only.
	pub fn open_read_only(path: &Path) -> Result<Self> {
		let to_error = |source| ProbeError::Open {
			path: path.to_path_buf(),
			source,
		};
		let c_path = path_to_cstring(path).map_err(to_error)?;
		let fd = Errno::result(unsafe {
			libc::open(c_path.as_ptr(), libc::O_RDONLY | libc::O_CLOEXEC)
		})
		.map_err(to_error)?;
		debug!("Opened {} read-only as fd {fd}", path.display());
		Ok(Self::from_raw(fd, path))
	}

	fn from_raw(fd: libc::c_int, path: &Path) -> Self {
		// SAFETY: `fd` was just returned by a successful open and is owned by nobody else.
		let fd = unsafe { OwnedFd::from_raw_fd(fd) };
		Self {
			fd,
			path: path.to_path_buf(),
		}
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// A single `write(2)` call. Returns the number of bytes the host accepted.
	pub fn write(&mut self, bytes: &[u8]) -> std::result::Result<usize, Errno> {
		let ret = unsafe {
			libc::write(
				self.fd.as_raw_fd(),
				bytes.as_ptr() as *const libc::c_void,
				bytes.len(),
			)
		};
		let written = Errno::result(ret)?;
		trace!("write: fd {} accepted {written} bytes", self.fd.as_raw_fd());
		Ok(written as usize)
	}

	/// Writes all of `bytes` with one call. A partial write is an error.
	pub fn write_exact(&mut self, bytes: &[u8]) -> Result<()> {
		let written = self.write(bytes).map_err(ProbeError::Write)?;
		check_written(written, bytes.len())
	}

	/// A single `read(2)` call into the spare capacity of `buf`.
	///
	/// End of file on the first read is reported as [`ProbeError::EmptyRead`].
	pub fn read_into(&mut self, buf: &mut BoundedBuf) -> Result<usize> {
		let spare = buf.spare_mut();
		let ret = unsafe {
			libc::read(
				self.fd.as_raw_fd(),
				spare.as_mut_ptr() as *mut libc::c_void,
				spare.len(),
			)
		};
		let read = Errno::result(ret).map_err(ProbeError::Read)? as usize;
		trace!("read: fd {} returned {read} bytes", self.fd.as_raw_fd());
		if read == 0 {
			return Err(ProbeError::EmptyRead);
		}
		// read(2) never returns more than it was offered.
		buf.commit(read)
			.map_err(|_| ProbeError::Read(Errno::EOVERFLOW))?;
		Ok(read)
	}

	/// File size as reported by `fstat(2)`.
	pub fn size(&self) -> std::result::Result<u64, Errno> {
		let mut stat = MaybeUninit::<libc::stat>::uninit();
		Errno::result(unsafe { libc::fstat(self.fd.as_raw_fd(), stat.as_mut_ptr()) })?;
		// SAFETY: fstat succeeded and filled `stat`.
		let stat = unsafe { stat.assume_init() };
		Ok(stat.st_size as u64)
	}

	/// Maps the first `length` bytes of the file read-only.
	pub fn map(&self, length: NonZeroUsize) -> Result<FileMapping> {
		let file_size = self.size().map_err(ProbeError::Map)?;
		FileMapping::new(self, length, file_size)
	}

	/// Closes the descriptor and reports the result of `close(2)`.
	pub fn close(self) -> std::result::Result<(), Errno> {
		let fd = self.fd.into_raw_fd();
		trace!("Closing fd {fd}");
		Errno::result(unsafe { libc::close(fd) }).map(drop)
	}

	/// Closes the descriptor, logging a failure instead of returning it.
	pub fn close_best_effort(self) {
		let path = self.path.clone();
		if let Err(errno) = self.close() {
			warn!("Closing {} failed: {errno}", path.display());
		}
	}
}

impl AsFd for ProbeFile {
	fn as_fd(&self) -> BorrowedFd<'_> {
		self.fd.as_fd()
	}
}

/// Removes `path` from the filesystem with `unlink(2)`.
pub fn unlink(path: &Path) -> std::result::Result<(), Errno> {
	let c_path = path_to_cstring(path)?;
	Errno::result(unsafe { libc::unlink(c_path.as_ptr()) }).map(drop)
}
