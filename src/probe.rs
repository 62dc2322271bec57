//! The FileOps and MapFile probes.
//!
//! Both walk the same stages: the file is created and written, closed,
//! reopened read-only, its content inspected (by `read(2)` or through a
//! mapping) and closed again. Any failing step aborts the run.

use std::{num::NonZeroUsize, path::Path};

use crate::{
	buffer::{BoundedBuf, until_nul},
	consts::FILE_MODE,
	error::{ProbeError, Result},
	file::{self, ProbeFile},
	output::{Console, console},
	params::{Params, Payload},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
	Start,
	Created,
	Written,
	WriterClosed,
	Reopened,
	Verified,
	ReaderClosed,
	Done,
	Aborted,
}

impl Stage {
	/// The stage following `self` on success. Terminal stages have none.
	pub fn next(self) -> Option<Self> {
		use Stage::*;
		Some(match self {
			Start => Created,
			Created => Written,
			Written => WriterClosed,
			WriterClosed => Reopened,
			Reopened => Verified,
			Verified => ReaderClosed,
			ReaderClosed => Done,
			Done | Aborted => return None,
		})
	}

	pub fn is_terminal(self) -> bool {
		self.next().is_none()
	}
}

/// Tracks the progress of one probe run.
#[derive(Debug)]
pub struct Stages {
	current: Stage,
	reached: Stage,
}

impl Stages {
	pub fn new() -> Self {
		Self {
			current: Stage::Start,
			reached: Stage::Start,
		}
	}

	pub fn current(&self) -> Stage {
		self.current
	}

	/// The last stage reached before an abort, or the current one.
	pub fn reached(&self) -> Stage {
		self.reached
	}

	/// Moves to `to`, which must directly follow the current stage.
	pub fn advance(&mut self, to: Stage) {
		assert_eq!(
			self.current.next(),
			Some(to),
			"invalid stage transition {:?} -> {to:?}",
			self.current
		);
		debug!("Stage {:?} -> {to:?}", self.current);
		self.current = to;
		self.reached = to;
	}

	/// Lets a read phase run on its own: a fresh tracker resumes at
	/// `WriterClosed`, as if the file had been written by an earlier run.
	pub fn resume_reading(&mut self) {
		if self.current == Stage::Start {
			debug!("Stage Start -> WriterClosed (file written earlier)");
			self.current = Stage::WriterClosed;
			self.reached = Stage::WriterClosed;
		}
	}

	pub fn abort(&mut self) {
		debug!("Stage {:?} -> Aborted", self.current);
		self.current = Stage::Aborted;
	}
}

impl Default for Stages {
	fn default() -> Self {
		Self::new()
	}
}

/// State shared by the phases of one run.
pub struct Session {
	pub stages: Stages,
	pub console: Console,
}

impl Session {
	pub fn new(console: Console) -> Self {
		Self {
			stages: Stages::new(),
			console,
		}
	}
}

/// Outcome of [`Probe::run`].
#[derive(Debug)]
pub struct ProbeResult {
	/// Process exit code: 0 on success, -1 on abort.
	pub code: i32,
	/// `Done` on success, `Aborted` otherwise.
	pub stage: Stage,
	/// Last stage completed before the run ended.
	pub reached: Stage,
	pub error: Option<ProbeError>,
	/// Bytes read back from the file.
	pub content: Option<Vec<u8>>,
	/// Captured console output for [`crate::params::Output::Buffer`].
	pub output: Option<String>,
}

impl ProbeResult {
	pub fn is_success(&self) -> bool {
		self.code == 0
	}
}

/// Creates `path`, writes `payload` and closes the file again.
pub fn create_file(path: &Path, payload: &Payload, session: &mut Session) -> Result<()> {
	let mut file = ProbeFile::create(path, FILE_MODE)?;
	session.stages.advance(Stage::Created);
	file.write_exact(payload.as_bytes())?;
	session.stages.advance(Stage::Written);
	file.close_best_effort();
	session.stages.advance(Stage::WriterClosed);
	Ok(())
}

/// Checks that `found` starts with all of `expected`.
fn verify_content(expected: &[u8], found: &[u8]) -> Result<()> {
	if found.get(..expected.len()) == Some(expected) {
		Ok(())
	} else {
		Err(ProbeError::Verify {
			expected: expected.to_vec(),
			found: found.to_vec(),
		})
	}
}

/// Reopens `path` read-only and reads up to `capacity` bytes back with a single
/// call. If `expected` is given, the content must start with it.
pub fn read_back(
	path: &Path,
	capacity: usize,
	expected: Option<&Payload>,
	session: &mut Session,
) -> Result<Vec<u8>> {
	session.stages.resume_reading();
	let mut file = ProbeFile::open_read_only(path)?;
	session.stages.advance(Stage::Reopened);

	let mut buf = BoundedBuf::with_capacity(capacity);
	let read = file.read_into(&mut buf)?;
	console!(
		session.console,
		"Read back content: [{read}] {}",
		String::from_utf8_lossy(buf.text_bytes())
	);
	if let Some(payload) = expected {
		verify_content(payload.as_bytes(), buf.as_bytes())?;
	}
	session.stages.advance(Stage::Verified);

	file.close_best_effort();
	session.stages.advance(Stage::ReaderClosed);
	Ok(buf.into_vec())
}

/// Reopens `path` read-only and inspects its first `length` bytes through a
/// private read-only mapping. If `expected` is given, the mapped content must
/// match it.
pub fn verify_file(
	path: &Path,
	length: NonZeroUsize,
	expected: Option<&Payload>,
	session: &mut Session,
) -> Result<Vec<u8>> {
	session.stages.resume_reading();
	let file = ProbeFile::open_read_only(path)?;
	session.stages.advance(Stage::Reopened);

	let mapping = file.map(length)?;
	let mapped = mapping.as_bytes();
	console!(
		session.console,
		"Read back content: {}",
		String::from_utf8_lossy(until_nul(mapped))
	);
	if let Some(payload) = expected {
		let expected = payload.as_bytes();
		verify_content(&expected[..expected.len().min(mapped.len())], mapped)?;
	}
	session.stages.advance(Stage::Verified);
	let content = mapped.to_vec();

	file.close_best_effort();
	session.stages.advance(Stage::ReaderClosed);
	drop(mapping);
	Ok(content)
}

fn check_capacity(payload: &Payload, capacity: usize, region: &'static str) -> Result<()> {
	if payload.len() > capacity {
		return Err(ProbeError::CapacityExceeded {
			len: payload.len(),
			capacity,
			region,
		});
	}
	Ok(())
}

pub trait Probe {
	/// Name shown in the banners.
	const NAME: &'static str;

	fn params(&self) -> &Params;

	/// Rejects payloads that do not fit the region the content is read back through.
	fn check_capacity(&self) -> Result<()>;

	/// Runs every phase. Returns the bytes read back.
	fn exercise(&self, session: &mut Session) -> Result<Vec<u8>>;

	fn run(&self) -> ProbeResult {
		let params = self.params();
		let console = match Console::new(&params.output) {
			Ok(console) => console,
			Err(err) => {
				error!("{}: could not open console output: {err}", Self::NAME);
				let mut console = Console::StdIo;
				console!(console, "{err}");
				return ProbeResult {
					code: -1,
					stage: Stage::Aborted,
					reached: Stage::Start,
					error: Some(err),
					content: None,
					output: None,
				};
			}
		};
		let mut session = Session::new(console);
		console!(session.console, "{} ...", Self::NAME);
		info!("{}: probing {}", Self::NAME, params.path.display());

		let res = self
			.check_capacity()
			.and_then(|()| self.exercise(&mut session));
		match res {
			Ok(content) => {
				session.stages.advance(Stage::Done);
				if params.remove {
					match file::unlink(&params.path) {
						Ok(()) => debug!("Removed {}", params.path.display()),
						Err(errno) => warn!("Could not remove {}: {errno}", params.path.display()),
					}
				}
				console!(session.console, "{} ok!", Self::NAME);
				ProbeResult {
					code: 0,
					stage: session.stages.current(),
					reached: session.stages.reached(),
					error: None,
					content: Some(content),
					output: session.console.into_output(),
				}
			}
			Err(err) => {
				error!(
					"{} aborted after stage {:?} ({} error)",
					Self::NAME,
					session.stages.reached(),
					err.kind()
				);
				console!(session.console, "{err}");
				session.stages.abort();
				ProbeResult {
					code: -1,
					stage: session.stages.current(),
					reached: session.stages.reached(),
					error: Some(err),
					content: None,
					output: session.console.into_output(),
				}
			}
		}
	}
}

/// Write a file, read it back with `read(2)`.
#[derive(Debug, Default)]
pub struct FileOps {
	params: Params,
}

impl FileOps {
	pub fn new(params: Params) -> Self {
		Self { params }
	}
}

impl Probe for FileOps {
	const NAME: &'static str = "FileOps";

	fn params(&self) -> &Params {
		&self.params
	}

	fn check_capacity(&self) -> Result<()> {
		check_capacity(
			&self.params.payload,
			self.params.read_capacity,
			"read buffer",
		)
	}

	fn exercise(&self, session: &mut Session) -> Result<Vec<u8>> {
		let Params {
			path,
			payload,
			read_capacity,
			verify,
			..
		} = &self.params;
		create_file(path, payload, session)?;
		read_back(path, *read_capacity, verify.then_some(payload), session)
	}
}

/// Write a file, inspect it through a read-only mapping.
#[derive(Debug, Default)]
pub struct MapFile {
	params: Params,
}

impl MapFile {
	pub fn new(params: Params) -> Self {
		Self { params }
	}
}

impl Probe for MapFile {
	const NAME: &'static str = "MapFile";

	fn params(&self) -> &Params {
		&self.params
	}

	fn check_capacity(&self) -> Result<()> {
		check_capacity(
			&self.params.payload,
			self.params.map_length.get(),
			"mapping",
		)
	}

	fn exercise(&self, session: &mut Session) -> Result<Vec<u8>> {
		let Params {
			path,
			payload,
			map_length,
			verify,
			..
		} = &self.params;
		create_file(path, payload, session)?;
		verify_file(path, *map_length, verify.then_some(payload), session)
	}
}
