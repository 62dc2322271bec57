//! Console sink for the human-readable probe report.

use std::{
	fmt,
	fs::File,
	io::{self, Write},
};

use crate::{
	error::{ProbeError, Result},
	params::Output,
};

pub enum Console {
	StdIo,
	File(File),
	Buffer(String),
	None,
}

impl Console {
	pub fn new(output: &Output) -> Result<Self> {
		Ok(match output {
			Output::StdIo => Self::StdIo,
			Output::File(path) => Self::File(File::create(path).map_err(|source| {
				ProbeError::Output {
					path: path.clone(),
					source,
				}
			})?),
			Output::Buffer => Self::Buffer(String::new()),
			Output::None => Self::None,
		})
	}

	/// Writes one line. Failing to write the report never fails the probe.
	pub fn line(&mut self, args: fmt::Arguments<'_>) {
		let res = match self {
			Self::StdIo => writeln!(io::stdout(), "{args}"),
			Self::File(file) => writeln!(file, "{args}"),
			Self::Buffer(buf) => {
				buf.push_str(&args.to_string());
				buf.push('\n');
				Ok(())
			}
			Self::None => Ok(()),
		};
		if let Err(err) = res {
			warn!("Could not write console output: {err}");
		}
	}

	/// Returns the captured text for [`Output::Buffer`].
	pub fn into_output(self) -> Option<String> {
		match self {
			Self::Buffer(buf) => Some(buf),
			_ => None,
		}
	}
}

macro_rules! console {
	($console:expr, $($arg:tt)*) => {
		$console.line(format_args!($($arg)*))
	};
}

pub(crate) use console;
