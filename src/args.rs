use std::path::PathBuf;

use clap::Parser;

use crate::{
	consts::{CONTENT, TEST_FILE_NAME},
	params::{Output, Params, Payload},
};

/// Used by clap to derive the CLI shared by both probes.
///
/// Without arguments, a probe writes `hello, arceos!` to `test_file` in the
/// working directory.
#[derive(Parser, Debug)]
#[clap(version, author, about)]
pub struct Args {
	/// File to create, write and read back
	#[clap(short, long, default_value = TEST_FILE_NAME, env = "FSPROBE_PATH")]
	pub path: PathBuf,

	/// Content written to the file
	///
	/// A terminating NUL byte is appended.
	#[clap(short, long, default_value = CONTENT, env = "FSPROBE_CONTENT")]
	pub content: Payload,

	/// Console output redirection.
	///
	/// None discards all output, Omit for stdout
	#[clap(short, long, value_name = "FILE")]
	pub output: Option<String>,

	/// Only display the content read back, don't compare it with what was written
	#[clap(long)]
	pub no_verify: bool,

	/// Remove the file after a successful run
	#[clap(long)]
	pub remove: bool,
}

impl From<Args> for Params {
	fn from(args: Args) -> Self {
		let Args {
			path,
			content,
			output,
			no_verify,
			remove,
		} = args;
		Self {
			path,
			payload: content,
			verify: !no_verify,
			remove,
			output: output
				.map(|output| output.parse::<Output>().unwrap_or_else(|err| match err {}))
				.unwrap_or_default(),
			..Default::default()
		}
	}
}
