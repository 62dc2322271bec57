#![allow(dead_code)]

use std::{
	fs,
	path::{Path, PathBuf},
	process::{Command, Output},
};

use fsprobelib::{
	ProbeResult,
	params::{self, Params},
};
use tempfile::{Builder, TempDir};

/// Creates an isolated working directory for one test.
pub fn probe_dir() -> TempDir {
	Builder::new()
		.prefix("fsprobe-")
		.tempdir()
		.expect("The temporary directory could not be created.")
}

/// Default parameters with the test file placed in `dir` and the console captured.
pub fn buffered_params(dir: &Path) -> Params {
	Params {
		path: dir.join("test_file"),
		output: params::Output::Buffer,
		..Default::default()
	}
}

/// Asserts a successful run and returns its console output.
pub fn check_result(res: &ProbeResult) -> &str {
	let output = res.output.as_deref().unwrap_or_default();
	if !res.is_success() {
		panic!(
			"probe failed with code {} after {:?}: {:?}\n{output}",
			res.code, res.reached, res.error
		);
	}
	output
}

/// Verifies the file exists on the host and holds exactly `contents`.
pub fn verify_file_equals(testfile: &Path, contents: &[u8]) {
	assert!(testfile.exists());
	assert_eq!(fs::read(testfile).unwrap(), contents);
}

/// Runs one of the probe binaries in `dir` with extra arguments.
pub fn run_bin(bin_path: &str, dir: &Path, args: &[&str]) -> Output {
	println!("Launching {bin_path} in {}", dir.display());
	Command::new(bin_path)
		.args(args)
		.current_dir(dir)
		.env_remove("FSPROBE_PATH")
		.env_remove("FSPROBE_CONTENT")
		.output()
		.expect("failed to execute probe binary")
}

pub fn stdout_of(output: &Output) -> String {
	String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn default_test_file(dir: &Path) -> PathBuf {
	dir.join("test_file")
}
