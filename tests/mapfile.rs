mod common;

use std::{fs, num::NonZeroUsize};

use common::{
	buffered_params, check_result, default_test_file, probe_dir, run_bin, stdout_of,
	verify_file_equals,
};
use fsprobelib::{
	ErrorKind, MapFile, Probe, Stage,
	output::Console,
	params::{Params, Payload},
	probe::{Session, verify_file},
};

#[test]
fn mapfile_test() {
	env_logger::try_init().ok();
	let dir = probe_dir();
	let params = buffered_params(dir.path());
	let path = params.path.clone();

	let res = MapFile::new(params).run();
	let output = check_result(&res);
	assert_eq!(
		output,
		"MapFile ...\nRead back content: hello, arceos!\nMapFile ok!\n"
	);
	verify_file_equals(&path, b"hello, arceos!\0");
	assert_eq!(res.content.unwrap(), b"hello, arceos!\0");
}

#[test]
fn mapfile_is_idempotent() {
	env_logger::try_init().ok();
	let dir = probe_dir();
	let params = buffered_params(dir.path());
	let path = params.path.clone();

	check_result(&MapFile::new(params.clone()).run());
	check_result(&MapFile::new(params).run());
	verify_file_equals(&path, b"hello, arceos!\0");
}

#[test]
fn verify_missing_file() {
	env_logger::try_init().ok();
	let dir = probe_dir();
	let mut session = Session::new(Console::Buffer(String::new()));
	let err = verify_file(
		&dir.path().join("absent"),
		NonZeroUsize::new(32).unwrap(),
		Some(&Payload::default()),
		&mut session,
	)
	.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Open);
	assert!(err.to_string().starts_with("Open file error!"));
}

#[test]
fn verify_detects_foreign_content() {
	env_logger::try_init().ok();
	let dir = probe_dir();
	let path = default_test_file(dir.path());
	fs::write(&path, b"hello, world!!\0").unwrap();

	let mut session = Session::new(Console::Buffer(String::new()));
	let err = verify_file(
		&path,
		NonZeroUsize::new(32).unwrap(),
		Some(&Payload::default()),
		&mut session,
	)
	.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Verify);
}

#[test]
fn mapfile_rejects_oversized_payload() {
	env_logger::try_init().ok();
	let dir = probe_dir();
	let params = Params {
		payload: Payload::new("x".repeat(40)).unwrap(),
		..buffered_params(dir.path())
	};
	let path = params.path.clone();

	let res = MapFile::new(params).run();
	assert_eq!(res.stage, Stage::Aborted);
	assert_eq!(res.error.unwrap().kind(), ErrorKind::Capacity);
	assert!(!path.exists());
}

#[test]
fn mapfile_binary_without_arguments() {
	let dir = probe_dir();
	let out = run_bin(env!("CARGO_BIN_EXE_mapfile"), dir.path(), &[]);
	assert!(out.status.success());
	assert_eq!(
		stdout_of(&out),
		"MapFile ...\nRead back content: hello, arceos!\nMapFile ok!\n"
	);
	verify_file_equals(&default_test_file(dir.path()), b"hello, arceos!\0");
}

#[test]
fn mapfile_binary_output_redirection() {
	let dir = probe_dir();
	let out = run_bin(
		env!("CARGO_BIN_EXE_mapfile"),
		dir.path(),
		&["--output", "report.txt"],
	);
	assert!(out.status.success());
	assert!(stdout_of(&out).is_empty());
	assert_eq!(
		fs::read_to_string(dir.path().join("report.txt")).unwrap(),
		"MapFile ...\nRead back content: hello, arceos!\nMapFile ok!\n"
	);
}
