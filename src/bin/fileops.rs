#![warn(rust_2018_idioms)]

use std::process;

use clap::Parser;
use fsprobelib::{FileOps, Probe, args::Args, params::Params};

fn run_fileops() -> i32 {
	env_logger::init();

	let params = Params::from(Args::parse());
	FileOps::new(params).run().code
}

fn main() {
	process::exit(run_fileops())
}
