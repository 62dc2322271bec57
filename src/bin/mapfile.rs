#![warn(rust_2018_idioms)]

use std::process;

use clap::Parser;
use fsprobelib::{MapFile, Probe, args::Args, params::Params};

fn run_mapfile() -> i32 {
	env_logger::init();

	let params = Params::from(Args::parse());
	MapFile::new(params).run().code
}

fn main() {
	process::exit(run_mapfile())
}
