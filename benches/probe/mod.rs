use criterion::{Criterion, criterion_group};
use fsprobelib::{
	FileOps, MapFile, Probe,
	params::{Output, Params},
};

fn bench_params(dir: &std::path::Path) -> Params {
	Params {
		path: dir.join("test_file"),
		output: Output::None,
		..Default::default()
	}
}

pub fn fileops_cycle(c: &mut Criterion) {
	let dir = tempfile::tempdir().unwrap();
	let probe = FileOps::new(bench_params(dir.path()));

	let mut group = c.benchmark_group("fileops");
	group.sample_size(100);
	group.bench_function("create-write-read", |b| {
		b.iter(|| {
			let res = probe.run();
			assert!(res.is_success());
		})
	});
	group.finish();
}

pub fn mapfile_cycle(c: &mut Criterion) {
	let dir = tempfile::tempdir().unwrap();
	let probe = MapFile::new(bench_params(dir.path()));

	let mut group = c.benchmark_group("mapfile");
	group.sample_size(100);
	group.bench_function("create-write-map", |b| {
		b.iter(|| {
			let res = probe.run();
			assert!(res.is_success());
		})
	});
	group.finish();
}

criterion_group!(probe_cycle_benchmark_group, fileops_cycle, mapfile_cycle);
