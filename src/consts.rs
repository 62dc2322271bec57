use std::num::NonZeroUsize;

pub const TEST_FILE_NAME: &str = "test_file";
pub const CONTENT: &str = "hello, arceos!";
/// Owner read/write only.
pub const FILE_MODE: libc::mode_t = 0o600;
pub const READ_BUFFER_CAPACITY: usize = 64;
pub const MAP_LENGTH: NonZeroUsize = NonZeroUsize::new(32).unwrap();

/// Length of [`CONTENT`] on disk, including the terminating NUL.
pub const PAYLOAD_LEN: usize = CONTENT.len() + 1;

const _: () = assert!(PAYLOAD_LEN <= READ_BUFFER_CAPACITY);
const _: () = assert!(PAYLOAD_LEN <= MAP_LENGTH.get());
