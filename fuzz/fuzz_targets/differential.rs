//! Differential fuzzing: every engine against the slicing-by-8 oracle and
//! the `crc32c` crate.

#![no_main]

use arbitrary::Arbitrary;
use castagnoli::{crc32c, engines, portable};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
  seed: u32,
  /// Start offset into `data`, to vary alignment.
  offset: u8,
  data: Vec<u8>,
}

fuzz_target!(|input: Input| {
  let start = usize::from(input.offset % 8).min(input.data.len());
  let data = &input.data[start..];

  let expected = portable::slice8(input.seed, data);
  for engine in engines() {
    let ours = engine.update(input.seed, data);
    assert_eq!(
      ours,
      expected,
      "{} mismatch: ours={ours:#010x}, oracle={expected:#010x}, len={}",
      engine.name(),
      data.len()
    );
  }

  let reference = ::crc32c::crc32c(data);
  assert_eq!(crc32c(data), reference, "crc32c crate mismatch, len={}", data.len());
});
