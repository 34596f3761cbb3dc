//! Arbitrary update sequences and combine splits match one-shot results.

#![no_main]

use arbitrary::Arbitrary;
use castagnoli::{Crc32c, combine, crc32c};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
  data: Vec<u8>,
  /// Chunk sizes for streaming updates.
  chunk_sizes: Vec<u16>,
}

fuzz_target!(|input: Input| {
  let data = &input.data;
  let expected = crc32c(data);

  let mut hasher = Crc32c::new();
  let mut rest = data.as_slice();
  let mut sizes = input.chunk_sizes.iter().cycle();
  while !rest.is_empty() {
    let size = sizes.next().map_or(1, |&s| usize::from(s).max(1)).min(rest.len());
    let (chunk, tail) = rest.split_at(size);
    hasher.update(chunk);

    let done = data.len() - tail.len();
    let (a, b) = data.split_at(done);
    assert_eq!(combine(crc32c(a), crc32c(b), b.len()), expected, "combine split={done}");
    rest = tail;
  }

  assert_eq!(hasher.finalize(), expected, "streaming mismatch");
});
