//! Buffer slicing shared by the three-way hardware engines.
//!
//! The arch modules own the instructions; this module only decides which
//! bytes go to which stream, so the same layout is used on every target.

/// Above this length the zero-table engine aligns to 8 bytes before starting.
pub const SHIFT_ALIGN_THRESHOLD: usize = 128;

/// Split off the 0-7 leading bytes that precede the first 8-byte boundary.
#[inline(always)]
pub(crate) fn split_unaligned_head(data: &[u8]) -> (&[u8], &[u8]) {
  let lead = data.as_ptr().addr().wrapping_neg() & 7;
  data.split_at(lead.min(data.len()))
}

/// Three consecutive regions of `stream_bytes` each, as 8-byte words, plus
/// whatever follows them. `None` when `data` is too short.
///
/// `stream_bytes` must be a multiple of 8.
#[inline(always)]
pub(crate) fn split3(data: &[u8], stream_bytes: usize) -> Option<([&[[u8; 8]]; 3], &[u8])> {
  debug_assert_eq!(stream_bytes % 8, 0);
  let (a, rest) = data.split_at_checked(stream_bytes)?;
  let (b, rest) = rest.split_at_checked(stream_bytes)?;
  let (c, rest) = rest.split_at_checked(stream_bytes)?;
  Some(([a.as_chunks::<8>().0, b.as_chunks::<8>().0, c.as_chunks::<8>().0], rest))
}

/// Block schedule for the carry-less engine.
///
/// `triplets` word triplets are consumed as one partial block of
/// `triplets % max` words per stream (when non-zero) followed by full
/// blocks of `max` words.
#[derive(Clone, Copy, Debug)]
pub(crate) struct BlockSchedule {
  remaining: usize,
  next: usize,
  max: usize,
}

impl BlockSchedule {
  #[inline(always)]
  pub(crate) fn new(triplets: usize, max: usize) -> Self {
    let first = triplets % max;
    Self {
      remaining: triplets,
      next: if first == 0 { max } else { first },
      max,
    }
  }
}

impl Iterator for BlockSchedule {
  /// Words per stream in the next block.
  type Item = usize;

  #[inline(always)]
  fn next(&mut self) -> Option<usize> {
    if self.remaining == 0 {
      return None;
    }
    let words = self.next;
    self.remaining -= words;
    self.next = self.max;
    Some(words)
  }
}
