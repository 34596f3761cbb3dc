//! Checksum traits.
//!
//! A checksum here is a register that absorbs bytes, can be read out at any
//! point, and (for CRCs) can be merged with another register over a later
//! part of the same message.

use core::fmt::Debug;

use crate::error::MismatchError;

/// Streaming checksum.
///
/// ```rust,ignore
/// use castagnoli::{Checksum, Crc32c};
///
/// let mut hasher = Crc32c::new();
/// for part in [&b"1234"[..], b"5678", b"9"] {
///   hasher.update(part);
/// }
/// assert_eq!(hasher.finalize(), Crc32c::checksum(b"123456789"));
/// ```
///
/// Implementations keep `new() == Default::default()`, make `finalize`
/// side-effect free, and have `reset` return to the value the hasher was
/// created with.
pub trait Checksum: Clone + Default {
  /// Width of `Output` in bytes.
  const OUTPUT_SIZE: usize;

  /// Finalized value.
  type Output: Copy + Eq + Debug + Default;

  /// Hasher over the empty message.
  #[must_use]
  fn new() -> Self;

  /// Create a hasher that continues from a previously finalized checksum.
  #[must_use]
  fn with_initial(initial: Self::Output) -> Self;

  /// Absorb `data`.
  fn update(&mut self, data: &[u8]);

  /// Absorb each buffer in order, as if they were one contiguous slice.
  #[inline]
  fn update_vectored(&mut self, bufs: &[&[u8]]) {
    for buf in bufs {
      self.update(buf);
    }
  }

  /// Same as [`update_vectored`](Self::update_vectored), for `IoSlice`s.
  #[cfg(feature = "std")]
  #[inline]
  fn update_io_slices(&mut self, bufs: &[std::io::IoSlice<'_>]) {
    for buf in bufs {
      self.update(buf);
    }
  }

  /// Read out the checksum. The hasher keeps going if updated again.
  #[must_use]
  fn finalize(&self) -> Self::Output;

  /// Back to the state the hasher was created with.
  fn reset(&mut self);

  /// Checksum of `data` in one call.
  #[inline]
  #[must_use]
  fn checksum(data: &[u8]) -> Self::Output {
    let mut h = Self::new();
    h.update(data);
    h.finalize()
  }

  /// Checksum of the concatenation of `bufs`.
  #[inline]
  #[must_use]
  fn checksum_vectored(bufs: &[&[u8]]) -> Self::Output {
    let mut h = Self::new();
    h.update_vectored(bufs);
    h.finalize()
  }

  /// Check `data` against a stored checksum.
  ///
  /// # Errors
  ///
  /// Returns [`MismatchError`] carrying both values when they differ.
  #[inline]
  fn verify(data: &[u8], expected: Self::Output) -> Result<(), MismatchError<Self::Output>> {
    let actual = Self::checksum(data);
    if actual == expected {
      Ok(())
    } else {
      Err(MismatchError::new(expected, actual))
    }
  }
}

/// Checksums whose values over adjacent spans can be merged.
///
/// For a CRC, appending `len(B)` bytes multiplies the register by
/// `x^(8 * len(B))` modulo the generator, so two independently computed
/// values join without touching the data again:
///
/// ```text
/// crc(A || B) = (crc(A) * x^(8 * len(B)) mod G) ^ crc(B)
/// ```
pub trait ChecksumCombine: Checksum {
  /// `crc(A || B)` from `crc(A)`, `crc(B)` and `len(B)`.
  #[must_use]
  fn combine(crc_a: Self::Output, crc_b: Self::Output, len_b: usize) -> Self::Output;
}
