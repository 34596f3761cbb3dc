//! Streaming CRC-32C hasher.

use traits::{Checksum, ChecksumCombine};

use crate::{INIT, XOROUT, dispatch::crc32c_update};

/// CRC-32C (Castagnoli) checksum.
///
/// Streaming front end over the dispatched engine. `Crc32c` is `Send` and
/// `Sync`; independent hashers over separate parts of a message can be merged
/// with [`combine`](Self::combine).
///
/// ```
/// use castagnoli::Crc32c;
///
/// let mut hasher = Crc32c::new();
/// hasher.update(b"1234");
/// hasher.update(b"56789");
/// assert_eq!(hasher.finalize(), 0xE306_9283);
/// assert_eq!(Crc32c::checksum(b"123456789"), 0xE306_9283);
/// ```
#[derive(Clone, Debug)]
pub struct Crc32c {
  /// Raw register; the final complement is applied by `finalize`.
  state: u32,
  /// Register value `reset` returns to.
  initial: u32,
}

impl Crc32c {
  /// Create a new hasher with the default initial value.
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self {
      state: INIT,
      initial: INIT,
    }
  }

  /// Create a hasher that continues from a previously finalized CRC.
  ///
  /// ```
  /// use castagnoli::Crc32c;
  ///
  /// let data = b"hello world";
  /// let (first, second) = data.split_at(6);
  ///
  /// let mut hasher = Crc32c::resume(Crc32c::checksum(first));
  /// hasher.update(second);
  /// assert_eq!(hasher.finalize(), Crc32c::checksum(data));
  /// ```
  #[inline]
  #[must_use]
  pub const fn resume(crc: u32) -> Self {
    Self {
      state: crc ^ XOROUT,
      initial: crc ^ XOROUT,
    }
  }

  /// CRC-32C of `data` in one shot.
  #[inline]
  #[must_use]
  pub fn checksum(data: &[u8]) -> u32 {
    crc32c_update(INIT, data) ^ XOROUT
  }

  #[inline]
  pub fn update(&mut self, data: &[u8]) {
    self.state = crc32c_update(self.state, data);
  }

  /// Finalize and return the checksum. Further updates are still allowed.
  #[inline]
  #[must_use]
  pub const fn finalize(&self) -> u32 {
    self.state ^ XOROUT
  }

  #[inline]
  pub fn reset(&mut self) {
    self.state = self.initial;
  }

  /// `crc(A || B)` from `crc(A)`, `crc(B)` and `len(B)`, in O(log len(B)).
  ///
  /// ```
  /// use castagnoli::Crc32c;
  ///
  /// let (a, b) = b"hello world".split_at(6);
  /// let combined = Crc32c::combine(Crc32c::checksum(a), Crc32c::checksum(b), b.len());
  /// assert_eq!(combined, Crc32c::checksum(b"hello world"));
  /// ```
  #[inline]
  #[must_use]
  pub const fn combine(crc_a: u32, crc_b: u32, len_b: usize) -> u32 {
    crate::gf2::combine(crc_a, crc_b, len_b)
  }

  /// Check `data` against a stored checksum.
  ///
  /// # Errors
  ///
  /// Returns [`MismatchError`](traits::MismatchError) when the checksum of
  /// `data` is not `expected`.
  ///
  /// ```
  /// use castagnoli::Crc32c;
  ///
  /// assert!(Crc32c::verify(b"123456789", 0xE306_9283).is_ok());
  /// let err = Crc32c::verify(b"123456789", 0).unwrap_err();
  /// assert_eq!(err.actual(), 0xE306_9283);
  /// ```
  #[inline]
  pub fn verify(data: &[u8], expected: u32) -> Result<(), traits::MismatchError<u32>> {
    <Self as Checksum>::verify(data, expected)
  }
}

impl Default for Crc32c {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl Checksum for Crc32c {
  const OUTPUT_SIZE: usize = 4;
  type Output = u32;

  #[inline]
  fn new() -> Self {
    Crc32c::new()
  }

  #[inline]
  fn with_initial(initial: u32) -> Self {
    Crc32c::resume(initial)
  }

  #[inline]
  fn update(&mut self, data: &[u8]) {
    Crc32c::update(self, data);
  }

  #[inline]
  fn finalize(&self) -> u32 {
    Crc32c::finalize(self)
  }

  #[inline]
  fn reset(&mut self) {
    Crc32c::reset(self);
  }

  #[inline]
  fn checksum(data: &[u8]) -> u32 {
    Crc32c::checksum(data)
  }
}

impl ChecksumCombine for Crc32c {
  #[inline]
  fn combine(crc_a: u32, crc_b: u32, len_b: usize) -> u32 {
    Crc32c::combine(crc_a, crc_b, len_b)
  }
}

#[cfg(feature = "std")]
impl std::io::Write for Crc32c {
  #[inline]
  fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
    self.update(buf);
    Ok(buf.len())
  }

  #[inline]
  fn flush(&mut self) -> std::io::Result<()> {
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reset_restores_initial() {
    let mut h = Crc32c::resume(0x1234_5678);
    h.update(b"abc");
    h.reset();
    assert_eq!(h.finalize(), 0x1234_5678);

    let mut h = Crc32c::new();
    h.update(b"abc");
    h.reset();
    assert_eq!(h.finalize(), 0);
  }

  #[test]
  fn finalize_does_not_consume() {
    let mut h = Crc32c::default();
    h.update(b"1234");
    let partial = h.finalize();
    h.update(b"56789");
    assert_eq!(partial, Crc32c::checksum(b"1234"));
    assert_eq!(h.finalize(), 0xE306_9283);
  }

  #[test]
  fn trait_paths_agree() {
    let data = b"The quick brown fox jumps over the lazy dog";
    assert_eq!(<Crc32c as Checksum>::checksum(data), 0x2262_0404);
    assert_eq!(<Crc32c as Checksum>::checksum_vectored(&[&data[..10], &data[10..]]), 0x2262_0404);
    let (a, b) = data.split_at(19);
    let combined = <Crc32c as ChecksumCombine>::combine(Crc32c::checksum(a), Crc32c::checksum(b), b.len());
    assert_eq!(combined, 0x2262_0404);
  }

  #[test]
  fn verify_mismatch() {
    let err = Crc32c::verify(b"123456789", 0xDEAD_BEEF).unwrap_err();
    assert_eq!(err.expected(), 0xDEAD_BEEF);
    assert_eq!(err.actual(), 0xE306_9283);
  }

  #[cfg(feature = "std")]
  #[test]
  fn io_write_feeds_hasher() {
    use std::io::Write;

    let mut h = Crc32c::new();
    h.write_all(b"12345").unwrap();
    write!(h, "{}", 6789).unwrap();
    h.flush().unwrap();
    assert_eq!(h.finalize(), 0xE306_9283);
  }
}
