//! Table-less CRC-32C.
//!
//! Branchless bit-serial division: the slowest engine and the one with the
//! least that can go wrong, so every other engine is ultimately checked
//! against it.

use crate::POLYNOMIAL;

/// Update a raw CRC register over `data`, one bit at a time.
///
/// ```
/// use castagnoli::bitwise::compute;
///
/// let crc = compute(0xFFFF_FFFF, b"123456789") ^ 0xFFFF_FFFF;
/// assert_eq!(crc, 0xE306_9283);
/// ```
#[inline]
#[must_use]
pub fn compute(mut crc: u32, data: &[u8]) -> u32 {
  let (quads, rest) = data.as_chunks::<4>();
  for &[a, b, c, d] in quads {
    crc = compute_byte(crc, a);
    crc = compute_byte(crc, b);
    crc = compute_byte(crc, c);
    crc = compute_byte(crc, d);
  }
  for &byte in rest {
    crc = compute_byte(crc, byte);
  }
  crc
}

/// One byte through the register.
///
/// `0u32.wrapping_sub(crc & 1)` is all-ones exactly when the low bit is set,
/// which selects the polynomial without a branch.
#[inline]
#[must_use]
pub const fn compute_byte(mut crc: u32, byte: u8) -> u32 {
  crc ^= byte as u32;
  let mut i = 0;
  while i < 8 {
    let mask = 0u32.wrapping_sub(crc & 1);
    crc = (crc >> 1) ^ (POLYNOMIAL & mask);
    i += 1;
  }
  crc
}

/// Finalized CRC-32C of `data`, computed bit-serially.
#[must_use]
pub fn checksum(data: &[u8]) -> u32 {
  compute(crate::INIT, data) ^ crate::XOROUT
}
