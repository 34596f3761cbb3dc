//! Zero-padding shift tables.
//!
//! A [`Gf2Matrix32`] applied to a CRC register costs 32 conditional XORs.
//! Splitting the register into four byte lanes and tabulating the operator
//! for each of the 256 values per lane turns that into four lookups:
//!
//! ```text
//! shift(crc) = T[0][crc & 0xff] ^ T[1][(crc >> 8) & 0xff]
//!            ^ T[2][(crc >> 16) & 0xff] ^ T[3][crc >> 24]
//! ```
//!
//! The parallel engines use two instances, one per block tier, to fold
//! independently computed stream CRCs back together:
//!
//! ```text
//! crc(A || B) register = shift_len(B)(crc(A)) ^ crc_from_zero(B)
//! ```
//!
//! Both are computed by const evaluation and live in read-only memory.

#![allow(clippy::indexing_slicing)] // const-fn table construction with bounded indices

use crate::gf2::{Gf2Matrix32, zeros_operator};

/// Bytes per stream in the large parallel block tier.
pub const LONG_BLOCK: usize = 8192;

/// Bytes per stream in the small parallel block tier.
pub const SHORT_BLOCK: usize = 256;

/// Four 256-entry per-lane tables for one zero-padding length.
#[derive(Clone, PartialEq, Eq)]
#[repr(C, align(64))]
pub struct ShiftTables {
  lanes: [[u32; 256]; 4],
  byte_len: usize,
}

impl ShiftTables {
  /// Tabulate the operator for `byte_len` zero bytes.
  ///
  /// `byte_len` should be a power of two; see [`zeros_operator`] for the
  /// rounding applied otherwise.
  #[must_use]
  pub const fn new(byte_len: usize) -> Self {
    Self::from_operator(&zeros_operator(byte_len), byte_len)
  }

  const fn from_operator(op: &Gf2Matrix32, byte_len: usize) -> Self {
    let mut lanes = [[0u32; 256]; 4];
    let mut lane = 0;
    while lane < 4 {
      let mut n = 0;
      while n < 256 {
        lanes[lane][n] = op.mul_vec((n as u32) << (8 * lane));
        n += 1;
      }
      lane += 1;
    }
    Self { lanes, byte_len }
  }

  /// Advance `crc` (a raw register value) over `byte_len()` zero bytes.
  #[inline(always)]
  #[must_use]
  pub fn apply(&self, crc: u32) -> u32 {
    let [b0, b1, b2, b3] = crc.to_le_bytes();
    self.lanes[0][b0 as usize]
      ^ self.lanes[1][b1 as usize]
      ^ self.lanes[2][b2 as usize]
      ^ self.lanes[3][b3 as usize]
  }

  /// The zero-padding length these tables were built for.
  #[inline]
  #[must_use]
  pub const fn byte_len(&self) -> usize {
    self.byte_len
  }
}

impl core::fmt::Debug for ShiftTables {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("ShiftTables").field("byte_len", &self.byte_len).finish_non_exhaustive()
  }
}

/// Shift tables for [`LONG_BLOCK`] zero bytes.
pub static LONG_SHIFT: ShiftTables = ShiftTables::new(LONG_BLOCK);

/// Shift tables for [`SHORT_BLOCK`] zero bytes.
pub static SHORT_SHIFT: ShiftTables = ShiftTables::new(SHORT_BLOCK);

#[cfg(test)]
mod tests {
  extern crate alloc;

  use alloc::vec;

  use super::*;
  use crate::portable;

  #[test]
  fn apply_matches_operator() {
    let op = zeros_operator(64);
    let t = ShiftTables::new(64);
    for crc in [0u32, 1, 0x80, 0x8000_0000, 0xDEAD_BEEF, 0xFFFF_FFFF] {
      assert_eq!(t.apply(crc), op.mul_vec(crc));
    }
  }

  #[test]
  fn statics_equal_literal_zeros() {
    for tables in [&SHORT_SHIFT, &LONG_SHIFT] {
      let zeros = vec![0u8; tables.byte_len()];
      for crc in [0xFFFF_FFFFu32, 0x1234_5678, 1] {
        assert_eq!(tables.apply(crc), portable::slice8(crc, &zeros));
      }
    }
  }

  #[test]
  fn combine_two_spans() {
    let a: alloc::vec::Vec<u8> = (0..100u8).collect();
    let b: alloc::vec::Vec<u8> = (0..=255u8).collect();
    let t = ShiftTables::new(b.len());

    let crc_a = portable::slice8(!0, &a);
    let crc_b = portable::slice8(0, &b);
    let mut ab = a.clone();
    ab.extend_from_slice(&b);
    assert_eq!(t.apply(crc_a) ^ crc_b, portable::slice8(!0, &ab));
  }

  #[test]
  fn lanes_are_linear() {
    assert_eq!(LONG_SHIFT.apply(0), 0);
    let (x, y) = (0x00FF_00FFu32, 0xF0F0_0F0Fu32);
    assert_eq!(SHORT_SHIFT.apply(x ^ y), SHORT_SHIFT.apply(x) ^ SHORT_SHIFT.apply(y));
  }
}
