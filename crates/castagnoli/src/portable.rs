//! Portable table-driven CRC-32C.
//!
//! | Engine | Tables | Bytes per step |
//! |--------|--------|----------------|
//! | [`sarwate`] | 1 | 1 |
//! | [`slice4`] | 4 | 4 |
//! | [`slice8`] | 8 | 8 |
//!
//! Slicing-by-N XORs the next N bytes into the register and replaces each
//! byte with an independent lookup, so the N loads can be in flight at once.
//! All three take and return a raw register value; the caller applies the
//! initial value and the final complement.

#![allow(clippy::indexing_slicing)] // u8 indices into 256-entry tables

use crate::tables::TABLES;

/// Byte at a time, one table.
#[inline]
#[must_use]
pub fn sarwate(mut crc: u32, data: &[u8]) -> u32 {
  let t0 = &TABLES.0[0];
  for &byte in data {
    crc = (crc >> 8) ^ t0[(crc as u8 ^ byte) as usize];
  }
  crc
}

/// Four bytes per step.
#[inline]
#[must_use]
pub fn slice4(mut crc: u32, data: &[u8]) -> u32 {
  let t = &TABLES.0;
  let (words, rest) = data.as_chunks::<4>();
  for word in words {
    let [b0, b1, b2, b3] = (crc ^ u32::from_le_bytes(*word)).to_le_bytes();
    crc = t[3][b0 as usize] ^ t[2][b1 as usize] ^ t[1][b2 as usize] ^ t[0][b3 as usize];
  }
  sarwate(crc, rest)
}

/// Eight bytes per step. The portable fallback of choice.
#[inline]
#[must_use]
pub fn slice8(mut crc: u32, data: &[u8]) -> u32 {
  let t = &TABLES.0;
  let (words, rest) = data.as_chunks::<8>();
  for word in words {
    let d = u64::from_le_bytes(*word);
    let [b0, b1, b2, b3] = (crc ^ d as u32).to_le_bytes();
    let [b4, b5, b6, b7] = ((d >> 32) as u32).to_le_bytes();
    crc = t[7][b0 as usize]
      ^ t[6][b1 as usize]
      ^ t[5][b2 as usize]
      ^ t[4][b3 as usize]
      ^ t[3][b4 as usize]
      ^ t[2][b5 as usize]
      ^ t[1][b6 as usize]
      ^ t[0][b7 as usize];
  }
  sarwate(crc, rest)
}
