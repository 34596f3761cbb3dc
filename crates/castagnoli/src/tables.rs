//! Const-fn lookup tables for the table-driven portable engines.
//!
//! `TABLES[0]` is the classic byte-at-a-time table. `TABLES[k]` advances a
//! byte that sits `k` positions before the end of a chunk, so slicing-by-N
//! folds N bytes with N independent lookups.
//!
//! Total size: 8 * 256 * 4 = 8KB, 64-byte aligned.

#![allow(clippy::indexing_slicing)] // bounded loop indices in const fn

use crate::POLYNOMIAL;

/// 64-byte aligned wrapper so a table never straddles more cache lines than
/// it has to.
#[derive(Clone, Copy, Debug)]
#[repr(C, align(64))]
pub struct Aligned64<T>(pub T);

/// One entry of the byte table: eight bit-steps of the reflected register.
#[must_use]
pub const fn byte_table_entry(index: u8) -> u32 {
  let mut crc = index as u32;
  let mut i = 0;
  while i < 8 {
    if crc & 1 != 0 {
      crc = (crc >> 1) ^ POLYNOMIAL;
    } else {
      crc >>= 1;
    }
    i += 1;
  }
  crc
}

/// Generate `N` slicing tables.
#[must_use]
pub const fn generate_slicing_tables<const N: usize>() -> [[u32; 256]; N] {
  let mut tables = [[0u32; 256]; N];

  let mut i = 0usize;
  while i < 256 {
    tables[0][i] = byte_table_entry(i as u8);
    i += 1;
  }

  let mut k = 1usize;
  while k < N {
    i = 0;
    while i < 256 {
      let prev = tables[k - 1][i];
      tables[k][i] = (prev >> 8) ^ tables[0][(prev & 0xFF) as usize];
      i += 1;
    }
    k += 1;
  }

  tables
}

/// Slicing-by-8 tables; the first four double as the slicing-by-4 set and
/// the first one as the Sarwate table.
pub static TABLES: Aligned64<[[u32; 256]; 8]> = Aligned64(generate_slicing_tables::<8>());
