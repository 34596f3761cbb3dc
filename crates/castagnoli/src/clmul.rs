//! Carry-less multiplication constants for the three-way combine.
//!
//! Three streams of `w` eight-byte words each run over consecutive regions
//! `R0 || R1 || R2`. To fold `crc0` and `crc1` into the third stream, they
//! must be advanced over `2w` and `w` words of zeros respectively:
//!
//! ```text
//! crc0 * x^(128w)  ==  crc32q(0, clmul(crc0, k_lo))   with k_lo = x^(128w - 32) mod P
//! crc1 * x^(64w)   ==  crc32q(0, clmul(crc1, k_hi))   with k_hi = x^(64w - 32)  mod P
//! ```
//!
//! The final `crc32q` of stream 2's last word absorbs both products, so the
//! combine costs two multiplies and one CRC instruction. Constants are kept
//! bit-reflected and shifted left by one, matching the layout of the
//! hardware register (bit 0 of a 32-bit reflected value is x^31).
//!
//! The table is generated at compile time; its entries equal the published
//! `crc_pcl` constants.

#![allow(clippy::indexing_slicing)] // bounded loop indices in const fn

use crate::gf2::{mul_mod, reflect32, xpow_mod};

/// Largest block length, in eight-byte words per stream.
pub const MAX_BLOCK_WORDS: usize = 128;

/// Minimum buffer length for which the three-way clmul path is taken.
///
/// Below this the setup and combine cost more than the serial loop.
pub const CLMUL_THRESHOLD: usize = 216;

/// Bytes in one word triplet (one word from each of the three streams).
pub const TRIPLET: usize = 24;

/// `(k_lo, k_hi)` for block lengths `1..=MAX_BLOCK_WORDS`; index with `w - 1`.
pub static CLMUL_KEYS: [(u64, u64); MAX_BLOCK_WORDS] = generate_keys();

/// Reflect a 32-bit residue into the shifted-left-by-one hardware layout.
const fn key(residue: u64) -> u64 {
  (reflect32(residue as u32) as u64) << 1
}

const fn generate_keys() -> [(u64, u64); MAX_BLOCK_WORDS] {
  // pow[j] = x^(64j - 32) mod P for j in 1..=2*MAX_BLOCK_WORDS.
  let mut pow = [0u64; 2 * MAX_BLOCK_WORDS + 1];
  let step = xpow_mod(64);
  pow[1] = xpow_mod(32);
  let mut j = 2;
  while j <= 2 * MAX_BLOCK_WORDS {
    pow[j] = mul_mod(pow[j - 1], step);
    j += 1;
  }

  let mut keys = [(0u64, 0u64); MAX_BLOCK_WORDS];
  let mut w = 1;
  while w <= MAX_BLOCK_WORDS {
    keys[w - 1] = (key(pow[2 * w]), key(pow[w]));
    w += 1;
  }
  keys
}

/// Software 64x64 carry-less multiply, low 64 bits.
///
/// Reference for the hardware kernels; operands here are at most 33 bits
/// wide, so the product always fits.
#[cfg(test)]
pub(crate) fn clmul_lo(a: u64, b: u64) -> u64 {
  let mut r = 0u64;
  for i in 0..64 {
    if (b >> i) & 1 != 0 {
      r ^= a << i;
    }
  }
  r
}

#[cfg(test)]
mod tests {
  extern crate alloc;

  use alloc::vec;

  use super::*;
  use crate::bitwise;

  #[test]
  fn matches_published_table() {
    assert_eq!(CLMUL_KEYS[0], (0x0_14CD_00BD6, 0x1_05EC_76F0));
    assert_eq!(CLMUL_KEYS[1], (0x0_BA4F_C28E, 0x0_14CD_00BD6));
    assert_eq!(CLMUL_KEYS[2], (0x1_D82C_63DA, 0x0_F20C_0DFE));
  }

  #[test]
  fn hi_of_2w_is_lo_of_w() {
    for w in 1..=MAX_BLOCK_WORDS / 2 {
      assert_eq!(CLMUL_KEYS[2 * w - 1].1, CLMUL_KEYS[w - 1].0, "w={w}");
    }
  }

  #[test]
  fn keys_fit_33_bits() {
    for (lo, hi) in CLMUL_KEYS {
      assert!(lo < (1 << 33) && hi < (1 << 33));
      assert_eq!(lo & 1, 0);
      assert_eq!(hi & 1, 0);
    }
  }

  #[test]
  fn multiply_then_crc_equals_zero_shift() {
    // crc32q(0, clmul(c, k)) == c advanced over 8w (hi) or 16w (lo) zero bytes.
    for w in [1usize, 2, 3, 17, 128] {
      let (lo, hi) = CLMUL_KEYS[w - 1];
      for c in [1u32, 0xDEAD_BEEF, 0xFFFF_FFFF] {
        let v = clmul_lo(u64::from(c), hi).to_le_bytes();
        assert_eq!(bitwise::compute(0, &v), bitwise::compute(c, &vec![0u8; 8 * w]), "hi w={w}");
        let v = clmul_lo(u64::from(c), lo).to_le_bytes();
        assert_eq!(bitwise::compute(0, &v), bitwise::compute(c, &vec![0u8; 16 * w]), "lo w={w}");
      }
    }
  }
}
