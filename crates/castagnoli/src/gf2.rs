//! GF(2) algebra for CRC-32C.
//!
//! Every operation a CRC register undergoes (shifting in zero bits, shifting
//! in data) is linear over GF(2), so "advance the register by N zero bytes"
//! is a 32x32 bit matrix. This module builds those matrices at compile time
//! and provides the polynomial arithmetic behind the carry-less multiply
//! constants.
//!
//! # Mathematical Background
//!
//! For reflected CRCs:
//! ```text
//! crc(A || B) = crc(A) * x^(8*len(B)) mod G(x) XOR crc(B)
//! ```
//!
//! The multiplication by `x^(8*len(B))` is a matrix product; squaring the
//! matrix doubles the number of zero bits it represents.

// All array indexing in this module uses bounded loop indices (0..32).
// Clippy cannot prove this in const fn contexts.
#![allow(clippy::indexing_slicing)]

use crate::POLYNOMIAL;

/// CRC-32C polynomial with explicit x^32 term, normal (MSB-first) form.
pub const POLYNOMIAL_FULL: u64 = 0x1_1EDC_6F41;

// ─────────────────────────────────────────────────────────────────────────────
// 32x32 GF(2) Matrix
// ─────────────────────────────────────────────────────────────────────────────

/// A 32x32 GF(2) matrix represented as 32 `u32` rows.
///
/// Row `i` is the image of input bit `i` under the linear operator.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Gf2Matrix32([u32; 32]);

impl Gf2Matrix32 {
  /// The identity operator (zero bits of padding).
  #[must_use]
  pub const fn identity() -> Self {
    let mut m = [0u32; 32];
    let mut i = 0;
    while i < 32 {
      m[i] = 1 << i;
      i += 1;
    }
    Self(m)
  }

  /// The operator for one zero bit: `(crc >> 1) ^ (POLY if crc & 1)`.
  ///
  /// Row 0 is the reversed polynomial; row `j > 0` moves bit `j` to `j - 1`.
  #[must_use]
  pub const fn one_zero_bit() -> Self {
    let mut m = [0u32; 32];
    m[0] = POLYNOMIAL;
    let mut j = 1;
    while j < 32 {
      m[j] = 1 << (j - 1);
      j += 1;
    }
    Self(m)
  }

  /// Multiply matrix by a vector: XOR of the rows whose input bit is set,
  /// scanning from the least-significant bit.
  #[inline]
  #[must_use]
  pub const fn mul_vec(&self, vec: u32) -> u32 {
    let mut result = 0u32;
    let mut v = vec;
    let mut i = 0;
    while v != 0 {
      if v & 1 != 0 {
        result ^= self.0[i];
      }
      v >>= 1;
      i += 1;
    }
    result
  }

  /// Compose two operators: apply `other` first, then `self`.
  #[must_use]
  pub const fn mul_mat(&self, other: &Self) -> Self {
    let mut result = [0u32; 32];
    let mut i = 0;
    while i < 32 {
      result[i] = self.mul_vec(other.0[i]);
      i += 1;
    }
    Self(result)
  }

  /// Square the matrix: each row multiplied by the matrix itself.
  #[inline]
  #[must_use]
  pub const fn square(&self) -> Self {
    self.mul_mat(self)
  }

  /// Row `i` of the matrix.
  #[inline]
  #[must_use]
  pub const fn row(&self, i: usize) -> u32 {
    self.0[i % 32]
  }
}

impl core::fmt::Debug for Gf2Matrix32 {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    let mut rows = f.debug_list();
    for r in &self.0 {
      rows.entry(&format_args!("{r:#010x}"));
    }
    rows.finish()
  }
}

/// Operator that advances a CRC register over `byte_len` zero bytes.
///
/// `byte_len` is expected to be a power of two. Other values yield the
/// operator for the largest power of two not above `byte_len`; `0` behaves
/// like `1`.
#[must_use]
pub const fn zeros_operator(byte_len: usize) -> Gf2Matrix32 {
  // 1 bit -> 2 -> 4 -> 8 bits (one zero byte).
  let mut op = Gf2Matrix32::one_zero_bit().square().square().square();

  let mut len = byte_len >> 1;
  while len != 0 {
    op = op.square();
    len >>= 1;
  }
  op
}

/// The one-zero-byte operator.
pub(crate) const SHIFT8: Gf2Matrix32 = zeros_operator(1);

/// Combine two finalized CRC-32C values.
///
/// Given `crc_a = crc(A)` and `crc_b = crc(B)`, computes `crc(A || B)` by
/// square-and-multiply over the one-byte operator, O(log len_b).
#[must_use]
pub const fn combine(crc_a: u32, crc_b: u32, len_b: usize) -> u32 {
  if len_b == 0 {
    return crc_a;
  }

  let mut mat = SHIFT8;
  let mut result = Gf2Matrix32::identity();
  let mut remaining = len_b;
  while remaining > 0 {
    if remaining & 1 != 0 {
      result = result.mul_mat(&mat);
    }
    mat = mat.square();
    remaining >>= 1;
  }

  result.mul_vec(crc_a) ^ crc_b
}

// ─────────────────────────────────────────────────────────────────────────────
// Polynomial arithmetic (normal form)
// ─────────────────────────────────────────────────────────────────────────────

/// Reflect (bit-reverse) a 32-bit value.
#[inline]
#[must_use]
pub const fn reflect32(x: u32) -> u32 {
  x.reverse_bits()
}

/// Multiply two polynomials of degree < 32 and reduce mod P.
#[must_use]
pub const fn mul_mod(a: u64, b: u64) -> u64 {
  let mut product: u64 = 0;
  let mut i = 0;
  while i < 32 {
    if (b >> i) & 1 != 0 {
      product ^= a << i;
    }
    i += 1;
  }

  let mut bit: u32 = 63;
  while bit >= 32 {
    if (product >> bit) & 1 != 0 {
      product ^= POLYNOMIAL_FULL << (bit - 32);
    }
    bit -= 1;
  }

  product & 0xFFFF_FFFF
}

/// `x^n mod P` in normal form, by square-and-multiply.
#[must_use]
pub const fn xpow_mod(n: u32) -> u64 {
  if n < 32 {
    return 1u64 << n;
  }

  let mut result: u64 = 1;
  let mut base: u64 = 2;
  let mut exp = n;
  while exp > 0 {
    if exp & 1 != 0 {
      result = mul_mod(result, base);
    }
    base = mul_mod(base, base);
    exp >>= 1;
  }
  result
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::bitwise;

  #[test]
  fn one_zero_bit_matches_bitwise_step() {
    let m = Gf2Matrix32::one_zero_bit();
    for crc in [0u32, 1, 2, 0x8000_0000, 0xDEAD_BEEF, 0xFFFF_FFFF] {
      let expect = (crc >> 1) ^ if crc & 1 != 0 { POLYNOMIAL } else { 0 };
      assert_eq!(m.mul_vec(crc), expect);
    }
  }

  #[test]
  fn identity_is_neutral() {
    let id = Gf2Matrix32::identity();
    let m = zeros_operator(16);
    assert_eq!(id.mul_mat(&m), m);
    assert_eq!(m.mul_mat(&id), m);
    assert_eq!(id.mul_vec(0x1234_5678), 0x1234_5678);
  }

  #[test]
  fn zeros_operator_matches_feeding_zeros() {
    for shift in 0..12 {
      let len = 1usize << shift;
      let op = zeros_operator(len);
      let zeros = [0u8; 2048];
      for crc in [1u32, 0xFFFF_FFFF, 0x0BAD_F00D] {
        assert_eq!(op.mul_vec(crc), bitwise::compute(crc, &zeros[..len]), "len={len}");
      }
    }
  }

  #[test]
  fn zeros_operator_rounds_down() {
    assert_eq!(zeros_operator(0), zeros_operator(1));
    assert_eq!(zeros_operator(12), zeros_operator(8));
    assert_eq!(zeros_operator(8191), zeros_operator(4096));
  }

  #[test]
  fn operator_is_linear() {
    let op = zeros_operator(256);
    let (a, b) = (0x1357_9BDFu32, 0x2468_ACE0u32);
    assert_eq!(op.mul_vec(a ^ b), op.mul_vec(a) ^ op.mul_vec(b));
    assert_eq!(op.mul_vec(0), 0);
  }

  #[test]
  fn combine_matches_concatenation() {
    let data = b"The quick brown fox jumps over the lazy dog";
    let full = bitwise::checksum(data);
    for split in 0..=data.len() {
      let (a, b) = data.split_at(split);
      assert_eq!(combine(bitwise::checksum(a), bitwise::checksum(b), b.len()), full);
    }
  }

  #[test]
  fn xpow_small_and_reduced() {
    assert_eq!(xpow_mod(0), 1);
    assert_eq!(xpow_mod(31), 1 << 31);
    assert_eq!(xpow_mod(32), POLYNOMIAL_FULL & 0xFFFF_FFFF);
    assert_eq!(reflect32(xpow_mod(32) as u32), POLYNOMIAL);
  }

  #[test]
  fn xpow_is_additive() {
    for (a, b) in [(32, 32), (100, 28), (4064, 2016), (7, 9000)] {
      assert_eq!(mul_mod(xpow_mod(a), xpow_mod(b)), xpow_mod(a + b));
    }
  }
}
