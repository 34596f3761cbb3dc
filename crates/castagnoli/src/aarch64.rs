//! aarch64 hardware CRC-32C.
//!
//! Uses the ARMv8 CRC32 extension (`crc32c*` instructions) and, for the
//! carry-less combine, PMULL (`vmull_p64`, gated on the `aes` feature).
//! Stream layout and combine constants are shared with the x86_64 engines.
//!
//! Safety:
//! - This file is allowed to use `unsafe` for ISA-specific intrinsics.
//! - Kernels are only reachable through engines whose required
//!   capabilities the dispatcher has verified.

#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]

use core::arch::aarch64::{__crc32cb, __crc32cd, __crc32ch, __crc32cw, vmull_p64};

use crate::{
  clmul::{CLMUL_KEYS, CLMUL_THRESHOLD, MAX_BLOCK_WORDS, TRIPLET},
  parallel::{BlockSchedule, SHIFT_ALIGN_THRESHOLD, split_unaligned_head, split3},
  shift::{LONG_BLOCK, LONG_SHIFT, SHORT_BLOCK, SHORT_SHIFT, ShiftTables},
};

// ─────────────────────────────────────────────────────────────────────────────
// Building blocks
// ─────────────────────────────────────────────────────────────────────────────

#[inline]
#[target_feature(enable = "crc")]
unsafe fn crc_tail(mut crc: u32, data: &[u8]) -> u32 {
  let (quads, rest) = data.as_chunks::<4>();
  for q in quads {
    crc = __crc32cw(crc, u32::from_le_bytes(*q));
  }
  let (pairs, rest) = rest.as_chunks::<2>();
  for p in pairs {
    crc = __crc32ch(crc, u16::from_le_bytes(*p));
  }
  for &b in rest {
    crc = __crc32cb(crc, b);
  }
  crc
}

#[inline]
#[target_feature(enable = "aes")]
unsafe fn clmul_lo(a: u64, b: u64) -> u64 {
  vmull_p64(a, b) as u64
}

// ─────────────────────────────────────────────────────────────────────────────
// Kernels
// ─────────────────────────────────────────────────────────────────────────────

/// Single stream.
///
/// # Safety
/// Caller must ensure the CPU supports the `crc` target feature.
#[target_feature(enable = "crc")]
pub(crate) unsafe fn crc32c_crc(mut crc: u32, data: &[u8]) -> u32 {
  let (words, rest) = data.as_chunks::<8>();
  for w in words {
    crc = __crc32cd(crc, u64::from_le_bytes(*w));
  }
  crc_tail(crc, rest)
}

#[inline]
#[target_feature(enable = "crc")]
unsafe fn three_way_shift(crc: u32, [a, b, c]: [&[[u8; 8]]; 3], shift: &ShiftTables) -> u32 {
  let (mut crc0, mut crc1, mut crc2) = (crc, 0u32, 0u32);
  for ((x, y), z) in a.iter().zip(b).zip(c) {
    crc0 = __crc32cd(crc0, u64::from_le_bytes(*x));
    crc1 = __crc32cd(crc1, u64::from_le_bytes(*y));
    crc2 = __crc32cd(crc2, u64::from_le_bytes(*z));
  }
  let crc = shift.apply(crc0) ^ crc1;
  shift.apply(crc) ^ crc2
}

/// Three streams, zero-table combine.
///
/// # Safety
/// Caller must ensure the CPU supports the `crc` target feature.
#[target_feature(enable = "crc")]
pub(crate) unsafe fn crc32c_crc_3way(crc: u32, data: &[u8]) -> u32 {
  let mut crc = crc;
  let mut rest = data;

  if rest.len() > SHIFT_ALIGN_THRESHOLD {
    let (head, body) = split_unaligned_head(rest);
    crc = crc_tail(crc, head);
    rest = body;
  }

  while let Some((streams, tail)) = split3(rest, LONG_BLOCK) {
    crc = three_way_shift(crc, streams, &LONG_SHIFT);
    rest = tail;
  }
  while let Some((streams, tail)) = split3(rest, SHORT_BLOCK) {
    crc = three_way_shift(crc, streams, &SHORT_SHIFT);
    rest = tail;
  }

  crc32c_crc(crc, rest)
}

#[inline]
#[target_feature(enable = "crc,aes")]
unsafe fn three_way_pmull(crc: u32, [a, b, c]: [&[[u8; 8]]; 3]) -> u32 {
  let (Some((last0, a)), Some((last1, b)), Some((last2, c))) = (a.split_last(), b.split_last(), c.split_last())
  else {
    return crc;
  };

  let (mut crc0, mut crc1, mut crc2) = (crc, 0u32, 0u32);
  for ((x, y), z) in a.iter().zip(b).zip(c) {
    crc0 = __crc32cd(crc0, u64::from_le_bytes(*x));
    crc1 = __crc32cd(crc1, u64::from_le_bytes(*y));
    crc2 = __crc32cd(crc2, u64::from_le_bytes(*z));
  }
  crc0 = __crc32cd(crc0, u64::from_le_bytes(*last0));
  crc1 = __crc32cd(crc1, u64::from_le_bytes(*last1));

  // `a.len()` is `w - 1` and `w <= MAX_BLOCK_WORDS`.
  #[allow(clippy::indexing_slicing)]
  let (k_lo, k_hi) = CLMUL_KEYS[a.len()];
  let folded = clmul_lo(u64::from(crc0), k_lo) ^ clmul_lo(u64::from(crc1), k_hi);
  __crc32cd(crc2, folded ^ u64::from_le_bytes(*last2))
}

/// Three streams, PMULL combine.
///
/// # Safety
/// Caller must ensure the CPU supports the `crc` and `aes` target features.
#[target_feature(enable = "crc,aes")]
pub(crate) unsafe fn crc32c_crc_3way_pmull(crc: u32, data: &[u8]) -> u32 {
  let mut crc = crc;
  let mut rest = data;

  if rest.len() > CLMUL_THRESHOLD {
    let (head, body) = split_unaligned_head(rest);
    crc = crc_tail(crc, head);
    rest = body;

    for words in BlockSchedule::new(rest.len() / TRIPLET, MAX_BLOCK_WORDS) {
      let Some((streams, tail)) = split3(rest, words * 8) else {
        break;
      };
      crc = three_way_pmull(crc, streams);
      rest = tail;
    }
  }

  crc32c_crc(crc, rest)
}

// ─────────────────────────────────────────────────────────────────────────────
// Safe wrappers
// ─────────────────────────────────────────────────────────────────────────────

#[inline]
pub(crate) fn crc32c_crc_safe(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: dispatcher verifies CRC before selecting this kernel.
  unsafe { crc32c_crc(crc, data) }
}

#[inline]
pub(crate) fn crc32c_crc_3way_safe(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: dispatcher verifies CRC before selecting this kernel.
  unsafe { crc32c_crc_3way(crc, data) }
}

#[inline]
pub(crate) fn crc32c_crc_3way_pmull_safe(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: dispatcher verifies CRC + PMULL before selecting this kernel.
  unsafe { crc32c_crc_3way_pmull(crc, data) }
}

#[cfg(test)]
mod tests {
  extern crate alloc;

  use alloc::vec::Vec;

  use platform::caps::aarch64;

  use super::*;
  use crate::portable;

  #[test]
  fn kernels_match_portable() {
    let caps = platform::caps();
    let buf: Vec<u8> = (0..3 * LONG_BLOCK + 3 * SHORT_BLOCK + 777)
      .map(|i| (i.wrapping_mul(2_654_435_761) >> 13) as u8)
      .collect();
    for len in [0, 1, 7, 8, 129, 216, 217, 240, 767, 768, 769, 3 * LONG_BLOCK, buf.len()] {
      let input = &buf[..len];
      let expect = portable::slice8(!0, input);
      if caps.has(aarch64::CRC_READY) {
        assert_eq!(crc32c_crc_safe(!0, input), expect, "crc len={len}");
        assert_eq!(crc32c_crc_3way_safe(!0, input), expect, "3way len={len}");
      }
      if caps.has(aarch64::CRC_PMULL_READY) {
        assert_eq!(crc32c_crc_3way_pmull_safe(!0, input), expect, "pmull len={len}");
      }
    }
  }
}
