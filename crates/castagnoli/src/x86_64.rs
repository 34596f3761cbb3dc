//! x86_64 hardware CRC-32C.
//!
//! SSE4.2 `crc32` computes CRC-32C directly, one 8-byte word per
//! instruction, but each instruction depends on the previous register
//! value. With a latency of 3 cycles and a throughput of 1 per cycle, one
//! stream uses a third of the unit. The three-way engines run three
//! independent streams and fold the results:
//!
//! - `sse42-3way`: zero-padding shift tables ([`LONG_SHIFT`], [`SHORT_SHIFT`])
//! - `sse42-3way-clmul`: one `pclmulqdq` per stream with [`CLMUL_KEYS`]
//!
//! Safety:
//! - This file is allowed to use `unsafe` for ISA-specific intrinsics.
//! - Kernels are only reachable through engines whose required
//!   capabilities the dispatcher has verified.

#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]

use core::arch::x86_64::{
  _mm_clmulepi64_si128, _mm_crc32_u8, _mm_crc32_u16, _mm_crc32_u32, _mm_crc32_u64, _mm_cvtsi64_si128,
  _mm_cvtsi128_si64,
};

use crate::{
  clmul::{CLMUL_KEYS, CLMUL_THRESHOLD, MAX_BLOCK_WORDS, TRIPLET},
  parallel::{BlockSchedule, SHIFT_ALIGN_THRESHOLD, split_unaligned_head, split3},
  shift::{LONG_BLOCK, LONG_SHIFT, SHORT_BLOCK, SHORT_SHIFT, ShiftTables},
};

// ─────────────────────────────────────────────────────────────────────────────
// Building blocks
// ─────────────────────────────────────────────────────────────────────────────

/// Fewer than 8 bytes: 4, 2, then 1 byte wide.
#[inline]
#[target_feature(enable = "sse4.2")]
unsafe fn crc_tail(mut crc: u32, data: &[u8]) -> u32 {
  let (quads, rest) = data.as_chunks::<4>();
  for q in quads {
    crc = _mm_crc32_u32(crc, u32::from_le_bytes(*q));
  }
  let (pairs, rest) = rest.as_chunks::<2>();
  for p in pairs {
    crc = _mm_crc32_u16(crc, u16::from_le_bytes(*p));
  }
  for &b in rest {
    crc = _mm_crc32_u8(crc, b);
  }
  crc
}

#[inline]
#[target_feature(enable = "sse4.2")]
unsafe fn crc_words(crc: u32, words: &[[u8; 8]]) -> u32 {
  let mut crc = u64::from(crc);
  for w in words {
    crc = _mm_crc32_u64(crc, u64::from_le_bytes(*w));
  }
  crc as u32
}

/// Low 64 bits of the carry-less product. Operands here are at most 33 bits.
#[inline]
#[target_feature(enable = "pclmulqdq")]
unsafe fn clmul_lo(a: u64, b: u64) -> u64 {
  let p = _mm_clmulepi64_si128(_mm_cvtsi64_si128(a as i64), _mm_cvtsi64_si128(b as i64), 0x00);
  _mm_cvtsi128_si64(p) as u64
}

// ─────────────────────────────────────────────────────────────────────────────
// Kernels
// ─────────────────────────────────────────────────────────────────────────────

/// Single stream: whole words serially, then the tail.
///
/// # Safety
/// Caller must ensure the CPU supports SSE4.2.
#[target_feature(enable = "sse4.2")]
pub(crate) unsafe fn crc32c_sse42(crc: u32, data: &[u8]) -> u32 {
  let (words, rest) = data.as_chunks::<8>();
  crc_tail(crc_words(crc, words), rest)
}

/// Three interleaved streams over `stream` words each, folded with shift
/// tables for the stream length.
#[inline]
#[target_feature(enable = "sse4.2")]
unsafe fn three_way_shift(crc: u32, [a, b, c]: [&[[u8; 8]]; 3], shift: &ShiftTables) -> u32 {
  let (mut crc0, mut crc1, mut crc2) = (u64::from(crc), 0u64, 0u64);
  for ((x, y), z) in a.iter().zip(b).zip(c) {
    crc0 = _mm_crc32_u64(crc0, u64::from_le_bytes(*x));
    crc1 = _mm_crc32_u64(crc1, u64::from_le_bytes(*y));
    crc2 = _mm_crc32_u64(crc2, u64::from_le_bytes(*z));
  }
  let crc = shift.apply(crc0 as u32) ^ crc1 as u32;
  shift.apply(crc) ^ crc2 as u32
}

/// Three streams, zero-table combine, 8 KiB then 256 B tiers.
///
/// # Safety
/// Caller must ensure the CPU supports SSE4.2.
#[target_feature(enable = "sse4.2")]
pub(crate) unsafe fn crc32c_sse42_3way(crc: u32, data: &[u8]) -> u32 {
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

  crc32c_sse42(crc, rest)
}

/// One block of `w` words per stream, folded with a carry-less multiply.
///
/// Stream 2 holds back its last word; the two products are XORed into it so
/// a single `crc32` instruction finishes the combine.
#[inline]
#[target_feature(enable = "sse4.2,pclmulqdq")]
unsafe fn three_way_clmul(crc: u32, [a, b, c]: [&[[u8; 8]]; 3]) -> u32 {
  let (Some((last0, a)), Some((last1, b)), Some((last2, c))) = (a.split_last(), b.split_last(), c.split_last())
  else {
    return crc;
  };

  let (mut crc0, mut crc1, mut crc2) = (u64::from(crc), 0u64, 0u64);
  for ((x, y), z) in a.iter().zip(b).zip(c) {
    crc0 = _mm_crc32_u64(crc0, u64::from_le_bytes(*x));
    crc1 = _mm_crc32_u64(crc1, u64::from_le_bytes(*y));
    crc2 = _mm_crc32_u64(crc2, u64::from_le_bytes(*z));
  }
  crc0 = _mm_crc32_u64(crc0, u64::from_le_bytes(*last0));
  crc1 = _mm_crc32_u64(crc1, u64::from_le_bytes(*last1));

  // `a.len()` is `w - 1` and `w <= MAX_BLOCK_WORDS`.
  #[allow(clippy::indexing_slicing)]
  let (k_lo, k_hi) = CLMUL_KEYS[a.len()];
  let folded = clmul_lo(crc0, k_lo) ^ clmul_lo(crc1, k_hi);
  _mm_crc32_u64(crc2, folded ^ u64::from_le_bytes(*last2)) as u32
}

/// Three streams, carry-less multiply combine, blocks of up to 128 words.
///
/// # Safety
/// Caller must ensure the CPU supports SSE4.2 and PCLMULQDQ.
#[target_feature(enable = "sse4.2,pclmulqdq")]
pub(crate) unsafe fn crc32c_sse42_3way_clmul(crc: u32, data: &[u8]) -> u32 {
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
      crc = three_way_clmul(crc, streams);
      rest = tail;
    }
  }

  crc32c_sse42(crc, rest)
}

// ─────────────────────────────────────────────────────────────────────────────
// Safe wrappers
// ─────────────────────────────────────────────────────────────────────────────

#[inline]
pub(crate) fn crc32c_sse42_safe(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: dispatcher verifies SSE4.2 before selecting this kernel.
  unsafe { crc32c_sse42(crc, data) }
}

#[inline]
pub(crate) fn crc32c_sse42_3way_safe(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: dispatcher verifies SSE4.2 before selecting this kernel.
  unsafe { crc32c_sse42_3way(crc, data) }
}

#[inline]
pub(crate) fn crc32c_sse42_3way_clmul_safe(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: dispatcher verifies SSE4.2 + PCLMULQDQ before selecting this kernel.
  unsafe { crc32c_sse42_3way_clmul(crc, data) }
}
