//! CPU capability representation.
//!
//! [`Caps`] answers the question "what instructions can I legally run on this
//! machine?" for the CRC-32C engines. Each bit is one ISA extension.
//!
//! # Bit Layout
//!
//! - Bits 0-31: x86_64 features
//! - Bits 32-63: aarch64 features
//!
//! # Usage
//!
//! ```ignore
//! use platform::caps::x86;
//!
//! let c = platform::caps();
//! if c.has(x86::CRC32C_CLMUL_READY) {
//!     // three-way hardware CRC with carry-less combine
//! }
//! ```

// ─────────────────────────────────────────────────────────────────────────────
// Core Capability Type
// ─────────────────────────────────────────────────────────────────────────────

/// CPU capabilities: a 64-bit feature bitset.
///
/// `Caps` is `Copy`, `Send`, and `Sync`. It can be freely shared across threads.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Caps(pub(crate) u64);

impl Caps {
  /// Empty capability set (no features). Every portable engine requires this.
  pub const NONE: Self = Self(0);

  /// Create a capability set from a raw word.
  ///
  /// Only available with the `testing` feature or in test builds.
  #[cfg(any(test, feature = "testing"))]
  #[inline]
  #[must_use]
  pub const fn from_raw(bits: u64) -> Self {
    Self(bits)
  }

  /// Access the raw underlying word.
  #[inline]
  #[must_use]
  pub const fn to_raw(self) -> u64 {
    self.0
  }

  /// Check if all features in `required` are present.
  #[inline(always)]
  #[must_use]
  pub const fn has(self, required: Self) -> bool {
    (self.0 & required.0) == required.0
  }

  /// Union of two capability sets.
  #[inline]
  #[must_use]
  pub const fn union(self, other: Self) -> Self {
    Self(self.0 | other.0)
  }

  /// Intersection of two capability sets.
  #[inline]
  #[must_use]
  pub const fn intersection(self, other: Self) -> Self {
    Self(self.0 & other.0)
  }

  /// Check if the capability set is empty.
  #[inline]
  #[must_use]
  pub const fn is_empty(self) -> bool {
    self.0 == 0
  }

  /// Count the number of features present.
  #[inline]
  #[must_use]
  pub const fn count(self) -> u32 {
    self.0.count_ones()
  }

  /// Create a capability set with a single bit set.
  ///
  /// Bits above 63 wrap; callers use the named constants below.
  #[inline]
  #[must_use]
  pub const fn bit(bit: u8) -> Self {
    Self(1u64 << (bit % 64))
  }

  /// Iterate over the names of the features present.
  pub fn feature_names(self) -> impl Iterator<Item = &'static str> {
    FEATURE_NAMES
      .iter()
      .filter(move |(caps, _)| self.has(*caps))
      .map(|(_, name)| *name)
  }
}

impl core::ops::BitOr for Caps {
  type Output = Self;

  #[inline]
  fn bitor(self, rhs: Self) -> Self::Output {
    self.union(rhs)
  }
}

impl core::ops::BitAnd for Caps {
  type Output = Self;

  #[inline]
  fn bitand(self, rhs: Self) -> Self::Output {
    self.intersection(rhs)
  }
}

impl core::ops::BitOrAssign for Caps {
  #[inline]
  fn bitor_assign(&mut self, rhs: Self) {
    *self = self.union(rhs);
  }
}

impl core::fmt::Debug for Caps {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_set().entries(self.feature_names()).finish()
  }
}

impl core::fmt::Display for Caps {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    if self.is_empty() {
      return f.write_str("portable");
    }
    let mut first = true;
    for name in self.feature_names() {
      if !first {
        f.write_str("+")?;
      }
      f.write_str(name)?;
      first = false;
    }
    Ok(())
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// x86_64 Features (bits 0-31)
// ─────────────────────────────────────────────────────────────────────────────

/// x86_64 CPU features relevant to CRC-32C.
pub mod x86 {
  use super::Caps;

  pub const SSE2: Caps = Caps::bit(0);
  pub const SSSE3: Caps = Caps::bit(1);
  pub const SSE41: Caps = Caps::bit(2);
  /// SSE4.2 carries the `crc32` instruction.
  pub const SSE42: Caps = Caps::bit(3);
  pub const PCLMULQDQ: Caps = Caps::bit(4);

  // ─── Combined Capability Masks ───

  /// Hardware CRC-32C instruction available.
  pub const CRC32C_READY: Caps = SSE42;

  /// Hardware CRC-32C plus 64x64 carry-less multiply.
  pub const CRC32C_CLMUL_READY: Caps = Caps(SSE42.0 | PCLMULQDQ.0);
}

// ─────────────────────────────────────────────────────────────────────────────
// aarch64 Features (bits 32-63)
// ─────────────────────────────────────────────────────────────────────────────

/// aarch64 CPU features relevant to CRC-32C.
pub mod aarch64 {
  use super::Caps;

  pub const NEON: Caps = Caps::bit(32); // Baseline on AArch64
  pub const AES: Caps = Caps::bit(33);
  pub const PMULL: Caps = Caps::bit(34); // Bundled with AES
  pub const CRC: Caps = Caps::bit(35);

  // ─── Combined Capability Masks ───

  /// CRC32C{B,H,W,X} instructions available.
  pub const CRC_READY: Caps = CRC;

  /// CRC instructions plus `PMULL` (64x64 polynomial multiply).
  pub const CRC_PMULL_READY: Caps = Caps(CRC.0 | AES.0 | PMULL.0);
}

const FEATURE_NAMES: &[(Caps, &str)] = &[
  (x86::SSE2, "sse2"),
  (x86::SSSE3, "ssse3"),
  (x86::SSE41, "sse4.1"),
  (x86::SSE42, "sse4.2"),
  (x86::PCLMULQDQ, "pclmulqdq"),
  (aarch64::NEON, "neon"),
  (aarch64::AES, "aes"),
  (aarch64::PMULL, "pmull"),
  (aarch64::CRC, "crc"),
];

#[cfg(test)]
mod tests {
  extern crate alloc;

  use alloc::{format, vec::Vec};

  use super::*;

  #[test]
  fn has_requires_every_bit() {
    let c = x86::SSE42 | x86::SSE2;
    assert!(c.has(x86::SSE42));
    assert!(c.has(Caps::NONE));
    assert!(!c.has(x86::CRC32C_CLMUL_READY));
    assert!((c | x86::PCLMULQDQ).has(x86::CRC32C_CLMUL_READY));
  }

  #[test]
  fn arch_ranges_do_not_overlap() {
    let x86_all = x86::SSE2 | x86::SSSE3 | x86::SSE41 | x86::SSE42 | x86::PCLMULQDQ;
    let arm_all = aarch64::NEON | aarch64::AES | aarch64::PMULL | aarch64::CRC;
    assert!(x86_all.intersection(arm_all).is_empty());
    assert_eq!(x86_all.count(), 5);
    assert_eq!(arm_all.count(), 4);
    assert!(x86_all.to_raw() < (1 << 32));
  }

  #[test]
  fn feature_names_follow_bits() {
    let names: Vec<_> = aarch64::CRC_PMULL_READY.feature_names().collect();
    assert_eq!(names, ["aes", "pmull", "crc"]);
    assert_eq!(format!("{}", Caps::NONE), "portable");
    assert_eq!(format!("{}", x86::CRC32C_CLMUL_READY), "sse4.2+pclmulqdq");
    assert_eq!(format!("{:?}", x86::SSE42), r#"{"sse4.2"}"#);
  }

  #[test]
  fn raw_round_trip() {
    assert_eq!(Caps::from_raw(x86::SSE42.to_raw()), x86::SSE42);
  }
}
