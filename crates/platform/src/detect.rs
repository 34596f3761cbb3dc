//! CPU detection.
//!
//! - Compile-time detection via `cfg!(target_feature = "...")`
//! - Runtime detection via `std::arch::is_*_feature_detected!` (std only)
//! - Caching via `OnceLock` with `std`, atomics without
//! - Miri fallback (always portable)

#[cfg(not(feature = "std"))]
use core::sync::atomic::{AtomicU8, AtomicU64, Ordering};

use crate::caps::Caps;

// ─────────────────────────────────────────────────────────────────────────────
// Cache
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(not(feature = "std"))]
mod cache {
  use super::*;

  /// 0 = uninitialized, 1 = initializing, 2 = initialized
  static STATE: AtomicU8 = AtomicU8::new(0);
  static BITS: AtomicU64 = AtomicU64::new(0);

  #[inline]
  pub fn get_or_init(f: fn() -> Caps) -> Caps {
    if STATE.load(Ordering::Acquire) == 2 {
      return Caps(BITS.load(Ordering::Acquire));
    }

    match STATE.compare_exchange(0, 1, Ordering::AcqRel, Ordering::Acquire) {
      Ok(_) => {
        let caps = f();
        BITS.store(caps.0, Ordering::Release);
        STATE.store(2, Ordering::Release);
        caps
      }
      Err(1) => {
        while STATE.load(Ordering::Acquire) == 1 {
          core::hint::spin_loop();
        }
        Caps(BITS.load(Ordering::Acquire))
      }
      Err(_) => Caps(BITS.load(Ordering::Acquire)),
    }
  }
}

/// Detected capabilities, cached for the life of the process.
#[inline]
#[must_use]
pub fn caps() -> Caps {
  #[cfg(miri)]
  {
    return Caps::NONE;
  }

  #[cfg(not(miri))]
  {
    #[cfg(feature = "std")]
    {
      use std::sync::OnceLock;
      static CACHED: OnceLock<Caps> = OnceLock::new();
      *CACHED.get_or_init(detect_uncached)
    }

    #[cfg(not(feature = "std"))]
    {
      cache::get_or_init(detect_uncached)
    }
  }
}

/// Detect capabilities without caching.
#[inline]
#[must_use]
pub fn detect_uncached() -> Caps {
  #[cfg(target_arch = "x86_64")]
  {
    let caps = compile_time_x86_64();
    #[cfg(feature = "std")]
    let caps = caps.union(runtime_x86_64());
    caps
  }

  #[cfg(target_arch = "aarch64")]
  {
    let caps = crate::caps::aarch64::NEON.union(compile_time_aarch64());
    #[cfg(feature = "std")]
    let caps = caps.union(runtime_aarch64());
    caps
  }

  #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
  {
    Caps::NONE
  }
}

/// Capabilities guaranteed by the compilation target alone.
#[inline]
#[must_use]
pub const fn compile_time() -> Caps {
  #[cfg(target_arch = "x86_64")]
  {
    compile_time_x86_64()
  }

  #[cfg(target_arch = "aarch64")]
  {
    crate::caps::aarch64::NEON.union(compile_time_aarch64())
  }

  #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
  {
    Caps::NONE
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// x86_64 detection
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(target_arch = "x86_64")]
const fn compile_time_x86_64() -> Caps {
  use crate::caps::x86;

  // SSE2 is baseline on x86_64.
  #[allow(unused_mut)]
  let mut caps = x86::SSE2;

  #[cfg(target_feature = "ssse3")]
  {
    caps = caps.union(x86::SSSE3);
  }
  #[cfg(target_feature = "sse4.1")]
  {
    caps = caps.union(x86::SSE41);
  }
  #[cfg(target_feature = "sse4.2")]
  {
    caps = caps.union(x86::SSE42);
  }
  #[cfg(target_feature = "pclmulqdq")]
  {
    caps = caps.union(x86::PCLMULQDQ);
  }

  caps
}

#[cfg(all(target_arch = "x86_64", feature = "std"))]
fn runtime_x86_64() -> Caps {
  use crate::caps::x86;

  let mut caps = Caps::NONE;

  if std::arch::is_x86_feature_detected!("ssse3") {
    caps = caps.union(x86::SSSE3);
  }
  if std::arch::is_x86_feature_detected!("sse4.1") {
    caps = caps.union(x86::SSE41);
  }
  if std::arch::is_x86_feature_detected!("sse4.2") {
    caps = caps.union(x86::SSE42);
  }
  if std::arch::is_x86_feature_detected!("pclmulqdq") {
    caps = caps.union(x86::PCLMULQDQ);
  }

  caps
}

// ─────────────────────────────────────────────────────────────────────────────
// aarch64 detection
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(target_arch = "aarch64")]
const fn compile_time_aarch64() -> Caps {
  #[allow(unused_imports)]
  use crate::caps::aarch64;

  #[allow(unused_mut)]
  let mut caps = Caps::NONE;

  #[cfg(target_feature = "aes")]
  {
    caps = caps.union(aarch64::AES).union(aarch64::PMULL);
  }
  #[cfg(target_feature = "crc")]
  {
    caps = caps.union(aarch64::CRC);
  }

  caps
}

#[cfg(all(target_arch = "aarch64", feature = "std"))]
fn runtime_aarch64() -> Caps {
  use crate::caps::aarch64;

  let mut caps = Caps::NONE;

  if std::arch::is_aarch64_feature_detected!("aes") {
    caps = caps.union(aarch64::AES).union(aarch64::PMULL);
  }
  if std::arch::is_aarch64_feature_detected!("crc") {
    caps = caps.union(aarch64::CRC);
  }

  caps
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn detection_is_stable() {
    assert_eq!(detect_uncached(), detect_uncached());
  }

  #[test]
  fn cached_matches_uncached() {
    #[cfg(not(miri))]
    assert_eq!(caps(), detect_uncached());
    #[cfg(miri)]
    assert_eq!(caps(), Caps::NONE);
  }

  #[test]
  #[cfg(not(miri))]
  fn runtime_is_superset_of_compile_time() {
    assert!(caps().has(compile_time()));
  }

  #[test]
  #[cfg(all(target_arch = "x86_64", not(miri)))]
  fn x86_64_has_sse2() {
    assert!(caps().has(crate::caps::x86::SSE2));
  }

  #[test]
  #[cfg(all(target_arch = "aarch64", not(miri)))]
  fn aarch64_has_neon() {
    assert!(caps().has(crate::caps::aarch64::NEON));
  }
}
