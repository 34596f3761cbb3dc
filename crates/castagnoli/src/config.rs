//! CRC-32C runtime configuration.
//!
//! The only knob is a forced engine, read once from `CASTAGNOLI_FORCE`:
//!
//! | Value | Engine |
//! |-------|--------|
//! | `auto` (default) | best supported |
//! | `bitwise`, `reference` | bit-serial |
//! | `sarwate`, `table`, `bytewise` | one table |
//! | `slice4`, `slice-by-4` | slicing-by-4 |
//! | `slice8`, `slice-by-8`, `portable` | slicing-by-8 |
//! | `hwcrc`, `hardware`, `crc`, `sse42` | hardware, single stream |
//! | `parallel`, `3way` | hardware, three streams, shift tables |
//! | `clmul`, `pclmul`, `pmull` | hardware, three streams, carry-less combine |
//!
//! Forced modes are always clamped to detected CPU capabilities: asking for an
//! engine the machine cannot run falls back to `auto`.

use platform::Caps;

use crate::kernels::{self, EngineKind};

/// Environment variable holding the forced engine.
pub const FORCE_ENV: &str = "CASTAGNOLI_FORCE";

/// Forced engine selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Crc32cForce {
  /// Use the default auto selector.
  #[default]
  Auto,
  Bitwise,
  Sarwate,
  Slice4,
  Slice8,
  /// Hardware CRC instruction, one stream.
  Hwcrc,
  /// Three hardware streams with shift-table combine.
  Parallel,
  /// Three hardware streams with carry-less multiply combine.
  Clmul,
}

impl Crc32cForce {
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Auto => "auto",
      Self::Bitwise => "bitwise",
      Self::Sarwate => "sarwate",
      Self::Slice4 => "slice4",
      Self::Slice8 => "slice8",
      Self::Hwcrc => "hwcrc",
      Self::Parallel => "parallel",
      Self::Clmul => "clmul",
    }
  }

  /// The engine kind this mode pins, or `None` for `Auto`.
  #[must_use]
  pub const fn engine_kind(self) -> Option<EngineKind> {
    match self {
      Self::Auto => None,
      Self::Bitwise => Some(EngineKind::Bitwise),
      Self::Sarwate => Some(EngineKind::Sarwate),
      Self::Slice4 => Some(EngineKind::SliceBy4),
      Self::Slice8 => Some(EngineKind::SliceBy8),
      Self::Hwcrc => Some(EngineKind::Hardware),
      Self::Parallel => Some(EngineKind::HardwareParallel),
      Self::Clmul => Some(EngineKind::HardwareParallelClmul),
    }
  }
}

/// Full runtime configuration (after applying overrides).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Crc32cConfig {
  /// Requested force mode (environment).
  pub requested_force: Crc32cForce,
  /// Force mode clamped to detected CPU capabilities.
  pub effective_force: Crc32cForce,
}

#[cfg_attr(not(feature = "std"), allow(dead_code))]
fn parse_force(value: &str) -> Option<Crc32cForce> {
  let value = value.trim();
  if value.is_empty() {
    return None;
  }

  const ALIASES: &[(&str, Crc32cForce)] = &[
    ("auto", Crc32cForce::Auto),
    ("bitwise", Crc32cForce::Bitwise),
    ("reference", Crc32cForce::Bitwise),
    ("sarwate", Crc32cForce::Sarwate),
    ("table", Crc32cForce::Sarwate),
    ("bytewise", Crc32cForce::Sarwate),
    ("slice4", Crc32cForce::Slice4),
    ("slice-by-4", Crc32cForce::Slice4),
    ("slice8", Crc32cForce::Slice8),
    ("slice-by-8", Crc32cForce::Slice8),
    ("portable", Crc32cForce::Slice8),
    ("hwcrc", Crc32cForce::Hwcrc),
    ("hardware", Crc32cForce::Hwcrc),
    ("crc", Crc32cForce::Hwcrc),
    ("sse42", Crc32cForce::Hwcrc),
    ("parallel", Crc32cForce::Parallel),
    ("3way", Crc32cForce::Parallel),
    ("clmul", Crc32cForce::Clmul),
    ("pclmul", Crc32cForce::Clmul),
    ("pmull", Crc32cForce::Clmul),
  ];

  ALIASES
    .iter()
    .find(|(name, _)| value.eq_ignore_ascii_case(name))
    .map(|&(_, force)| force)
}

#[cfg(feature = "std")]
fn read_env_force() -> Crc32cForce {
  std::env::var(FORCE_ENV)
    .ok()
    .and_then(|v| parse_force(&v))
    .unwrap_or_default()
}

#[cfg(feature = "std")]
fn requested_force() -> Crc32cForce {
  use std::sync::OnceLock;
  static FORCE: OnceLock<Crc32cForce> = OnceLock::new();
  *FORCE.get_or_init(read_env_force)
}

#[cfg(not(feature = "std"))]
fn requested_force() -> Crc32cForce {
  Crc32cForce::Auto
}

#[inline]
#[must_use]
fn clamp_force_to_caps(requested: Crc32cForce, caps: Caps) -> Crc32cForce {
  match requested.engine_kind() {
    None => Crc32cForce::Auto,
    Some(kind) if kernels::supported(caps).any(|e| e.kind() == kind) => requested,
    Some(_) => Crc32cForce::Auto,
  }
}

/// Get the effective configuration for the current platform.
#[inline]
#[must_use]
pub fn get() -> Crc32cConfig {
  let requested_force = requested_force();
  Crc32cConfig {
    requested_force,
    effective_force: clamp_force_to_caps(requested_force, platform::caps()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_is_case_insensitive() {
    assert_eq!(parse_force("AUTO"), Some(Crc32cForce::Auto));
    assert_eq!(parse_force(" Slice-By-8 "), Some(Crc32cForce::Slice8));
    assert_eq!(parse_force("PCLMUL"), Some(Crc32cForce::Clmul));
    assert_eq!(parse_force("pmull"), Some(Crc32cForce::Clmul));
    assert_eq!(parse_force("3way"), Some(Crc32cForce::Parallel));
    assert_eq!(parse_force("sse42"), Some(Crc32cForce::Hwcrc));
  }

  #[test]
  fn parse_rejects_unknown_and_empty() {
    assert_eq!(parse_force(""), None);
    assert_eq!(parse_force("   "), None);
    assert_eq!(parse_force("avx512"), None);
  }

  #[test]
  fn as_str_round_trips() {
    for f in [
      Crc32cForce::Auto,
      Crc32cForce::Bitwise,
      Crc32cForce::Sarwate,
      Crc32cForce::Slice4,
      Crc32cForce::Slice8,
      Crc32cForce::Hwcrc,
      Crc32cForce::Parallel,
      Crc32cForce::Clmul,
    ] {
      assert_eq!(parse_force(f.as_str()), Some(f));
    }
  }

  #[test]
  fn portable_forces_survive_clamping() {
    for f in [Crc32cForce::Bitwise, Crc32cForce::Sarwate, Crc32cForce::Slice4, Crc32cForce::Slice8] {
      assert_eq!(clamp_force_to_caps(f, Caps::NONE), f);
    }
  }

  #[test]
  fn hardware_forces_clamp_without_caps() {
    for f in [Crc32cForce::Hwcrc, Crc32cForce::Parallel, Crc32cForce::Clmul] {
      assert_eq!(clamp_force_to_caps(f, Caps::NONE), Crc32cForce::Auto);
    }
  }

  #[cfg(target_arch = "x86_64")]
  #[test]
  fn hardware_forces_follow_caps() {
    use platform::caps::x86;

    assert_eq!(clamp_force_to_caps(Crc32cForce::Hwcrc, x86::SSE42), Crc32cForce::Hwcrc);
    assert_eq!(clamp_force_to_caps(Crc32cForce::Parallel, x86::SSE42), Crc32cForce::Parallel);
    assert_eq!(clamp_force_to_caps(Crc32cForce::Clmul, x86::SSE42), Crc32cForce::Auto);
    assert_eq!(clamp_force_to_caps(Crc32cForce::Clmul, x86::CRC32C_CLMUL_READY), Crc32cForce::Clmul);
  }

  #[test]
  fn effective_is_supported() {
    let cfg = get();
    if let Some(kind) = cfg.effective_force.engine_kind() {
      assert!(kernels::engine(kind).is_some());
    }
  }
}
