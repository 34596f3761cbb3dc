//! Engine registry.
//!
//! Every engine compiled into this build, best first. Each entry names the
//! CPU capabilities it needs; the list is only ever handed out filtered by
//! the detected capabilities, which is what makes [`Engine::update`] safe to
//! call on hardware engines.
//!
//! | Kind | x86_64 | aarch64 |
//! |------|--------|---------|
//! | `HardwareParallelClmul` | `sse42-3way-pclmul` | `crc-3way-pmull` |
//! | `HardwareParallel` | `sse42-3way` | `crc-3way` |
//! | `Hardware` | `sse42` | `crc` |
//! | `SliceBy8` / `SliceBy4` / `Sarwate` | portable | portable |
//! | `Bitwise` | reference | reference |

use core::fmt;

use backend::Kernel;
use platform::Caps;

use crate::{bitwise, portable};

/// Engine family, from the slowest reference to the fastest hardware path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EngineKind {
  /// Placeholder that selects and installs the real engine on first use.
  Detector,
  /// Bit-serial, no tables.
  Bitwise,
  /// One 256-entry table, one byte per step.
  Sarwate,
  /// Slicing-by-4.
  SliceBy4,
  /// Slicing-by-8.
  SliceBy8,
  /// Hardware CRC-32C instruction, single stream.
  Hardware,
  /// Three hardware streams, shift-table combine.
  HardwareParallel,
  /// Three hardware streams, carry-less multiply combine.
  HardwareParallelClmul,
}

impl EngineKind {
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Detector => "detector",
      Self::Bitwise => "bitwise",
      Self::Sarwate => "sarwate",
      Self::SliceBy4 => "slice4",
      Self::SliceBy8 => "slice8",
      Self::Hardware => "hardware",
      Self::HardwareParallel => "hardware-parallel",
      Self::HardwareParallelClmul => "hardware-parallel-clmul",
    }
  }
}

impl fmt::Display for EngineKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A CRC-32C engine: a raw-register update function plus its requirements.
///
/// Engines are only reachable as `&'static Engine` through [`engines`],
/// [`engine`], [`detect_best_engine`](crate::detect_best_engine) and
/// [`active_engine`](crate::active_engine), all of which filter by the
/// detected CPU capabilities.
pub struct Engine {
  name: &'static str,
  kind: EngineKind,
  requires: Caps,
  update: fn(u32, &[u8]) -> u32,
}

impl Engine {
  pub(crate) const fn new(
    name: &'static str,
    kind: EngineKind,
    requires: Caps,
    update: fn(u32, &[u8]) -> u32,
  ) -> Self {
    Self {
      name,
      kind,
      requires,
      update,
    }
  }

  /// Diagnostic name, e.g. `"x86_64/sse42-3way-pclmul"`.
  #[inline]
  #[must_use]
  pub const fn name(&self) -> &'static str {
    self.name
  }

  #[inline]
  #[must_use]
  pub const fn kind(&self) -> EngineKind {
    self.kind
  }

  /// CPU capabilities this engine needs.
  #[inline]
  #[must_use]
  pub const fn requires(&self) -> Caps {
    self.requires
  }

  /// Whether this engine can run on a machine with `caps`.
  #[inline]
  #[must_use]
  pub const fn is_supported(&self, caps: Caps) -> bool {
    caps.has(self.requires)
  }

  /// Advance a raw CRC register over `data`.
  ///
  /// The register is neither pre- nor post-conditioned; see
  /// [`crc32c_init`](crate::crc32c_init) and [`crc32c_finish`](crate::crc32c_finish).
  #[inline]
  #[must_use]
  pub fn update(&self, crc: u32, data: &[u8]) -> u32 {
    (self.update)(crc, data)
  }
}

impl Kernel for Engine {
  #[inline]
  fn name(&self) -> &'static str {
    self.name
  }

  #[inline]
  fn requires(&self) -> Caps {
    self.requires
  }
}

impl fmt::Debug for Engine {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Engine")
      .field("name", &self.name)
      .field("kind", &self.kind)
      .field("requires", &self.requires)
      .finish_non_exhaustive()
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Registry (per architecture)
// ─────────────────────────────────────────────────────────────────────────────

const SLICE8: Engine = Engine::new("portable/slice8", EngineKind::SliceBy8, Caps::NONE, portable::slice8);
const SLICE4: Engine = Engine::new("portable/slice4", EngineKind::SliceBy4, Caps::NONE, portable::slice4);
const SARWATE: Engine = Engine::new("portable/sarwate", EngineKind::Sarwate, Caps::NONE, portable::sarwate);
const BITWISE: Engine = Engine::new("reference/bitwise", EngineKind::Bitwise, Caps::NONE, bitwise::compute);

/// Fallback when nothing in [`ENGINES`] matches (unreachable in practice: the
/// list ends with portable engines).
pub(crate) static PORTABLE: Engine = SLICE8;

#[cfg(target_arch = "x86_64")]
pub(crate) static ENGINES: [Engine; 7] = {
  use platform::caps::x86;

  use crate::x86_64 as arch;

  [
    Engine::new(
      "x86_64/sse42-3way-pclmul",
      EngineKind::HardwareParallelClmul,
      x86::CRC32C_CLMUL_READY,
      arch::crc32c_sse42_3way_clmul_safe,
    ),
    Engine::new(
      "x86_64/sse42-3way",
      EngineKind::HardwareParallel,
      x86::CRC32C_READY,
      arch::crc32c_sse42_3way_safe,
    ),
    Engine::new("x86_64/sse42", EngineKind::Hardware, x86::CRC32C_READY, arch::crc32c_sse42_safe),
    SLICE8,
    SLICE4,
    SARWATE,
    BITWISE,
  ]
};

#[cfg(target_arch = "aarch64")]
pub(crate) static ENGINES: [Engine; 7] = {
  use platform::caps::aarch64;

  use crate::aarch64 as arch;

  [
    Engine::new(
      "aarch64/crc-3way-pmull",
      EngineKind::HardwareParallelClmul,
      aarch64::CRC_PMULL_READY,
      arch::crc32c_crc_3way_pmull_safe,
    ),
    Engine::new(
      "aarch64/crc-3way",
      EngineKind::HardwareParallel,
      aarch64::CRC_READY,
      arch::crc32c_crc_3way_safe,
    ),
    Engine::new("aarch64/crc", EngineKind::Hardware, aarch64::CRC_READY, arch::crc32c_crc_safe),
    SLICE8,
    SLICE4,
    SARWATE,
    BITWISE,
  ]
};

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
pub(crate) static ENGINES: [Engine; 4] = [SLICE8, SLICE4, SARWATE, BITWISE];

/// Engines in this build that can run on `caps`, best first.
#[inline]
pub(crate) fn supported(caps: Caps) -> impl Iterator<Item = &'static Engine> + Clone {
  ENGINES.iter().filter(move |e| e.is_supported(caps))
}

/// Engines in this build that can run on this machine, best first.
///
/// The last one is always the bit-serial reference engine.
///
/// ```
/// let data = b"123456789";
/// for engine in castagnoli::engines() {
///   let crc = castagnoli::crc32c_finish(engine.update(castagnoli::crc32c_init(), data));
///   assert_eq!(crc, 0xE306_9283, "{}", engine.name());
/// }
/// ```
#[inline]
pub fn engines() -> impl Iterator<Item = &'static Engine> + Clone {
  supported(platform::caps())
}

/// The engine of the given kind, if this machine can run it.
///
/// `EngineKind::Detector` is never returned here.
#[inline]
#[must_use]
pub fn engine(kind: EngineKind) -> Option<&'static Engine> {
  engines().find(|e| e.kind == kind)
}
