//! Process-wide engine selection.
//!
//! The dispatcher starts out pointing at [`DETECTOR`]. The detector's update
//! function installs [`detect_best_engine`]'s choice and forwards the call, so
//! the first checksum pays for detection once and every later call is an
//! atomic load plus an indirect call.

use backend::{Dispatcher, select};

use crate::{
  config,
  kernels::{self, Engine, EngineKind},
};

static DETECTOR: Engine = Engine::new("detector", EngineKind::Detector, platform::Caps::NONE, detect_and_update);

static DISPATCHER: Dispatcher<Engine> = Dispatcher::new(&DETECTOR, detect_best_engine);

fn detect_and_update(crc: u32, data: &[u8]) -> u32 {
  install().update(crc, data)
}

#[cold]
fn install() -> &'static Engine {
  let engine = DISPATCHER.install();
  #[cfg(feature = "log")]
  log::debug!("castagnoli: installed CRC-32C engine {} ({})", engine.name(), engine.kind());
  engine
}

/// The engine the dispatcher would install on this machine.
///
/// Honors `CASTAGNOLI_FORCE` (clamped to what the CPU supports), otherwise
/// picks the first supported engine in preference order:
/// carry-less parallel, shift-table parallel, single-stream hardware,
/// slicing-by-8, slicing-by-4, Sarwate, bitwise.
#[must_use]
pub fn detect_best_engine() -> &'static Engine {
  let cfg = config::get();
  if cfg.requested_force != cfg.effective_force {
    #[cfg(feature = "log")]
    log::warn!(
      "castagnoli: forced engine {} is not supported on this CPU, falling back to auto",
      cfg.requested_force.as_str()
    );
  }

  if let Some(engine) = cfg.effective_force.engine_kind().and_then(kernels::engine) {
    return engine;
  }
  select(platform::caps(), &kernels::ENGINES).unwrap_or(&kernels::PORTABLE)
}

/// The active engine, installing it first if no checksum has run yet.
#[inline]
#[must_use]
pub fn active_engine() -> &'static Engine {
  DISPATCHER.get()
}

/// Name of the active engine (diagnostics).
#[inline]
#[must_use]
pub fn backend_name() -> &'static str {
  active_engine().name()
}

/// Whether the detector has been replaced by a real engine.
#[inline]
#[must_use]
pub fn is_installed() -> bool {
  DISPATCHER.is_installed()
}

/// Advance a raw CRC register over `data` with the active engine.
#[inline]
#[must_use]
pub fn crc32c_update(crc: u32, data: &[u8]) -> u32 {
  DISPATCHER.current().update(crc, data)
}
