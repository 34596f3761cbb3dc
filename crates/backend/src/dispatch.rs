//! Kernel dispatch: selection and one-time installation.
//!
//! - [`Kernel`]: something with a name and capability requirements
//! - [`select`]: choose the best kernel from an ordered candidate list
//! - [`Dispatcher`]: a process-wide, write-once pointer to the active kernel
//!
//! # Design
//!
//! A [`Dispatcher`] starts out pointing at a *detector* kernel. The detector
//! is a real kernel whose entry point asks the dispatcher to [`install`]
//! the best kernel for this machine and then forwards the call. Installation
//! is a single compare-and-swap away from the detector, so racing threads all
//! end up with the same kernel and the pointer never changes again.
//!
//! ```ignore
//! static DISPATCHER: Dispatcher<Engine> = Dispatcher::new(&DETECTOR, detect_best_engine);
//!
//! fn update(crc: u32, data: &[u8]) -> u32 {
//!     DISPATCHER.current().update(crc, data)
//! }
//! ```
//!
//! [`install`]: Dispatcher::install

use core::{
  fmt,
  ptr,
  sync::atomic::{AtomicPtr, Ordering},
};

use platform::Caps;

// ─────────────────────────────────────────────────────────────────────────────
// Selection
// ─────────────────────────────────────────────────────────────────────────────

/// A kernel that can be chosen by capability.
pub trait Kernel {
  /// Human-readable name for diagnostics (e.g., "x86_64/sse42-3way").
  fn name(&self) -> &'static str;

  /// Required CPU capabilities. Must be a subset of detected caps.
  fn requires(&self) -> Caps;

  /// Whether this kernel can run on a machine with `caps`.
  #[inline]
  fn is_supported(&self, caps: Caps) -> bool {
    caps.has(self.requires())
  }
}

/// Select the best kernel from a candidate list.
///
/// Candidates are ordered from best to worst; the first one whose
/// requirements are satisfied by `caps` wins. Returns `None` only when the
/// list has no portable fallback.
#[inline]
#[must_use]
pub fn select<K: Kernel>(caps: Caps, candidates: &[K]) -> Option<&K> {
  candidates.iter().find(|k| k.is_supported(caps))
}

// ─────────────────────────────────────────────────────────────────────────────
// Dispatcher
// ─────────────────────────────────────────────────────────────────────────────

/// Write-once, process-wide pointer to the active kernel.
///
/// Reads are a single `Acquire` load. The only write is the compare-and-swap
/// from the detector to the selected kernel.
pub struct Dispatcher<T: 'static> {
  active: AtomicPtr<T>,
  detector: &'static T,
  selector: fn() -> &'static T,
}

impl<T: 'static> Dispatcher<T> {
  /// Create a dispatcher whose initial active kernel is `detector`.
  ///
  /// `selector` runs (at least once, possibly once per racing thread) when
  /// the detector asks for installation. It must be deterministic and must
  /// not return `detector`.
  #[must_use]
  pub const fn new(detector: &'static T, selector: fn() -> &'static T) -> Self {
    Self {
      active: AtomicPtr::new(ptr::from_ref(detector).cast_mut()),
      detector,
      selector,
    }
  }

  /// The currently active kernel, without triggering installation.
  ///
  /// Before the first installation this is the detector.
  #[inline]
  #[must_use]
  #[allow(unsafe_code)]
  pub fn current(&self) -> &'static T {
    let p = self.active.load(Ordering::Acquire);
    // SAFETY: `active` only ever holds pointers derived from `&'static T`
    // (the detector, or a value returned by the selector).
    unsafe { &*p }
  }

  /// The active kernel, installing the selected one first if needed.
  #[inline]
  #[must_use]
  pub fn get(&self) -> &'static T {
    let current = self.current();
    if ptr::eq(current, self.detector) {
      self.install()
    } else {
      current
    }
  }

  /// Run the selector and try to replace the detector with its choice.
  ///
  /// Returns whichever kernel ended up installed: ours if we won the
  /// compare-and-swap, the winner's otherwise.
  #[cold]
  #[allow(unsafe_code)]
  pub fn install(&self) -> &'static T {
    let chosen = (self.selector)();
    let expected = ptr::from_ref(self.detector).cast_mut();
    match self.active.compare_exchange(
      expected,
      ptr::from_ref(chosen).cast_mut(),
      Ordering::AcqRel,
      Ordering::Acquire,
    ) {
      Ok(_) => chosen,
      // SAFETY: see `current`.
      Err(winner) => unsafe { &*winner },
    }
  }

  /// Whether the detector has been replaced.
  #[inline]
  #[must_use]
  pub fn is_installed(&self) -> bool {
    !ptr::eq(self.active.load(Ordering::Acquire), self.detector)
  }

  /// The detector this dispatcher was created with.
  #[inline]
  #[must_use]
  pub fn detector(&self) -> &'static T {
    self.detector
  }
}

impl<T: Kernel + 'static> fmt::Debug for Dispatcher<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Dispatcher")
      .field("active", &self.current().name())
      .field("installed", &self.is_installed())
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use core::sync::atomic::AtomicUsize;

  use platform::caps::x86;

  use super::*;

  #[derive(Debug, PartialEq)]
  struct K {
    name: &'static str,
    requires: Caps,
  }

  impl Kernel for K {
    fn name(&self) -> &'static str {
      self.name
    }

    fn requires(&self) -> Caps {
      self.requires
    }
  }

  static DETECT: K = K {
    name: "detect",
    requires: Caps::NONE,
  };
  static FAST: K = K {
    name: "fast",
    requires: x86::CRC32C_READY,
  };
  static PORTABLE: K = K {
    name: "portable",
    requires: Caps::NONE,
  };

  #[test]
  fn select_first_supported() {
    let list = [
      K { name: "clmul", requires: x86::CRC32C_CLMUL_READY },
      K { name: "hw", requires: x86::CRC32C_READY },
      K { name: "portable", requires: Caps::NONE },
    ];
    assert_eq!(select(Caps::NONE, &list).map(Kernel::name), Some("portable"));
    assert_eq!(select(x86::SSE42, &list).map(Kernel::name), Some("hw"));
    assert_eq!(select(x86::CRC32C_CLMUL_READY, &list).map(Kernel::name), Some("clmul"));
  }

  #[test]
  fn select_without_fallback_is_none() {
    let list = [K { name: "hw", requires: x86::CRC32C_READY }];
    assert!(select(Caps::NONE, &list).is_none());
  }

  #[test]
  fn install_is_write_once() {
    static CALLS: AtomicUsize = AtomicUsize::new(0);
    fn pick() -> &'static K {
      if CALLS.fetch_add(1, Ordering::Relaxed) == 0 { &FAST } else { &PORTABLE }
    }
    static D: Dispatcher<K> = Dispatcher::new(&DETECT, pick);

    assert!(!D.is_installed());
    assert!(ptr::eq(D.current(), &DETECT));
    assert!(ptr::eq(D.get(), &FAST));
    assert!(D.is_installed());

    // A second install runs the selector again but cannot displace the winner.
    assert!(ptr::eq(D.install(), &FAST));
    assert!(ptr::eq(D.get(), &FAST));
    assert_eq!(CALLS.load(Ordering::Relaxed), 2);
  }

  #[cfg(feature = "std")]
  #[test]
  fn concurrent_install_converges() {
    use std::{sync::Barrier, thread, vec::Vec};

    fn pick() -> &'static K {
      &PORTABLE
    }
    static D: Dispatcher<K> = Dispatcher::new(&DETECT, pick);

    let barrier = Barrier::new(8);
    let seen: Vec<&'static K> = thread::scope(|s| {
      let handles: Vec<_> = (0..8)
        .map(|_| {
          s.spawn(|| {
            barrier.wait();
            D.get()
          })
        })
        .collect();
      handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(seen.iter().all(|k| ptr::eq(*k, &PORTABLE)));
  }
}
