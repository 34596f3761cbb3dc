//! CPU capability detection for the castagnoli workspace.
//!
//! This crate is the single source of truth for "which CRC-32C instructions
//! can run here". Engine crates query [`caps()`] instead of doing ad-hoc
//! detection.
//!
//! ```ignore
//! use platform::caps::x86;
//!
//! if platform::caps().has(x86::CRC32C_READY) {
//!     // hardware CRC-32C path
//! }
//! ```
//!
//! 1. Compile-time features are folded in via `cfg!`, so `-C target-cpu=native` builds detect
//!    everything without runtime probing.
//! 2. Runtime detection is cached in `OnceLock` (std) or atomics (no_std).
//! 3. Under Miri, always returns portable-only caps.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod caps;
mod detect;

pub use caps::Caps;
pub use detect::{compile_time, detect_uncached};

/// Detected CPU capabilities.
///
/// - With `std`: compile-time plus runtime detection, cached in a `OnceLock`.
/// - Without `std`: compile-time features only, cached in atomics.
#[inline]
#[must_use]
pub fn caps() -> Caps {
  detect::caps()
}
