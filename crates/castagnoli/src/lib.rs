//! CRC-32C (Castagnoli) with hardware acceleration.
//!
//! Reflected polynomial `0x82F63B78`, initial value and final XOR
//! `0xFFFF_FFFF`. Used by iSCSI, SCTP, ext4, Btrfs and most storage formats.
//!
//! # Engines
//!
//! | Kind | Technique |
//! |------|-----------|
//! | `HardwareParallelClmul` | 3 hardware streams, carry-less multiply combine |
//! | `HardwareParallel` | 3 hardware streams, zero-padding shift-table combine |
//! | `Hardware` | SSE4.2 `crc32` / ARMv8 `crc32c*`, one stream |
//! | `SliceBy8`, `SliceBy4`, `Sarwate` | table-driven, portable |
//! | `Bitwise` | bit-serial reference |
//!
//! The best engine the CPU supports is chosen on the first call and installed
//! process-wide; `CASTAGNOLI_FORCE` pins a specific one (see [`config`]).
//!
//! # Example
//!
//! ```rust
//! use castagnoli::{Crc32c, crc32c_finish, crc32c_init, crc32c_update};
//!
//! let data = b"123456789";
//!
//! // Raw register interface
//! let state = crc32c_update(crc32c_init(), &data[..4]);
//! let state = crc32c_update(state, &data[4..]);
//! assert_eq!(crc32c_finish(state), 0xE306_9283);
//!
//! // One shot
//! assert_eq!(castagnoli::crc32c(data), 0xE306_9283);
//!
//! // Streaming + combine
//! let (a, b) = data.split_at(4);
//! let crc = castagnoli::combine(Crc32c::checksum(a), Crc32c::checksum(b), b.len());
//! assert_eq!(crc, 0xE306_9283);
//! ```
//!
//! # no_std Support
//!
//! Disable the `std` feature for embedded use; engine selection then relies
//! on compile-time target features only.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod bitwise;
pub mod clmul;
pub mod config;
mod dispatch;
pub mod gf2;
mod hasher;
mod kernels;
#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
mod parallel;
pub mod portable;
pub mod shift;
mod tables;

#[cfg(target_arch = "aarch64")]
mod aarch64;
#[cfg(target_arch = "x86_64")]
mod x86_64;

#[cfg(test)]
mod proptests;

pub use dispatch::{active_engine, backend_name, crc32c_update, detect_best_engine, is_installed};
pub use hasher::Crc32c;
pub use kernels::{Engine, EngineKind, engine, engines};
pub use platform::Caps;
pub use traits::{Checksum, ChecksumCombine, MismatchError};

/// Reflected CRC-32C polynomial.
pub const POLYNOMIAL: u32 = 0x82F6_3B78;

/// Register value before the first byte.
pub const INIT: u32 = 0xFFFF_FFFF;

/// Final XOR applied by [`crc32c_finish`].
pub const XOROUT: u32 = 0xFFFF_FFFF;

/// Register value to start a new message with.
#[inline]
#[must_use]
pub const fn crc32c_init() -> u32 {
  INIT
}

/// Finalize a register into a checksum. Apply exactly once per message.
#[inline]
#[must_use]
pub const fn crc32c_finish(state: u32) -> u32 {
  state ^ XOROUT
}

/// CRC-32C of `data`.
#[inline]
#[must_use]
pub fn crc32c(data: &[u8]) -> u32 {
  crc32c_finish(crc32c_update(INIT, data))
}

/// `crc(A || B)` from finalized `crc(A)`, `crc(B)` and `len(B)`.
#[inline]
#[must_use]
pub const fn combine(crc_a: u32, crc_b: u32, len_b: usize) -> u32 {
  gf2::combine(crc_a, crc_b, len_b)
}
