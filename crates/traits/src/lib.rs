//! Core checksum traits for castagnoli.
//!
//! `no_std` compatible, zero dependencies.
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`Checksum`] | Streaming and one-shot checksums, verification |
//! | [`ChecksumCombine`] | O(log n) combination of independently computed checksums |
//!
//! # Error Types
//!
//! - [`MismatchError`] - A checksum did not match its stored value
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod checksum;
pub mod error;

pub use checksum::{Checksum, ChecksumCombine};
pub use error::MismatchError;
