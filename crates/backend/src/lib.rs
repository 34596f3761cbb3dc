//! Backend crate: kernel dispatch primitives for castagnoli.
//!
//! Algorithm crates describe their kernels with [`dispatch::Kernel`], order
//! them best-first, and publish the winner through a
//! [`dispatch::Dispatcher`]:
//!
//! ```ignore
//! use backend::dispatch::{Dispatcher, Kernel, select};
//!
//! fn detect_best() -> &'static Engine {
//!     select(platform::caps(), ENGINES).unwrap_or(&PORTABLE)
//! }
//!
//! static DISPATCHER: Dispatcher<Engine> = Dispatcher::new(&DETECTOR, detect_best);
//! ```
//!
//! Capabilities come from the `platform` crate, re-exported here.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod dispatch;

pub use dispatch::{Dispatcher, Kernel, select};
pub use platform;
pub use platform::Caps;
