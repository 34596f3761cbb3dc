//! Error types for checksum operations.
//!
//! Computing a checksum cannot fail. Comparing one against a stored value
//! can, and [`MismatchError`] reports both sides so the caller can log them.

use core::fmt;

/// A computed checksum did not match the expected value.
///
/// # Examples
///
/// ```
/// use traits::MismatchError;
///
/// fn check(computed: u32, stored: u32) -> Result<(), MismatchError<u32>> {
///   if computed == stored { Ok(()) } else { Err(MismatchError::new(stored, computed)) }
/// }
///
/// let err = check(0xE306_9283, 0).unwrap_err();
/// assert_eq!(err.actual(), 0xE306_9283);
/// assert_eq!(err.to_string(), "checksum mismatch: expected 0x00000000, got 0xe3069283");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct MismatchError<T> {
  expected: T,
  actual: T,
}

impl<T: Copy> MismatchError<T> {
  /// Create a new mismatch error.
  #[inline]
  #[must_use]
  pub const fn new(expected: T, actual: T) -> Self {
    Self { expected, actual }
  }

  /// The value the caller expected.
  #[inline]
  #[must_use]
  pub const fn expected(&self) -> T {
    self.expected
  }

  /// The value that was computed.
  #[inline]
  #[must_use]
  pub const fn actual(&self) -> T {
    self.actual
  }
}

impl<T: fmt::LowerHex> fmt::Display for MismatchError<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let width = 2 + 2 * core::mem::size_of::<T>();
    write!(
      f,
      "checksum mismatch: expected {:#0width$x}, got {:#0width$x}",
      self.expected, self.actual
    )
  }
}

impl<T: fmt::Debug + fmt::LowerHex> core::error::Error for MismatchError<T> {}
