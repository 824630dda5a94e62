//! Revision set sizing.

use std::fmt;

/// Questions drawn when the caller does not ask for a specific count.
pub const DEFAULT_SAMPLE_SIZE: usize = 5;

/// Error returned when a requested sample size is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZeroSampleSizeError;

impl fmt::Display for ZeroSampleSizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "count must be at least 1")
    }
}

impl std::error::Error for ZeroSampleSizeError {}

/// Number of questions to draw for a revision set; never zero.
///
/// A size larger than the stored set simply yields every question.
///
/// # Examples
/// ```
/// use revision_tracker::domain::SampleSize;
///
/// assert_eq!(SampleSize::default().get(), 5);
/// assert_eq!(SampleSize::new(3).unwrap().get(), 3);
/// assert_eq!(SampleSize::new(10_000).unwrap().get(), 10_000);
/// assert!(SampleSize::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleSize(usize);

impl SampleSize {
    /// Accept any positive count.
    pub fn new(count: usize) -> Result<Self, ZeroSampleSizeError> {
        if count == 0 {
            return Err(ZeroSampleSizeError);
        }
        Ok(Self(count))
    }

    /// Requested number of questions.
    #[must_use]
    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for SampleSize {
    fn default() -> Self {
        Self(DEFAULT_SAMPLE_SIZE)
    }
}
