// Declare modules at the root level
pub mod error;
pub mod filter;
pub mod readings;
pub mod report;
pub mod resample;
pub mod source;
pub mod stats;
pub mod summary;
pub mod time;
pub mod validators;

// Test utilities module (available in test and integration test builds)
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export everything under a shared namespace for external access
pub mod shared {
    pub use super::error;
    pub use super::filter;
    pub use super::readings;
    pub use super::report;
    pub use super::resample;
    pub use super::source;
    pub use super::stats;
    pub use super::summary;
    pub use super::time;
    pub use super::validators;
}

// Also re-export at root for convenience
pub use error::*;
pub use filter::*;
pub use readings::*;
pub use report::*;
pub use resample::*;
pub use source::*;
pub use stats::*;
pub use summary::*;
pub use time::*;
pub use validators::*;
