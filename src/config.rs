// src/config.rs

//! Configuration types for the sliding limiter

// dependencies
use crate::errors::SlidingLimiterError;
use std::time::Duration;

/// Configuration for rate limiter behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlidingLimiterConfig {
    pub(crate) window: Duration,
    pub(crate) quota: u32,
}

impl SlidingLimiterConfig {
    /// Create a new configuration with window and quota settings
    pub fn new(window: Duration, quota: u32) -> Self {
        Self { window, quota }
    }

    /// Builder-style: set the trailing window duration
    pub fn window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Builder-style: set the maximum admissions per key per window
    pub fn quota(mut self, quota: u32) -> Self {
        self.quota = quota;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), SlidingLimiterError> {
        if self.window.is_zero() {
            return Err(SlidingLimiterError::InvalidWindow);
        }
        if self.quota == 0 {
            return Err(SlidingLimiterError::InvalidQuota);
        }
        Ok(())
    }
}

impl Default for SlidingLimiterConfig {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 10)
    }
}
