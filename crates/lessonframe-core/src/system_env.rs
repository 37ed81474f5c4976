//! Production Environment implementation using system time and RNG.

use std::time::{Duration, Instant};

use crate::{env::Environment, error::EntropyError};

/// Production environment using system time and OS randomness.
///
/// This implementation:
/// - Uses `std::time::Instant::now()` for time
/// - Uses `tokio::time::sleep()` for async sleeping
/// - Uses `getrandom` for randomness
#[derive(Debug, Clone, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn advance(&self, instant: Instant, duration: Duration) -> Instant {
        instant + duration
    }

    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }

    fn random_bytes(&self, buffer: &mut [u8]) -> Result<(), EntropyError> {
        getrandom::fill(buffer).map_err(|e| {
            tracing::error!("getrandom failed: {}", e);
            EntropyError { reason: e.to_string() }
        })
    }
}
