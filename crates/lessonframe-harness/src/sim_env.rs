//! Simulated environment: virtual clock and seeded randomness.

use std::{
    future::Future,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use lessonframe_core::{EntropyError, Environment};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A point on the virtual clock, measured from the start of the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SimInstant(Duration);

impl SimInstant {
    /// Time elapsed since the simulation started.
    pub fn since_start(self) -> Duration {
        self.0
    }
}

/// Deterministic environment for simulation.
///
/// Clones share the clock and the RNG, so every component of one simulated
/// page observes the same time and draws from the same random stream.
///
/// # Determinism
///
/// Two environments built with the same seed produce identical
/// `random_bytes` sequences. Time only moves through [`SimEnv::advance_time`]
/// or [`Environment::sleep`].
#[derive(Debug, Clone)]
pub struct SimEnv {
    clock: Arc<Mutex<Duration>>,
    rng: Arc<Mutex<ChaCha8Rng>>,
}

impl SimEnv {
    /// Environment at time zero with an RNG seeded from `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            clock: Arc::new(Mutex::new(Duration::ZERO)),
            rng: Arc::new(Mutex::new(ChaCha8Rng::seed_from_u64(seed))),
        }
    }

    /// Move the clock forward.
    pub fn advance_time(&self, duration: Duration) {
        let mut clock = self.clock.lock().unwrap_or_else(PoisonError::into_inner);
        *clock += duration;
    }

    /// Move the clock to `instant` if it lies in the future.
    pub fn advance_to(&self, instant: SimInstant) {
        let mut clock = self.clock.lock().unwrap_or_else(PoisonError::into_inner);
        if instant.0 > *clock {
            *clock = instant.0;
        }
    }
}

impl Default for SimEnv {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl Environment for SimEnv {
    type Instant = SimInstant;

    fn now(&self) -> SimInstant {
        SimInstant(*self.clock.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn advance(&self, instant: SimInstant, duration: Duration) -> SimInstant {
        SimInstant(instant.0.saturating_add(duration))
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        self.advance_time(duration);
        std::future::ready(())
    }

    fn random_bytes(&self, buffer: &mut [u8]) -> Result<(), EntropyError> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner).fill_bytes(buffer);
        Ok(())
    }
}
