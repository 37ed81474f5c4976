//! Environment abstraction for deterministic testing.
//!
//! The `Environment` trait decouples embedding logic from system resources
//! (time, randomness). This enables:
//!
//! - Deterministic Simulation: the harness provides a virtual clock and a
//!   seeded RNG, so a page run with the same seed produces the same secret
//!   and the same timer schedule.
//!
//! - Production Runtime: [`SystemEnv`](crate::SystemEnv) uses the OS clock
//!   and entropy pool without any change to the state machines.
//!
//! # Invariants
//!
//! - Monotonicity: `env.now()` must never go backwards
//! - Determinism: Given the same seed, `random_bytes()` produces the same
//!   sequence
//! - Isolation: Implementations must not share global state

use std::{fmt::Debug, future::Future, time::Duration};

use crate::error::EntropyError;

/// Abstract environment providing time, randomness, and a sleep primitive.
pub trait Environment: Clone + Send + Sync + 'static {
    /// Point in time on this environment's clock.
    type Instant: Copy + Ord + Debug + Send + Sync + 'static;

    /// Returns the current time.
    ///
    /// # Invariants
    ///
    /// - Monotonicity: subsequent calls return times >= previous calls.
    fn now(&self) -> Self::Instant;

    /// Instant `duration` after `instant` on this clock.
    fn advance(&self, instant: Self::Instant, duration: Duration) -> Self::Instant;

    /// Sleeps for the specified duration.
    ///
    /// Only driver code sleeps; the state machines never do.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;

    /// Fills the provided buffer with random bytes.
    ///
    /// # Security
    ///
    /// Production implementations MUST draw from the OS entropy pool and
    /// MUST return an error instead of filling the buffer with anything
    /// predictable. The session secret is derived from these bytes, and a
    /// script sharing the page must not be able to guess it.
    fn random_bytes(&self, buffer: &mut [u8]) -> Result<(), EntropyError>;
}
