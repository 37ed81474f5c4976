//! Per-page session secret.
//!
//! One secret is generated when the page bootstraps and shared by every frame
//! created during that page load. It is written into each frame's location
//! fragment and nowhere else: the embedded lesson compares it against
//! messages it receives, so code elsewhere on the host page cannot forge
//! requests that appear to come from this embedding session.

use std::fmt;

use crate::{env::Environment, error::EntropyError};

/// Length of the secret generated at page bootstrap.
pub const SECRET_LENGTH: usize = 64;

/// Symbols a secret is drawn from.
pub const SECRET_ALPHABET: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Random bytes at or above this value are rejected so that every symbol is
/// equally likely (234 is the largest multiple of 26 not above 256).
const REJECTION_LIMIT: u8 = 234;

/// A session secret.
///
/// # Security
///
/// - **Debug Redaction**: `Debug` prints only the length.
/// - No `Display`: callers must ask for [`SessionSecret::expose`].
#[derive(Clone, PartialEq, Eq)]
pub struct SessionSecret(String);

impl SessionSecret {
    /// The secret characters.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Number of characters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for a zero-length secret.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SessionSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionSecret(<redacted {} chars>)", self.0.len())
    }
}

/// Produces session secrets from an [`Environment`]'s randomness.
pub struct SecretGenerator;

impl SecretGenerator {
    /// Generate a secret of `length` characters, each drawn independently
    /// and uniformly from [`SECRET_ALPHABET`].
    ///
    /// # Errors
    ///
    /// Returns the environment's `EntropyError`; no partial or fallback
    /// secret is ever produced.
    pub fn generate<E: Environment>(
        env: &E,
        length: usize,
    ) -> Result<SessionSecret, EntropyError> {
        let mut secret = String::with_capacity(length);
        let mut bytes = [0u8; SECRET_LENGTH];

        while secret.len() < length {
            env.random_bytes(&mut bytes)?;
            for &byte in bytes.iter().filter(|&&b| b < REJECTION_LIMIT) {
                if secret.len() == length {
                    break;
                }
                let index = usize::from(byte) % SECRET_ALPHABET.len();
                secret.push(char::from(SECRET_ALPHABET[index]));
            }
        }

        Ok(SessionSecret(secret))
    }
}
