//! Password verification hook for password-protected rooms.
//!
//! Roomgate doesn't care how passwords are hashed. That choice belongs to
//! the deployment (Argon2, bcrypt, a KMS call, ...). The engine only needs
//! two things: turn a plaintext into something storable, and later check a
//! plaintext against what was stored. That is the [`PasswordVerifier`]
//! trait.
//!
//! # Why a trait?
//!
//! The service receives the verifier through its builder instead of
//! reaching for a process-wide encoder. This lets us:
//! - plug in a production-grade hasher without touching the engine
//! - use the cheap [`Sha256PasswordVerifier`] in tests and demos
//! - substitute a counting or failing verifier when testing edge cases

use rand::Rng;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Separator between the salt and the hash inside a stored digest.
const DIGEST_SEPARATOR: char = '$';

/// Hashes room passwords and verifies presented passwords against them.
///
/// # Trait bounds
///
/// - `Send + Sync`: one verifier is shared by every admission task.
/// - `'static`: it lives as long as the service that owns it.
///
/// Both methods are synchronous. Hashing is CPU-bound work, and keeping
/// it out of `async` makes the contract easy to implement.
///
/// # Example
///
/// ```rust
/// use roomgate_auth::PasswordVerifier;
///
/// /// Stores passwords reversed. Only for illustration!
/// struct ReversingVerifier;
///
/// impl PasswordVerifier for ReversingVerifier {
///     fn hash(&self, plain: &str) -> String {
///         plain.chars().rev().collect()
///     }
///
///     fn verify(&self, plain: &str, digest: &str) -> bool {
///         self.hash(plain) == digest
///     }
/// }
///
/// let v = ReversingVerifier;
/// let digest = v.hash("hunter2");
/// assert!(v.verify("hunter2", &digest));
/// assert!(!v.verify("hunter3", &digest));
/// ```
pub trait PasswordVerifier: Send + Sync + 'static {
    /// Produces a storable digest for `plain`.
    fn hash(&self, plain: &str) -> String;

    /// Returns `true` if `plain` is the password `digest` was made from.
    ///
    /// A malformed digest must yield `false`, never a panic.
    fn verify(&self, plain: &str, digest: &str) -> bool;
}

/// Salted SHA-256 verifier.
///
/// Digests look like `<salt-hex>$<sha256-hex>`, with a fresh 128-bit salt
/// per password. An optional pepper is mixed into every hash and never
/// stored alongside it. Comparison is constant-time.
#[derive(Debug, Clone, Default)]
pub struct Sha256PasswordVerifier {
    pepper: Option<String>,
}

impl Sha256PasswordVerifier {
    /// Creates a verifier without a pepper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a verifier that mixes `pepper` into every hash.
    ///
    /// Digests made with one pepper do not verify under another.
    pub fn with_pepper(pepper: impl Into<String>) -> Self {
        Self {
            pepper: Some(pepper.into()),
        }
    }

    fn digest_hex(&self, salt_hex: &str, plain: &str) -> String {
        let mut hasher = Sha256::new();
        if let Some(pepper) = &self.pepper {
            hasher.update(pepper.as_bytes());
            hasher.update(b":");
        }
        hasher.update(salt_hex.as_bytes());
        hasher.update(b":");
        hasher.update(plain.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl PasswordVerifier for Sha256PasswordVerifier {
    fn hash(&self, plain: &str) -> String {
        let salt_hex = generate_salt_hex();
        let hash = self.digest_hex(&salt_hex, plain);
        format!("{salt_hex}{DIGEST_SEPARATOR}{hash}")
    }

    fn verify(&self, plain: &str, digest: &str) -> bool {
        let Some((salt_hex, expected)) = digest.split_once(DIGEST_SEPARATOR)
        else {
            return false;
        };
        let got = self.digest_hex(salt_hex, plain);
        got.as_bytes().ct_eq(expected.as_bytes()).into()
    }
}

/// Generates a random 128-bit salt, hex-encoded.
fn generate_salt_hex() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();
    hex::encode(bytes)
}

// =========================================================================
// Tests
// =========================================================================
