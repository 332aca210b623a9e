//! Secrets for Roomgate: room passwords and join codes.
//!
//! 1. **Password verification**: the [`PasswordVerifier`] trait is the
//!    opaque `hash`/`verify` capability the admission engine consumes.
//!    [`Sha256PasswordVerifier`] is a salted reference implementation.
//! 2. **Join codes**: [`generate_join_code`] produces short, unambiguous
//!    codes such as `7K2P-9QXH` for users to share.
//!
//! # How it fits in the stack
//!
//! ```text
//! Service (roomgate)  ← hashes passwords on create, generates join codes
//!     ↕
//! Registry (roomgate-room)  ← verifies passwords during admission
//!     ↕
//! Auth (this crate)
//! ```

mod code;
mod verifier;

pub use code::{JOIN_CODE_ALPHABET, generate_join_code};
pub use verifier::{PasswordVerifier, Sha256PasswordVerifier};
