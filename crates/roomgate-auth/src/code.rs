//! Join-code generation.

use rand::Rng;
use roomgate_types::JoinCode;

/// Characters used in generated join codes.
///
/// Uppercase letters and digits minus the look-alikes (`0/O`, `1/I`), so
/// a code read aloud or copied from a screen survives the trip.
pub const JOIN_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Number of random symbols in a generated code (excluding the dash).
const CODE_SYMBOLS: usize = 8;

/// Generates a fresh join code such as `7K2P-9QXH`.
///
/// 32^8 ≈ 10^12 codes, so collisions are rare but possible; uniqueness is
/// enforced by the store, and the service regenerates on collision.
pub fn generate_join_code() -> JoinCode {
    let mut rng = rand::rng();
    let half = CODE_SYMBOLS / 2;

    let mut raw = String::with_capacity(CODE_SYMBOLS + 1);
    for i in 0..CODE_SYMBOLS {
        if i == half {
            raw.push('-');
        }
        let idx = rng.random_range(0..JOIN_CODE_ALPHABET.len());
        raw.push(JOIN_CODE_ALPHABET[idx] as char);
    }

    // Nine characters, all from the alphabet or '-': always parses.
    JoinCode::parse(&raw).expect("generated join code is valid")
}
