//! Deterministic document identifiers.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Mask keeping the low 96 bits, i.e. 24 hex digits.
const OBJECT_ID_MASK: u128 = (1_u128 << 96) - 1;

/// Draw a 24-character lowercase hex identifier from the RNG.
pub(crate) fn object_id(rng: &mut ChaCha8Rng) -> String {
    let raw: u128 = rng.random();
    format!("{:024x}", raw & OBJECT_ID_MASK)
}
