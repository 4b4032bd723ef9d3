use rand::rngs::OsRng;
use rand::RngCore;

/// 128 bits of randomness per token.
pub const TOKEN_BYTES: usize = 16;

/// Generates a fresh bearer token: `TOKEN_BYTES` from the operating system's
/// RNG, hex-encoded.
pub fn generate() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
