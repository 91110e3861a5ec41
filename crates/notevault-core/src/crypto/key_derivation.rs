//! Password-based key derivation using PBKDF2-HMAC-SHA256

use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;
use tracing::debug;
use zeroize::Zeroize;

use super::{DerivedKey, KEY_LEN, SALT_LEN};
use crate::error::{CryptoError, Result};

/// PBKDF2 iteration count.
///
/// Envelopes carry no iteration field, so changing this breaks every stored
/// envelope.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Generate a cryptographically secure random salt
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Derive a 256-bit key from a passphrase using PBKDF2-HMAC-SHA256
///
/// # Arguments
/// * `passphrase` - The user's passphrase (must be non-empty)
/// * `salt` - Exactly 16 bytes (use `generate_salt()` to create one)
///
/// # Returns
/// A 32-byte key suitable for [`seal`](super::seal) and [`open`](super::open)
///
/// This is deliberately slow. Call it off any interactive thread.
pub fn derive_key(passphrase: &str, salt: &[u8]) -> Result<DerivedKey> {
    if passphrase.is_empty() {
        return Err(CryptoError::invalid("passphrase must not be empty"));
    }
    if salt.len() != SALT_LEN {
        return Err(CryptoError::invalid(format!(
            "salt must be {} bytes, got {}",
            SALT_LEN,
            salt.len()
        )));
    }

    debug!(iterations = PBKDF2_ITERATIONS, "Deriving key from passphrase");

    let mut key_bytes = [0u8; KEY_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(
        passphrase.as_bytes(),
        salt,
        PBKDF2_ITERATIONS,
        &mut key_bytes,
    );

    // `DerivedKey::new` copies; clear the stack copy
    let key = DerivedKey::new(key_bytes);
    key_bytes.zeroize();

    Ok(key)
}
