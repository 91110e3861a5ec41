//! HMAC-SHA256 integrity tags over `iv ++ ciphertext`

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::TAG_LEN;
use crate::error::{CryptoError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Compute the tag for an IV and ciphertext under `key`.
///
/// The IV is authenticated along with the ciphertext, so flipping IV bits
/// is caught before decryption.
pub(crate) fn compute_tag(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<[u8; TAG_LEN]> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key)
        .map_err(|e| CryptoError::internal(format!("HMAC init failed: {}", e)))?;
    mac.update(iv);
    mac.update(ciphertext);
    Ok(mac.finalize().into_bytes().into())
}

/// Compare two tags without short-circuiting on the first differing byte.
///
/// Lengths are compared first; equal-length inputs are then inspected in
/// full by `subtle`.
pub(crate) fn tags_match(expected: &[u8], actual: &[u8]) -> bool {
    if expected.len() != actual.len() {
        return false;
    }
    expected.ct_eq(actual).into()
}
