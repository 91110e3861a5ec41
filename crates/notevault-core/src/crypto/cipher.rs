//! AES-256-CBC encryption authenticated with HMAC-SHA256 (encrypt-then-MAC)
//!
//! Sealed data layout:
//! - IV: 16 bytes, random per seal
//! - Ciphertext: PKCS#7 padded, a multiple of 16 bytes
//! - Tag: 32 bytes, HMAC-SHA256 over `iv ++ ciphertext`

use aes::Aes256;
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::{rngs::OsRng, RngCore};
use tracing::{debug, warn};
use zeroize::{Zeroize, Zeroizing};

use super::mac::{compute_tag, tags_match};
use super::{SecretString, BLOCK_LEN, IV_LEN, KEY_LEN, TAG_LEN};
use crate::error::{CryptoError, Result};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Output of [`seal`]: IV, ciphertext, and tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedData {
    /// Initialization vector (16 bytes, not secret)
    pub iv: [u8; IV_LEN],
    /// Encrypted, padded plaintext
    pub ciphertext: Vec<u8>,
    /// HMAC-SHA256 over `iv ++ ciphertext`
    pub tag: [u8; TAG_LEN],
}

fn check_key(key: &[u8]) -> Result<()> {
    if key.len() != KEY_LEN {
        return Err(CryptoError::invalid(format!(
            "key must be {} bytes, got {}",
            KEY_LEN,
            key.len()
        )));
    }
    Ok(())
}

/// Encrypt and authenticate plaintext
///
/// # Arguments
/// * `plaintext` - Non-empty text to protect
/// * `key` - The 32-byte derived key
///
/// # Returns
/// A fresh random IV, the ciphertext, and the tag. The caller persists all
/// three together with the salt the key was derived from.
pub fn seal(plaintext: &str, key: &[u8]) -> Result<SealedData> {
    if plaintext.is_empty() {
        return Err(CryptoError::invalid("plaintext must not be empty"));
    }
    check_key(key)?;

    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);

    seal_with_iv(plaintext.as_bytes(), key, iv)
}

/// Validated-input core of [`seal`], with the IV supplied.
pub(crate) fn seal_with_iv(plaintext: &[u8], key: &[u8], iv: [u8; IV_LEN]) -> Result<SealedData> {
    let ciphertext = Aes256CbcEnc::new_from_slices(key, &iv)
        .map_err(|e| CryptoError::internal(format!("cipher init failed: {}", e)))?
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let tag = compute_tag(key, &iv, &ciphertext)?;

    debug!(ciphertext_len = ciphertext.len(), "Sealed plaintext");

    Ok(SealedData {
        iv,
        ciphertext,
        tag,
    })
}

/// Verify and decrypt
///
/// The tag is checked over `iv ++ ciphertext` before any decryption takes
/// place. A mismatch is reported as [`CryptoError::AuthenticationFailed`]
/// whether it comes from tampering or from a wrong key.
///
/// # Arguments
/// * `iv` - The 16-byte IV returned by [`seal`]
/// * `ciphertext` - The ciphertext returned by [`seal`]
/// * `tag` - The 32-byte tag returned by [`seal`]
/// * `key` - The 32-byte derived key
pub fn open(iv: &[u8], ciphertext: &[u8], tag: &[u8], key: &[u8]) -> Result<SecretString> {
    if iv.len() != IV_LEN {
        return Err(CryptoError::invalid(format!(
            "iv must be {} bytes, got {}",
            IV_LEN,
            iv.len()
        )));
    }
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
        return Err(CryptoError::invalid(format!(
            "ciphertext must be a non-empty multiple of {} bytes, got {}",
            BLOCK_LEN,
            ciphertext.len()
        )));
    }
    if tag.len() != TAG_LEN {
        return Err(CryptoError::invalid(format!(
            "tag must be {} bytes, got {}",
            TAG_LEN,
            tag.len()
        )));
    }
    check_key(key)?;

    let expected = compute_tag(key, iv, ciphertext)?;
    if !tags_match(&expected, tag) {
        warn!("Tag verification failed");
        return Err(CryptoError::AuthenticationFailed);
    }

    // Past this point the ciphertext is authentic, so any failure below is
    // an internal fault rather than an oracle.
    let mut plaintext = Zeroizing::new(
        Aes256CbcDec::new_from_slices(key, iv)
            .map_err(|e| CryptoError::internal(format!("cipher init failed: {}", e)))?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| CryptoError::internal("invalid padding after tag verification"))?,
    );

    let text = String::from_utf8(std::mem::take(&mut *plaintext)).map_err(|e| {
        e.into_bytes().zeroize();
        CryptoError::internal("plaintext is not valid UTF-8")
    })?;

    Ok(SecretString::new(text))
}

/// Open a [`SealedData`] produced by [`seal`]
pub fn open_sealed(sealed: &SealedData, key: &[u8]) -> Result<SecretString> {
    open(&sealed.iv, &sealed.ciphertext, &sealed.tag, key)
}
