//! Passphrase envelopes: salt + sealed data in one value
//!
//! Text format: `{salt_hex}:{iv_hex}:{tag_hex}:{ciphertext_hex}`
//! - Salt: 16 bytes
//! - IV: 16 bytes
//! - Tag: 32 bytes
//! - Ciphertext: variable length, multiple of 16
//!
//! JSON format: an object with the same four fields, hex encoded.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

use crate::crypto::{
    derive_key, generate_salt, open, seal, DerivedKey, SealedData, SecretString, IV_LEN, SALT_LEN,
    TAG_LEN,
};
use crate::error::{CryptoError, Result};

/// Everything needed to later verify and decrypt a secret, minus the passphrase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Salt the key was derived with
    #[serde(with = "hex")]
    pub salt: [u8; SALT_LEN],
    /// CBC initialization vector
    #[serde(with = "hex")]
    pub iv: [u8; IV_LEN],
    /// HMAC-SHA256 over `iv ++ ciphertext`
    #[serde(with = "hex")]
    pub tag: [u8; TAG_LEN],
    /// AES-256-CBC ciphertext
    #[serde(with = "hex")]
    pub ciphertext: Vec<u8>,
}

impl std::fmt::Display for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            hex::encode(self.salt),
            hex::encode(self.iv),
            hex::encode(self.tag),
            hex::encode(&self.ciphertext)
        )
    }
}

fn decode_fixed<const N: usize>(field: &str, value: &str) -> Result<[u8; N]> {
    let bytes = hex::decode(value)
        .map_err(|e| CryptoError::invalid(format!("Invalid {} hex: {}", field, e)))?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| {
        CryptoError::invalid(format!(
            "Invalid {} length: expected {}, got {}",
            field, N, len
        ))
    })
}

impl Envelope {
    /// Combine a salt with the output of [`seal`]
    pub fn from_sealed(salt: [u8; SALT_LEN], sealed: SealedData) -> Self {
        Self {
            salt,
            iv: sealed.iv,
            tag: sealed.tag,
            ciphertext: sealed.ciphertext,
        }
    }

    /// Split back into salt and sealed data
    pub fn into_parts(self) -> ([u8; SALT_LEN], SealedData) {
        (
            self.salt,
            SealedData {
                iv: self.iv,
                ciphertext: self.ciphertext,
                tag: self.tag,
            },
        )
    }

    /// Seal under a fresh random salt
    pub fn seal_with_passphrase(plaintext: &str, passphrase: &str) -> Result<Self> {
        Self::seal_with_salt(plaintext, passphrase, generate_salt())
    }

    /// Seal under an existing salt (e.g. one shared by a password set)
    pub fn seal_with_salt(plaintext: &str, passphrase: &str, salt: [u8; SALT_LEN]) -> Result<Self> {
        if plaintext.is_empty() {
            return Err(CryptoError::invalid("plaintext must not be empty"));
        }
        let key = derive_key(passphrase, &salt)?;
        Self::seal_with_key(plaintext, &key, salt)
    }

    /// Seal with a key that was already derived from `salt`
    pub fn seal_with_key(plaintext: &str, key: &DerivedKey, salt: [u8; SALT_LEN]) -> Result<Self> {
        let sealed = seal(plaintext, key.as_bytes())?;
        debug!("Sealed envelope");
        Ok(Self::from_sealed(salt, sealed))
    }

    /// Derive the key from `passphrase` and this envelope's salt, then open
    pub fn open_with_passphrase(&self, passphrase: &str) -> Result<SecretString> {
        let key = derive_key(passphrase, &self.salt)?;
        self.open_with_key(&key)
    }

    /// Open with a key that was already derived from this envelope's salt
    pub fn open_with_key(&self, key: &DerivedKey) -> Result<SecretString> {
        open(&self.iv, &self.ciphertext, &self.tag, key.as_bytes())
    }

    /// Parse from the format: `{salt_hex}:{iv_hex}:{tag_hex}:{ciphertext_hex}`
    pub fn from_string(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        let [salt, iv, tag, ciphertext] = parts.as_slice() else {
            return Err(CryptoError::invalid(
                "Invalid envelope format: expected salt:iv:tag:ciphertext",
            ));
        };

        let ciphertext = hex::decode(ciphertext)
            .map_err(|e| CryptoError::invalid(format!("Invalid ciphertext hex: {}", e)))?;

        Ok(Self {
            salt: decode_fixed("salt", salt)?,
            iv: decode_fixed("IV", iv)?,
            tag: decode_fixed("tag", tag)?,
            ciphertext,
        })
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CryptoError::internal(format!("envelope serialization failed: {}", e)))
    }

    /// Parse from JSON
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s)
            .map_err(|e| CryptoError::invalid(format!("Invalid envelope JSON: {}", e)))
    }
}

impl FromStr for Envelope {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_string(s)
    }
}
