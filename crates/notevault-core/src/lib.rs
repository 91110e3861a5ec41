//! # notevault-core
//!
//! Password-based authenticated encryption for NoteVault notes:
//! - PBKDF2-HMAC-SHA256 key derivation (100,000 iterations)
//! - AES-256-CBC encryption with an HMAC-SHA256 tag over `iv ++ ciphertext`
//! - Tag verification before any decryption, in constant time
//! - Zeroize-on-drop keys and decrypted plaintext
//!
//! ```no_run
//! use notevault_core::{derive_key, generate_salt, open, seal};
//!
//! let salt = generate_salt();
//! let key = derive_key("correct horse", &salt)?;
//! let sealed = seal("hello world", key.as_bytes())?;
//! let plaintext = open(&sealed.iv, &sealed.ciphertext, &sealed.tag, key.as_bytes())?;
//! assert_eq!(plaintext.expose(), "hello world");
//! # Ok::<(), notevault_core::CryptoError>(())
//! ```

pub mod crypto;
pub mod envelope;
pub mod error;

pub use crypto::{
    derive_key, generate_salt, open, open_sealed, seal, DerivedKey, SealedData, SecretString,
    IV_LEN, KEY_LEN, PBKDF2_ITERATIONS, SALT_LEN, TAG_LEN,
};
pub use envelope::Envelope;
pub use error::{CryptoError, Result};
