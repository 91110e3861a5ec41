//! Cryptographic primitives for passphrase-protected notes
//!
//! This module provides:
//! - PBKDF2-HMAC-SHA256 key derivation from passphrases
//! - AES-256-CBC encryption with an HMAC-SHA256 tag (encrypt-then-MAC)
//! - Secure memory handling with zeroize
//!
//! All functions are stateless and safe to call from any number of threads.

mod cipher;
mod key_derivation;
mod mac;
mod secure_memory;

pub use cipher::{open, open_sealed, seal, SealedData};
pub use key_derivation::{derive_key, generate_salt, PBKDF2_ITERATIONS};
pub use secure_memory::{DerivedKey, SecretString};

/// Salt length in bytes
pub const SALT_LEN: usize = 16;
/// Derived key length in bytes (AES-256 and HMAC-SHA256 share it)
pub const KEY_LEN: usize = 32;
/// CBC initialization vector length in bytes
pub const IV_LEN: usize = 16;
/// HMAC-SHA256 tag length in bytes
pub const TAG_LEN: usize = 32;
/// AES block length in bytes
pub const BLOCK_LEN: usize = 16;
