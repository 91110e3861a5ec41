//! Key and plaintext buffers that wipe themselves on drop

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::KEY_LEN;

/// Output of [`derive_key`](super::derive_key)
///
/// Lives for one seal/open call and is never persisted. Pass it on with
/// [`DerivedKey::as_bytes`].
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LEN],
}

impl DerivedKey {
    /// Wrap freshly derived key bytes
    pub fn new(key: [u8; KEY_LEN]) -> Self {
        Self { key }
    }

    /// Raw key bytes for [`seal`](super::seal) and [`open`](super::open)
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey(..)")
    }
}

/// Plaintext returned by [`open`](super::open)
///
/// No `PartialEq`: compare through [`SecretString::expose`] when a test
/// needs to.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    pub fn new(value: String) -> Self {
        Self { value }
    }

    /// Borrow the plaintext; the buffer is wiped when `self` drops
    pub fn expose(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretString({} bytes)", self.value.len())
    }
}
