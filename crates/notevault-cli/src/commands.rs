//! Subcommand implementations
//!
//! Key derivation is CPU-bound, so every command that derives a key runs it
//! on tokio's blocking pool.

use notevault_core::{Envelope, SecretString, SALT_LEN};
use tracing::{debug, info};

pub type CliResult<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Envelope encoding on stdin/stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `salt:iv:tag:ciphertext` hex
    Text,
    /// Pretty JSON object with hex fields
    Json,
}

/// clap value parser for `--salt`
pub fn parse_salt(s: &str) -> std::result::Result<[u8; SALT_LEN], String> {
    let bytes = hex::decode(s).map_err(|e| format!("invalid hex: {}", e))?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| format!("salt must be {} bytes, got {}", SALT_LEN, len))
}

/// Generate a new random salt, hex encoded
pub fn new_salt() -> String {
    hex::encode(notevault_core::generate_salt())
}

/// Seal `plaintext` and render the envelope
pub async fn seal(
    plaintext: SecretString,
    passphrase: SecretString,
    salt: Option<[u8; SALT_LEN]>,
    format: Format,
) -> CliResult<String> {
    let envelope = tokio::task::spawn_blocking(move || match salt {
        Some(salt) => {
            debug!("Sealing with caller-supplied salt");
            Envelope::seal_with_salt(plaintext.expose(), passphrase.expose(), salt)
        }
        None => Envelope::seal_with_passphrase(plaintext.expose(), passphrase.expose()),
    })
    .await??;

    info!(ciphertext_len = envelope.ciphertext.len(), "Sealed note");

    Ok(match format {
        Format::Text => envelope.to_string(),
        Format::Json => envelope.to_json()?,
    })
}

/// Parse an envelope and open it
pub async fn open(input: &str, passphrase: SecretString, format: Format) -> CliResult<SecretString> {
    let envelope = match format {
        Format::Text => Envelope::from_string(input)?,
        Format::Json => Envelope::from_json(input)?,
    };

    let plaintext =
        tokio::task::spawn_blocking(move || envelope.open_with_passphrase(passphrase.expose()))
            .await??;

    info!("Opened note");
    Ok(plaintext)
}
