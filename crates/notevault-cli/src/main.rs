//! NoteVault CLI - seal and open notes with a passphrase
//!
//! Envelopes are written to stdout and read from stdin, so the tool composes
//! with pipes and files. Logs go to stderr.

mod commands;

use clap::{Parser, Subcommand};
use std::io::Read;

use commands::{CliResult, Format};
use notevault_core::{SecretString, SALT_LEN};

/// NoteVault - passphrase-based note encryption
#[derive(Parser, Debug)]
#[command(name = "notevault")]
#[command(version)]
#[command(about = "Seal and open notes with AES-256-CBC + HMAC-SHA256 envelopes")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Read and write envelopes as JSON instead of `salt:iv:tag:ciphertext`
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a new random 16-byte salt as hex
    Salt,

    /// Encrypt a note (from the argument, or stdin if omitted)
    ///
    /// One trailing newline is dropped from stdin, so `echo note | notevault seal`
    /// seals `note`.
    Seal {
        /// Note text
        text: Option<String>,

        /// Passphrase used to derive the key
        #[arg(long, env = "NOTEVAULT_PASSPHRASE", hide_env_values = true)]
        passphrase: String,

        /// Reuse an existing salt (hex) instead of generating one
        #[arg(long, value_parser = commands::parse_salt)]
        salt: Option<[u8; SALT_LEN]>,
    },

    /// Verify and decrypt an envelope (from the argument, or stdin if omitted)
    Open {
        /// Envelope
        envelope: Option<String>,

        /// Passphrase used to derive the key
        #[arg(long, env = "NOTEVAULT_PASSPHRASE", hide_env_values = true)]
        passphrase: String,
    },
}

fn read_input(arg: Option<String>) -> CliResult<String> {
    match arg {
        Some(value) => Ok(value),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(strip_trailing_newline(buf))
        }
    }
}

/// Drop one `\n` or `\r\n` left by `echo` or a text editor
fn strip_trailing_newline(mut s: String) -> String {
    if s.ends_with('\n') {
        s.pop();
        if s.ends_with('\r') {
            s.pop();
        }
    }
    s
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let args = Args::parse();

    // Initialize logging on stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let format = if args.json { Format::Json } else { Format::Text };

    // Each arm moves the passphrase `String` into a `SecretString` before
    // doing anything else. Copies made inside clap while parsing are not
    // reachable from here and are not wiped.

    match args.command {
        Command::Salt => println!("{}", commands::new_salt()),
        Command::Seal {
            text,
            passphrase,
            salt,
        } => {
            let passphrase = SecretString::new(passphrase);
            let plaintext = SecretString::new(read_input(text)?);
            let envelope = commands::seal(plaintext, passphrase, salt, format).await?;
            println!("{}", envelope);
        }
        Command::Open {
            envelope,
            passphrase,
        } => {
            let passphrase = SecretString::new(passphrase);
            let input = read_input(envelope)?;
            let plaintext = commands::open(&input, passphrase, format)
                .await
                .map_err(|e| format!("Failed to open envelope: {}", e))?;
            print!("{}", plaintext.expose());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seal_args() {
        let args = Args::try_parse_from([
            "notevault",
            "seal",
            "hello",
            "--passphrase",
            "pw",
            "--salt",
            "000102030405060708090a0b0c0d0e0f",
        ])
        .unwrap();

        match args.command {
            Command::Seal {
                text,
                passphrase,
                salt,
            } => {
                assert_eq!(text.as_deref(), Some("hello"));
                assert_eq!(passphrase, "pw");
                assert_eq!(salt.map(|s| s[1]), Some(1));
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(!args.json);
    }

    #[test]
    fn test_parse_open_args_json() {
        let args =
            Args::try_parse_from(["notevault", "--json", "open", "--passphrase", "pw"]).unwrap();

        assert!(args.json);
        assert!(matches!(args.command, Command::Open { envelope: None, .. }));
    }

    #[test]
    fn test_strip_trailing_newline() {
        assert_eq!(strip_trailing_newline("note\n".to_string()), "note");
        assert_eq!(strip_trailing_newline("note\r\n".to_string()), "note");
        // Only one newline is dropped
        assert_eq!(strip_trailing_newline("note\n\n".to_string()), "note\n");
        assert_eq!(strip_trailing_newline("note".to_string()), "note");
        assert_eq!(strip_trailing_newline("a\rb".to_string()), "a\rb");
    }

    #[test]
    fn test_passphrase_moves_into_secret() {
        let args = Args::try_parse_from(["notevault", "open", "--passphrase", "pw"]).unwrap();

        let Command::Open { passphrase, .. } = args.command else {
            panic!("expected open command");
        };
        let passphrase = SecretString::new(passphrase);
        assert_eq!(passphrase.expose(), "pw");
        assert_eq!(format!("{:?}", passphrase), "SecretString(2 bytes)");
    }

    #[test]
    fn test_bad_salt_rejected() {
        let result =
            Args::try_parse_from(["notevault", "seal", "x", "--passphrase", "pw", "--salt", "abcd"]);
        assert!(result.is_err());
    }
}
