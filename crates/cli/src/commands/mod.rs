//! Subcommand implementations.
//!
//! Each command takes the [`Storefront`](wonderland_client::Storefront) the
//! binary opened and prints through [`crate::render`].

pub mod account;
pub mod admin;
pub mod cart;
pub mod orders;
pub mod products;
pub mod seed;

use std::io::{BufRead, IsTerminal, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use secrecy::SecretString;
use thiserror::Error;
use wonderland_client::ClientError;
use wonderland_core::ValidationError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The command needs a signed-in user.
    #[error("Please log in first (wonderland login -e <email>)")]
    LoginRequired,

    /// The command needs an admin account.
    #[error("Admin access required; log in with an admin account")]
    AdminRequired,

    #[error("Invalid attribute '{0}': expected KEY=VALUE")]
    InvalidAttribute(String),

    #[error("Failed to read input: {0}")]
    Input(#[from] std::io::Error),

    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid seed file: {0}")]
    SeedFile(#[from] serde_yaml::Error),

    #[error("{0} products in the seed file are invalid")]
    InvalidSeed(usize),

    #[error("{failed} of {total} products could not be created")]
    SeedIncomplete { failed: usize, total: usize },
}

/// Use `given`, or prompt for a secret.
///
/// On a terminal the typed characters are not echoed. Piped input is read
/// as one line.
pub(crate) fn secret_or_prompt(
    given: Option<String>,
    prompt: &str,
) -> Result<SecretString, CommandError> {
    if let Some(value) = given {
        return Ok(SecretString::from(value));
    }

    let mut stderr = std::io::stderr();
    write!(stderr, "{prompt}")?;
    stderr.flush()?;

    if std::io::stdin().is_terminal() {
        let secret = read_hidden()?;
        writeln!(stderr)?;
        return Ok(SecretString::from(secret));
    }

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(SecretString::from(line.trim_end_matches(['\r', '\n'])))
}

/// Raw terminal mode for as long as this value lives.
struct RawMode;

impl RawMode {
    fn enable() -> std::io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Keystroke {
    Continue,
    Submit,
    Cancel,
}

/// Apply one key event to the secret being typed.
fn apply_key(secret: &mut String, key: &KeyEvent) -> Keystroke {
    if key.kind == KeyEventKind::Release {
        return Keystroke::Continue;
    }
    match key.code {
        KeyCode::Enter => Keystroke::Submit,
        KeyCode::Char('c' | 'd') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Keystroke::Cancel
        }
        KeyCode::Char(c) => {
            secret.push(c);
            Keystroke::Continue
        }
        KeyCode::Backspace => {
            secret.pop();
            Keystroke::Continue
        }
        _ => Keystroke::Continue,
    }
}

fn read_hidden() -> Result<String, CommandError> {
    let _raw = RawMode::enable()?;
    let mut secret = String::new();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        match apply_key(&mut secret, &key) {
            Keystroke::Continue => {}
            Keystroke::Submit => return Ok(secret),
            Keystroke::Cancel => {
                return Err(CommandError::Input(std::io::Error::new(
                    std::io::ErrorKind::Interrupted,
                    "cancelled",
                )));
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_typed_secret_with_backspace() {
        let mut secret = String::new();
        for code in [
            KeyCode::Char('s'),
            KeyCode::Char('x'),
            KeyCode::Backspace,
            KeyCode::Char('3'),
            KeyCode::Left,
        ] {
            assert_eq!(apply_key(&mut secret, &press(code)), Keystroke::Continue);
        }
        assert_eq!(apply_key(&mut secret, &press(KeyCode::Enter)), Keystroke::Submit);
        assert_eq!(secret, "s3");
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut secret = String::new();
        let release =
            KeyEvent::new_with_kind(KeyCode::Char('a'), KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(apply_key(&mut secret, &release), Keystroke::Continue);
        assert!(secret.is_empty());
    }

    #[test]
    fn test_ctrl_c_cancels() {
        let mut secret = String::from("abc");
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(apply_key(&mut secret, &ctrl_c), Keystroke::Cancel);

        // A plain 'c' is part of the password
        assert_eq!(
            apply_key(&mut secret, &press(KeyCode::Char('c'))),
            Keystroke::Continue
        );
        assert_eq!(secret, "abcc");
    }

    #[test]
    fn test_given_secret_skips_prompt() {
        use secrecy::ExposeSecret;

        let secret = secret_or_prompt(Some("secret123".to_string()), "Password: ").unwrap();
        assert_eq!(secret.expose_secret(), "secret123");
    }
}
