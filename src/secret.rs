//! Secret key sources
//!
//! The host application owns the secret key. These sources are how a host
//! (the `etbox` CLI included) obtains it before building an input control.

use crate::error::{ErrorCategory, ErrorKind, Result, TextboxError};
use std::env;
use std::io::{self, IsTerminal, Read, Write};
use zeroize::Zeroizing;

/// Trait for obtaining the secret key from various sources
pub trait SecretKeySource {
    /// Read the secret key as bytes
    ///
    /// Returns the key wrapped in `Zeroizing` so it is wiped from memory
    /// when dropped.
    fn read_secret_key(&mut self) -> Result<Zeroizing<Vec<u8>>>;
}

/// Reads the secret key from any io::Read source (typically a key file)
///
/// A single trailing `\n` or `\r\n` is stripped so keys written with
/// `echo` behave as expected.
pub struct ReaderSecretKey {
    reader: Box<dyn Read>,
}

impl ReaderSecretKey {
    pub fn new(reader: Box<dyn Read>) -> Self {
        Self { reader }
    }
}

impl SecretKeySource for ReaderSecretKey {
    fn read_secret_key(&mut self) -> Result<Zeroizing<Vec<u8>>> {
        let mut data = Zeroizing::new(Vec::new());
        self.reader.read_to_end(&mut data).map_err(|e| {
            TextboxError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                format!("error reading secret key: {}", e),
                e,
            )
        })?;
        if data.ends_with(b"\n") {
            data.pop();
            if data.ends_with(b"\r") {
                data.pop();
            }
        }
        Ok(data)
    }
}

/// Reads the secret key from a named environment variable
pub struct EnvSecretKey {
    var: String,
}

impl EnvSecretKey {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl SecretKeySource for EnvSecretKey {
    fn read_secret_key(&mut self) -> Result<Zeroizing<Vec<u8>>> {
        match env::var(&self.var) {
            Ok(value) => Ok(Zeroizing::new(value.into_bytes())),
            Err(env::VarError::NotPresent) => Err(TextboxError::with_kind(
                ErrorCategory::User,
                ErrorKind::SecretKeyUnavailable,
                format!("environment variable {} is not set", self.var),
            )),
            Err(e @ env::VarError::NotUnicode(_)) => Err(TextboxError::with_kind_and_source(
                ErrorCategory::User,
                ErrorKind::InvalidEncoding,
                format!("environment variable {} is not valid UTF-8", self.var),
                e,
            )),
        }
    }
}

/// Reads the secret key from the terminal with no echo
pub struct TerminalSecretKey;

impl TerminalSecretKey {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalSecretKey {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretKeySource for TerminalSecretKey {
    fn read_secret_key(&mut self) -> Result<Zeroizing<Vec<u8>>> {
        if !io::stdin().is_terminal() {
            return Err(TextboxError::with_kind(
                ErrorCategory::User,
                ErrorKind::SecretKeyUnavailable,
                "cannot read secret key from terminal - stdin is not a terminal",
            ));
        }

        io::stderr().write_all(b"Secret key: ").map_err(|e| {
            TextboxError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                format!("failed to write prompt: {}", e),
                e,
            )
        })?;
        io::stderr().flush().map_err(|e| {
            TextboxError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                format!("failed to flush prompt: {}", e),
                e,
            )
        })?;

        // rpassword hands back a plain String; move it into Zeroizing right away.
        let secret_key = rpassword::read_password().map_err(|e| {
            TextboxError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::SecretKeyUnavailable,
                format!("failure reading secret key: {}", e),
                e,
            )
        })?;

        Ok(Zeroizing::new(secret_key.into_bytes()))
    }
}

/// Converts a secret key read as bytes into the string form the control takes.
pub fn into_string(secret_key: Zeroizing<Vec<u8>>) -> Result<Zeroizing<String>> {
    let text = std::str::from_utf8(&secret_key).map_err(|e| {
        TextboxError::with_kind_and_source(
            ErrorCategory::User,
            ErrorKind::InvalidEncoding,
            "secret key is not valid UTF-8",
            e,
        )
    })?;
    Ok(Zeroizing::new(text.to_owned()))
}
