//! encrypted-textbox - a headless form input that encrypts its text
//!
//! Every change of the input is encrypted with AES-256-CBC under a key
//! derived from the host's secret key (PBKDF2-HMAC-SHA256), and the
//! ciphertext, IV and salt are exposed as Base64 for the host form.

#![forbid(unsafe_code)]

pub mod cipher;
pub mod control;
pub mod error;
pub mod output;
pub mod props;
pub mod secret;
pub mod view;

pub use control::InputControl;
pub use error::{ErrorCategory, ErrorKind, Result, TextboxError};
pub use output::EncryptedOutput;
pub use props::InputControlProps;
