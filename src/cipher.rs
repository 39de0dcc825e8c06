//! Encryption using PBKDF2 + AES-256-CBC
//!
//! This module implements the routine behind every change of the input:
//! - a fresh 16-byte salt and 16-byte IV from the OS random number generator
//! - PBKDF2-HMAC-SHA256 (1000 iterations) turning the secret key into a 32-byte AES key
//! - AES-256 in CBC mode with PKCS7 padding over the UTF-8 plaintext
//!
//! The ciphertext, IV and salt are returned separately, each Base64 encoded.
//! Nothing is prepended to the ciphertext; a consumer needs all three values
//! plus the secret key to recover the plaintext.

use aes::Aes256;
use aes::cipher::{BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use pbkdf2::pbkdf2_hmac;
use rand::TryRngCore;
use rand::rngs::OsRng;
use sha2::Sha256;
use tracing::{debug, trace};
use zeroize::ZeroizeOnDrop;

use crate::error::{ErrorCategory, ErrorKind, Result, TextboxError};
use crate::output::EncryptedOutput;

/// Length of salt in bytes
pub const SALT_LEN: usize = 16;

/// Length of the CBC initialization vector in bytes
pub const IV_LEN: usize = 16;

/// Length of derived key in bytes (AES-256)
pub const KEY_LEN: usize = 32;

/// PBKDF2 iteration count
pub const PBKDF2_ITERATIONS: u32 = 1000;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;

/// An AES key derived from the secret key. Wiped from memory on drop.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LEN],
}

impl DerivedKey {
    /// Raw key bytes. Use for immediate cipher setup only; never store or log them.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive a 32-byte key from the secret key and salt using PBKDF2-HMAC-SHA256
pub fn derive_key(secret_key: &[u8], salt: &[u8; SALT_LEN]) -> DerivedKey {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(secret_key, salt, PBKDF2_ITERATIONS, &mut key);
    DerivedKey { key }
}

/// Encrypt plaintext with a secret key using random salt and IV
///
/// Empty plaintext yields the empty record without consuming randomness.
pub fn encrypt(plaintext: &str, secret_key: &[u8]) -> Result<EncryptedOutput> {
    if plaintext.is_empty() {
        trace!("empty input, skipping encryption");
        return Ok(EncryptedOutput::empty());
    }

    let mut salt = [0u8; SALT_LEN];
    fill_random(&mut salt, "salt")?;

    let mut iv = [0u8; IV_LEN];
    fill_random(&mut iv, "IV")?;

    encrypt_deterministic(plaintext, secret_key, &salt, &iv)
}

/// Encrypt plaintext with a secret key using provided salt and IV
///
/// This function is ONLY for generating reproducible test vectors.
/// NEVER use this in production - always use `encrypt()`, which draws a fresh
/// salt and IV for every call.
pub fn encrypt_deterministic(
    plaintext: &str,
    secret_key: &[u8],
    salt: &[u8; SALT_LEN],
    iv: &[u8; IV_LEN],
) -> Result<EncryptedOutput> {
    if plaintext.is_empty() {
        return Ok(EncryptedOutput::empty());
    }

    let key = derive_key(secret_key, salt);
    let cipher = Aes256CbcEnc::new_from_slices(key.as_bytes(), iv).map_err(|e| {
        TextboxError::with_kind(
            ErrorCategory::Internal,
            ErrorKind::CipherFailure,
            format!("failed to initialize AES-256-CBC: {}", e),
        )
    })?;
    let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

    debug!(
        plaintext_len = plaintext.len(),
        ciphertext_len = ciphertext.len(),
        "encrypted input"
    );

    Ok(EncryptedOutput::from_raw(&ciphertext, iv, salt))
}

fn fill_random(buf: &mut [u8], what: &str) -> Result<()> {
    OsRng.try_fill_bytes(buf).map_err(|e| {
        TextboxError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::RandomUnavailable,
            format!("failed to generate random {}: {}", what, e),
            e,
        )
    })
}
