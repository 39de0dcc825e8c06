//! The encrypted output record handed to the host
//!
//! Every field is standard Base64 (with `=` padding), which is the encoding
//! host form designers expect when they store the triple alongside the
//! submitted form. Serialized field names match the host's
//! `encryptedText` / `outputIV` / `outputSalt` props.

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorCategory, ErrorKind, Result, TextboxError};

/// Ciphertext, IV and salt of a single encryption, each Base64 encoded.
///
/// The record is replaced wholesale on every change; an empty record means
/// the input is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedOutput {
    #[serde(rename = "encryptedText")]
    pub encrypted_text: String,
    #[serde(rename = "outputIV")]
    pub output_iv: String,
    #[serde(rename = "outputSalt")]
    pub output_salt: String,
}

impl EncryptedOutput {
    /// The record for an empty input: all three fields empty.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Encode raw ciphertext, IV and salt into a record.
    pub(crate) fn from_raw(ciphertext: &[u8], iv: &[u8], salt: &[u8]) -> Self {
        Self {
            encrypted_text: STANDARD.encode(ciphertext),
            output_iv: STANDARD.encode(iv),
            output_salt: STANDARD.encode(salt),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.encrypted_text.is_empty() && self.output_iv.is_empty() && self.output_salt.is_empty()
    }

    pub fn encrypted_text(&self) -> &str {
        &self.encrypted_text
    }

    pub fn iv(&self) -> &str {
        &self.output_iv
    }

    pub fn salt(&self) -> &str {
        &self.output_salt
    }

    /// The record as a single line of JSON, the form hosts consume.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            TextboxError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Serialization,
                "failed to serialize output record",
                e,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_record() {
        let out = EncryptedOutput::empty();
        assert!(out.is_empty());
        assert_eq!(out, EncryptedOutput::default());
        assert_eq!(out.encrypted_text(), "");
        assert_eq!(out.iv(), "");
        assert_eq!(out.salt(), "");
    }

    #[test]
    fn test_from_raw_uses_padded_standard_alphabet() {
        // 0xFB 0xFF encodes to characters only present in the standard alphabet.
        let out = EncryptedOutput::from_raw(&[0xfb, 0xff], &[0u8; 16], &[0xffu8; 16]);

        assert_eq!(out.encrypted_text(), "+/8=");
        assert_eq!(out.iv(), "AAAAAAAAAAAAAAAAAAAAAA==");
        assert_eq!(out.salt(), "/////////////////////w==");
        assert!(!out.is_empty());
    }

    #[test]
    fn test_serializes_with_host_field_names() {
        let out = EncryptedOutput {
            encrypted_text: "c2VjcmV0".to_string(),
            output_iv: "aXY=".to_string(),
            output_salt: "c2FsdA==".to_string(),
        };

        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "encryptedText": "c2VjcmV0",
                "outputIV": "aXY=",
                "outputSalt": "c2FsdA==",
            })
        );

        let back: EncryptedOutput = serde_json::from_value(json).unwrap();
        assert_eq!(back, out);
    }

    #[test]
    fn test_to_json_is_one_line_with_host_field_names() {
        let out = EncryptedOutput::from_raw(b"ciphertext", &[1u8; 16], &[2u8; 16]);
        let line = out.to_json().unwrap();

        assert!(!line.contains('\n'));
        assert!(line.starts_with("{\"encryptedText\":"));
        let back: EncryptedOutput = serde_json::from_str(&line).unwrap();
        assert_eq!(back, out);

        assert_eq!(
            EncryptedOutput::empty().to_json().unwrap(),
            r#"{"encryptedText":"","outputIV":"","outputSalt":""}"#
        );
    }
}
