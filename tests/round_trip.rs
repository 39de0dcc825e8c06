//! Round-trip checks through the public control API
//!
//! Decryption lives only here: the harness re-derives the key with the same
//! PBKDF2 parameters and runs AES-256-CBC decryption itself.

use std::cell::RefCell;
use std::rc::Rc;

use aes::Aes256;
use aes::cipher::{BlockDecryptMut, KeyIvInit, block_padding::Pkcs7};
use base64::{Engine, engine::general_purpose::STANDARD};
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

use encrypted_textbox::view::InputType;
use encrypted_textbox::{EncryptedOutput, InputControl, InputControlProps};

type Aes256CbcDec = cbc::Decryptor<Aes256>;

fn decrypt(out: &EncryptedOutput, secret_key: &str) -> String {
    let salt = STANDARD.decode(out.salt()).expect("salt is Base64");
    let iv = STANDARD.decode(out.iv()).expect("iv is Base64");
    let ciphertext = STANDARD.decode(out.encrypted_text()).expect("ciphertext is Base64");

    let mut key = [0u8; 32];
    pbkdf2_hmac::<Sha256>(secret_key.as_bytes(), &salt, 1000, &mut key);

    let plaintext = Aes256CbcDec::new_from_slices(&key, &iv)
        .unwrap()
        .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
        .expect("valid PKCS7 padding");
    String::from_utf8(plaintext).unwrap()
}

#[test]
fn test_every_keystroke_decrypts_to_current_value() {
    let records: Rc<RefCell<Vec<EncryptedOutput>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = records.clone();
    let props = InputControlProps::builder("Bank account", "form-secret")
        .on_change_encrypted(move |out| sink.borrow_mut().push(out.clone()))
        .build();
    let mut control = InputControl::new(props);

    let typed = ["D", "DE", "DE8", "DE89", "DE89 3704"];
    for value in typed {
        control.handle_change(value).unwrap();
    }

    let records = records.borrow();
    assert_eq!(records.len(), typed.len());
    for (record, value) in records.iter().zip(typed) {
        assert_eq!(decrypt(record, "form-secret"), value);
    }
}

#[test]
fn test_repeated_encryptions_differ_but_all_decrypt() {
    let mut control = InputControl::new(InputControlProps::builder("Note", "k").build());

    let mut seen = Vec::new();
    for _ in 0..5 {
        let out = control.handle_change("same value").unwrap().clone();
        assert_eq!(STANDARD.decode(out.iv()).unwrap().len(), 16);
        assert_eq!(STANDARD.decode(out.salt()).unwrap().len(), 16);
        let ct_len = STANDARD.decode(out.encrypted_text()).unwrap().len();
        assert!(ct_len > 0 && ct_len % 16 == 0);

        assert_eq!(decrypt(&out, "k"), "same value");
        assert!(!seen.contains(&out));
        seen.push(out);
    }
}

#[test]
fn test_empty_input_always_yields_empty_record() {
    let mut control = InputControl::new(InputControlProps::builder("Note", "k").build());
    for _ in 0..3 {
        let out = control.handle_change("").unwrap();
        assert_eq!(out.encrypted_text(), "");
        assert_eq!(out.iv(), "");
        assert_eq!(out.salt(), "");
    }
}

#[test]
fn test_password_mode_encrypts_the_same_way() {
    let props = InputControlProps::builder("PIN", "k").password(true).build();
    let mut control = InputControl::new(props);

    let out = control.handle_change("4321").unwrap().clone();
    assert_eq!(control.render().input.input_type, InputType::Password);
    assert_eq!(decrypt(&out, "k"), "4321");
}
