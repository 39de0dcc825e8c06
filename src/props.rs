//! Configuration surface of the input control

use std::fmt;

use zeroize::Zeroizing;

use crate::output::EncryptedOutput;

/// Callback invoked with the freshly computed record after every change.
pub type OnChangeEncrypted = Box<dyn FnMut(&EncryptedOutput)>;

/// Props supplied by the host when it places the control on a form.
pub struct InputControlProps {
    /// Mask the input (password field) instead of showing plain text.
    pub is_password: bool,
    pub disabled: bool,
    /// Font size in px for the label, the input and the output panel.
    pub font_size: Option<u32>,
    pub label: String,
    pub(crate) secret_key: Zeroizing<String>,
    /// Show the debug panel with the three output values.
    pub show_output_values: bool,
    pub(crate) on_change_encrypted: Option<OnChangeEncrypted>,
}

impl InputControlProps {
    /// Starts a builder; `label` and `secret_key` are the only required props.
    pub fn builder(
        label: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> InputControlPropsBuilder {
        InputControlPropsBuilder {
            props: InputControlProps {
                is_password: false,
                disabled: false,
                font_size: None,
                label: label.into(),
                secret_key: Zeroizing::new(secret_key.into()),
                show_output_values: false,
                on_change_encrypted: None,
            },
        }
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// Replaces the secret key; later changes encrypt with the new key.
    pub fn set_secret_key(&mut self, secret_key: impl Into<String>) {
        self.secret_key = Zeroizing::new(secret_key.into());
    }
}

impl fmt::Debug for InputControlProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputControlProps")
            .field("is_password", &self.is_password)
            .field("disabled", &self.disabled)
            .field("font_size", &self.font_size)
            .field("label", &self.label)
            .field("secret_key", &"[REDACTED]")
            .field("show_output_values", &self.show_output_values)
            .field("on_change_encrypted", &self.on_change_encrypted.is_some())
            .finish()
    }
}

pub struct InputControlPropsBuilder {
    props: InputControlProps,
}

impl InputControlPropsBuilder {
    pub fn password(mut self, is_password: bool) -> Self {
        self.props.is_password = is_password;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.props.disabled = disabled;
        self
    }

    pub fn font_size(mut self, px: u32) -> Self {
        self.props.font_size = Some(px);
        self
    }

    pub fn show_output_values(mut self, show: bool) -> Self {
        self.props.show_output_values = show;
        self
    }

    pub fn on_change_encrypted(mut self, callback: impl FnMut(&EncryptedOutput) + 'static) -> Self {
        self.props.on_change_encrypted = Some(Box::new(callback));
        self
    }

    pub fn build(self) -> InputControlProps {
        self.props
    }
}
