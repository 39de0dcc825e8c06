//! The encrypting input control
//!
//! `InputControl` holds the control's render state (the current input value
//! and the last computed output record) and turns change events into fresh
//! encryptions. Each change is handled synchronously on the caller's turn.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;
use zeroize::Zeroizing;

use crate::cipher;
use crate::error::Result;
use crate::output::EncryptedOutput;
use crate::props::InputControlProps;
use crate::view::{
    ControlView, DEFAULT_PANEL_FONT_SIZE, InputType, InputView, LabelView, OutputPanelView,
    PANEL_MARGIN_TOP, RootStyle,
};

static NEXT_INPUT_ID: AtomicU64 = AtomicU64::new(0);

fn next_input_id() -> String {
    format!("input-{}", NEXT_INPUT_ID.fetch_add(1, Ordering::Relaxed))
}

pub struct InputControl {
    id: String,
    props: InputControlProps,
    value: Zeroizing<String>,
    output: EncryptedOutput,
}

impl InputControl {
    pub fn new(props: InputControlProps) -> Self {
        Self {
            id: next_input_id(),
            props,
            value: Zeroizing::new(String::new()),
            output: EncryptedOutput::empty(),
        }
    }

    /// Element id of the input; the label points at it.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn props(&self) -> &InputControlProps {
        &self.props
    }

    /// Mutable access for hosts that re-render with changed props.
    pub fn props_mut(&mut self) -> &mut InputControlProps {
        &mut self.props
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// The last computed record; empty until the first non-empty change.
    pub fn output(&self) -> &EncryptedOutput {
        &self.output
    }

    /// Handle a change event carrying the full new input value.
    ///
    /// Stores the value, re-encrypts it from scratch, replaces the output
    /// record and passes it to the change callback, if any. On error the
    /// value is kept, the previous record stays in place and the callback
    /// is not invoked.
    pub fn handle_change(&mut self, new_value: impl Into<String>) -> Result<&EncryptedOutput> {
        self.value = Zeroizing::new(new_value.into());

        let output = cipher::encrypt(&self.value, self.props.secret_key.as_bytes())
            .map_err(|e| e.with_context(format!("failed to encrypt {}", self.id)))?;
        debug!(id = %self.id, empty = output.is_empty(), "recomputed encrypted output");
        self.output = output;

        if let Some(callback) = self.props.on_change_encrypted.as_mut() {
            callback(&self.output);
        }

        Ok(&self.output)
    }

    pub fn render(&self) -> ControlView {
        let props = &self.props;
        // A zero size counts as unset for the label and input only.
        let text_font_size = props.font_size.filter(|&px| px != 0);
        let input_type = if props.is_password {
            InputType::Password
        } else {
            InputType::Text
        };

        let output_panel = props.show_output_values.then(|| OutputPanelView {
            encrypted_text: self.output.encrypted_text.clone(),
            iv: self.output.output_iv.clone(),
            salt: self.output.output_salt.clone(),
            font_size: props.font_size.unwrap_or(DEFAULT_PANEL_FONT_SIZE),
            margin_top: PANEL_MARGIN_TOP,
            break_all: true,
        });

        ControlView {
            root: RootStyle::default(),
            label: LabelView {
                html_for: self.id.clone(),
                text: props.label.clone(),
                font_size: text_font_size,
                disabled: props.disabled,
            },
            input: InputView {
                id: self.id.clone(),
                input_type,
                value: self.value.as_str().to_owned(),
                font_size: text_font_size,
                disabled: props.disabled,
            },
            output_panel,
        }
    }
}
