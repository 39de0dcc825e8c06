//! Declarative view model of the control
//!
//! A host toolkit maps these structs onto its own widgets. The `Display`
//! impls give a plain-text rendering for terminals and tests.

use std::fmt;

/// Font size of the output panel when the host sets none.
pub const DEFAULT_PANEL_FONT_SIZE: u32 = 12;

/// Top margin of the output panel, px.
pub const PANEL_MARGIN_TOP: u32 = 12;

/// Vertical gap between label and input, px.
pub const ROOT_GAP: u32 = 2;

const MASK_CHAR: char = '•';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    Text,
    Password,
}

impl InputType {
    pub fn as_str(self) -> &'static str {
        match self {
            InputType::Text => "text",
            InputType::Password => "password",
        }
    }
}

/// Root container: a full-width vertical flex column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootStyle {
    pub gap_px: u32,
    pub full_width: bool,
}

impl Default for RootStyle {
    fn default() -> Self {
        Self {
            gap_px: ROOT_GAP,
            full_width: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelView {
    /// Id of the input this label belongs to.
    pub html_for: String,
    pub text: String,
    pub font_size: Option<u32>,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputView {
    pub id: String,
    pub input_type: InputType,
    pub value: String,
    pub font_size: Option<u32>,
    pub disabled: bool,
}

impl InputView {
    /// The value as shown to the user: masked for password inputs.
    pub fn displayed_value(&self) -> String {
        match self.input_type {
            InputType::Text => self.value.clone(),
            InputType::Password => self.value.chars().map(|_| MASK_CHAR).collect(),
        }
    }
}

/// Debug panel listing the three output values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPanelView {
    pub encrypted_text: String,
    pub iv: String,
    pub salt: String,
    pub font_size: u32,
    pub margin_top: u32,
    /// Values wrap at any character; Base64 carries no natural break points.
    pub break_all: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlView {
    pub root: RootStyle,
    pub label: LabelView,
    pub input: InputView,
    pub output_panel: Option<OutputPanelView>,
}

impl fmt::Display for ControlView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let disabled = if self.input.disabled { " (disabled)" } else { "" };
        writeln!(f, "{}{}", self.label.text, disabled)?;
        writeln!(
            f,
            "[{}] {}",
            self.input.input_type.as_str(),
            self.input.displayed_value()
        )?;
        if let Some(panel) = &self.output_panel {
            write!(f, "{}", panel)?;
        }
        Ok(())
    }
}

impl fmt::Display for OutputPanelView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Encrypted Text: {}", self.encrypted_text)?;
        writeln!(f, "IV: {}", self.iv)?;
        writeln!(f, "Salt: {}", self.salt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(input_type: InputType, value: &str) -> InputView {
        InputView {
            id: "input-0".to_string(),
            input_type,
            value: value.to_string(),
            font_size: None,
            disabled: false,
        }
    }

    #[test]
    fn test_password_value_is_masked_per_character() {
        let view = input(InputType::Password, "pä55");
        assert_eq!(view.displayed_value(), "••••");

        let view = input(InputType::Text, "pä55");
        assert_eq!(view.displayed_value(), "pä55");
    }

    #[test]
    fn test_display_without_panel() {
        let view = ControlView {
            root: RootStyle::default(),
            label: LabelView {
                html_for: "input-0".to_string(),
                text: "Card".to_string(),
                font_size: None,
                disabled: true,
            },
            input: InputView {
                disabled: true,
                ..input(InputType::Text, "1234")
            },
            output_panel: None,
        };

        assert_eq!(view.to_string(), "Card (disabled)\n[text] 1234\n");
    }

    #[test]
    fn test_display_with_panel() {
        let panel = OutputPanelView {
            encrypted_text: "Y3Q=".to_string(),
            iv: "aXY=".to_string(),
            salt: "c2E=".to_string(),
            font_size: DEFAULT_PANEL_FONT_SIZE,
            margin_top: PANEL_MARGIN_TOP,
            break_all: true,
        };

        assert_eq!(
            panel.to_string(),
            "Encrypted Text: Y3Q=\nIV: aXY=\nSalt: c2E=\n"
        );
    }
}
