//! Layout sizes and labels used while building dialogs.
//!
//! Every size the builders use comes from a [`DialogConfig`] passed into the
//! build calls. The struct deserializes from JSON with every field optional,
//! so a config file only needs to list what it overrides.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::toolkit::CanvasSize;

/// Error surfaced when a dialog config cannot be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure (for example, a missing or unreadable file).
    #[error("dialog config I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid config JSON.
    #[error("dialog config serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Fixed strings shown by the framework itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogLabels {
    /// Button that opens the pop-up of a secret option.
    pub secret_edit: String,
    /// Button that closes a secret pop-up.
    pub popup_close: String,
}

impl Default for DialogLabels {
    fn default() -> Self {
        Self {
            secret_edit: "Edit".to_string(),
            popup_close: "OK".to_string(),
        }
    }
}

/// Sizing and labelling knobs for built dialogs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogConfig {
    /// Gap between entries of a dialog and between the members of a line.
    pub spacing: f32,
    /// Preferred height of action buttons.
    pub button_height: f32,
    /// Height of one line of error text.
    pub error_height: f32,
    /// Replaces every character of a secret editor.
    pub secret_mask: char,
    pub labels: DialogLabels,
    pub dialog_canvas: CanvasSize,
    pub popup_canvas: CanvasSize,
    /// Default number of lines reserved by an error display.
    pub error_display_lines: usize,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            spacing: 4.0,
            button_height: 24.0,
            error_height: 8.0,
            secret_mask: '*',
            labels: DialogLabels::default(),
            dialog_canvas: CanvasSize::new(200.0, 108.0),
            popup_canvas: CanvasSize::new(200.0, 104.0),
            error_display_lines: 2,
        }
    }
}

impl DialogConfig {
    /// Reads a config from a JSON file. Missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&data)
    }

    pub fn from_json_str(data: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(data)?)
    }
}
