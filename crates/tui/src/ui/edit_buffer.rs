//! UTF-8 safe text editing for scene editors.
//!
//! The buffer holds what the user typed, which is not always a valid value:
//! a half-typed number stays in the buffer and is only committed once it
//! parses for the editor's kind.

use dialogkit_types::{EditorKind, ValueKind};
use serde_json::{Number, Value as JsonValue};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditBuffer {
    /// The underlying text buffer
    input: String,
    /// Cursor byte index into `input` (always on a UTF-8 boundary)
    cursor: usize,
}

impl EditBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the buffer from an editor value with the cursor at the end.
    pub fn from_value(value: &JsonValue) -> Self {
        let input = match value {
            JsonValue::Null => String::new(),
            JsonValue::String(text) => text.clone(),
            other => other.to_string(),
        };
        let cursor = input.len();
        Self { input, cursor }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Display form, with every character replaced by `mask` when set.
    pub fn display(&self, mask: Option<char>) -> String {
        match mask {
            Some(mask) => self.input.chars().map(|_| mask).collect(),
            None => self.input.clone(),
        }
    }

    /// Converts the buffer into a value for an editor of `kind`; `None` while
    /// the text does not parse.
    pub fn to_value(&self, kind: EditorKind) -> Option<JsonValue> {
        let text = self.input.trim();
        match kind {
            EditorKind::Value(ValueKind::Text) => Some(JsonValue::String(self.input.clone())),
            EditorKind::Value(ValueKind::Integer) => {
                if let Ok(number) = text.parse::<i64>() {
                    Some(JsonValue::from(number))
                } else {
                    text.parse::<u64>().ok().map(JsonValue::from)
                }
            }
            EditorKind::Value(ValueKind::Number) => text.parse::<f64>().ok().and_then(Number::from_f64).map(JsonValue::Number),
            EditorKind::Value(ValueKind::Boolean) => match text {
                "true" => Some(JsonValue::Bool(true)),
                "false" => Some(JsonValue::Bool(false)),
                _ => None,
            },
            EditorKind::Reference if text.is_empty() => Some(JsonValue::Null),
            EditorKind::Reference => Some(JsonValue::String(text.to_string())),
        }
    }

    /// Move cursor one Unicode scalar to the left.
    pub fn move_left(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev_len = self.input[..self.cursor].chars().last().map(char::len_utf8).unwrap_or(1);
        self.cursor = self.cursor.saturating_sub(prev_len);
    }

    /// Move cursor one Unicode scalar to the right.
    pub fn move_right(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.input.len();
    }

    pub fn insert_char(&mut self, c: char) {
        self.input.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Backspace the char immediately before the cursor.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let prev = self.input[..self.cursor].chars().last().map(char::len_utf8).unwrap_or(1);
        let start = self.cursor - prev;
        self.input.drain(start..self.cursor);
        self.cursor = start;
        true
    }

    /// Delete the char under the cursor.
    pub fn delete(&mut self) -> bool {
        let Some(next) = self.input[self.cursor..].chars().next() else {
            return false;
        };
        self.input.drain(self.cursor..self.cursor + next.len_utf8());
        true
    }
}
