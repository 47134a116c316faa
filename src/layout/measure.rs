//! Text measurement oracle
//!
//! The engine never shapes text itself. Hosts inject a [`TextMeasure`]
//! that returns the pixel width of a string; it must be deterministic for
//! layouts to be reproducible.

use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

/// What a measured string is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextKind {
    MessageContent,
    ParticipantName,
}

/// Pixel width of a string
pub trait TextMeasure {
    fn measure(&self, text: &str, kind: TextKind) -> f64;
}

impl<F> TextMeasure for F
where
    F: Fn(&str, TextKind) -> f64,
{
    fn measure(&self, text: &str, kind: TextKind) -> f64 {
        self(text, kind)
    }
}

/// Deterministic estimate from terminal column widths
///
/// Wide (CJK) characters count as two columns. Multi-line text measures its
/// longest line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharWidthMeasurer {
    /// Width of one column of message text
    pub message_char_width: f64,
    /// Width of one column of a participant name
    pub participant_char_width: f64,
}

impl Default for CharWidthMeasurer {
    fn default() -> Self {
        Self {
            message_char_width: 7.0,
            participant_char_width: 8.0,
        }
    }
}

impl CharWidthMeasurer {
    pub fn new(char_width: f64) -> Self {
        Self {
            message_char_width: char_width,
            participant_char_width: char_width,
        }
    }
}

impl TextMeasure for CharWidthMeasurer {
    fn measure(&self, text: &str, kind: TextKind) -> f64 {
        let columns = text
            .lines()
            .map(UnicodeWidthStr::width)
            .max()
            .unwrap_or(0);
        let per_column = match kind {
            TextKind::MessageContent => self.message_char_width,
            TextKind::ParticipantName => self.participant_char_width,
        };
        columns as f64 * per_column
    }
}
