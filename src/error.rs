//! Error types for reading statement trees

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug)]
pub enum InputError {
    /// The statement tree is not valid JSON or does not match the IR shape
    #[error("invalid statement tree at {line}:{column}: {message}")]
    Json {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for InputError {
    fn from(err: serde_json::Error) -> Self {
        let message = err.to_string();
        // serde_json appends " at line L column C"; the location is kept separately
        let message = match message.rfind(" at line ") {
            Some(cut) => message[..cut].to_string(),
            None => message,
        };
        InputError::Json {
            line: err.line(),
            column: err.column(),
            message,
        }
    }
}

impl InputError {
    /// Byte range the error points at, if it has a location in `source`
    pub fn span(&self, source: &str) -> Option<Span> {
        match self {
            InputError::Json { line, column, .. } => {
                let offset = offset_of(source, *line, *column)?;
                let end = source[offset..]
                    .chars()
                    .next()
                    .map_or(offset, |c| offset + c.len_utf8());
                Some(offset..end)
            }
            InputError::Io(_) => None,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let (span, message) = match (self, self.span(source)) {
            (InputError::Json { message, .. }, Some(span)) => (span, message),
            _ => return self.to_string(),
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message("invalid statement tree")
            .with_label(
                Label::new((filename, span))
                    .with_message(message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);
        match (written, String::from_utf8(buf)) {
            (Ok(()), Ok(text)) => text,
            _ => self.to_string(),
        }
    }
}

/// Byte offset of 1-based `line`, `column` (serde_json columns count bytes)
fn offset_of(source: &str, line: usize, column: usize) -> Option<usize> {
    if line == 0 {
        return None;
    }
    let mut offset = 0;
    for (index, text) in source.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            let column = column.saturating_sub(1).min(text.trim_end_matches('\n').len());
            let mut at = offset + column;
            while !source.is_char_boundary(at) {
                at -= 1;
            }
            return Some(at);
        }
        offset += text.len();
    }
    Some(source.len())
}
