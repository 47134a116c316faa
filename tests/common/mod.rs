//! Shared helpers for integration tests

#![allow(dead_code)]

use sequence_layout::ir::Diagram;
use sequence_layout::{layout, DiagramLayout, TextKind};

/// Width provider returning the numeric suffix of a label (`s100` -> 100)
pub fn digits(text: &str, _kind: TextKind) -> f64 {
    let start = text
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i);
    start.and_then(|i| text[i..].parse().ok()).unwrap_or(0.0)
}

pub fn compute_layout(diagram: &Diagram) -> DiagramLayout {
    layout(diagram, &digits).unwrap_or_else(|e| panic!("layout failed: {}", e))
}

pub fn center(result: &DiagramLayout, name: &str) -> f64 {
    result
        .participants
        .get(name)
        .unwrap_or_else(|| panic!("participant '{}' not found", name))
        .center
}
