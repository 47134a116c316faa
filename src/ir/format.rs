//! Display text for statement tree nodes
//!
//! The engine measures exactly what the renderer draws, so both sides go
//! through these functions instead of formatting labels ad hoc.

use super::statement::{Message, MessageKind};

/// Marker drawn on creation arrows
pub const CREATE_MARKER: &str = "«create»";

/// Label drawn on a message arrow
pub fn message_label(message: &Message) -> String {
    match message.kind {
        MessageKind::Creation => {
            let args = message.signature.trim();
            if args.is_empty() {
                CREATE_MARKER.to_string()
            } else {
                format!("{}({})", CREATE_MARKER, args)
            }
        }
        MessageKind::Sync => match &message.assignee {
            Some(assignee) if !assignee.is_empty() => {
                format!("{} = {}", assignee, message.signature)
            }
            _ => message.signature.clone(),
        },
        MessageKind::Async | MessageKind::Return => message.signature.clone(),
    }
}

/// Label drawn next to a created participant (`a:A`)
pub fn assignment_label(message: &Message, target: &str) -> Option<String> {
    match (&message.kind, &message.assignee) {
        (MessageKind::Creation, Some(assignee)) if !assignee.is_empty() => {
            Some(format!("{}:{}", assignee, target))
        }
        _ => None,
    }
}
