//! Statement tree consumed by the layout engine

pub mod format;
pub mod statement;

pub use format::{assignment_label, message_label, CREATE_MARKER};
pub use statement::*;
