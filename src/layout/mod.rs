//! Layout engine for sequence diagrams
//!
//! This module takes a statement tree and computes lifeline positions,
//! statement coordinates, fragment boxes and frame borders, producing a
//! [`DiagramLayout`].

pub mod anchor;
pub mod collector;
pub mod comment;
pub mod config;
pub mod engine;
pub mod error;
pub mod fragment;
pub mod frame;
pub mod measure;
pub mod participants;
pub mod scope;
pub mod solver;
pub mod types;
pub mod vertical;

pub use anchor::Anchor;
pub use config::LayoutMetrics;
pub use engine::{compute, solve_horizontal};
pub use error::LayoutError;
pub use frame::{Frame, FrameBuilder};
pub use measure::{CharWidthMeasurer, TextKind, TextMeasure};
pub use participants::{Participant, ParticipantOrder};
pub use scope::Scope;
pub use solver::{ConstraintMatrix, HorizontalLayout};
pub use types::*;
pub use vertical::{VerticalLayout, VerticalStacker};
