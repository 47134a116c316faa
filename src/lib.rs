//! Sequence Layout - geometry engine for sequence diagrams
//!
//! This library turns a statement tree (participants, messages, fragments,
//! dividers) into lifeline positions, statement coordinates, fragment boxes
//! and activation anchors that a renderer can draw directly.
//!
//! # Example
//!
//! ```rust
//! use sequence_layout::ir::{Diagram, Statement};
//! use sequence_layout::{layout, CharWidthMeasurer};
//!
//! let diagram = Diagram::new(vec![Statement::sync("A", "hello")].into());
//! let result = layout(&diagram, &CharWidthMeasurer::default()).unwrap();
//! assert_eq!(result.participants.len(), 2);
//! assert_eq!(result.statement("0").unwrap().top, 72.0);
//! ```

pub mod error;
pub mod ir;
pub mod layout;
pub mod theme;

pub use error::InputError;
pub use ir::Diagram;
pub use layout::{
    CharWidthMeasurer, DiagramLayout, LayoutError, LayoutMetrics, TextKind, TextMeasure,
};

// Re-export Theme for public API
pub use theme::Theme;

use thiserror::Error;

/// Errors that can occur between reading input and producing a layout
#[derive(Debug, Error)]
pub enum EngineError {
    /// Error while reading the statement tree
    #[error("input error: {0}")]
    Input(#[from] InputError),

    /// Error during layout
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),
}

/// Lay out `diagram` with the reference metrics
///
/// # Example
///
/// ```rust
/// use sequence_layout::ir::{Diagram, Statement};
/// use sequence_layout::{layout, TextKind};
///
/// // every label is 40 pixels wide
/// let measure = |_text: &str, _kind: TextKind| 40.0;
/// let diagram = Diagram::new(vec![
///     Statement::sync("A", "a"),
///     Statement::sync("B", "b"),
/// ].into());
///
/// let result = layout(&diagram, &measure).unwrap();
/// assert!(result.participants["A"].center < result.participants["B"].center);
/// ```
pub fn layout(diagram: &Diagram, measure: &dyn TextMeasure) -> Result<DiagramLayout, LayoutError> {
    layout_with_metrics(diagram, measure, &LayoutMetrics::default())
}

/// Lay out `diagram` with custom metrics
///
/// # Example
///
/// ```rust
/// use sequence_layout::ir::{Diagram, Statement};
/// use sequence_layout::{layout_with_metrics, CharWidthMeasurer, LayoutMetrics};
///
/// let metrics = LayoutMetrics::default().with_left_margin(50.0);
/// let diagram = Diagram::new(vec![Statement::sync("A", "m")].into());
///
/// let result = layout_with_metrics(&diagram, &CharWidthMeasurer::default(), &metrics).unwrap();
/// assert_eq!(result.participants["_STARTER_"].center, 50.0);
/// ```
pub fn layout_with_metrics(
    diagram: &Diagram,
    measure: &dyn TextMeasure,
    metrics: &LayoutMetrics,
) -> Result<DiagramLayout, LayoutError> {
    layout::compute(diagram, measure, metrics)
}

/// Read a JSON statement tree and lay it out
pub fn layout_json(
    source: &str,
    measure: &dyn TextMeasure,
    metrics: &LayoutMetrics,
) -> Result<DiagramLayout, EngineError> {
    let diagram: Diagram = serde_json::from_str(source).map_err(InputError::from)?;
    Ok(layout_with_metrics(&diagram, measure, metrics)?)
}
