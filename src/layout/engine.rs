//! Layout computation engine
//!
//! Runs the phases in order:
//!
//! 1. **Ordering**: derive the left-to-right participant order
//! 2. **Collection**: gather every message with resolved endpoints
//! 3. **Horizontal solve**: lifeline positions from spacing constraints
//! 4. **Vertical stacking**: statement tops, heights and anchors, with
//!    frame borders and fragment boxes computed on the way down
//! 5. **Assembly**: participant and group boxes, total width and height
//!
//! Every phase reads the immutable statement tree; nothing is cached across
//! calls.

use tracing::{debug, warn};

use crate::ir::{Diagram, STARTER};

use super::collector::collect_messages;
use super::config::LayoutMetrics;
use super::error::LayoutError;
use super::measure::TextMeasure;
use super::participants::ParticipantOrder;
use super::scope::Scope;
use super::solver::HorizontalLayout;
use super::types::{DiagramLayout, GroupBox};
use super::vertical::VerticalStacker;

/// Compute the layout of `diagram`
pub fn compute(
    diagram: &Diagram,
    measure: &dyn TextMeasure,
    metrics: &LayoutMetrics,
) -> Result<DiagramLayout, LayoutError> {
    if diagram.is_empty() {
        warn!("diagram has no participants and no statements");
        return Ok(DiagramLayout::empty());
    }

    let order = ParticipantOrder::from_diagram(diagram);
    let horizontal = solve_horizontal(diagram, &order, measure, metrics)?;
    let vertical = VerticalStacker::new(&horizontal, measure, metrics).layout(diagram)?;

    let participants = horizontal.boxes();
    let groups = diagram
        .groups
        .iter()
        .map(|group| group_box(&group.name, &group.participants, &horizontal))
        .collect::<Result<Vec<_>, _>>()?;

    let layout = DiagramLayout {
        width: horizontal.width(),
        height: vertical.end_top + metrics.diagram_bottom_padding,
        participants,
        groups,
        frames: vertical.frames,
        fragments: vertical.fragments,
        statements: vertical.statements,
        creations: vertical.creations,
    };
    debug!(
        width = layout.width,
        height = layout.height,
        statements = layout.statements.len(),
        "layout complete"
    );
    Ok(layout)
}

/// Solve lifeline positions for `diagram`
pub fn solve_horizontal(
    diagram: &Diagram,
    order: &ParticipantOrder,
    measure: &dyn TextMeasure,
    metrics: &LayoutMetrics,
) -> Result<HorizontalLayout, LayoutError> {
    let origin = diagram.starter.as_deref().unwrap_or(STARTER);
    let messages = collect_messages(&diagram.root, &Scope::root(origin));
    HorizontalLayout::solve(order, &messages, measure, metrics)
}

fn group_box(
    name: &str,
    members: &[String],
    horizontal: &HorizontalLayout,
) -> Result<GroupBox, LayoutError> {
    let mut left = f64::INFINITY;
    let mut right = f64::NEG_INFINITY;
    for member in members {
        left = left.min(horizontal.left(member)?);
        right = right.max(horizontal.right(member)?);
    }
    if members.is_empty() {
        left = 0.0;
        right = 0.0;
    }
    Ok(GroupBox {
        name: name.to_string(),
        participants: members.to_vec(),
        left,
        right,
    })
}
