//! Horizontal geometry of fragment boxes

use crate::ir::Fragment;

use super::anchor::{origin_anchor, Anchor};
use super::collector::{collect_fragment_messages, OwnedMessage};
use super::config::LayoutMetrics;
use super::error::LayoutError;
use super::frame::FrameBuilder;
use super::measure::TextMeasure;
use super::scope::Scope;
use super::solver::HorizontalLayout;
use super::types::{FragmentGeometry, StatementId};

/// Compute the box of `fragment` (statement `id`) evaluated in `scope`
pub fn fragment_geometry(
    fragment: &Fragment,
    scope: &Scope<'_>,
    id: &StatementId,
    horizontal: &HorizontalLayout,
    measure: &dyn TextMeasure,
    metrics: &LayoutMetrics,
) -> Result<FragmentGeometry, LayoutError> {
    let frame = FrameBuilder::new(horizontal.participants()).build(fragment, scope, id)?;
    let border = frame.border(metrics.fragment_padding_x);
    let (left, right) = (frame.left.as_str(), frame.right.as_str());

    let messages = collect_fragment_messages(fragment, scope);
    let extra = self_message_overflow(&messages, right, horizontal, measure)?;
    let half_left = horizontal.half_width(left)?;
    let span = horizontal.distance(left, right)?
        + border.left
        + border.right
        + half_left
        + horizontal.half_width(right)?
        + extra;
    let width = span.max(metrics.fragment_min_width);

    let origin = origin_anchor(scope, horizontal, metrics)?;
    let left_anchor = Anchor::new(horizontal.position(left)?, 0, metrics);
    let translate_x = origin.center_to_center(&left_anchor) - half_left - border.left;

    Ok(FragmentGeometry {
        kind: fragment.kind(),
        left_participant: left.to_string(),
        right_participant: right.to_string(),
        border,
        x: left_anchor.position() - half_left - border.left,
        width,
        translate_x,
    })
}

/// How far self-message labels reach past the right participant's box
fn self_message_overflow(
    messages: &[OwnedMessage],
    right: &str,
    horizontal: &HorizontalLayout,
    measure: &dyn TextMeasure,
) -> Result<f64, LayoutError> {
    let half_right = horizontal.half_width(right)?;
    let mut overflow: f64 = 0.0;
    for message in messages.iter().filter(|m| m.is_self()) {
        let reach = horizontal.message_width(message, measure)?
            - horizontal.distance(&message.from, right)?
            - half_right;
        overflow = overflow.max(reach);
    }
    Ok(overflow)
}
