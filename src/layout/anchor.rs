//! Anchor and occurrence-bar geometry
//!
//! An [`Anchor`] is a lifeline position plus the number of activation bars
//! stacked on it at some point of the statement tree. Each layer after the
//! first shifts the bar right by a fixed step, so arrow and fragment spacing
//! must be measured between bar walls, never between raw lifeline centers.

use super::config::LayoutMetrics;
use super::error::LayoutError;
use super::scope::Scope;
use super::solver::HorizontalLayout;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    position: f64,
    layers: usize,
    side_width: f64,
    lifeline_width: f64,
}

impl Anchor {
    pub fn new(position: f64, layers: usize, metrics: &LayoutMetrics) -> Self {
        Self {
            position,
            layers,
            side_width: metrics.occurrence_bar_side_width,
            lifeline_width: metrics.lifeline_width,
        }
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn layers(&self) -> usize {
        self.layers
    }

    /// Same anchor with one more activation bar on top
    pub fn activated(&self) -> Self {
        Self {
            layers: self.layers + 1,
            ..*self
        }
    }

    /// Center of the outermost (rightmost) activation bar
    pub fn center_of_right_wall(&self) -> f64 {
        if self.layers <= 1 {
            self.position
        } else {
            self.position + self.side_width * (self.layers - 1) as f64
        }
    }

    pub fn right_edge_of_right_wall(&self) -> f64 {
        self.position + self.side_width * self.layers as f64
    }

    pub fn left_edge_of_right_wall(&self) -> f64 {
        if self.layers == 0 {
            self.position
        } else {
            self.center_of_right_wall() - self.side_width
        }
    }

    /// Offset from this anchor's outermost bar to `other`'s
    pub fn center_to_center(&self, other: &Anchor) -> f64 {
        other.center_of_right_wall() - self.center_of_right_wall()
    }

    /// Free space between the facing bar walls of `self` (sender) and
    /// `other` (receiver), negative when the call goes right to left
    pub fn edge_offset(&self, other: &Anchor) -> f64 {
        if self.position == other.position {
            return 0.0;
        }
        let (left, right) = if self.position < other.position {
            (self, other)
        } else {
            (other, self)
        };
        let distance =
            right.left_edge_of_right_wall() - left.right_edge_of_right_wall() - self.lifeline_width;
        if self.position < other.position {
            distance
        } else {
            -distance
        }
    }
}

/// Anchor of the participant whose activation encloses `scope`
///
/// At the root the origin is the starter, which only exists when some
/// root-level message relies on it; otherwise offsets are taken from the
/// left margin.
pub fn origin_anchor(
    scope: &Scope<'_>,
    horizontal: &HorizontalLayout,
    metrics: &LayoutMetrics,
) -> Result<Anchor, LayoutError> {
    let origin = scope.origin();
    if scope.is_root() && !horizontal.participants().contains(origin) {
        return Ok(Anchor::new(metrics.left_margin, 0, metrics));
    }
    Ok(Anchor::new(
        horizontal.position(origin)?,
        scope.activation_layers(origin),
        metrics,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor(position: f64, layers: usize) -> Anchor {
        Anchor::new(position, layers, &LayoutMetrics::default())
    }

    #[test]
    fn test_walls_without_activation() {
        let a = anchor(100.0, 0);
        assert_eq!(a.center_of_right_wall(), 100.0);
        assert_eq!(a.right_edge_of_right_wall(), 100.0);
        assert_eq!(a.left_edge_of_right_wall(), 100.0);
    }

    #[test]
    fn test_walls_single_activation() {
        let a = anchor(100.0, 1);
        assert_eq!(a.center_of_right_wall(), 100.0);
        assert_eq!(a.right_edge_of_right_wall(), 107.0);
        assert_eq!(a.left_edge_of_right_wall(), 93.0);
    }

    #[test]
    fn test_walls_stacked_activation() {
        let a = anchor(100.0, 3);
        assert_eq!(a.center_of_right_wall(), 114.0);
        assert_eq!(a.right_edge_of_right_wall(), 121.0);
        assert_eq!(a.left_edge_of_right_wall(), 107.0);
        assert_eq!(a.activated().layers(), 4);
    }

    #[test]
    fn test_center_to_center() {
        let origin = anchor(0.0, 2);
        let target = anchor(100.0, 0);
        assert_eq!(origin.center_to_center(&target), 93.0);
        assert_eq!(target.center_to_center(&origin), -93.0);
    }

    #[test]
    fn test_origin_anchor_without_starter() {
        use crate::layout::participants::ParticipantOrder;

        let metrics = LayoutMetrics::default().with_left_margin(5.0);
        let order = ParticipantOrder::from_names(["A", "B"]);
        let zero = |_: &str, _: crate::layout::measure::TextKind| 0.0;
        let horizontal = HorizontalLayout::solve(&order, &[], &zero, &metrics).unwrap();

        let root = Scope::root("_STARTER_");
        assert_eq!(origin_anchor(&root, &horizontal, &metrics).unwrap().position(), 5.0);

        let inner = root.enter("A", "B");
        let anchor = origin_anchor(&inner, &horizontal, &metrics).unwrap();
        assert_eq!((anchor.position(), anchor.layers()), (109.0, 1));

        let stray = inner.enter("B", "Ghost");
        assert!(origin_anchor(&stray, &horizontal, &metrics).is_err());
    }

    #[test]
    fn test_edge_offset_direction() {
        let a = anchor(0.0, 1);
        let b = anchor(200.0, 1);
        // 193 - 7 - 1
        assert_eq!(a.edge_offset(&b), 185.0);
        assert_eq!(b.edge_offset(&a), -185.0);
        assert_eq!(a.edge_offset(&anchor(0.0, 3)), 0.0);
    }
}
