//! Fragment frame tree and border padding
//!
//! A [`Frame`] records the leftmost and rightmost participant a fragment
//! spans, plus the frames of the fragments nested in it. Nested fragments
//! sharing an edge with their parent stack their border strokes on that
//! side, so the parent reserves one padding unit per level of such nesting.

use crate::ir::{Block, Fragment, StatementKind};

use super::collector::local_participants;
use super::error::LayoutError;
use super::participants::ParticipantOrder;
use super::scope::Scope;
use super::types::{FrameBorder, StatementId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub left: String,
    pub right: String,
    pub children: Vec<Frame>,
}

impl Frame {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: Frame) -> Self {
        self.children.push(child);
        self
    }

    fn edge(&self, side: Side) -> &str {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Padding reserved on each side of this frame
    pub fn border(&self, padding_x: f64) -> FrameBorder {
        FrameBorder {
            left: padding_x * self.longest_path(Side::Left) as f64,
            right: padding_x * self.longest_path(Side::Right) as f64,
        }
    }

    /// Depth of the chain of nested frames sharing this frame's edge on `side`
    fn longest_path(&self, side: Side) -> usize {
        let edge = self.edge(side);
        1 + self
            .children
            .iter()
            .filter(|child| child.edge(side) == edge)
            .map(|child| child.longest_path(side))
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Builds frames against the global participant order
pub struct FrameBuilder<'a> {
    order: &'a ParticipantOrder,
}

impl<'a> FrameBuilder<'a> {
    pub fn new(order: &'a ParticipantOrder) -> Self {
        Self { order }
    }

    /// Frame of `fragment` (statement `id`) evaluated in `scope`
    ///
    /// A fragment that names no participant collapses onto the scope's origin.
    pub fn build(
        &self,
        fragment: &Fragment,
        scope: &Scope<'_>,
        id: &StatementId,
    ) -> Result<Frame, LayoutError> {
        let (left, right) = self.span(fragment, scope, id)?;
        let mut frame = Frame::new(left, right);
        for (branch_index, branch) in fragment.branches().into_iter().enumerate() {
            let base = BranchBase {
                id,
                branch: Some(branch_index),
            };
            self.collect_children(branch, scope, &base, &mut frame.children)?;
        }
        Ok(frame)
    }

    /// Leftmost and rightmost participant of `fragment` in global order
    pub fn span(
        &self,
        fragment: &Fragment,
        scope: &Scope<'_>,
        id: &StatementId,
    ) -> Result<(String, String), LayoutError> {
        let mut local = local_participants(fragment);
        if local.is_empty() {
            local.insert(scope.origin());
        }
        if let Some(missing) = local.iter().find(|name| !self.order.contains(name)) {
            return Err(LayoutError::inconsistent_span(id.to_string(), *missing));
        }

        let mut in_order = self.order.names().filter(|name| local.contains(name));
        let left = in_order.next();
        let right = in_order.last().or(left);
        match (left, right) {
            (Some(left), Some(right)) => Ok((left.to_string(), right.to_string())),
            _ => Err(LayoutError::inconsistent_span(id.to_string(), scope.origin())),
        }
    }

    fn collect_children(
        &self,
        block: &Block,
        scope: &Scope<'_>,
        base: &BranchBase<'_>,
        out: &mut Vec<Frame>,
    ) -> Result<(), LayoutError> {
        for (index, stmt) in block.iter().enumerate() {
            let id = base.child(index);
            match &stmt.kind {
                StatementKind::Fragment(fragment) => out.push(self.build(fragment, scope, &id)?),
                StatementKind::Message(message) => {
                    if let Some(nested) = message.nested_block() {
                        let (from, to) = scope.endpoints(message);
                        let inner = scope.enter(from, to);
                        let base = BranchBase {
                            id: &id,
                            branch: None,
                        };
                        self.collect_children(nested, &inner, &base, out)?;
                    }
                }
                StatementKind::Divider(_) => {}
            }
        }
        Ok(())
    }
}

/// Owner of a block: a fragment branch or a message's nested block
struct BranchBase<'a> {
    id: &'a StatementId,
    branch: Option<usize>,
}

impl BranchBase<'_> {
    fn child(&self, index: usize) -> StatementId {
        match self.branch {
            Some(branch) => self.id.branch_child(branch, index),
            None => self.id.child(index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Message, MessageKind, Statement};

    fn order() -> ParticipantOrder {
        ParticipantOrder::from_names(["_STARTER_", "A", "B", "C", "D"])
    }

    fn build(fragment: &Fragment) -> Result<Frame, LayoutError> {
        let order = order();
        FrameBuilder::new(&order).build(
            fragment,
            &Scope::root("_STARTER_"),
            &StatementId::root().child(0),
        )
    }

    #[test]
    fn test_single_frame_border() {
        let frame = Frame::new("A", "B");
        assert_eq!(
            frame.border(10.0),
            FrameBorder {
                left: 10.0,
                right: 10.0
            }
        );
    }

    #[test]
    fn test_same_span_child_doubles_border() {
        let frame = Frame::new("A", "B").with_child(Frame::new("A", "B"));
        assert_eq!(
            frame.border(10.0),
            FrameBorder {
                left: 20.0,
                right: 20.0
            }
        );
    }

    #[test]
    fn test_border_counts_each_side_separately() {
        // A..D
        //   A..D
        //     A..C
        //       A..B
        let frame = Frame::new("A", "D").with_child(
            Frame::new("A", "D").with_child(Frame::new("A", "C").with_child(Frame::new("A", "B"))),
        );
        let border = frame.border(10.0);
        assert_eq!(border.left, 40.0);
        assert_eq!(border.right, 20.0);
    }

    #[test]
    fn test_border_takes_longest_matching_chain() {
        let frame = Frame::new("A", "C")
            .with_child(Frame::new("B", "C"))
            .with_child(Frame::new("B", "C").with_child(Frame::new("B", "C")));
        let border = frame.border(10.0);
        assert_eq!(border.left, 10.0);
        assert_eq!(border.right, 30.0);
    }

    #[test]
    fn test_build_span_uses_global_order() {
        let fragment = Fragment::opt(
            "x",
            vec![
                Statement::sync_from("C", "B", "m"),
                Statement::sync_from("C", "D", "n"),
            ],
        );
        let frame = build(&fragment).unwrap();
        assert_eq!((frame.left.as_str(), frame.right.as_str()), ("B", "D"));
        assert!(frame.children.is_empty());
    }

    #[test]
    fn test_build_children_through_message_blocks() {
        let inner = Fragment::loop_("y", vec![Statement::sync_from("A", "C", "m")]);
        let fragment = Fragment::alt(
            "x",
            vec![Message::new(MessageKind::Sync, "call")
                .from("A")
                .to("B")
                .with_block(vec![Statement::fragment(inner)])
                .into()],
        );
        let frame = build(&fragment).unwrap();
        assert_eq!((frame.left.as_str(), frame.right.as_str()), ("A", "C"));
        assert_eq!(frame.children, vec![Frame::new("A", "C")]);
        assert_eq!(frame.border(10.0), FrameBorder { left: 20.0, right: 20.0 });
    }

    #[test]
    fn test_fragment_without_participants_collapses_to_origin() {
        let fragment = Fragment::opt("x", vec![Statement::self_call("s")]);
        let frame = build(&fragment).unwrap();
        assert_eq!(frame, Frame::new("_STARTER_", "_STARTER_"));
    }

    #[test]
    fn test_unknown_participant_is_inconsistent_span() {
        let fragment = Fragment::opt("x", vec![Statement::sync("Ghost", "m")]);
        let err = build(&fragment).unwrap_err();
        assert_eq!(
            err,
            LayoutError::InconsistentFrameSpan {
                fragment: "0".to_string(),
                participant: "Ghost".to_string(),
            }
        );
    }
}
