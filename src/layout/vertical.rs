//! Vertical coordinate stacker
//!
//! Walks the statement tree top to bottom. The cursor is a plain value
//! passed into each layout function and returned advanced; the only
//! side effect is appending finished records to a [`VerticalLayout`].

use indexmap::IndexMap;
use tracing::debug;

use crate::ir::{
    assignment_label, message_label, Block, Diagram, Fragment, FragmentKind, Message, MessageKind,
    Statement, StatementKind, STARTER,
};

use super::anchor::{origin_anchor, Anchor};
use super::collector::OwnedMessage;
use super::comment::comment_height;
use super::config::LayoutMetrics;
use super::error::LayoutError;
use super::fragment::fragment_geometry;
use super::measure::TextMeasure;
use super::scope::Scope;
use super::solver::HorizontalLayout;
use super::types::{
    Anchors, CoordinateKind, Direction, FragmentGeometry, FrameBorder, MessageGeometry,
    StatementCoordinate, StatementId,
};

/// Everything the stacker records for one diagram
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerticalLayout {
    pub statements: IndexMap<StatementId, StatementCoordinate>,
    /// Top of the first creation message of each created participant
    pub creations: IndexMap<String, f64>,
    pub frames: IndexMap<StatementId, FrameBorder>,
    pub fragments: IndexMap<StatementId, FragmentGeometry>,
    /// Cursor after the last root statement
    pub end_top: f64,
}

/// Where a block sits in the tree
#[derive(Clone, Copy)]
struct BlockContext<'s, 'p> {
    scope: &'s Scope<'s>,
    parent: &'p StatementId,
    /// Branch index when the block belongs to a fragment
    branch: Option<usize>,
    /// Kind of the fragment owning the block, if any
    fragment: Option<FragmentKind>,
}

impl BlockContext<'_, '_> {
    fn child_id(&self, index: usize) -> StatementId {
        match self.branch {
            Some(branch) => self.parent.branch_child(branch, index),
            None => self.parent.child(index),
        }
    }
}

/// Height and anchors of a statement body (everything below its comment)
struct Body {
    height: f64,
    anchors: Anchors,
    segments: Vec<f64>,
    message: Option<MessageGeometry>,
}

impl Body {
    fn plain(height: f64) -> Self {
        Self {
            height,
            anchors: Anchors::default(),
            segments: Vec::new(),
            message: None,
        }
    }
}

pub struct VerticalStacker<'a> {
    horizontal: &'a HorizontalLayout,
    measure: &'a dyn TextMeasure,
    metrics: &'a LayoutMetrics,
}

impl<'a> VerticalStacker<'a> {
    pub fn new(
        horizontal: &'a HorizontalLayout,
        measure: &'a dyn TextMeasure,
        metrics: &'a LayoutMetrics,
    ) -> Self {
        Self {
            horizontal,
            measure,
            metrics,
        }
    }

    /// Lay out the whole diagram starting below the participant headers
    pub fn layout(&self, diagram: &Diagram) -> Result<VerticalLayout, LayoutError> {
        let origin = diagram.starter.as_deref().unwrap_or(STARTER);
        let start = self.metrics.first_statement_top(diagram.title.is_some());
        let mut out = VerticalLayout::default();
        let end = self.layout_block(
            &diagram.root,
            &Scope::root(origin),
            &StatementId::root(),
            start,
            &mut out,
        )?;
        out.end_top = end;
        Ok(out)
    }

    /// Lay out a block owned by the statement `parent`, starting at `top`;
    /// returns the cursor after the block
    pub fn layout_block(
        &self,
        block: &Block,
        scope: &Scope<'_>,
        parent: &StatementId,
        top: f64,
        out: &mut VerticalLayout,
    ) -> Result<f64, LayoutError> {
        let ctx = BlockContext {
            scope,
            parent,
            branch: None,
            fragment: None,
        };
        self.block(block, ctx, top, out)
    }

    fn block(
        &self,
        block: &Block,
        ctx: BlockContext<'_, '_>,
        top: f64,
        out: &mut VerticalLayout,
    ) -> Result<f64, LayoutError> {
        let mut gap = self.metrics.statement_margin;
        if ctx.fragment == Some(FragmentKind::Par) {
            gap += self.metrics.par_gap;
        }

        let mut cursor = top;
        for (index, stmt) in block.iter().enumerate() {
            if index > 0 {
                cursor += gap;
            }
            let id = ctx.child_id(index);
            cursor += self.statement(stmt, &id, ctx.scope, cursor, out)?;
        }
        Ok(cursor)
    }

    /// Lay out one statement at `top`; returns its height
    fn statement(
        &self,
        stmt: &Statement,
        id: &StatementId,
        scope: &Scope<'_>,
        top: f64,
        out: &mut VerticalLayout,
    ) -> Result<f64, LayoutError> {
        let comment = stmt
            .comment
            .as_deref()
            .map(|text| comment_height(text, self.metrics))
            .unwrap_or(0.0);
        let body_top = top + comment;

        let kind = match &stmt.kind {
            StatementKind::Message(m) => CoordinateKind::Message(m.kind),
            StatementKind::Fragment(f) => CoordinateKind::Fragment(f.kind()),
            StatementKind::Divider(_) => CoordinateKind::Divider,
        };
        // Reserve the slot so parents precede their children in the output
        out.statements.insert(
            id.clone(),
            StatementCoordinate {
                top,
                height: 0.0,
                kind,
                anchors: Anchors::default(),
                segments: Vec::new(),
                message: None,
            },
        );

        let mut body = match &stmt.kind {
            StatementKind::Message(message) => {
                self.message(message, id, scope, top, body_top, out)?
            }
            StatementKind::Fragment(fragment) => {
                self.fragment(fragment, id, scope, body_top, out)?
            }
            StatementKind::Divider(_) => Body::plain(self.metrics.divider_height),
        };
        if comment > 0.0 {
            body.anchors.comment = Some(top);
        }

        let height = comment + body.height;
        debug!(id = %id, top, height, "statement laid out");
        out.statements.insert(
            id.clone(),
            StatementCoordinate {
                top,
                height,
                kind,
                anchors: body.anchors,
                segments: body.segments,
                message: body.message,
            },
        );
        Ok(height)
    }

    fn message(
        &self,
        message: &Message,
        id: &StatementId,
        scope: &Scope<'_>,
        top: f64,
        body_top: f64,
        out: &mut VerticalLayout,
    ) -> Result<Body, LayoutError> {
        let m = self.metrics;
        let (from, to) = scope.endpoints(message);
        let is_self = from == to;
        let geometry = self.message_geometry(message, from, to, scope)?;

        let mut anchors = Anchors::default();
        let height = match message.kind {
            MessageKind::Sync | MessageKind::Creation => {
                let row = match message.kind {
                    MessageKind::Creation => m.creation_message_height,
                    _ if is_self => m.self_message_height,
                    _ => m.message_height,
                };
                if message.kind == MessageKind::Creation {
                    out.creations.entry(to.to_string()).or_insert(top);
                    // the arrow points at the middle of the created box
                    anchors.message = Some(body_top + row / 2.0);
                } else {
                    anchors.message = Some(body_top + row);
                }
                anchors.occurrence = Some(body_top + row);

                let occurrence = match message.nested_block() {
                    Some(block) => {
                        let nested_top = body_top + row;
                        let inner = scope.enter(from, to);
                        let end = self.layout_block(block, &inner, id, nested_top, out)?;
                        (end - nested_top + m.occurrence_closing_height)
                            .max(m.occurrence_min_height)
                    }
                    None => m.occurrence_min_height,
                };
                let mut height = row + occurrence;
                if message.assignee.is_some() || message.nested_block().is_some() {
                    anchors.ret = Some(body_top + height);
                }
                if assignment_label(message, to).is_some() {
                    height += m.assignment_label_height;
                }
                height
            }
            MessageKind::Async | MessageKind::Return => {
                let height = if is_self {
                    let label = if message.signature.trim().is_empty() {
                        0.0
                    } else {
                        m.self_async_label_height
                    };
                    m.self_async_message_height + label
                } else if message.kind == MessageKind::Return {
                    m.return_message_height
                } else {
                    m.async_message_height
                };
                anchors.message = Some(body_top + height);
                height
            }
        };

        Ok(Body {
            height,
            anchors,
            segments: Vec::new(),
            message: Some(geometry),
        })
    }

    /// Arrow geometry, measured between activation bar walls
    fn message_geometry(
        &self,
        message: &Message,
        from: &str,
        to: &str,
        scope: &Scope<'_>,
    ) -> Result<MessageGeometry, LayoutError> {
        let h = self.horizontal;
        let source_layers = scope.activation_layers(from);
        let target_layers = scope.activation_layers(to);
        let source = Anchor::new(h.position(from)?, source_layers, self.metrics);
        let mut target = Anchor::new(h.position(to)?, target_layers, self.metrics);
        if message.kind.activates() {
            target = target.activated();
        }
        let origin = origin_anchor(scope, h, self.metrics)?;

        let (direction, x, width) = if from == to {
            let owned = OwnedMessage {
                from: from.to_string(),
                to: to.to_string(),
                kind: message.kind,
                label: message_label(message),
            };
            let width = h.message_width(&owned, self.measure)? + self.metrics.arrow_head_width;
            (Direction::SelfCall, source.right_edge_of_right_wall(), width)
        } else if source.position() < target.position() {
            let width = source.edge_offset(&target);
            (Direction::LeftToRight, source.right_edge_of_right_wall(), width)
        } else {
            let width = -source.edge_offset(&target);
            (Direction::RightToLeft, target.right_edge_of_right_wall(), width)
        };

        Ok(MessageGeometry {
            from: from.to_string(),
            to: to.to_string(),
            direction,
            source_layers,
            target_layers,
            x,
            width,
            translate_x: x - origin.center_of_right_wall(),
        })
    }

    fn fragment(
        &self,
        fragment: &Fragment,
        id: &StatementId,
        scope: &Scope<'_>,
        body_top: f64,
        out: &mut VerticalLayout,
    ) -> Result<Body, LayoutError> {
        let m = self.metrics;
        let geometry = fragment_geometry(fragment, scope, id, self.horizontal, self.measure, m)?;
        out.frames.insert(id.clone(), geometry.border);
        out.fragments.insert(id.clone(), geometry);

        let kind = fragment.kind();
        let branch = |index: usize| BlockContext {
            scope,
            parent: id,
            branch: Some(index),
            fragment: Some(kind),
        };
        let label = |text: Option<&str>| match text {
            Some(text) if !text.trim().is_empty() => m.condition_label_height,
            _ => 0.0,
        };

        let mut segments = Vec::new();
        let mut cursor = body_top + m.fragment_header_height;
        match fragment {
            Fragment::Alt {
                block,
                else_ifs,
                else_block,
                ..
            } => {
                cursor += m.condition_label_height;
                cursor = self.block(block, branch(0), cursor, out)?;
                for (i, else_if) in else_ifs.iter().enumerate() {
                    segments.push(cursor);
                    cursor += m.segment_label_height;
                    cursor = self.block(&else_if.block, branch(i + 1), cursor, out)?;
                }
                if let Some(else_block) = else_block {
                    segments.push(cursor);
                    cursor += m.segment_label_height;
                    cursor = self.block(else_block, branch(else_ifs.len() + 1), cursor, out)?;
                }
            }
            Fragment::Opt(region)
            | Fragment::Loop(region)
            | Fragment::Par(region)
            | Fragment::Critical(region)
            | Fragment::Section(region) => {
                cursor += label(region.condition.as_deref());
                cursor = self.block(&region.block, branch(0), cursor, out)?;
            }
            Fragment::Tcf {
                block,
                catches,
                finally,
            } => {
                cursor = self.block(block, branch(0), cursor, out)?;
                for (i, catch) in catches.iter().enumerate() {
                    segments.push(cursor);
                    cursor += m.segment_label_height;
                    cursor = self.block(&catch.block, branch(i + 1), cursor, out)?;
                }
                if let Some(finally) = finally {
                    segments.push(cursor);
                    cursor += m.segment_label_height;
                    cursor = self.block(finally, branch(catches.len() + 1), cursor, out)?;
                }
            }
            Fragment::Ref { label: text, .. } => {
                cursor += label(Some(text.as_str()));
            }
        }
        cursor += m.fragment_bottom_padding;

        Ok(Body {
            height: cursor - body_top,
            anchors: Anchors::default(),
            segments,
            message: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::ParticipantDecl;
    use crate::layout::collector::collect_messages;
    use crate::layout::measure::TextKind;
    use crate::layout::participants::ParticipantOrder;

    fn zero(_text: &str, _kind: TextKind) -> f64 {
        0.0
    }

    fn stack(diagram: &Diagram) -> Result<VerticalLayout, LayoutError> {
        let metrics = LayoutMetrics::default();
        let order = ParticipantOrder::from_diagram(diagram);
        let origin = diagram.starter.as_deref().unwrap_or(STARTER);
        let messages = collect_messages(&diagram.root, &Scope::root(origin));
        let horizontal = HorizontalLayout::solve(&order, &messages, &zero, &metrics)?;
        VerticalStacker::new(&horizontal, &zero, &metrics).layout(diagram)
    }

    fn coord<'v>(layout: &'v VerticalLayout, path: &str) -> &'v StatementCoordinate {
        let id: StatementId = path.parse().unwrap();
        &layout.statements[&id]
    }

    #[test]
    fn test_sync_message_heights() {
        let diagram = Diagram::new(
            vec![Statement::sync("A", "cross"), Statement::self_call("self")].into(),
        );
        let layout = stack(&diagram).unwrap();
        assert_eq!(coord(&layout, "0").height, 55.0);
        assert_eq!(coord(&layout, "1").top, 128.0);
        assert_eq!(coord(&layout, "1").height, 40.0);
        assert_eq!(coord(&layout, "1").top, coord(&layout, "0").bottom() + 1.0);
        assert_eq!(layout.end_top, 168.0);
        assert_eq!(layout.end_top, coord(&layout, "1").bottom());
    }

    #[test]
    fn test_nested_block_extends_occurrence() {
        let outer = Message::new(MessageKind::Sync, "m1")
            .to("A")
            .with_block(vec![Statement::sync("B", "m2")]);
        let diagram = Diagram::new(vec![Statement::from(outer)].into());
        let layout = stack(&diagram).unwrap();
        let inner = coord(&layout, "0.0");
        assert_eq!(inner.top, 72.0 + 31.0);
        assert_eq!(inner.height, 55.0);
        // 31 row + 55 nested + 20 closing
        assert_eq!(coord(&layout, "0").height, 106.0);
        assert_eq!(coord(&layout, "0").anchors.ret, Some(72.0 + 106.0));
    }

    #[test]
    fn test_async_heights() {
        let diagram = Diagram::new(
            vec![
                Statement::async_msg("A", "B", "ping"),
                Statement::async_msg("A", "A", "note"),
                Statement::async_msg("A", "A", ""),
            ]
            .into(),
        );
        let layout = stack(&diagram).unwrap();
        assert_eq!(coord(&layout, "0").height, 16.0);
        assert_eq!(coord(&layout, "1").height, 54.0);
        assert_eq!(coord(&layout, "2").height, 44.0);
    }

    #[test]
    fn test_alt_segments() {
        let alt = Fragment::alt("x", vec![Statement::sync("A", "a")])
            .or("y", vec![])
            .otherwise(vec![Statement::sync("A", "c")]);
        let diagram = Diagram::new(vec![Statement::fragment(alt)].into());
        let layout = stack(&diagram).unwrap();
        let c = coord(&layout, "0");
        // header 25 + condition 20 + 55, else-if label 20 + 0, else label 20 + 55, bottom 10
        assert_eq!(c.height, 205.0);
        assert_eq!(c.segments, vec![72.0 + 100.0, 72.0 + 120.0]);
        assert_eq!(coord(&layout, "0.0.0").top, 72.0 + 45.0);
        assert_eq!(coord(&layout, "0.2.0").top, 72.0 + 140.0);
    }

    #[test]
    fn test_par_adds_separation() {
        let par = Fragment::par(vec![
            Statement::sync("A", "a"),
            Statement::sync("A", "b"),
            Statement::sync("A", "c"),
        ]);
        let diagram = Diagram::new(vec![Statement::fragment(par)].into());
        let layout = stack(&diagram).unwrap();
        assert_eq!(coord(&layout, "0.0.0").top, 97.0);
        assert_eq!(coord(&layout, "0.0.1").top, 97.0 + 55.0 + 2.0);
        assert_eq!(coord(&layout, "0.0.2").top, 97.0 + 2.0 * 57.0);
    }

    #[test]
    fn test_tcf_and_divider() {
        let tcf = Fragment::tcf(vec![Statement::sync("A", "a")])
            .or("Error e", vec![Statement::sync("A", "b")])
            .otherwise(vec![]);
        let diagram = Diagram::new(
            vec![Statement::fragment(tcf), Statement::divider("later")].into(),
        );
        let layout = stack(&diagram).unwrap();
        // header 25 + 55, catch 20 + 55, finally 20, bottom 10
        assert_eq!(coord(&layout, "0").height, 185.0);
        assert_eq!(coord(&layout, "0").segments.len(), 2);
        assert_eq!(coord(&layout, "1").height, 30.0);
    }

    #[test]
    fn test_comment_is_part_of_statement() {
        let diagram = Diagram::new(
            vec![Statement::sync("A", "m").with_comment("two\nlines")].into(),
        );
        let layout = stack(&diagram).unwrap();
        let c = coord(&layout, "0");
        assert_eq!(c.top, 72.0);
        assert_eq!(c.height, 32.0 + 55.0);
        assert_eq!(c.anchors.comment, Some(72.0));
        assert_eq!(c.anchors.message, Some(72.0 + 32.0 + 31.0));
    }

    #[test]
    fn test_only_first_creation_is_recorded() {
        let diagram = Diagram::new(
            vec![
                Statement::creation("A").with_comment("make it"),
                Statement::creation("A"),
            ]
            .into(),
        );
        let layout = stack(&diagram).unwrap();
        assert_eq!(layout.creations.len(), 1);
        assert_eq!(layout.creations["A"], 72.0);
    }

    #[test]
    fn test_self_call_activation_layers() {
        let outer = Message::new(MessageKind::Sync, "m1")
            .to("A")
            .with_block(vec![Statement::sync("A", "m2")]);
        let diagram = Diagram::new(vec![Statement::from(outer)].into());
        let layout = stack(&diagram).unwrap();
        let outer = coord(&layout, "0").message.as_ref().unwrap();
        let inner = coord(&layout, "0.0").message.as_ref().unwrap();
        assert_eq!(outer.target_layers, 0);
        assert_eq!(inner.target_layers, 1);
        assert_eq!(inner.direction, Direction::SelfCall);
        // inner self call starts at the right edge of the first bar
        assert_eq!(inner.x, 104.0 + 7.0);
    }

    #[test]
    fn test_inconsistent_horizontal_layout_fails_fast() {
        let metrics = LayoutMetrics::default();
        let other = Diagram::default().with_participant(ParticipantDecl::new("X"));
        let horizontal = HorizontalLayout::solve(
            &ParticipantOrder::from_diagram(&other),
            &[],
            &zero,
            &metrics,
        )
        .unwrap();
        let diagram = Diagram::new(vec![Statement::sync_from("X", "Y", "m")].into());
        let result = VerticalStacker::new(&horizontal, &zero, &metrics).layout(&diagram);
        assert!(matches!(
            result,
            Err(LayoutError::ParticipantNotFound { ref name, .. }) if name == "Y"
        ));
    }
}
