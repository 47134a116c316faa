//! Horizontal coordinate solver
//!
//! Participants are totally ordered, so every spacing requirement is a
//! forward difference constraint `position[j] - position[i] >= m[i][j]` with
//! `i < j`. The smallest satisfying positions are the longest paths from the
//! first participant in that DAG.

use indexmap::IndexMap;
use tracing::debug;

use super::collector::OwnedMessage;
use super::config::LayoutMetrics;
use super::error::LayoutError;
use super::measure::{TextKind, TextMeasure};
use super::participants::ParticipantOrder;
use super::types::ParticipantBox;
use crate::ir::MessageKind;

/// Upper-triangular matrix of minimum center distances
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintMatrix {
    m: Vec<Vec<f64>>,
}

impl ConstraintMatrix {
    pub fn new(size: usize) -> Self {
        Self {
            m: vec![vec![0.0; size]; size],
        }
    }

    pub fn size(&self) -> usize {
        self.m.len()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.m[i][j]
    }

    /// Raise the requirement between `a` and `b` to at least `distance`
    ///
    /// The pair is normalized so only forward constraints are stored;
    /// repeated requirements keep the maximum rather than accumulating.
    pub fn require(&mut self, a: usize, b: usize, distance: f64) {
        if a == b {
            return;
        }
        let (i, j) = (a.min(b), a.max(b));
        if distance > self.m[i][j] {
            self.m[i][j] = distance;
        }
    }

    /// Smallest positions satisfying every constraint, with `position[0] = start`
    ///
    /// Relaxation is repeated until a sweep changes nothing. For forward-only
    /// constraints the first sweep is already exact and the second confirms it.
    pub fn solve(&self, start: f64) -> Result<(Vec<f64>, usize), LayoutError> {
        let n = self.size();
        let mut positions = vec![start; n];
        let max_passes = n + 1;

        for pass in 1..=max_passes {
            let mut changed = false;
            for j in 1..n {
                for i in 0..j {
                    let required = self.m[i][j];
                    if required > 0.0 && positions[i] + required > positions[j] {
                        positions[j] = positions[i] + required;
                        changed = true;
                    }
                }
            }
            if !changed {
                return Ok((positions, pass));
            }
        }
        Err(LayoutError::SolverDidNotConverge { passes: max_passes })
    }
}

/// Solved horizontal positions for one diagram
///
/// Lookups by name fail with [`LayoutError::ParticipantNotFound`] rather
/// than defaulting to the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct HorizontalLayout {
    participants: ParticipantOrder,
    positions: Vec<f64>,
    /// Per-solve memo of participant half widths, index-aligned
    half_widths: Vec<f64>,
    box_widths: Vec<f64>,
    min_diagram_width: f64,
    passes: usize,
}

impl HorizontalLayout {
    /// Solve positions for `participants` under the spacing `messages` need
    pub fn solve(
        participants: &ParticipantOrder,
        messages: &[OwnedMessage],
        measure: &dyn TextMeasure,
        metrics: &LayoutMetrics,
    ) -> Result<Self, LayoutError> {
        let box_widths: Vec<f64> = participants
            .iter()
            .map(|p| {
                let width = p
                    .declared_width
                    .unwrap_or_else(|| measure.measure(p.display_label(), TextKind::ParticipantName));
                width.max(metrics.min_participant_width)
            })
            .collect();
        let half_widths: Vec<f64> = box_widths
            .iter()
            .map(|w| w / 2.0 + metrics.margin / 2.0)
            .collect();

        let mut matrix = ConstraintMatrix::new(participants.len());
        for i in 1..participants.len() {
            matrix.require(i - 1, i, half_widths[i - 1] + half_widths[i]);
        }
        for message in messages {
            let from = participants.require_index(&message.from)?;
            let to = participants.require_index(&message.to)?;
            if from == to {
                continue;
            }
            let mut required = measure.measure(&message.label, TextKind::MessageContent)
                + metrics.arrow_head_width
                + metrics.occurrence_width;
            if message.kind == MessageKind::Creation {
                required += half_widths[to];
            }
            matrix.require(from, to, required);
        }

        let (positions, passes) = matrix.solve(metrics.left_margin)?;
        debug!(
            participants = participants.len(),
            messages = messages.len(),
            passes,
            "solved horizontal positions"
        );

        Ok(Self {
            participants: participants.clone(),
            positions,
            half_widths,
            box_widths,
            min_diagram_width: metrics.min_diagram_width,
            passes,
        })
    }

    pub fn participants(&self) -> &ParticipantOrder {
        &self.participants
    }

    /// Positions index-aligned with the participant order
    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    /// Relaxation sweeps the solver needed (including the confirming sweep)
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Lifeline x of `name`
    pub fn position(&self, name: &str) -> Result<f64, LayoutError> {
        let index = self.participants.require_index(name)?;
        Ok(self.positions[index])
    }

    /// Half of the box width plus half the margin
    pub fn half_width(&self, name: &str) -> Result<f64, LayoutError> {
        let index = self.participants.require_index(name)?;
        Ok(self.half_widths[index])
    }

    /// Center distance from `left` to `right` (negative if reversed)
    pub fn distance(&self, left: &str, right: &str) -> Result<f64, LayoutError> {
        Ok(self.position(right)? - self.position(left)?)
    }

    /// Left edge of the participant box of `name`
    pub fn left(&self, name: &str) -> Result<f64, LayoutError> {
        let index = self.participants.require_index(name)?;
        Ok(self.positions[index] - self.box_widths[index] / 2.0)
    }

    /// Right edge of the participant box of `name`
    pub fn right(&self, name: &str) -> Result<f64, LayoutError> {
        let index = self.participants.require_index(name)?;
        Ok(self.positions[index] + self.box_widths[index] / 2.0)
    }

    /// Total diagram width, floored at the minimum; zero without participants
    pub fn width(&self) -> f64 {
        match (self.positions.last(), self.half_widths.last()) {
            (Some(position), Some(half)) => (position + half).max(self.min_diagram_width),
            _ => 0.0,
        }
    }

    /// Width a message label needs; creation arrows also reach into the
    /// created participant's box
    pub fn message_width(
        &self,
        message: &OwnedMessage,
        measure: &dyn TextMeasure,
    ) -> Result<f64, LayoutError> {
        let mut width = measure.measure(&message.label, TextKind::MessageContent);
        if message.kind == MessageKind::Creation {
            width += self.half_width(&message.to)?;
        }
        Ok(width)
    }

    /// Per-participant boxes keyed by name, in order
    pub fn boxes(&self) -> IndexMap<String, ParticipantBox> {
        self.participants
            .iter()
            .map(|p| {
                let center = self.positions[p.order];
                let width = self.box_widths[p.order];
                let b = ParticipantBox {
                    name: p.name.clone(),
                    label: p.display_label().to_string(),
                    order: p.order,
                    center,
                    half_width: self.half_widths[p.order],
                    left: center - width / 2.0,
                    right: center + width / 2.0,
                    width,
                };
                (p.name.clone(), b)
            })
            .collect()
    }
}
