//! Output types of the layout engine
//!
//! Everything here is plain data. A renderer reads it; nothing in the engine
//! mutates it after it has been produced.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::ir::{FragmentKind, MessageKind};

/// Position of a statement in the tree as a dot-separated index path
///
/// Children of a message's nested block append their index. Children of a
/// fragment append the branch index and then their index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StatementId(Vec<usize>);

impl StatementId {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Id of the `index`-th statement in a block owned by `self`
    pub fn child(&self, index: usize) -> Self {
        let mut path = self.0.clone();
        path.push(index);
        Self(path)
    }

    /// Id of the `index`-th statement of branch `branch` of the fragment `self`
    pub fn branch_child(&self, branch: usize, index: usize) -> Self {
        let mut path = self.0.clone();
        path.push(branch);
        path.push(index);
        Self(path)
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for StatementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", index)?;
        }
        Ok(())
    }
}

impl FromStr for StatementId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }
        s.split('.')
            .map(str::parse)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl Serialize for StatementId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Horizontal placement of one participant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticipantBox {
    pub name: String,
    pub label: String,
    pub order: usize,
    /// Lifeline x position
    pub center: f64,
    /// Half the box width plus half the margin
    pub half_width: f64,
    pub left: f64,
    pub right: f64,
    /// Box width (measured label width, floored at the minimum)
    pub width: f64,
}

/// Horizontal extent of a participant group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupBox {
    pub name: String,
    pub participants: Vec<String>,
    pub left: f64,
    pub right: f64,
}

/// Padding reserved on each side of a fragment for nested border strokes
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameBorder {
    pub left: f64,
    pub right: f64,
}

/// Which way a message arrow points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    LeftToRight,
    RightToLeft,
    SelfCall,
}

/// Horizontal geometry of a message arrow
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageGeometry {
    pub from: String,
    pub to: String,
    pub direction: Direction,
    /// Activation layers on the sender at this statement
    pub source_layers: usize,
    /// Activation layers on the receiver at this statement, not counting the
    /// activation the message itself opens
    pub target_layers: usize,
    /// Absolute x of the arrow's left end
    pub x: f64,
    pub width: f64,
    /// `x` relative to the origin's current activation bar
    pub translate_x: f64,
}

/// Horizontal geometry of a fragment box
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FragmentGeometry {
    pub kind: FragmentKind,
    pub left_participant: String,
    pub right_participant: String,
    pub border: FrameBorder,
    /// Absolute x of the fragment's left edge
    pub x: f64,
    pub width: f64,
    /// `x` relative to the origin's current activation bar
    pub translate_x: f64,
}

/// Kind tag recorded with each statement coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateKind {
    Message(MessageKind),
    Fragment(FragmentKind),
    Divider,
}

/// Vertical reference points inside a statement
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Anchors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<f64>,
    /// y of the message arrow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<f64>,
    /// Top of the activation bar opened by the message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occurrence: Option<f64>,
    /// y of the return arrow closing the activation
    #[serde(rename = "return", skip_serializing_if = "Option::is_none")]
    pub ret: Option<f64>,
}

/// Vertical placement of one statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementCoordinate {
    pub top: f64,
    pub height: f64,
    pub kind: CoordinateKind,
    pub anchors: Anchors,
    /// Tops of the else-if/else or catch/finally separators
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub segments: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<MessageGeometry>,
}

impl StatementCoordinate {
    /// Cursor just below this statement
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Complete geometry of one diagram
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiagramLayout {
    pub width: f64,
    pub height: f64,
    pub participants: IndexMap<String, ParticipantBox>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<GroupBox>,
    pub frames: IndexMap<StatementId, FrameBorder>,
    pub fragments: IndexMap<StatementId, FragmentGeometry>,
    pub statements: IndexMap<StatementId, StatementCoordinate>,
    /// Top of the first creation message of each created participant
    pub creations: IndexMap<String, f64>,
}

impl DiagramLayout {
    /// Layout of a diagram with no participants and no statements
    pub fn empty() -> Self {
        Self::default()
    }

    /// Coordinate of the statement at `path` (e.g. `"1.0.2"`)
    pub fn statement(&self, path: &str) -> Option<&StatementCoordinate> {
        let id = path.parse::<StatementId>().ok()?;
        self.statements.get(&id)
    }

    /// Geometry of the fragment at `path`
    pub fn fragment(&self, path: &str) -> Option<&FragmentGeometry> {
        let id = path.parse::<StatementId>().ok()?;
        self.fragments.get(&id)
    }

    pub fn frame(&self, path: &str) -> Option<&FrameBorder> {
        let id = path.parse::<StatementId>().ok()?;
        self.frames.get(&id)
    }

    /// Debug dump keyed by statement id
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
