//! Left-to-right participant ordering
//!
//! Declared participants come first, in declaration order, followed by
//! group members not declared on their own. Every other name is appended
//! the first time a message or `ref` mentions it. When a root-level message
//! is sent by the implicit starter, `_STARTER_` is synthesized and moved to
//! the front.

use indexmap::IndexMap;

use crate::ir::{Block, Diagram, Fragment, StatementKind, STARTER};

use super::error::LayoutError;
use super::scope::Scope;

/// A participant in its final horizontal slot
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub name: String,
    pub label: Option<String>,
    pub declared_width: Option<f64>,
    /// Position in the left-to-right sequence
    pub order: usize,
}

impl Participant {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            label: None,
            declared_width: None,
            order: 0,
        }
    }

    /// Text drawn in the participant box
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// Ordered, uniquely named participants of one diagram
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticipantOrder {
    participants: IndexMap<String, Participant>,
}

impl ParticipantOrder {
    /// Derive the ordering for `diagram`
    pub fn from_diagram(diagram: &Diagram) -> Self {
        let mut builder = OrderBuilder::default();
        for decl in &diagram.participants {
            let p = builder.mention(&decl.name);
            if decl.label.is_some() {
                p.label = decl.label.clone();
            }
            if decl.width.is_some() {
                p.declared_width = decl.width;
            }
        }
        for group in &diagram.groups {
            for name in &group.participants {
                builder.mention(name);
            }
        }

        let origin = diagram.starter.as_deref().unwrap_or(STARTER);
        builder.walk_block(&diagram.root, &Scope::root(origin));

        let front = match diagram.starter.as_deref() {
            Some(starter) if !builder.participants.contains_key(starter) => Some(starter),
            Some(_) => None,
            None if builder.participants.contains_key(STARTER) => Some(STARTER),
            None => None,
        };
        Self::finish(builder.participants, front)
    }

    /// Build an ordering from plain names (used by tests and hosts that
    /// already know their participants)
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut participants = IndexMap::new();
        for name in names {
            let name = name.as_ref();
            participants
                .entry(name.to_string())
                .or_insert_with(|| Participant::new(name));
        }
        Self::finish(participants, None)
    }

    /// Move `front` (if any) to slot zero and number every participant
    fn finish(mut participants: IndexMap<String, Participant>, front: Option<&str>) -> Self {
        if let Some(front) = front {
            let first = participants
                .shift_remove(front)
                .unwrap_or_else(|| Participant::new(front));
            let mut reordered = IndexMap::with_capacity(participants.len() + 1);
            reordered.insert(first.name.clone(), first);
            reordered.extend(participants);
            participants = reordered;
        }
        for (order, p) in participants.values_mut().enumerate() {
            p.order = order;
        }
        Self { participants }
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.participants.keys().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.participants.contains_key(name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.participants.get_index_of(name)
    }

    pub fn get(&self, name: &str) -> Option<&Participant> {
        self.participants.get(name)
    }

    /// Look up a participant, failing with suggestions when it is unknown
    pub fn require(&self, name: &str) -> Result<&Participant, LayoutError> {
        self.participants
            .get(name)
            .ok_or_else(|| LayoutError::participant_not_found(name, self.names()))
    }

    /// Index of `name`, failing with suggestions when it is unknown
    pub fn require_index(&self, name: &str) -> Result<usize, LayoutError> {
        self.require(name).map(|p| p.order)
    }
}

#[derive(Default)]
struct OrderBuilder {
    participants: IndexMap<String, Participant>,
}

impl OrderBuilder {
    fn mention(&mut self, name: &str) -> &mut Participant {
        self.participants
            .entry(name.to_string())
            .or_insert_with(|| Participant::new(name))
    }

    fn walk_block(&mut self, block: &Block, scope: &Scope<'_>) {
        for stmt in block {
            match &stmt.kind {
                StatementKind::Message(message) => {
                    let (from, to) = scope.endpoints(message);
                    self.mention(from);
                    self.mention(to);
                    if let Some(nested) = message.nested_block() {
                        self.walk_block(nested, &scope.enter(from, to));
                    }
                }
                StatementKind::Fragment(fragment) => {
                    if let Fragment::Ref { participants, .. } = fragment {
                        for name in participants {
                            self.mention(name);
                        }
                    }
                    // A fragment without explicit participants collapses
                    // onto its origin, which therefore has to exist.
                    if super::collector::local_participants(fragment).is_empty() {
                        self.mention(scope.origin());
                    }
                    for branch in fragment.branches() {
                        self.walk_block(branch, scope);
                    }
                }
                StatementKind::Divider(_) => {}
            }
        }
    }
}
