//! Collects messages and participant mentions from the statement tree
//!
//! This module walks the tree and extracts:
//! - every message with its implicit endpoints resolved (the input of the
//!   horizontal solver and of fragment width computation)
//! - the participants a fragment references textually (the input of the
//!   frame builder)

use indexmap::IndexSet;

use crate::ir::{message_label, Block, Fragment, MessageKind, StatementKind};

use super::scope::Scope;

/// A message with both endpoints resolved
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedMessage {
    pub from: String,
    pub to: String,
    pub kind: MessageKind,
    /// Text drawn on the arrow
    pub label: String,
}

impl OwnedMessage {
    pub fn is_self(&self) -> bool {
        self.from == self.to
    }
}

/// Collect every message under `block`, depth first, in source order
pub fn collect_messages(block: &Block, scope: &Scope<'_>) -> Vec<OwnedMessage> {
    let mut messages = Vec::new();
    collect_block(block, scope, &mut messages);
    messages
}

/// Collect every message under `fragment`
pub fn collect_fragment_messages(fragment: &Fragment, scope: &Scope<'_>) -> Vec<OwnedMessage> {
    let mut messages = Vec::new();
    for branch in fragment.branches() {
        collect_block(branch, scope, &mut messages);
    }
    messages
}

fn collect_block(block: &Block, scope: &Scope<'_>, out: &mut Vec<OwnedMessage>) {
    for stmt in block {
        match &stmt.kind {
            StatementKind::Message(message) => {
                let (from, to) = scope.endpoints(message);
                out.push(OwnedMessage {
                    from: from.to_string(),
                    to: to.to_string(),
                    kind: message.kind,
                    label: message_label(message),
                });
                if let Some(nested) = message.nested_block() {
                    collect_block(nested, &scope.enter(from, to), out);
                }
            }
            StatementKind::Fragment(fragment) => {
                for branch in fragment.branches() {
                    collect_block(branch, scope, out);
                }
            }
            StatementKind::Divider(_) => {}
        }
    }
}

/// Participants referenced by name anywhere under `fragment`
///
/// Implicit senders and receivers are not textual references and are left
/// out; nested fragments and nested message blocks are included.
pub fn local_participants(fragment: &Fragment) -> IndexSet<&str> {
    let mut names = IndexSet::new();
    fragment_mentions(fragment, &mut names);
    names
}

fn fragment_mentions<'a>(fragment: &'a Fragment, names: &mut IndexSet<&'a str>) {
    if let Fragment::Ref { participants, .. } = fragment {
        names.extend(participants.iter().map(String::as_str));
    }
    for branch in fragment.branches() {
        block_mentions(branch, names);
    }
}

fn block_mentions<'a>(block: &'a Block, names: &mut IndexSet<&'a str>) {
    for stmt in block {
        match &stmt.kind {
            StatementKind::Message(message) => {
                names.extend(message.from.as_deref());
                names.extend(message.to.as_deref());
                if let Some(nested) = message.nested_block() {
                    block_mentions(nested, names);
                }
            }
            StatementKind::Fragment(fragment) => fragment_mentions(fragment, names),
            StatementKind::Divider(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Message, Statement};

    #[test]
    fn test_collect_resolves_origins() {
        let block = Block::new(vec![
            Message::new(MessageKind::Sync, "m")
                .to("A")
                .with_block(vec![Statement::sync("B", "n"), Statement::self_call("s")])
                .into(),
            Statement::fragment(Fragment::opt("x", vec![Statement::ret("done")])),
        ]);
        let messages = collect_messages(&block, &Scope::root("_STARTER_"));
        let pairs: Vec<(&str, &str)> = messages
            .iter()
            .map(|m| (m.from.as_str(), m.to.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("_STARTER_", "A"),
                ("A", "B"),
                ("A", "A"),
                ("_STARTER_", "_STARTER_"),
            ]
        );
        assert!(messages[2].is_self());
    }

    #[test]
    fn test_local_participants_are_textual() {
        let fragment = Fragment::alt(
            "x",
            vec![
                Statement::sync("A", "method"),
                Message::new(MessageKind::Sync, "method")
                    .to("B")
                    .with_block(vec![Statement::self_call("s100")])
                    .into(),
            ],
        );
        let names: Vec<&str> = local_participants(&fragment).into_iter().collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_local_participants_descend_into_nested_fragments() {
        let fragment = Fragment::loop_(
            "forever",
            vec![Statement::fragment(Fragment::opt(
                "x",
                vec![Statement::sync_from("C", "D", "m")],
            ))],
        );
        let names: Vec<&str> = local_participants(&fragment).into_iter().collect();
        assert_eq!(names, vec!["C", "D"]);
    }
}
