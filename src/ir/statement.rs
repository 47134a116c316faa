//! Statement tree types handed to the layout engine
//!
//! The tree is produced by an external IR builder (or deserialized from JSON)
//! and is never mutated by the engine.

use serde::{Deserialize, Serialize};

/// Name of the participant synthesized when a root-level message has no sender
pub const STARTER: &str = "_STARTER_";

/// A complete sequence diagram
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Explicitly declared starter participant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starter: Option<String>,
    #[serde(default)]
    pub participants: Vec<ParticipantDecl>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub root: Block,
}

impl Diagram {
    pub fn new(root: Block) -> Self {
        Self {
            root,
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_starter(mut self, starter: impl Into<String>) -> Self {
        self.starter = Some(starter.into());
        self
    }

    pub fn with_participant(mut self, participant: ParticipantDecl) -> Self {
        self.participants.push(participant);
        self
    }

    pub fn with_group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    /// True when there is nothing to lay out
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
            && self.root.is_empty()
            && self.groups.iter().all(|g| g.participants.is_empty())
    }
}

/// A participant declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantDecl {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Declared box width; overrides the measured label width
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}

impl ParticipantDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            width: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }
}

/// Named cluster of participants (cosmetic only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    #[serde(default)]
    pub participants: Vec<String>,
}

impl Group {
    pub fn new<I, S>(name: impl Into<String>, participants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            participants: participants.into_iter().map(Into::into).collect(),
        }
    }
}

/// Ordered sequence of statements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Block {
    pub statements: Vec<Statement>,
}

impl Block {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Statement> {
        self.statements.iter()
    }
}

impl From<Vec<Statement>> for Block {
    fn from(statements: Vec<Statement>) -> Self {
        Self::new(statements)
    }
}

impl<'a> IntoIterator for &'a Block {
    type Item = &'a Statement;
    type IntoIter = std::slice::Iter<'a, Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.iter()
    }
}

/// One statement with its optional leading comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(flatten)]
    pub kind: StatementKind,
}

impl Statement {
    pub fn new(kind: StatementKind) -> Self {
        Self {
            comment: None,
            kind,
        }
    }

    /// Attach a (markdown) comment rendered above the statement
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// `to.signature` sent from the current origin
    pub fn sync(to: impl Into<String>, signature: impl Into<String>) -> Self {
        Message::new(MessageKind::Sync, signature).to(to).into()
    }

    /// `from->to.signature`
    pub fn sync_from(
        from: impl Into<String>,
        to: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Message::new(MessageKind::Sync, signature)
            .from(from)
            .to(to)
            .into()
    }

    /// Self call on the current origin
    pub fn self_call(signature: impl Into<String>) -> Self {
        Message::new(MessageKind::Sync, signature).into()
    }

    /// `from->to: signature`
    pub fn async_msg(
        from: impl Into<String>,
        to: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Message::new(MessageKind::Async, signature)
            .from(from)
            .to(to)
            .into()
    }

    /// `new Target()`
    pub fn creation(to: impl Into<String>) -> Self {
        Message::new(MessageKind::Creation, "").to(to).into()
    }

    /// `return signature`
    pub fn ret(signature: impl Into<String>) -> Self {
        Message::new(MessageKind::Return, signature).into()
    }

    pub fn fragment(fragment: Fragment) -> Self {
        Self::new(StatementKind::Fragment(fragment))
    }

    pub fn divider(note: impl Into<String>) -> Self {
        Self::new(StatementKind::Divider(Divider { note: note.into() }))
    }

    pub fn as_message(&self) -> Option<&Message> {
        match &self.kind {
            StatementKind::Message(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_fragment(&self) -> Option<&Fragment> {
        match &self.kind {
            StatementKind::Fragment(f) => Some(f),
            _ => None,
        }
    }
}

impl From<Message> for Statement {
    fn from(message: Message) -> Self {
        Self::new(StatementKind::Message(message))
    }
}

impl From<Fragment> for Statement {
    fn from(fragment: Fragment) -> Self {
        Self::fragment(fragment)
    }
}

/// Closed set of statement kinds, decided when the tree is built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StatementKind {
    Message(Message),
    Fragment(Fragment),
    Divider(Divider),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Sync,
    Async,
    Creation,
    Return,
}

impl MessageKind {
    /// Sync and creation messages open an activation on their target
    pub fn activates(self) -> bool {
        matches!(self, MessageKind::Sync | MessageKind::Creation)
    }
}

/// A message between two participants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub kind: MessageKind,
    /// Sender; `None` means the current origin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Receiver; `None` means a self call (or the caller, for returns)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default)]
    pub signature: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    /// Nested block executed inside the activation (sync and creation only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<Block>,
}

impl Message {
    pub fn new(kind: MessageKind, signature: impl Into<String>) -> Self {
        Self {
            kind,
            from: None,
            to: None,
            signature: signature.into(),
            assignee: None,
            block: None,
        }
    }

    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    pub fn assign(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    pub fn with_block(mut self, statements: Vec<Statement>) -> Self {
        self.block = Some(Block::new(statements));
        self
    }

    /// Nested block, if this kind of message can carry one
    pub fn nested_block(&self) -> Option<&Block> {
        if self.kind.activates() {
            self.block.as_ref()
        } else {
            None
        }
    }
}

/// Body of a single-block fragment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Region {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default)]
    pub block: Block,
}

impl Region {
    pub fn new(condition: Option<&str>, statements: Vec<Statement>) -> Self {
        Self {
            condition: condition.map(str::to_string),
            block: Block::new(statements),
        }
    }
}

/// Else-if or catch branch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default)]
    pub block: Block,
}

impl Branch {
    pub fn new(condition: impl Into<String>, statements: Vec<Statement>) -> Self {
        Self {
            condition: Some(condition.into()),
            block: Block::new(statements),
        }
    }
}

/// Bracketed control-structure region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fragment {
    Alt {
        condition: String,
        #[serde(default)]
        block: Block,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        else_ifs: Vec<Branch>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        else_block: Option<Block>,
    },
    Opt(Region),
    Loop(Region),
    Par(Region),
    Critical(Region),
    Section(Region),
    Tcf {
        #[serde(default)]
        block: Block,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        catches: Vec<Branch>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        finally: Option<Block>,
    },
    Ref {
        label: String,
        #[serde(default)]
        participants: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentKind {
    Alt,
    Opt,
    Loop,
    Par,
    Critical,
    Section,
    Tcf,
    Ref,
}

impl FragmentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FragmentKind::Alt => "alt",
            FragmentKind::Opt => "opt",
            FragmentKind::Loop => "loop",
            FragmentKind::Par => "par",
            FragmentKind::Critical => "critical",
            FragmentKind::Section => "section",
            FragmentKind::Tcf => "tcf",
            FragmentKind::Ref => "ref",
        }
    }
}

impl std::fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Fragment {
    /// `if(condition) { ... }` with no else branches
    pub fn alt(condition: impl Into<String>, statements: Vec<Statement>) -> Self {
        Fragment::Alt {
            condition: condition.into(),
            block: Block::new(statements),
            else_ifs: Vec::new(),
            else_block: None,
        }
    }

    pub fn opt(condition: &str, statements: Vec<Statement>) -> Self {
        Fragment::Opt(Region::new(Some(condition), statements))
    }

    pub fn loop_(condition: &str, statements: Vec<Statement>) -> Self {
        Fragment::Loop(Region::new(Some(condition), statements))
    }

    pub fn par(statements: Vec<Statement>) -> Self {
        Fragment::Par(Region::new(None, statements))
    }

    pub fn critical(condition: Option<&str>, statements: Vec<Statement>) -> Self {
        Fragment::Critical(Region::new(condition, statements))
    }

    pub fn section(name: Option<&str>, statements: Vec<Statement>) -> Self {
        Fragment::Section(Region::new(name, statements))
    }

    pub fn tcf(statements: Vec<Statement>) -> Self {
        Fragment::Tcf {
            block: Block::new(statements),
            catches: Vec::new(),
            finally: None,
        }
    }

    pub fn reference<I, S>(label: impl Into<String>, participants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Fragment::Ref {
            label: label.into(),
            participants: participants.into_iter().map(Into::into).collect(),
        }
    }

    /// Add an else-if branch (alt) or a catch branch (tcf)
    pub fn or(mut self, condition: impl Into<String>, statements: Vec<Statement>) -> Self {
        match &mut self {
            Fragment::Alt { else_ifs, .. } => else_ifs.push(Branch::new(condition, statements)),
            Fragment::Tcf { catches, .. } => catches.push(Branch::new(condition, statements)),
            _ => {}
        }
        self
    }

    /// Set the else block (alt) or the finally block (tcf)
    pub fn otherwise(mut self, statements: Vec<Statement>) -> Self {
        match &mut self {
            Fragment::Alt { else_block, .. } => *else_block = Some(Block::new(statements)),
            Fragment::Tcf { finally, .. } => *finally = Some(Block::new(statements)),
            _ => {}
        }
        self
    }

    pub fn kind(&self) -> FragmentKind {
        match self {
            Fragment::Alt { .. } => FragmentKind::Alt,
            Fragment::Opt(_) => FragmentKind::Opt,
            Fragment::Loop(_) => FragmentKind::Loop,
            Fragment::Par(_) => FragmentKind::Par,
            Fragment::Critical(_) => FragmentKind::Critical,
            Fragment::Section(_) => FragmentKind::Section,
            Fragment::Tcf { .. } => FragmentKind::Tcf,
            Fragment::Ref { .. } => FragmentKind::Ref,
        }
    }

    /// Blocks in branch order: if/try/body first, then else-ifs or catches,
    /// then else or finally.
    pub fn branches(&self) -> Vec<&Block> {
        match self {
            Fragment::Alt {
                block,
                else_ifs,
                else_block,
                ..
            } => std::iter::once(block)
                .chain(else_ifs.iter().map(|b| &b.block))
                .chain(else_block.iter())
                .collect(),
            Fragment::Opt(r)
            | Fragment::Loop(r)
            | Fragment::Par(r)
            | Fragment::Critical(r)
            | Fragment::Section(r) => vec![&r.block],
            Fragment::Tcf {
                block,
                catches,
                finally,
            } => std::iter::once(block)
                .chain(catches.iter().map(|b| &b.block))
                .chain(finally.iter())
                .collect(),
            Fragment::Ref { .. } => Vec::new(),
        }
    }
}

/// `== note ==` separator spanning the whole diagram
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Divider {
    #[serde(default)]
    pub note: String,
}
