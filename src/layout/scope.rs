//! Activation context threaded through every tree walk
//!
//! A [`Scope`] is an immutable linked list: entering the nested block of a
//! sync or creation message pushes a frame that borrows its parent. Queries
//! such as the activation layer count walk the chain instead of reading
//! shared mutable state.

use crate::ir::{Message, MessageKind};

#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    parent: Option<&'a Scope<'a>>,
    origin: &'a str,
    caller: &'a str,
    /// Target of the message whose block this scope is
    activation: Option<&'a str>,
}

impl<'a> Scope<'a> {
    /// Root scope; statements without a sender are sent by `origin`
    pub fn root(origin: &'a str) -> Self {
        Self {
            parent: None,
            origin,
            caller: origin,
            activation: None,
        }
    }

    /// Scope of the nested block of a message from `from` to `to`
    pub fn enter<'b>(&'b self, from: &'b str, to: &'b str) -> Scope<'b> {
        Scope {
            parent: Some(self),
            origin: to,
            caller: from,
            activation: Some(to),
        }
    }

    /// Participant whose activation encloses the statements of this scope
    pub fn origin(&self) -> &'a str {
        self.origin
    }

    /// Sender of the enclosing message
    pub fn caller(&self) -> &'a str {
        self.caller
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Number of enclosing sync/creation messages targeting `name`
    pub fn activation_layers(&self, name: &str) -> usize {
        let mut layers = 0;
        let mut current = Some(self);
        while let Some(scope) = current {
            if scope.activation == Some(name) {
                layers += 1;
            }
            current = scope.parent;
        }
        layers
    }

    /// Sender and receiver of `message` with implicit endpoints filled in
    pub fn endpoints<'m>(&self, message: &'m Message) -> (&'m str, &'m str)
    where
        'a: 'm,
    {
        let from = message.from.as_deref().unwrap_or(self.origin);
        let to = match (message.kind, message.to.as_deref()) {
            (_, Some(to)) => to,
            (MessageKind::Return, None) => self.caller,
            (_, None) => from,
        };
        (from, to)
    }
}
