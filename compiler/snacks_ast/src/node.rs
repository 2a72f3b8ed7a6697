use snacks_common::span::{Span, Spanned};

use std::ops::{Deref, DerefMut};

/// A syntax tree node with the source range it was parsed from.
#[derive(Clone, Debug, PartialEq)]
pub struct Node<T> {
    pub kind: T,
    pub span: Span,
}

impl<T> Node<T> {
    pub fn new(kind: T, span: Span) -> Self {
        Self { kind, span }
    }
}

impl<T> From<T> for Node<T> {
    fn from(kind: T) -> Self {
        Self {
            kind,
            span: Span::default(),
        }
    }
}

impl<T> Spanned for Node<T> {
    fn span(&self) -> Span {
        self.span
    }
}

impl<T> Deref for Node<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.kind
    }
}

impl<T> DerefMut for Node<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.kind
    }
}
