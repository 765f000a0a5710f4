//! Selector parsing error types

use std::fmt;
use thiserror::Error;

/// Selector parsing result type
pub type SelectorResult<T> = Result<T, SelectorError>;

/// Broad classes of parse failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unbalanced quote, bracket or parenthesis
    Lex,
    /// Unexpected token, empty group or dangling combinator
    Syntax,
    /// Pseudo-class name not known to the parser
    UnknownPseudoClass,
    /// Bad argument to a pseudo-class or attribute operator
    Argument,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Lex => "lex",
            Self::Syntax => "syntax",
            Self::UnknownPseudoClass => "unknown pseudo-class",
            Self::Argument => "argument",
        };
        f.write_str(name)
    }
}

/// Selector parsing errors.
///
/// Every offset is a byte offset into the selector string handed to
/// [`parse`](crate::parse), including for errors raised inside the
/// argument of `:has(...)` or `:not(...)`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("Unterminated {quote} quote in '{fragment}' at offset {offset}")]
    UnterminatedQuote {
        quote: char,
        fragment: String,
        offset: usize,
    },

    #[error("Unbalanced '{open}' in '{fragment}' at offset {offset}")]
    Unbalanced {
        open: char,
        fragment: String,
        offset: usize,
    },

    #[error("Unexpected token at '{fragment}' (offset {offset})")]
    UnexpectedToken { fragment: String, offset: usize },

    #[error("Empty selector at offset {offset}")]
    EmptyGroup { offset: usize },

    #[error("Combinator '{combinator}' at offset {offset} is not followed by a selector")]
    DanglingCombinator { combinator: char, offset: usize },

    #[error("Unknown pseudo-class ':{name}' at offset {offset}")]
    UnknownPseudoClass { name: String, offset: usize },

    #[error("Invalid argument '{argument}' for {context} at offset {offset}: {reason}")]
    InvalidArgument {
        context: String,
        argument: String,
        reason: String,
        offset: usize,
    },
}

impl SelectorError {
    /// Which class of failure this is
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnterminatedQuote { .. } | Self::Unbalanced { .. } => ErrorKind::Lex,
            Self::UnexpectedToken { .. }
            | Self::EmptyGroup { .. }
            | Self::DanglingCombinator { .. } => ErrorKind::Syntax,
            Self::UnknownPseudoClass { .. } => ErrorKind::UnknownPseudoClass,
            Self::InvalidArgument { .. } => ErrorKind::Argument,
        }
    }

    /// Byte offset of the problem in the selector
    pub fn offset(&self) -> usize {
        match self {
            Self::UnterminatedQuote { offset, .. } => *offset,
            Self::Unbalanced { offset, .. } => *offset,
            Self::UnexpectedToken { offset, .. } => *offset,
            Self::EmptyGroup { offset } => *offset,
            Self::DanglingCombinator { offset, .. } => *offset,
            Self::UnknownPseudoClass { offset, .. } => *offset,
            Self::InvalidArgument { offset, .. } => *offset,
        }
    }

    pub fn unexpected(fragment: impl Into<String>, offset: usize) -> Self {
        Self::UnexpectedToken { fragment: fragment.into(), offset }
    }

    pub fn invalid_argument(
        context: impl Into<String>,
        argument: impl Into<String>,
        reason: impl Into<String>,
        offset: usize,
    ) -> Self {
        Self::InvalidArgument {
            context: context.into(),
            argument: argument.into(),
            reason: reason.into(),
            offset,
        }
    }

    /// Shift the offset by `base`, used when a nested argument is parsed on its own
    pub(crate) fn shifted(mut self, base: usize) -> Self {
        match &mut self {
            Self::UnterminatedQuote { offset, .. }
            | Self::Unbalanced { offset, .. }
            | Self::UnexpectedToken { offset, .. }
            | Self::EmptyGroup { offset }
            | Self::DanglingCombinator { offset, .. }
            | Self::UnknownPseudoClass { offset, .. }
            | Self::InvalidArgument { offset, .. } => *offset += base,
        }
        self
    }
}
