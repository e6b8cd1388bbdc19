//! Error types.
//!
//! Every failure the core can produce is a typed value carrying a
//! human-readable message.  Whether a failure is fatal to the enclosing
//! declaration (or to the whole build) is the caller's decision.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to tokenize a documentation block into tags.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocblockError {
    /// A physical line carried content before its leading `*`.
    #[error("failed to parse php_doc: unexpected {found:?} at offset {offset} outside a comment line")]
    Malformed { offset: usize, found: char },
}

/// Failure to parse one type string.
///
/// `offset` fields are byte offsets into the type string being parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeParseError {
    #[error("Failed to parse phpdoc type: unexpected end")]
    UnexpectedEnd { offset: usize },

    #[error("Failed to parse phpdoc type: unmatching () at offset {offset}")]
    UnmatchedParen { offset: usize },

    #[error("Failed to parse phpdoc type: unmatching [] at offset {offset}")]
    UnmatchedBrackets { offset: usize },

    #[error("Failed to parse phpdoc type: Unknown type name [{input}] at offset {offset}")]
    UnknownTypeName { input: String, offset: usize },

    #[error("Failed to parse phpdoc type: expected '<' or '(' at offset {offset}")]
    ExpectedOpener { offset: usize },

    #[error("Failed to parse phpdoc type: expected ',' or '{closer}' at offset {offset}")]
    ExpectedSeparator { closer: char, offset: usize },

    #[error("Failed to parse phpdoc type: empty argument list at offset {offset}")]
    EmptyArguments { offset: usize },

    #[error("Failed to parse phpdoc type: something left at the end after parsing (offset {offset})")]
    TrailingInput { offset: usize },

    #[error("Failed to parse phpdoc type: nesting deeper than {limit} at offset {offset}")]
    TooDeep { limit: usize, offset: usize },

    #[error("Failed to parse phpdoc type: 'self' used outside of a class at offset {offset}")]
    SelfOutsideClass { offset: usize },

    #[error("You may not use trait({name}) as a type-hint")]
    TraitAsTypeHint { name: String },

    #[error(
        "Could not find class in phpdoc: {name}\nProbably, this class is used only in phpdoc and never created in reachable code"
    )]
    UnresolvedClass { name: String },
}

impl TypeParseError {
    /// Byte offset into the type string, when the error has one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::UnexpectedEnd { offset }
            | Self::UnmatchedParen { offset }
            | Self::UnmatchedBrackets { offset }
            | Self::UnknownTypeName { offset, .. }
            | Self::ExpectedOpener { offset }
            | Self::ExpectedSeparator { offset, .. }
            | Self::EmptyArguments { offset }
            | Self::TrailingInput { offset }
            | Self::TooDeep { offset, .. }
            | Self::SelfOutsideClass { offset } => Some(*offset),
            Self::TraitAsTypeHint { .. } | Self::UnresolvedClass { .. } => None,
        }
    }
}

/// Failure to load a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
