//! Error types for the translation lexer.
//!
//! Errors carry the source position where they were detected so the
//! driver can render `file:line:column` messages and source excerpts.
//! All of them are fatal for the current stream except that warnings
//! (macro redefinition) never become errors at all; those go through the
//! diagnostic handler instead.

use std::io;

use crex_util::SourcePos;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LexError>;

/// A fatal lexing failure.
#[derive(Debug, Error)]
pub enum LexError {
    /// The input file could not be opened.
    #[error("could not open '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },

    /// A read from the input failed mid-stream.
    #[error("read error: {0}")]
    Read(#[source] io::Error),

    /// A tokenizer rule could not match at `pos`.
    #[error("{pos}: {message}")]
    Lexical { pos: SourcePos, message: String },

    /// A malformed or unknown preprocessor directive.
    #[error("{pos}: {message}")]
    Preprocessor { pos: SourcePos, message: String },

    /// A failure while expanding a macro.
    #[error("{message}")]
    Expansion { message: String },

    /// A bounded table ran out of room.
    #[error("{what} exhausted")]
    Capacity { what: &'static str },

    /// A previous fatal error left the lexer unusable.
    #[error("lexer is in a failed state after a previous error")]
    Poisoned,
}

impl LexError {
    /// The source position the error refers to, if it has one.
    pub fn pos(&self) -> Option<SourcePos> {
        match self {
            LexError::Lexical { pos, .. } | LexError::Preprocessor { pos, .. } => Some(*pos),
            _ => None,
        }
    }
}
