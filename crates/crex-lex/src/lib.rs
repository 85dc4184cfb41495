//! crex-lex - A streaming C translation lexer.
//!
//! One pull-driven component fuses the three front-end phases that
//! cannot be cleanly separated in C: physical-to-logical source
//! normalization (line-ending normalization, backslash-newline
//! splicing), tokenization, and in-line expansion of object-like and
//! function-like preprocessor macros. They have to interleave: a splice
//! inside a string literal is an escape instead, a `#define` body ends
//! at the unspliced newline, and a macro invocation may span lines while
//! its expanded arguments contain further invocations.
//!
//! # Architecture
//!
//! ```text
//!             ┌──────────────────────────────────┐
//!   caller ──▶│  Token source (Lexer)            │── Token ──▶ caller
//!             │   • handles directives           │
//!             │   • drives macro expansion       │
//!             └──────────┬───────────┬───────────┘
//!                        │           │
//!             ┌──────────▼──┐   ┌────▼────────────────┐
//!             │  Tokenizer  │   │ Expansion engine    │
//!             │             │   │ • context stack     │
//!             │             │   │ • parameter binding │
//!             └──────┬──────┘   └────┬────────────────┘
//!                    │               │
//!             ┌──────▼───────────────▼──────┐
//!             │ Source reader               │
//!             │  • chunked byte input       │
//!             │  • line-ending normalization│
//!             │  • backslash-newline splice │
//!             └─────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use crex_lex::{Lexer, TokenKind, TokenValue};
//!
//! let source = "#define TWO 2\nint a = TWO;\n";
//! let mut lexer = Lexer::from_source("example.c", source).unwrap();
//!
//! let kinds: Vec<TokenKind> = std::iter::from_fn(|| {
//!     let token = lexer.next_token().unwrap();
//!     (!token.is_eof()).then_some(token.kind)
//! })
//! .collect();
//!
//! assert_eq!(
//!     kinds,
//!     [
//!         TokenKind::KwInt,
//!         TokenKind::Identifier,
//!         TokenKind::Assign,
//!         TokenKind::ConstInt,
//!         TokenKind::Semicolon,
//!     ]
//! );
//! ```
//!
//! The token stream observable through [`Lexer::next_token`] is fully
//! expanded: identifiers that name macros never surface, preprocessing
//! numbers are parsed into concrete constants, and the stream ends with
//! an end-of-file token that repeats on further calls.

mod constants;
mod display;
mod error;
mod keyword;
mod lexer;
mod pp;
mod reader;
mod strings;
mod token;

pub use crex_util::{Diagnostic, Handler, Level, SourcePos};

pub use constants::{Constant, ConstantTable};
pub use error::{LexError, Result};
pub use lexer::Lexer;
pub use pp::{
    MAX_DEFINITION_COUNT, MAX_DEFINITION_TOKEN_COUNT, MAX_EXPANSION_DEPTH,
};
pub use reader::{SourceReader, INPUT_EOF};
pub use strings::{StrId, StringSet, StringSetStats};
pub use token::{Token, TokenKind, TokenValue};

/// Longest accepted identifier, macro name, or parameter name.
pub const MAX_IDENTIFIER_LENGTH: usize = 255;

/// Longest accepted preprocessing-number lexeme.
pub const MAX_NUMBER_LENGTH: usize = 255;

/// Longest accepted (concatenated) string-literal payload.
pub const MAX_STRING_LITERAL_LENGTH: usize = 4096;

/// Identifier interner: content bytes and entry count.
pub const IDENTIFIER_BUFFER_SIZE: usize = 4096 << 2;
pub const MAX_IDENTIFIER_COUNT: usize = 1024;

/// String-literal interner: content bytes and entry count.
pub const STRING_LITERAL_BUFFER_SIZE: usize = 4096 << 3;
pub const MAX_STRING_LITERAL_COUNT: usize = 1024;

/// Preprocessing-number interner: content bytes and entry count.
pub const PP_NUMBER_BUFFER_SIZE: usize = 4096 << 3;
pub const MAX_PP_NUMBER_COUNT: usize = 1024;

/// Constant-table entry bound.
pub const MAX_CONSTANT_COUNT: usize = 1024;

/// Formal parameters per function-like macro.
pub const MAX_MACRO_PARAMS: usize = 255;

/// Bytes reserved for one directive's parameter names.
pub const PARAM_NAME_BUFFER_SIZE: usize = 4096;
