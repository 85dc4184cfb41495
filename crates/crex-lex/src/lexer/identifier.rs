//! Identifier and keyword lexing.

use crate::error::{LexError, Result};
use crate::keyword;
use crate::lexer::Lexer;
use crate::strings::djb2;
use crate::token::{Token, TokenKind, TokenValue};
use crate::MAX_IDENTIFIER_LENGTH;

/// May a word (identifier or keyword) start with this byte?
#[inline]
pub(crate) fn is_word_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

/// May a word continue with this byte? `$` is accepted as an extension.
#[inline]
pub(crate) fn is_word_byte(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c == b'$'
}

impl Lexer {
    /// Lex a maximal word and classify it: keyword, formal-parameter
    /// reference (inside a function-like macro body), or identifier.
    pub(crate) fn lex_word(&mut self) -> Result<Token> {
        self.scratch.clear();
        while is_word_byte(self.reader.current()) {
            if self.scratch.len() >= MAX_IDENTIFIER_LENGTH {
                return Err(self.lexical_error_at(self.token_pos, "identifier too long"));
            }
            self.scratch.push(self.reader.current());
            self.consume_lexable()?;
        }

        let hash = djb2(&self.scratch);
        if let Some(kind) = keyword::lookup(&self.scratch, hash) {
            return Ok(Token::simple(kind, self.token_pos));
        }

        if self.macro_body && self.function_like_body {
            if let Some(id) = self.param_names.find(&self.scratch) {
                return Ok(Token::new(
                    TokenKind::PpParam,
                    TokenValue::Param(id.0 as u8),
                    self.token_pos,
                ));
            }
        }

        let (id, _) = self
            .identifiers
            .add(&self.scratch)
            .map_err(|_| LexError::Capacity {
                what: "identifier table",
            })?;
        Ok(Token::new(
            TokenKind::Identifier,
            TokenValue::Str(id),
            self.token_pos,
        ))
    }
}
