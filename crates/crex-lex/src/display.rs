//! Token display helpers.
//!
//! Rendering needs the string sets and the constants table, so it lives
//! on the lexer. Two forms: the line-oriented listing the driver prints
//! by default, and a C-struct initializer dump useful for generating
//! test fixtures.

use std::fmt::Write;

use crate::lexer::Lexer;
use crate::token::{Token, TokenKind, TokenValue};

impl Lexer {
    /// Human-readable one-line rendering of a token.
    pub fn display_token(&self, token: &Token) -> String {
        let mut out = format!(
            "line:{}, column:{}, type: <{}>",
            token.pos.display_line(),
            token.pos.display_column(),
            token.kind.name()
        );
        match (token.kind, token.value) {
            (TokenKind::Identifier, TokenValue::Str(id)) => {
                let _ = write!(out, ", name: {}", self.identifiers.get_lossy(id));
            }
            (TokenKind::LitString, TokenValue::Str(id)) => {
                let _ = write!(out, ", value: {:?}", self.string_literals.get_lossy(id));
            }
            (_, TokenValue::Int(v)) => {
                let _ = write!(out, ", value: {v}");
            }
            (_, TokenValue::UInt(v)) => {
                let _ = write!(out, ", value: {v}");
            }
            (_, TokenValue::Float(v)) => {
                let _ = write!(out, ", value: {v}");
            }
            (_, TokenValue::Double(v)) => {
                let _ = write!(out, ", value: {v}");
            }
            (_, TokenValue::Char(v)) => {
                let _ = write!(out, ", value: {v:#x}");
            }
            _ => {}
        }
        out
    }

    /// Render a token as a C struct initializer, matching the layout a
    /// C consumer of this stream would declare.
    pub fn token_c_struct(&self, token: &Token) -> String {
        let mut out = format!(
            "{{.type = {}, .line = {}, .column = {}",
            token.kind.name(),
            token.pos.line,
            token.pos.column
        );
        match (token.kind, token.value) {
            (TokenKind::Identifier, TokenValue::Str(id)) => {
                let _ = write!(
                    out,
                    ", .value.string_index = {} /* {} */",
                    id.0,
                    self.identifiers.get_lossy(id)
                );
            }
            (TokenKind::LitString, TokenValue::Str(id)) => {
                let _ = write!(out, ", .value.string_index = {}", id.0);
            }
            (_, TokenValue::Int(v)) => {
                let _ = write!(out, ", .value.int_literal = {v}");
            }
            (_, TokenValue::UInt(v)) => {
                let _ = write!(out, ", .value.uint_literal = {v}u");
            }
            (_, TokenValue::Float(v)) => {
                let _ = write!(out, ", .value.float_literal = {v}f");
            }
            (_, TokenValue::Double(v)) => {
                let _ = write!(out, ", .value.double_literal = {v}");
            }
            (_, TokenValue::Char(v)) => {
                let _ = write!(out, ", .value.character_literal = {v}");
            }
            _ => {}
        }
        out.push('}');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_simple_token() {
        let mut lexer = Lexer::from_source("test.c", ";").unwrap();
        let token = lexer.next_token().unwrap();
        assert_eq!(
            lexer.display_token(&token),
            "line:1, column:1, type: <PUNCTUATOR_SEMICOLON>"
        );
    }

    #[test]
    fn test_display_identifier() {
        let mut lexer = Lexer::from_source("test.c", "foo").unwrap();
        let token = lexer.next_token().unwrap();
        assert_eq!(
            lexer.display_token(&token),
            "line:1, column:1, type: <IDENTIFIER>, name: foo"
        );
    }

    #[test]
    fn test_display_constant() {
        let mut lexer = Lexer::from_source("test.c", "42").unwrap();
        let token = lexer.next_token().unwrap();
        assert_eq!(
            lexer.display_token(&token),
            "line:1, column:1, type: <CONSTANT_INT>, value: 42"
        );
    }

    #[test]
    fn test_c_struct_dump() {
        let mut lexer = Lexer::from_source("test.c", "int x").unwrap();
        let kw = lexer.next_token().unwrap();
        assert_eq!(
            lexer.token_c_struct(&kw),
            "{.type = KEYWORD_INT, .line = 0, .column = 0}"
        );
        let ident = lexer.next_token().unwrap();
        assert_eq!(
            lexer.token_c_struct(&ident),
            "{.type = IDENTIFIER, .line = 0, .column = 4, .value.string_index = 0 /* x */}"
        );
    }
}
