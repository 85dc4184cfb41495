//! String-literal and character-constant lexing.
//!
//! Inside a literal a backslash always starts an escape sequence; line
//! splicing is not applied there. Adjacent string literals separated
//! only by whitespace or comments concatenate before the payload is
//! interned.

use crate::error::{LexError, Result};
use crate::lexer::Lexer;
use crate::reader::INPUT_EOF;
use crate::token::{Token, TokenKind, TokenValue};
use crate::MAX_STRING_LITERAL_LENGTH;

/// Character constants accumulate one byte per shift; wider values no
/// longer fit the 32-bit payload.
const MAX_CHAR_CONSTANT_BYTES: usize = 4;

impl Lexer {
    /// Lex one-or-more adjacent string literals into a single token.
    pub(crate) fn lex_string_literal(&mut self) -> Result<Token> {
        self.scratch.clear();
        loop {
            // Current byte is the opening quote of one piece.
            self.consume_lexable()?;
            loop {
                match self.reader.current() {
                    INPUT_EOF | b'\n' => {
                        return Err(self.lexical_error("unterminated string literal"));
                    }
                    b'"' => {
                        self.consume_lexable()?;
                        break;
                    }
                    b'\\' => {
                        let byte = self.lex_escape()?;
                        self.push_literal_byte(byte)?;
                    }
                    c => {
                        self.push_literal_byte(c)?;
                        self.reader.advance()?;
                    }
                }
            }
            self.skip_gap()?;
            if self.reader.current() != b'"' {
                break;
            }
        }
        let (id, _) = self
            .string_literals
            .add(&self.scratch)
            .map_err(|_| LexError::Capacity {
                what: "string literal table",
            })?;
        Ok(Token::new(
            TokenKind::LitString,
            TokenValue::Str(id),
            self.token_pos,
        ))
    }

    fn push_literal_byte(&mut self, byte: u8) -> Result<()> {
        if self.scratch.len() >= MAX_STRING_LITERAL_LENGTH {
            return Err(self.lexical_error_at(self.token_pos, "string literal too long"));
        }
        self.scratch.push(byte);
        Ok(())
    }

    /// Lex a character constant, accumulating bytes into a 32-bit value
    /// (`'ab'` is legal and yields `('a' << 8) | 'b'`).
    pub(crate) fn lex_char_constant(&mut self) -> Result<Token> {
        self.consume_lexable()?;
        let mut value: i32 = 0;
        let mut count = 0usize;
        loop {
            match self.reader.current() {
                INPUT_EOF | b'\n' => {
                    return Err(self.lexical_error("unterminated character constant"));
                }
                b'\'' => {
                    self.consume_lexable()?;
                    break;
                }
                c => {
                    if count >= MAX_CHAR_CONSTANT_BYTES {
                        return Err(
                            self.lexical_error_at(self.token_pos, "character constant too long")
                        );
                    }
                    let byte = if c == b'\\' {
                        self.lex_escape()?
                    } else {
                        self.reader.advance()?;
                        c
                    };
                    value = (value << 8) | byte as i32;
                    count += 1;
                }
            }
        }
        if count == 0 {
            return Err(self.lexical_error_at(self.token_pos, "empty character constant"));
        }
        Ok(Token::new(
            TokenKind::ConstChar,
            TokenValue::Char(value),
            self.token_pos,
        ))
    }

    /// Decode one escape sequence; the current byte is the backslash.
    ///
    /// Handles the simple escapes, `\e`, `\xH..H` and one-to-three
    /// octal digits. Values beyond one byte are truncated to the low
    /// eight bits.
    pub(crate) fn lex_escape(&mut self) -> Result<u8> {
        self.reader.advance()?;
        let selector = self.reader.current();
        let simple = match selector {
            b'\\' => Some(b'\\'),
            b'\'' => Some(b'\''),
            b'"' => Some(b'"'),
            b'?' => Some(b'?'),
            b'a' => Some(0x07),
            b'b' => Some(0x08),
            b't' => Some(0x09),
            b'n' => Some(0x0A),
            b'v' => Some(0x0B),
            b'f' => Some(0x0C),
            b'r' => Some(0x0D),
            b'e' => Some(0x1B),
            _ => None,
        };
        if let Some(byte) = simple {
            self.reader.advance()?;
            return Ok(byte);
        }
        match selector {
            b'x' => {
                self.reader.advance()?;
                if !self.reader.current().is_ascii_hexdigit() {
                    return Err(self.lexical_error("invalid escape sequence"));
                }
                let mut value: u32 = 0;
                while self.reader.current().is_ascii_hexdigit() {
                    let d = hex_digit(self.reader.current());
                    value = value.wrapping_shl(4) | d;
                    self.reader.advance()?;
                }
                Ok((value & 0xFF) as u8)
            }
            b'0'..=b'7' => {
                let mut value: u32 = 0;
                let mut count = 0;
                while count < 3 && matches!(self.reader.current(), b'0'..=b'7') {
                    value = (value << 3) | (self.reader.current() - b'0') as u32;
                    self.reader.advance()?;
                    count += 1;
                }
                Ok((value & 0xFF) as u8)
            }
            INPUT_EOF => Err(self.lexical_error("unexpected end of file in escape sequence")),
            _ => Err(self.lexical_error("invalid escape sequence")),
        }
    }
}

fn hex_digit(c: u8) -> u32 {
    match c {
        b'0'..=b'9' => (c - b'0') as u32,
        b'a'..=b'f' => (c - b'a' + 10) as u32,
        _ => (c - b'A' + 10) as u32,
    }
}
