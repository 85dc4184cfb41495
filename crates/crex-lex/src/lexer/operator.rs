//! Operator and punctuator lexing.
//!
//! Lead-byte dispatch lives in `core`; each prefix here is a small state
//! machine: consume the prefix, look at the current byte, optionally
//! consume once or twice more. Splices are honored between the bytes of
//! an operator, so `<\` newline `<=` still lexes as `<<=`.

use crate::error::Result;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

impl Lexer {
    /// `*`, `*=`
    pub(crate) fn lex_star(&mut self) -> Result<Token> {
        self.consume_lexable()?;
        let kind = if self.reader.current() == b'=' {
            self.consume_lexable()?;
            TokenKind::StarAssign
        } else {
            TokenKind::Star
        };
        Ok(Token::simple(kind, self.token_pos))
    }

    /// `%`, `%=`
    pub(crate) fn lex_percent(&mut self) -> Result<Token> {
        self.consume_lexable()?;
        let kind = if self.reader.current() == b'=' {
            self.consume_lexable()?;
            TokenKind::ModAssign
        } else {
            TokenKind::Mod
        };
        Ok(Token::simple(kind, self.token_pos))
    }

    /// `+`, `+=`, `++`
    pub(crate) fn lex_plus(&mut self) -> Result<Token> {
        self.consume_lexable()?;
        let kind = match self.reader.current() {
            b'=' => {
                self.consume_lexable()?;
                TokenKind::PlusAssign
            }
            b'+' => {
                self.consume_lexable()?;
                TokenKind::PlusPlus
            }
            _ => TokenKind::Plus,
        };
        Ok(Token::simple(kind, self.token_pos))
    }

    /// `-`, `-=`, `--`, `->`
    pub(crate) fn lex_minus(&mut self) -> Result<Token> {
        self.consume_lexable()?;
        let kind = match self.reader.current() {
            b'=' => {
                self.consume_lexable()?;
                TokenKind::MinusAssign
            }
            b'-' => {
                self.consume_lexable()?;
                TokenKind::MinusMinus
            }
            b'>' => {
                self.consume_lexable()?;
                TokenKind::Arrow
            }
            _ => TokenKind::Minus,
        };
        Ok(Token::simple(kind, self.token_pos))
    }

    /// `&`, `&=`, `&&`
    pub(crate) fn lex_ampersand(&mut self) -> Result<Token> {
        self.consume_lexable()?;
        let kind = match self.reader.current() {
            b'=' => {
                self.consume_lexable()?;
                TokenKind::AndAssign
            }
            b'&' => {
                self.consume_lexable()?;
                TokenKind::AndAnd
            }
            _ => TokenKind::Amp,
        };
        Ok(Token::simple(kind, self.token_pos))
    }

    /// `|`, `|=`, `||`
    pub(crate) fn lex_pipe(&mut self) -> Result<Token> {
        self.consume_lexable()?;
        let kind = match self.reader.current() {
            b'=' => {
                self.consume_lexable()?;
                TokenKind::OrAssign
            }
            b'|' => {
                self.consume_lexable()?;
                TokenKind::OrOr
            }
            _ => TokenKind::Pipe,
        };
        Ok(Token::simple(kind, self.token_pos))
    }

    /// `^`, `^=`
    pub(crate) fn lex_caret(&mut self) -> Result<Token> {
        self.consume_lexable()?;
        let kind = if self.reader.current() == b'=' {
            self.consume_lexable()?;
            TokenKind::XorAssign
        } else {
            TokenKind::Caret
        };
        Ok(Token::simple(kind, self.token_pos))
    }

    /// `!`, `!=`
    pub(crate) fn lex_bang(&mut self) -> Result<Token> {
        self.consume_lexable()?;
        let kind = if self.reader.current() == b'=' {
            self.consume_lexable()?;
            TokenKind::NotEq
        } else {
            TokenKind::Not
        };
        Ok(Token::simple(kind, self.token_pos))
    }

    /// `<`, `<=`, `<<`, `<<=`
    pub(crate) fn lex_less(&mut self) -> Result<Token> {
        self.consume_lexable()?;
        let kind = match self.reader.current() {
            b'<' => {
                self.consume_lexable()?;
                if self.reader.current() == b'=' {
                    self.consume_lexable()?;
                    TokenKind::ShlAssign
                } else {
                    TokenKind::Shl
                }
            }
            b'=' => {
                self.consume_lexable()?;
                TokenKind::Le
            }
            _ => TokenKind::Lt,
        };
        Ok(Token::simple(kind, self.token_pos))
    }

    /// `>`, `>=`, `>>`, `>>=`
    pub(crate) fn lex_greater(&mut self) -> Result<Token> {
        self.consume_lexable()?;
        let kind = match self.reader.current() {
            b'>' => {
                self.consume_lexable()?;
                if self.reader.current() == b'=' {
                    self.consume_lexable()?;
                    TokenKind::ShrAssign
                } else {
                    TokenKind::Shr
                }
            }
            b'=' => {
                self.consume_lexable()?;
                TokenKind::Ge
            }
            _ => TokenKind::Gt,
        };
        Ok(Token::simple(kind, self.token_pos))
    }

    /// `=`, `==`
    pub(crate) fn lex_equals(&mut self) -> Result<Token> {
        self.consume_lexable()?;
        let kind = if self.reader.current() == b'=' {
            self.consume_lexable()?;
            TokenKind::EqEq
        } else {
            TokenKind::Assign
        };
        Ok(Token::simple(kind, self.token_pos))
    }
}
