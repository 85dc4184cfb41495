//! Comment skipping.
//!
//! Both comment forms are transparent: no token is emitted and the next
//! token's position records the point after the skip. In macro-body mode
//! a comment may not smuggle tokens across the terminating newline, so a
//! block comment reaching one is an error and a line comment leaves the
//! newline unconsumed.

use crate::error::Result;
use crate::lexer::Lexer;
use crate::reader::INPUT_EOF;

impl Lexer {
    /// Skip the remainder of a `//` comment. The terminating newline is
    /// left unconsumed; plain whitespace skipping (or the macro-body
    /// epilogue) deals with it.
    pub(crate) fn skip_line_comment(&mut self) -> Result<()> {
        loop {
            match self.reader.current() {
                INPUT_EOF | b'\n' => return Ok(()),
                _ => self.reader.advance()?,
            }
        }
    }

    /// Skip through the `*/` terminating a block comment.
    pub(crate) fn skip_block_comment(&mut self) -> Result<()> {
        loop {
            match self.reader.current() {
                INPUT_EOF => return Err(self.lexical_error("unterminated comment")),
                b'\n' => {
                    if self.macro_body {
                        return Err(self
                            .lexical_error("comment not closed before end of macro definition"));
                    }
                    self.reader.advance()?;
                }
                b'*' => {
                    self.consume_lexable()?;
                    if self.reader.current() == b'/' {
                        self.consume_lexable()?;
                        return Ok(());
                    }
                }
                _ => self.reader.advance()?,
            }
        }
    }
}
