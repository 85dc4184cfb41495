//! Preprocessor directive dispatch and `#define` capture.
//!
//! These run on the lexer itself because they consume raw input. A `#`
//! is only a directive when it is the first non-whitespace token of a
//! logical line; the dispatcher then recognizes the directive name and
//! either captures a macro definition, skips the line (the conditional
//! and include family carries no semantics here), or fails.
//!
//! Directive parsing runs in macro-body mode throughout: a directive is
//! a single-logical-line construct, so newline termination and the
//! comment rules match the replacement-list capture exactly.

use crex_util::Diagnostic;

use crate::error::{LexError, Result};
use crate::lexer::identifier::{is_word_byte, is_word_start};
use crate::lexer::Lexer;
use crate::reader::INPUT_EOF;
use crate::strings::StringSetError;
use crate::{MAX_IDENTIFIER_LENGTH, MAX_MACRO_PARAMS};

impl Lexer {
    /// Handle a directive; the current byte is the `#` at line start.
    pub(crate) fn handle_directive(&mut self) -> Result<()> {
        self.macro_body = true;
        let result = self.dispatch_directive();
        self.macro_body = false;
        self.function_like_body = false;
        result
    }

    fn dispatch_directive(&mut self) -> Result<()> {
        self.consume_lexable()?;
        self.skip_gap()?;
        match self.reader.current() {
            // A `#` alone on its line is the null directive.
            b'\n' | INPUT_EOF => return self.finish_directive_line(),
            c if is_word_start(c) => {}
            _ => return Err(self.pp_error("expected a preprocessor directive name")),
        }

        self.scratch.clear();
        while is_word_byte(self.reader.current()) {
            if self.scratch.len() >= MAX_IDENTIFIER_LENGTH {
                return Err(self.pp_error("preprocessor directive name too long"));
            }
            self.scratch.push(self.reader.current());
            self.consume_lexable()?;
        }

        match self.scratch.as_slice() {
            b"define" => self.define_directive(),
            b"include" | b"undef" | b"if" | b"ifdef" | b"ifndef" | b"elsif" | b"else"
            | b"endif" | b"error" => {
                tracing::debug!(
                    directive = %String::from_utf8_lossy(&self.scratch),
                    "skipping directive without semantics"
                );
                self.skip_directive_line()
            }
            _ => Err(self.pp_error("Unknown preprocessor directive")),
        }
    }

    /// Skip the raw remainder of the physical line. Backslash-newline
    /// continuations are deliberately not observed here.
    fn skip_directive_line(&mut self) -> Result<()> {
        loop {
            match self.reader.current() {
                INPUT_EOF => return Ok(()),
                b'\n' => {
                    self.reader.advance()?;
                    self.line_beginning = true;
                    return Ok(());
                }
                _ => self.reader.advance()?,
            }
        }
    }

    /// Consume the terminating newline of a fully parsed directive.
    fn finish_directive_line(&mut self) -> Result<()> {
        if self.reader.current() == b'\n' {
            self.reader.advance()?;
            self.line_beginning = true;
        }
        Ok(())
    }

    /// Parse `#define name[(params)] replacement-list`.
    fn define_directive(&mut self) -> Result<()> {
        self.skip_gap()?;
        let c = self.reader.current();
        if c == b'\n' || c == INPUT_EOF {
            return Err(self.pp_error("macro name missing"));
        }
        if !is_word_start(c) {
            return Err(self.pp_error("macro name must be an identifier"));
        }

        let mut name = Vec::with_capacity(32);
        while is_word_byte(self.reader.current()) {
            if name.len() >= MAX_IDENTIFIER_LENGTH {
                return Err(self.pp_error("macro name too long"));
            }
            name.push(self.reader.current());
            self.consume_lexable()?;
        }

        // A parenthesis directly after the name (no whitespace) makes
        // the macro function-like.
        let function_like = self.reader.current() == b'(';
        let mut num_params: u8 = 0;
        if function_like {
            self.consume_lexable()?;
            self.param_names.clear();
            self.function_like_body = true;
            self.skip_gap()?;
            if self.reader.current() == b')' {
                self.consume_lexable()?;
            } else {
                loop {
                    self.skip_gap()?;
                    if !is_word_start(self.reader.current()) {
                        return Err(self.pp_error("expected a macro parameter name"));
                    }
                    self.scratch.clear();
                    while is_word_byte(self.reader.current()) {
                        if self.scratch.len() >= MAX_IDENTIFIER_LENGTH {
                            return Err(self.pp_error("macro parameter name too long"));
                        }
                        self.scratch.push(self.reader.current());
                        self.consume_lexable()?;
                    }
                    let (_, existed) =
                        self.param_names
                            .add(&self.scratch)
                            .map_err(|_| LexError::Capacity {
                                what: "macro parameter set",
                            })?;
                    if existed {
                        return Err(self.pp_error("duplicate macro parameter"));
                    }
                    if num_params as usize >= MAX_MACRO_PARAMS {
                        return Err(self.pp_error("too many macro parameters"));
                    }
                    num_params += 1;
                    self.skip_gap()?;
                    match self.reader.current() {
                        b',' => self.consume_lexable()?,
                        b')' => {
                            self.consume_lexable()?;
                            break;
                        }
                        _ => {
                            return Err(
                                self.pp_error("expected ',' or ')' in macro parameter list")
                            )
                        }
                    }
                }
            }
        } else {
            // Object-like: whitespace (or a comment, or the end of the
            // line) must separate the name from the replacement list.
            match self.reader.current() {
                b' ' | b'\t' | b'\n' | INPUT_EOF => {}
                b'/' if matches!(self.reader.lookahead(), b'/' | b'*') => {}
                _ => return Err(self.pp_error("whitespace required after macro name")),
            }
        }

        // Capture the replacement list up to the physical newline.
        let start = self.pp.tokens.len();
        loop {
            let token = self.lex_raw_token()?;
            if token.is_eof() {
                break;
            }
            self.push_pp_token(&token)?;
        }
        let num_tokens = self.pp.tokens.len() - start;

        let (_, existed) = self
            .pp
            .definitions
            .create(&name, start, num_tokens, num_params, function_like)
            .map_err(|e| match e {
                StringSetError::TableFull => LexError::Capacity {
                    what: "macro table",
                },
                StringSetError::BufferFull => LexError::Capacity {
                    what: "macro name buffer",
                },
            })?;
        if existed {
            self.handler.emit(
                Diagnostic::warning("macro redefined").with_file(self.reader.name()),
            );
        }
        tracing::debug!(
            name = %String::from_utf8_lossy(&name),
            function_like,
            params = num_params,
            tokens = num_tokens,
            "macro defined"
        );

        self.function_like_body = false;
        self.finish_directive_line()
    }
}
