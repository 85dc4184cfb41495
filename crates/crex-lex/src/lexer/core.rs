//! Lexer state and the top-level token source.
//!
//! [`Lexer::next_token`] is the public entry point. Internally it runs
//! three cooperating layers: the raw tokenizer (this module and its
//! siblings), the directive dispatcher (`pp::directive`), and the macro
//! expansion engine (`pp::expand`). Expansion is transparent to the
//! caller: identifiers that name macros never surface, and preprocessing
//! numbers are parsed into concrete constants before they leave the
//! crate.

use std::path::Path;

use crex_util::{Diagnostic, Handler, SourcePos};

use crate::constants::{Constant, ConstantTable};
use crate::error::{LexError, Result};
use crate::lexer::identifier::is_word_start;
use crate::lexer::number::parse_pp_number;
use crate::pp::{Definition, ParamNode, PpToken, PreprocessorState, TokenIterator};
use crate::reader::{SourceReader, INPUT_EOF};
use crate::strings::{StrId, StringSet};
use crate::token::{Token, TokenKind, TokenValue};
use crate::{
    IDENTIFIER_BUFFER_SIZE, MAX_CONSTANT_COUNT, MAX_IDENTIFIER_COUNT, MAX_PP_NUMBER_COUNT,
    MAX_STRING_LITERAL_COUNT, PARAM_NAME_BUFFER_SIZE, PP_NUMBER_BUFFER_SIZE,
    STRING_LITERAL_BUFFER_SIZE,
};

/// The translation lexer: tokenization, normalization and macro
/// expansion fused into one pull-driven component.
pub struct Lexer {
    pub(crate) reader: SourceReader,
    pub(crate) handler: Handler,
    /// Identifier lexemes.
    pub(crate) identifiers: StringSet,
    /// Decoded string-literal payloads.
    pub(crate) string_literals: StringSet,
    /// Raw preprocessing-number lexemes captured in macro bodies.
    pub(crate) pp_numbers: StringSet,
    /// Constant payloads referenced from replacement-list tokens.
    pub(crate) constants: ConstantTable,
    pub(crate) pp: PreprocessorState,
    /// Formal-parameter names of the `#define` currently being captured.
    pub(crate) param_names: StringSet,
    /// Scratch buffer for identifier, number and literal lexemes.
    pub(crate) scratch: Vec<u8>,
    /// Position of the token currently being lexed.
    pub(crate) token_pos: SourcePos,
    /// Macro-body capture mode: a physical newline ends the stream.
    pub(crate) macro_body: bool,
    /// Whether `param_names` applies (function-like `#define` body).
    pub(crate) function_like_body: bool,
    /// No token has been produced on the current logical line yet.
    pub(crate) line_beginning: bool,
    /// Suppresses duplicate diagnostics for one failure.
    pub(crate) error_handled: bool,
    poisoned: bool,
}

impl Lexer {
    /// Open `path` and prime the lexer.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::with_reader(SourceReader::open(path)?))
    }

    /// Lex an in-memory buffer under the given display name.
    pub fn from_source(name: &str, source: impl Into<Vec<u8>>) -> Result<Self> {
        Ok(Self::with_reader(SourceReader::from_bytes(name, source)?))
    }

    fn with_reader(reader: SourceReader) -> Self {
        Self {
            reader,
            handler: Handler::new(),
            identifiers: StringSet::with_capacity(IDENTIFIER_BUFFER_SIZE, MAX_IDENTIFIER_COUNT),
            string_literals: StringSet::with_capacity(
                STRING_LITERAL_BUFFER_SIZE,
                MAX_STRING_LITERAL_COUNT,
            ),
            pp_numbers: StringSet::with_capacity(PP_NUMBER_BUFFER_SIZE, MAX_PP_NUMBER_COUNT),
            constants: ConstantTable::with_capacity(MAX_CONSTANT_COUNT),
            pp: PreprocessorState::new(),
            param_names: StringSet::with_capacity(PARAM_NAME_BUFFER_SIZE, crate::MAX_MACRO_PARAMS),
            scratch: Vec::new(),
            token_pos: SourcePos::START,
            macro_body: false,
            function_like_body: false,
            line_beginning: true,
            error_handled: false,
            poisoned: false,
        }
    }

    /// The next fully-expanded token, or `TokenKind::Eof` at stream end.
    ///
    /// A fatal error poisons the lexer; every later call reports
    /// [`LexError::Poisoned`]. Reaching end of file does not poison:
    /// repeated calls keep returning the end-of-file token.
    pub fn next_token(&mut self) -> Result<Token> {
        if self.poisoned {
            return Err(LexError::Poisoned);
        }
        match self.next_token_inner() {
            Ok(token) => Ok(token),
            Err(error) => {
                self.poisoned = true;
                if !self.error_handled {
                    self.error_handled = true;
                    let message = match &error {
                        LexError::Lexical { message, .. }
                        | LexError::Preprocessor { message, .. } => message.clone(),
                        other => other.to_string(),
                    };
                    let mut diagnostic =
                        Diagnostic::error(message).with_file(self.reader.name());
                    if let Some(pos) = error.pos() {
                        diagnostic = diagnostic.with_pos(pos);
                    }
                    self.handler.emit(diagnostic);
                }
                Err(error)
            }
        }
    }

    fn next_token_inner(&mut self) -> Result<Token> {
        loop {
            if self.pp.expanding() {
                let pp_token = self.pp.next_expanded(&self.identifiers)?;
                if pp_token.kind == TokenKind::Eof {
                    self.pp.stop_expansion();
                    continue;
                }
                return self.token_from_pp(&pp_token);
            }

            let token = self.lex_raw_token()?;
            if token.kind == TokenKind::Identifier {
                if let TokenValue::Str(id) = token.value {
                    if let Some(def) = self.find_macro(id) {
                        self.invoke_macro(def)?;
                        continue;
                    }
                }
            }
            return Ok(token);
        }
    }

    /// Produce one raw token in the current mode, skipping whitespace
    /// and comments first.
    pub(crate) fn lex_raw_token(&mut self) -> Result<Token> {
        loop {
            self.skip_whitespace()?;
            self.token_pos = self.reader.pos();
            let c = self.reader.current();
            if c == INPUT_EOF {
                return Ok(Token::eof(self.token_pos));
            }
            if c == b'\n' && self.macro_body {
                // The replacement list ends at the physical newline,
                // which stays unconsumed for the directive epilogue.
                return Ok(Token::eof(self.token_pos));
            }
            let at_line_start = self.line_beginning;
            self.line_beginning = false;
            let token = match c {
                b'/' => {
                    self.consume_lexable()?;
                    match self.reader.current() {
                        b'/' => {
                            self.consume_lexable()?;
                            self.skip_line_comment()?;
                            // Comments are whitespace; a directive may
                            // still follow on this logical line.
                            self.line_beginning = at_line_start;
                            continue;
                        }
                        b'*' => {
                            self.consume_lexable()?;
                            self.skip_block_comment()?;
                            self.line_beginning = at_line_start
                                || self.reader.pos().line != self.token_pos.line;
                            continue;
                        }
                        b'=' => {
                            self.consume_lexable()?;
                            Token::simple(TokenKind::DivAssign, self.token_pos)
                        }
                        _ => Token::simple(TokenKind::Div, self.token_pos),
                    }
                }
                b'*' => self.lex_star()?,
                b'%' => self.lex_percent()?,
                b'+' => self.lex_plus()?,
                b'-' => self.lex_minus()?,
                b'&' => self.lex_ampersand()?,
                b'|' => self.lex_pipe()?,
                b'^' => self.lex_caret()?,
                b'!' => self.lex_bang()?,
                b'<' => self.lex_less()?,
                b'>' => self.lex_greater()?,
                b'=' => self.lex_equals()?,
                b'~' => self.lex_single(TokenKind::Tilde)?,
                b'?' => self.lex_single(TokenKind::Question)?,
                b':' => self.lex_single(TokenKind::Colon)?,
                b';' => self.lex_single(TokenKind::Semicolon)?,
                b',' => self.lex_single(TokenKind::Comma)?,
                b'(' => self.lex_single(TokenKind::LParen)?,
                b')' => self.lex_single(TokenKind::RParen)?,
                b'[' => self.lex_single(TokenKind::LBracket)?,
                b']' => self.lex_single(TokenKind::RBracket)?,
                b'{' => self.lex_single(TokenKind::LBrace)?,
                b'}' => self.lex_single(TokenKind::RBrace)?,
                b'.' => {
                    self.consume_lexable()?;
                    if self.reader.current().is_ascii_digit() {
                        self.lex_number_after_dot()?
                    } else {
                        Token::simple(TokenKind::Dot, self.token_pos)
                    }
                }
                b'"' => self.lex_string_literal()?,
                b'\'' => self.lex_char_constant()?,
                b'#' => {
                    if self.macro_body {
                        self.consume_lexable()?;
                        if self.reader.current() == b'#' {
                            self.consume_lexable()?;
                            Token::simple(TokenKind::PpConcat, self.token_pos)
                        } else {
                            Token::simple(TokenKind::PpStringify, self.token_pos)
                        }
                    } else if at_line_start {
                        self.handle_directive()?;
                        continue;
                    } else {
                        return Err(self.lexical_error_at(
                            self.token_pos,
                            "preprocessor directives must start at the beginning of a line",
                        ));
                    }
                }
                c if is_word_start(c) => self.lex_word()?,
                c if c.is_ascii_digit() => self.lex_number()?,
                _ => return Err(self.lexical_error("unexpected character")),
            };
            return Ok(token);
        }
    }

    fn lex_single(&mut self, kind: TokenKind) -> Result<Token> {
        self.consume_lexable()?;
        Ok(Token::simple(kind, self.token_pos))
    }

    /// Skip whitespace; newlines count only outside macro-body mode.
    pub(crate) fn skip_whitespace(&mut self) -> Result<()> {
        loop {
            match self.reader.current() {
                b'\n' if self.macro_body => return Ok(()),
                b'\n' => {
                    self.line_beginning = true;
                    self.reader.advance()?;
                }
                b' ' | b'\t' | 0x08 | 0x0B | 0x0C => self.reader.advance()?,
                b'\\' => {
                    if !self.reader.skip_backslash_newline()? {
                        return Err(self.lexical_error("unexpected character"));
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Skip whitespace and comments without producing a token; used
    /// where the grammar allows a gap (adjacent string literals, macro
    /// argument parentheses, directive headers).
    pub(crate) fn skip_gap(&mut self) -> Result<()> {
        loop {
            self.skip_whitespace()?;
            if self.reader.current() == b'/' {
                match self.reader.lookahead() {
                    b'/' => {
                        self.reader.advance()?;
                        self.reader.advance()?;
                        self.skip_line_comment()?;
                    }
                    b'*' => {
                        self.reader.advance()?;
                        self.reader.advance()?;
                        self.skip_block_comment()?;
                    }
                    _ => return Ok(()),
                }
            } else {
                return Ok(());
            }
        }
    }

    /// Consume the current byte and splice any backslash-newline
    /// sequences that follow, so the next lexable character is current.
    pub(crate) fn consume_lexable(&mut self) -> Result<()> {
        self.reader.advance()?;
        if !self.reader.skip_backslash_newline()? {
            return Err(self.lexical_error("unexpected character"));
        }
        Ok(())
    }

    fn find_macro(&self, id: StrId) -> Option<Definition> {
        let name = self.identifiers.get_bytes(id);
        let hash = self.identifiers.hash_at(id);
        self.pp.find_definition(name, hash)
    }

    /// Begin expanding `def` at the top level. For a function-like
    /// macro this captures the raw argument tokens into the
    /// replacement-token buffer and slices them into per-parameter
    /// iterators before the root context is pushed.
    fn invoke_macro(&mut self, def: Definition) -> Result<()> {
        let marker = self.pp.tokens.len();
        if !def.is_function_like() {
            self.pp.begin_expansion(&def, None, marker);
            return Ok(());
        }

        self.skip_gap()?;
        if self.reader.current() != b'(' {
            return Err(LexError::Expansion {
                message: "function-like macro must be called like a function".into(),
            });
        }
        self.consume_lexable()?;

        if def.num_params == 0 {
            self.skip_gap()?;
            if self.reader.current() != b')' {
                return Err(LexError::Expansion {
                    message: "macro parentheses not closed".into(),
                });
            }
            self.consume_lexable()?;
            self.pp.begin_expansion(&def, None, marker);
            return Ok(());
        }

        let mut depth: i32 = 1;
        loop {
            let token = self.lex_raw_token()?;
            match token.kind {
                TokenKind::Eof => {
                    return Err(LexError::Expansion {
                        message: "macro parentheses not closed".into(),
                    });
                }
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => depth -= 1,
                _ => {}
            }
            self.push_pp_token(&token)?;
            if depth == 0 {
                break;
            }
        }

        let end = self.pp.tokens.len() as i32 - 1;
        let mut scan = TokenIterator::new(marker as i32, end);
        let iters_start = self.pp.arena.alloc_iterators(def.num_params)?;
        self.pp
            .scan_argument_list(&mut scan, iters_start, def.num_params)?;
        let param_id = self.pp.arena.push_param(ParamNode {
            parent: None,
            iters_start,
            num_params: def.num_params,
        })?;
        self.pp.begin_expansion(&def, Some(param_id), marker);
        Ok(())
    }

    /// Convert a raw token to replacement-list form and append it.
    pub(crate) fn push_pp_token(&mut self, token: &Token) -> Result<()> {
        let value_handle: u16 = match token.value {
            TokenValue::None => 0,
            TokenValue::Str(id) => id.0,
            TokenValue::Param(ordinal) => ordinal as u16,
            TokenValue::Int(v) => self.park_constant(Constant::Int(v))?,
            TokenValue::UInt(v) => self.park_constant(Constant::UInt(v))?,
            TokenValue::Float(v) => self.park_constant(Constant::Float(v))?,
            TokenValue::Double(v) => self.park_constant(Constant::Double(v))?,
            TokenValue::Char(v) => self.park_constant(Constant::Char(v))?,
        };
        self.pp
            .tokens
            .push(PpToken::new(token.kind, value_handle, token.pos))
            .ok_or(LexError::Capacity {
                what: "replacement token buffer",
            })?;
        Ok(())
    }

    fn park_constant(&mut self, constant: Constant) -> Result<u16> {
        self.constants.add(constant).ok_or(LexError::Capacity {
            what: "constants table",
        })
    }

    /// Reconstitute a full token from its replacement-list form.
    fn token_from_pp(&mut self, pp_token: &PpToken) -> Result<Token> {
        let pos = pp_token.pos();
        let handle = pp_token.value_handle;
        let token = match pp_token.kind {
            TokenKind::Identifier => {
                Token::new(TokenKind::Identifier, TokenValue::Str(StrId(handle)), pos)
            }
            TokenKind::LitString => {
                Token::new(TokenKind::LitString, TokenValue::Str(StrId(handle)), pos)
            }
            TokenKind::PpNumber => {
                let lexeme = self.pp_numbers.get_bytes(StrId(handle));
                let (kind, value) = parse_pp_number(lexeme)
                    .map_err(|message| self.lexical_error_at(pos, message))?;
                Token::new(kind, value, pos)
            }
            kind if kind.is_constant() => {
                let constant = self.constants.get(handle).ok_or(LexError::Expansion {
                    message: "invalid constant handle in replacement list".into(),
                })?;
                Token::new(kind, constant.to_value(), pos)
            }
            TokenKind::PpParam | TokenKind::PpConcat | TokenKind::PpStringify => {
                return Err(LexError::Expansion {
                    message: "internal preprocessing token escaped expansion".into(),
                });
            }
            kind => Token::simple(kind, pos),
        };
        Ok(token)
    }

    /// Build a lexical error at the current reader position.
    pub(crate) fn lexical_error(&self, message: impl Into<String>) -> LexError {
        LexError::Lexical {
            pos: self.reader.pos(),
            message: message.into(),
        }
    }

    pub(crate) fn lexical_error_at(&self, pos: SourcePos, message: impl Into<String>) -> LexError {
        LexError::Lexical {
            pos,
            message: message.into(),
        }
    }

    /// Build a preprocessor error at the current reader position.
    pub(crate) fn pp_error(&self, message: impl Into<String>) -> LexError {
        LexError::Preprocessor {
            pos: self.reader.pos(),
            message: message.into(),
        }
    }

    /// Diagnostics collected so far (warnings and the fatal error, if
    /// one occurred).
    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    /// Display name of the input.
    pub fn file_name(&self) -> &str {
        self.reader.name()
    }

    /// Path of the input, when it came from a file.
    pub fn file_path(&self) -> Option<&Path> {
        self.reader.path()
    }

    /// The identifier interner (for token display and tests).
    pub fn identifiers(&self) -> &StringSet {
        &self.identifiers
    }

    /// The string-literal interner.
    pub fn string_literals(&self) -> &StringSet {
        &self.string_literals
    }

    /// Number of macros currently defined.
    pub fn macro_count(&self) -> usize {
        self.pp.definitions.len()
    }
}

impl std::fmt::Debug for Lexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("file", &self.reader.name())
            .field("pos", &self.reader.pos())
            .field("expanding", &self.pp.expanding())
            .field("poisoned", &self.poisoned)
            .finish()
    }
}
