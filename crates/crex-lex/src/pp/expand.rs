//! Macro expansion.
//!
//! Expansion is driven by a bounded stack of contexts. Each frame walks
//! either a macro's replacement list or the token range bound to a
//! formal parameter, together with the parameter context to consult for
//! parameter references seen inside that frame.
//!
//! The subtle part is parameter binding. When a frame walks a
//! function-like macro's body, a `PpParam` there refers to that macro's
//! own formals and resolves against the frame's parameter context. But
//! when the engine then *enters* the argument tokens bound to that
//! formal, any `PpParam` inside them belongs to the caller's macro, so
//! the pushed frame inherits `parent` — the caller's bindings — hiding
//! the current macro's own. Parameter contexts therefore form a chain
//! of arena-owned nodes linked by non-owning parent references; the
//! whole chain dies at once when the root expansion stops.

use crate::error::{LexError, Result};
use crate::pp::{PreprocessorState, MAX_EXPANSION_DEPTH};
use crate::pp::store::{Definition, PpToken};
use crate::strings::{StrId, StringSet};
use crate::token::TokenKind;

/// A cursor over a contiguous range of replacement-list tokens.
///
/// `end` is inclusive; the range is exhausted once `cur > end`, which
/// also covers empty ranges (`end == start - 1`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenIterator {
    pub start: i32,
    pub cur: i32,
    pub end: i32,
}

impl TokenIterator {
    pub fn new(start: i32, end: i32) -> Self {
        Self {
            start,
            cur: start,
            end,
        }
    }

    /// The iterator covering a macro's replacement list.
    pub fn of_definition(def: &Definition) -> Self {
        let start = def.token_start as i32;
        Self::new(start, start + def.num_tokens as i32 - 1)
    }

    #[inline]
    pub fn exhausted(&self) -> bool {
        self.cur > self.end
    }

    /// A copy rewound to its start.
    pub fn rewound(&self) -> Self {
        Self::new(self.start, self.end)
    }
}

/// Handle to a parameter-context node in the expansion arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParamId(u32);

/// Binding of formal-parameter ordinals to token ranges at one
/// invocation site.
#[derive(Clone, Copy, Debug)]
pub struct ParamNode {
    /// The enclosing invocation's bindings; consulted by frames entered
    /// through a parameter reference.
    pub parent: Option<ParamId>,
    /// First of `num_params` consecutive iterator slots in the arena.
    pub iters_start: u32,
    pub num_params: u8,
}

/// Per-expansion arena for iterator arrays and parameter-context nodes.
///
/// Reset wholesale when the root expansion completes; everything handed
/// out in between is stale afterwards.
#[derive(Debug)]
pub struct ExpansionArena {
    iters: Vec<TokenIterator>,
    params: Vec<ParamNode>,
    max_iters: usize,
    max_params: usize,
}

impl ExpansionArena {
    pub fn new(max_iters: usize, max_params: usize) -> Self {
        Self {
            iters: Vec::new(),
            params: Vec::new(),
            max_iters,
            max_params,
        }
    }

    /// Reserve `count` consecutive iterator slots, returning the first
    /// slot's index.
    pub fn alloc_iterators(&mut self, count: u8) -> Result<u32> {
        let start = self.iters.len();
        if start + count as usize > self.max_iters {
            return Err(LexError::Capacity {
                what: "expansion arena",
            });
        }
        self.iters
            .resize(start + count as usize, TokenIterator::new(0, -1));
        Ok(start as u32)
    }

    pub fn iterator(&self, slot: u32) -> TokenIterator {
        self.iters[slot as usize]
    }

    pub fn set_iterator(&mut self, slot: u32, it: TokenIterator) {
        self.iters[slot as usize] = it;
    }

    pub fn push_param(&mut self, node: ParamNode) -> Result<ParamId> {
        if self.params.len() >= self.max_params {
            return Err(LexError::Capacity {
                what: "expansion arena",
            });
        }
        self.params.push(node);
        Ok(ParamId(self.params.len() as u32 - 1))
    }

    pub fn param(&self, id: ParamId) -> ParamNode {
        self.params[id.0 as usize]
    }

    /// Bulk-free everything allocated since the expansion began.
    pub fn reset(&mut self) {
        self.iters.clear();
        self.params.clear();
    }
}

/// One frame of the expansion stack.
#[derive(Clone, Copy, Debug)]
pub struct ExpansionContext {
    pub iterator: TokenIterator,
    pub param: Option<ParamId>,
}

/// The expansion-context stack plus the buffer marker for reclaiming
/// captured argument tokens.
#[derive(Debug)]
pub struct ExpansionState {
    stack: Vec<ExpansionContext>,
    token_marker: usize,
    active: bool,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self {
            stack: Vec::new(),
            token_marker: 0,
            active: false,
        }
    }

    #[inline]
    pub fn active(&self) -> bool {
        self.active
    }
}

impl Default for ExpansionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of one `expand` step.
enum Step {
    /// Yield this token to the caller.
    Token(PpToken),
    /// State changed; invoke `expand` again.
    Continue,
    /// The root frame drained.
    Eof,
}

fn expansion_error(message: impl Into<String>) -> LexError {
    LexError::Expansion {
        message: message.into(),
    }
}

impl PreprocessorState {
    /// Install the root context for an invocation of `def`.
    ///
    /// `marker` is the token-buffer length before any argument capture;
    /// `stop_expansion` truncates back to it. `param` carries the root
    /// parameter bindings of a function-like invocation.
    pub fn begin_expansion(&mut self, def: &Definition, param: Option<ParamId>, marker: usize) {
        self.expansion.token_marker = marker;
        self.expansion.active = true;
        self.expansion.stack.clear();
        self.expansion.stack.push(ExpansionContext {
            iterator: TokenIterator::of_definition(def),
            param,
        });
        tracing::debug!(
            function_like = def.is_function_like(),
            tokens = def.num_tokens,
            "begin expansion"
        );
    }

    /// Tear down after the root expansion drained (or was abandoned).
    ///
    /// Resets the expansion arena wholesale and reclaims captured
    /// argument tokens.
    pub fn stop_expansion(&mut self) {
        self.expansion.active = false;
        self.expansion.stack.clear();
        let marker = self.expansion.token_marker;
        self.tokens.truncate(marker);
        self.arena.reset();
        tracing::debug!("stop expansion");
    }

    fn push_context(&mut self, iterator: TokenIterator, param: Option<ParamId>) -> Result<()> {
        if self.expansion.stack.len() >= MAX_EXPANSION_DEPTH {
            return Err(expansion_error("expansion stack full"));
        }
        self.expansion.stack.push(ExpansionContext {
            iterator: iterator.rewound(),
            param,
        });
        Ok(())
    }

    fn pop_context(&mut self) -> Result<()> {
        if self.expansion.stack.len() <= 1 {
            return Err(expansion_error("expansion context underflow"));
        }
        self.expansion.stack.pop();
        Ok(())
    }

    /// Run `expand` until it produces a token or fails.
    ///
    /// An `Eof`-kinded result means the root frame drained; the caller
    /// is expected to `stop_expansion` and resume raw lexing.
    pub fn next_expanded(&mut self, identifiers: &StringSet) -> Result<PpToken> {
        loop {
            match self.expand(identifiers)? {
                Step::Continue => continue,
                Step::Token(token) => return Ok(token),
                Step::Eof => {
                    return Ok(PpToken::new(TokenKind::Eof, 0, crex_util::SourcePos::START))
                }
            }
        }
    }

    /// One expansion step: yield a token, change state, or fail.
    fn expand(&mut self, identifiers: &StringSet) -> Result<Step> {
        let depth = self.expansion.stack.len() - 1;
        let frame = self.expansion.stack[depth];

        if frame.iterator.exhausted() {
            if depth == 0 {
                return Ok(Step::Eof);
            }
            self.pop_context()?;
            return Ok(Step::Continue);
        }

        let token = *self.tokens.get(frame.iterator.cur as usize);
        self.expansion.stack[depth].iterator.cur += 1;

        match token.kind {
            TokenKind::PpParam => {
                let param_id = frame.param.ok_or_else(|| {
                    expansion_error("parameter reference outside a function-like expansion")
                })?;
                let node = self.arena.param(param_id);
                let ordinal = token.value_handle;
                if ordinal >= node.num_params as u16 {
                    return Err(expansion_error("invalid macro parameter reference"));
                }
                let bound = self.arena.iterator(node.iters_start + ordinal as u32);
                // Inside the argument tokens, parameter references refer
                // to the caller's formals, not this macro's.
                self.push_context(bound, node.parent)?;
                Ok(Step::Continue)
            }
            TokenKind::Identifier => {
                let name_id = StrId(token.value_handle);
                let name = identifiers.get_bytes(name_id);
                let hash = identifiers.hash_at(name_id);
                match self.definitions.find_hashed(name, hash) {
                    None => Ok(Step::Token(token)),
                    Some(def) if !def.is_function_like() => {
                        self.push_context(TokenIterator::of_definition(&def), None)?;
                        Ok(Step::Continue)
                    }
                    Some(def) => {
                        let mut it = self.expansion.stack[depth].iterator;
                        if it.exhausted()
                            || self.tokens.get(it.cur as usize).kind != TokenKind::LParen
                        {
                            return Err(expansion_error(
                                "function-like macro must be called like a function",
                            ));
                        }
                        it.cur += 1;
                        if def.num_params > 0 {
                            let iters_start = self.arena.alloc_iterators(def.num_params)?;
                            self.scan_argument_list(&mut it, iters_start, def.num_params)?;
                            self.expansion.stack[depth].iterator = it;
                            let param_id = self.arena.push_param(ParamNode {
                                parent: frame.param,
                                iters_start,
                                num_params: def.num_params,
                            })?;
                            self.push_context(TokenIterator::of_definition(&def), Some(param_id))?;
                        } else {
                            if it.exhausted()
                                || self.tokens.get(it.cur as usize).kind != TokenKind::RParen
                            {
                                return Err(expansion_error("macro parentheses not closed"));
                            }
                            it.cur += 1;
                            self.expansion.stack[depth].iterator = it;
                            self.push_context(TokenIterator::of_definition(&def), None)?;
                        }
                        Ok(Step::Continue)
                    }
                }
            }
            TokenKind::PpConcat => Err(expansion_error("token pasting is not supported")),
            TokenKind::PpStringify => Err(expansion_error("stringification is not supported")),
            _ => Ok(Step::Token(token)),
        }
    }

    /// Slice an argument list into per-parameter token ranges.
    ///
    /// `iterator` must sit just past the opening parenthesis; on success
    /// it sits just past the matching closing one. Arguments are
    /// separated by commas at parenthesis depth one; the recorded range
    /// for each parameter covers its raw tokens exclusive of the
    /// delimiters. The iterator is advanced first, then the depth
    /// counter is checked, then positions are recorded.
    pub fn scan_argument_list(
        &mut self,
        iterator: &mut TokenIterator,
        iters_start: u32,
        expected: u8,
    ) -> Result<()> {
        let token_offset = iterator.cur;
        let mut param_index: usize = 0;
        let mut counter: i32 = 1;
        let mut token_count: i32 = 0;
        let mut token_start: i32 = 0;
        self.arena
            .set_iterator(iters_start, TokenIterator::new(token_offset, token_offset - 1));
        loop {
            if iterator.exhausted() {
                return Err(expansion_error("macro parentheses not closed"));
            }
            let kind = self.tokens.get(iterator.cur as usize).kind;
            match kind {
                TokenKind::LParen => counter += 1,
                TokenKind::RParen => counter -= 1,
                TokenKind::Comma if counter == 1 => {
                    if param_index as u8 == expected - 1 {
                        return Err(expansion_error("too many macro arguments"));
                    }
                    let slot = iters_start + param_index as u32;
                    self.arena.set_iterator(
                        slot,
                        TokenIterator::new(
                            token_start + token_offset,
                            token_count - 1 + token_offset,
                        ),
                    );
                    token_start = token_count + 1;
                    self.arena.set_iterator(
                        slot + 1,
                        TokenIterator::new(token_start + token_offset, token_start + token_offset - 1),
                    );
                    param_index += 1;
                }
                _ => {}
            }
            iterator.cur += 1;
            if counter == 0 {
                let slot = iters_start + param_index as u32;
                self.arena.set_iterator(
                    slot,
                    TokenIterator::new(
                        token_start + token_offset,
                        token_count - 1 + token_offset,
                    ),
                );
                break;
            }
            token_count += 1;
        }
        if (param_index as u8) < expected - 1 {
            return Err(expansion_error("too few macro arguments"));
        }
        Ok(())
    }
}
