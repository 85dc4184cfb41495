//! Preprocessing: replacement-list storage, directive handling, macro
//! expansion.
//!
//! Everything the `#define` machinery needs hangs off one
//! [`PreprocessorState`]: the global buffer of compressed replacement
//! tokens, the macro table, the expansion-context stack and the
//! per-expansion arena. The directive dispatcher and the top-level
//! invocation capture live on the lexer itself (they consume raw input);
//! the pure expansion algorithm lives here.

mod directive;
mod expand;
mod store;

pub use expand::{ExpansionArena, ExpansionState, ParamId, ParamNode, TokenIterator};
pub use store::{Definition, DefinitionSet, PpToken, PpTokenSet, FLAG_FUNCTION_LIKE};

/// Expansion-context stack capacity; the only guard against runaway
/// (e.g. self-recursive) expansion.
pub const MAX_EXPANSION_DEPTH: usize = 1024;

/// Macro table capacity.
pub const MAX_DEFINITION_COUNT: usize = 1024;

/// Replacement-list buffer capacity, in tokens.
pub const MAX_DEFINITION_TOKEN_COUNT: usize = 4096 << 2;

/// Bytes reserved for macro names.
pub const DEFINITION_NAME_BUFFER_SIZE: usize = 4096 << 3;

/// Iterator slots available to one root expansion.
pub const MAX_EXPANSION_ITERATORS: usize = 2048;

/// Parameter-context nodes available to one root expansion.
pub const MAX_PARAM_CONTEXTS: usize = 1024;

/// All preprocessing state owned by a lexer.
#[derive(Debug)]
pub struct PreprocessorState {
    pub(crate) tokens: PpTokenSet,
    pub(crate) definitions: DefinitionSet,
    pub(crate) expansion: ExpansionState,
    pub(crate) arena: ExpansionArena,
}

impl PreprocessorState {
    pub fn new() -> Self {
        Self {
            tokens: PpTokenSet::with_capacity(MAX_DEFINITION_TOKEN_COUNT),
            definitions: DefinitionSet::new(DEFINITION_NAME_BUFFER_SIZE, MAX_DEFINITION_COUNT),
            expansion: ExpansionState::new(),
            arena: ExpansionArena::new(MAX_EXPANSION_ITERATORS, MAX_PARAM_CONTEXTS),
        }
    }

    /// Is a macro expansion currently feeding the token stream?
    #[inline]
    pub fn expanding(&self) -> bool {
        self.expansion.active()
    }

    /// Look up a macro by name bytes and interner hash.
    pub fn find_definition(&self, name: &[u8], hash: u32) -> Option<Definition> {
        self.definitions.find_hashed(name, hash)
    }
}

impl Default for PreprocessorState {
    fn default() -> Self {
        Self::new()
    }
}
