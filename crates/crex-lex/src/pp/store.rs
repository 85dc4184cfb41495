//! Replacement-list token storage and the macro table.

use crex_util::SourcePos;
use static_assertions::const_assert_eq;

use crate::strings::{StringSet, StringSetError};
use crate::token::TokenKind;

/// Marks a definition as function-like.
pub const FLAG_FUNCTION_LIKE: u8 = 0x1;

/// Compressed token stored in the replacement-list buffer.
///
/// `value_handle` is interpreted according to `kind`: a string-set index
/// for identifiers, string literals and preprocessing numbers, a
/// constants-table index for numeric and character constants, and a
/// parameter ordinal for `PpParam`. Line and column saturate at 16 bits;
/// they are display data, not offsets.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct PpToken {
    pub line_start: u32,
    pub line: u16,
    pub column: u16,
    pub value_handle: u16,
    pub kind: TokenKind,
}

const_assert_eq!(std::mem::size_of::<PpToken>(), 12);

impl PpToken {
    pub fn new(kind: TokenKind, value_handle: u16, pos: SourcePos) -> Self {
        Self {
            line_start: pos.line_start,
            line: pos.line.min(u16::MAX as u32) as u16,
            column: pos.column.min(u16::MAX as u32) as u16,
            value_handle,
            kind,
        }
    }

    pub fn pos(&self) -> SourcePos {
        SourcePos::new(self.line as u32, self.column as u32, self.line_start)
    }
}

/// The global, append-only buffer of replacement-list tokens.
///
/// Macro records point into it by stable index. During an expansion the
/// buffer additionally holds the captured argument tokens of the root
/// invocation; `truncate` reclaims them when the expansion stops.
#[derive(Debug)]
pub struct PpTokenSet {
    tokens: Vec<PpToken>,
    max_tokens: usize,
}

impl PpTokenSet {
    pub fn with_capacity(max_tokens: usize) -> Self {
        Self {
            tokens: Vec::new(),
            max_tokens,
        }
    }

    /// Append a token; `None` when the buffer is full.
    pub fn push(&mut self, token: PpToken) -> Option<usize> {
        if self.tokens.len() >= self.max_tokens {
            return None;
        }
        self.tokens.push(token);
        Some(self.tokens.len() - 1)
    }

    #[inline]
    pub fn get(&self, index: usize) -> &PpToken {
        &self.tokens[index]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Drop everything at and after `marker`.
    pub fn truncate(&mut self, marker: usize) {
        self.tokens.truncate(marker);
    }
}

/// A macro record. The name lives in the definition-name string set at
/// the same index.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct Definition {
    pub token_start: u16,
    pub num_tokens: u16,
    pub num_params: u8,
    pub flags: u8,
}

const_assert_eq!(std::mem::size_of::<Definition>(), 6);

impl Definition {
    #[inline]
    pub fn is_function_like(&self) -> bool {
        self.flags & FLAG_FUNCTION_LIKE != 0
    }
}

/// The macro table: records parallel to an interned name set.
///
/// Redefinition reuses the slot (the name set guarantees identity by
/// content), so records never move once created.
#[derive(Debug)]
pub struct DefinitionSet {
    definitions: Vec<Definition>,
    names: StringSet,
}

impl DefinitionSet {
    pub fn new(name_buffer_size: usize, max_definitions: usize) -> Self {
        Self {
            definitions: Vec::new(),
            names: StringSet::with_capacity(name_buffer_size, max_definitions),
        }
    }

    /// Record a definition under `name`. Returns the slot index and
    /// whether an earlier definition was overwritten.
    pub fn create(
        &mut self,
        name: &[u8],
        token_start: usize,
        num_tokens: usize,
        num_params: u8,
        function_like: bool,
    ) -> Result<(u16, bool), StringSetError> {
        let (id, existed) = self.names.add(name)?;
        let record = Definition {
            token_start: token_start as u16,
            num_tokens: num_tokens as u16,
            num_params,
            flags: if function_like { FLAG_FUNCTION_LIKE } else { 0 },
        };
        if existed {
            self.definitions[id.0 as usize] = record;
        } else {
            debug_assert_eq!(id.0 as usize, self.definitions.len());
            self.definitions.push(record);
        }
        Ok((id.0, existed))
    }

    /// Look up a record by name bytes and interner hash.
    pub fn find_hashed(&self, name: &[u8], hash: u32) -> Option<Definition> {
        self.names
            .find_hashed(name, hash)
            .map(|id| self.definitions[id.0 as usize])
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
