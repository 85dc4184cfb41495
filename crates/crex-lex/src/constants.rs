//! Bounded table of numeric and character constants.
//!
//! Replacement-list tokens are compressed to a 16-bit value handle, so
//! constant payloads captured during `#define` bodies or macro-argument
//! lists are parked here and referenced by index.

use crate::token::{TokenKind, TokenValue};

/// A constant value parked in the table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Constant {
    Int(i64),
    UInt(u64),
    Float(f32),
    Double(f64),
    Char(i32),
}

impl Constant {
    /// The token value this constant converts back to at the expansion
    /// boundary.
    pub fn to_value(self) -> TokenValue {
        match self {
            Constant::Int(v) => TokenValue::Int(v),
            Constant::UInt(v) => TokenValue::UInt(v),
            Constant::Float(v) => TokenValue::Float(v),
            Constant::Double(v) => TokenValue::Double(v),
            Constant::Char(v) => TokenValue::Char(v),
        }
    }

    /// Extract the constant payload from a token, if it has one.
    pub fn from_token(kind: TokenKind, value: TokenValue) -> Option<Constant> {
        match (kind, value) {
            (TokenKind::ConstInt, TokenValue::Int(v)) => Some(Constant::Int(v)),
            (TokenKind::ConstUInt, TokenValue::UInt(v)) => Some(Constant::UInt(v)),
            (TokenKind::ConstFloat, TokenValue::Float(v)) => Some(Constant::Float(v)),
            (TokenKind::ConstDouble, TokenValue::Double(v)) => Some(Constant::Double(v)),
            (TokenKind::ConstChar, TokenValue::Char(v)) => Some(Constant::Char(v)),
            _ => None,
        }
    }
}

/// Append-only, bounded constant storage.
#[derive(Debug)]
pub struct ConstantTable {
    items: Vec<Constant>,
    max_count: usize,
}

impl ConstantTable {
    pub fn with_capacity(max_count: usize) -> Self {
        Self {
            items: Vec::new(),
            max_count,
        }
    }

    /// Park a constant, returning its handle, or `None` when full.
    pub fn add(&mut self, constant: Constant) -> Option<u16> {
        if self.items.len() >= self.max_count {
            return None;
        }
        let index = self.items.len() as u16;
        self.items.push(constant);
        Some(index)
    }

    pub fn get(&self, handle: u16) -> Option<Constant> {
        self.items.get(handle as usize).copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
