//! Token model.
//!
//! A token is a kind, a value payload and a source position. The payload
//! is a closed sum: each kind that carries data gets exactly one variant
//! shape, and exhaustive matching replaces the discriminator-plus-union
//! arrangement C front-ends traditionally use.

use crex_util::SourcePos;

use crate::strings::StrId;

/// Every kind of token the lexer can produce.
///
/// The `Pp*` kinds exist only inside replacement-list storage; they never
/// reach the public token stream (preprocessing numbers are parsed into
/// concrete constants before emission).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenKind {
    Identifier = 0,
    // Keywords
    KwIf,
    KwElse,
    KwWhile,
    KwFor,
    KwDo,
    KwSwitch,
    KwCase,
    KwBreak,
    KwContinue,
    KwDefault,
    KwGoto,
    KwReturn,
    KwStruct,
    KwEnum,
    KwUnion,
    KwTypedef,
    KwVoid,
    KwChar,
    KwShort,
    KwInt,
    KwLong,
    KwFloat,
    KwDouble,
    KwSigned,
    KwUnsigned,
    KwStatic,
    KwExtern,
    KwConst,
    KwInline,
    KwRegister,
    KwRestrict,
    KwVolatile,
    KwAuto,
    KwSizeof,
    KwAlignas,
    KwAlignof,
    KwBool,
    KwComplex,
    KwGeneric,
    KwImaginary,
    KwNoreturn,
    KwStaticAssert,
    KwConstexpr,
    // Operator punctuators
    Plus,
    Minus,
    Div,
    Mod,
    PlusPlus,
    MinusMinus,
    Amp,
    Pipe,
    Caret,
    Shl,
    Shr,
    Tilde,
    AndAnd,
    OrOr,
    Not,
    EqEq,
    NotEq,
    Lt,
    Gt,
    Le,
    Ge,
    Assign,
    PlusAssign,
    MinusAssign,
    StarAssign,
    DivAssign,
    ModAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    ShlAssign,
    ShrAssign,
    Dot,
    Arrow,
    Question,
    // Other punctuators
    Colon,
    Semicolon,
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Star,
    // Literals
    LitString,
    ConstChar,
    ConstInt,
    ConstUInt,
    ConstFloat,
    ConstDouble,
    // Preprocessor (replacement-list internal)
    PpNumber,
    PpParam,
    PpConcat,
    PpStringify,
    // End of stream
    Eof,
}

impl TokenKind {
    /// C-front-end style display name (used by the token printer).
    pub fn name(&self) -> &'static str {
        use TokenKind::*;
        match self {
            Identifier => "IDENTIFIER",
            KwIf => "KEYWORD_IF",
            KwElse => "KEYWORD_ELSE",
            KwWhile => "KEYWORD_WHILE",
            KwFor => "KEYWORD_FOR",
            KwDo => "KEYWORD_DO",
            KwSwitch => "KEYWORD_SWITCH",
            KwCase => "KEYWORD_CASE",
            KwBreak => "KEYWORD_BREAK",
            KwContinue => "KEYWORD_CONTINUE",
            KwDefault => "KEYWORD_DEFAULT",
            KwGoto => "KEYWORD_GOTO",
            KwReturn => "KEYWORD_RETURN",
            KwStruct => "KEYWORD_STRUCT",
            KwEnum => "KEYWORD_ENUM",
            KwUnion => "KEYWORD_UNION",
            KwTypedef => "KEYWORD_TYPEDEF",
            KwVoid => "KEYWORD_VOID",
            KwChar => "KEYWORD_CHAR",
            KwShort => "KEYWORD_SHORT",
            KwInt => "KEYWORD_INT",
            KwLong => "KEYWORD_LONG",
            KwFloat => "KEYWORD_FLOAT",
            KwDouble => "KEYWORD_DOUBLE",
            KwSigned => "KEYWORD_SIGNED",
            KwUnsigned => "KEYWORD_UNSIGNED",
            KwStatic => "KEYWORD_STATIC",
            KwExtern => "KEYWORD_EXTERN",
            KwConst => "KEYWORD_CONST",
            KwInline => "KEYWORD_INLINE",
            KwRegister => "KEYWORD_REGISTER",
            KwRestrict => "KEYWORD_RESTRICT",
            KwVolatile => "KEYWORD_VOLATILE",
            KwAuto => "KEYWORD_AUTO",
            KwSizeof => "KEYWORD_SIZEOF",
            KwAlignas => "KEYWORD_ALIGNAS",
            KwAlignof => "KEYWORD_ALIGNOF",
            KwBool => "KEYWORD_BOOL",
            KwComplex => "KEYWORD_COMPLEX",
            KwGeneric => "KEYWORD_GENERIC",
            KwImaginary => "KEYWORD_IMAGINARY",
            KwNoreturn => "KEYWORD_NORETURN",
            KwStaticAssert => "KEYWORD_STATIC_ASSERT",
            KwConstexpr => "KEYWORD_CONSTEXPR",
            Plus => "PUNCTUATOR_PLUS",
            Minus => "PUNCTUATOR_MINUS",
            Div => "PUNCTUATOR_DIV",
            Mod => "PUNCTUATOR_MODULO",
            PlusPlus => "PUNCTUATOR_PLUSPLUS",
            MinusMinus => "PUNCTUATOR_MINUSMINUS",
            Amp => "PUNCTUATOR_AND",
            Pipe => "PUNCTUATOR_OR",
            Caret => "PUNCTUATOR_XOR",
            Shl => "PUNCTUATOR_SHIFT_LEFT",
            Shr => "PUNCTUATOR_SHIFT_RIGHT",
            Tilde => "PUNCTUATOR_NEGATE",
            AndAnd => "PUNCTUATOR_LOGICAL_AND",
            OrOr => "PUNCTUATOR_LOGICAL_OR",
            Not => "PUNCTUATOR_LOGICAL_NOT",
            EqEq => "PUNCTUATOR_EQUAL",
            NotEq => "PUNCTUATOR_NOT_EQUAL",
            Lt => "PUNCTUATOR_LESS",
            Gt => "PUNCTUATOR_GREATER",
            Le => "PUNCTUATOR_LESS_OR_EQUAL",
            Ge => "PUNCTUATOR_GREATER_OR_EQUAL",
            Assign => "PUNCTUATOR_ASSIGNMENT",
            PlusAssign => "PUNCTUATOR_PLUS_ASSIGNMENT",
            MinusAssign => "PUNCTUATOR_MINUS_ASSIGNMENT",
            StarAssign => "PUNCTUATOR_MUL_ASSIGNMENT",
            DivAssign => "PUNCTUATOR_DIV_ASSIGNMENT",
            ModAssign => "PUNCTUATOR_MODULO_ASSIGNMENT",
            AndAssign => "PUNCTUATOR_AND_ASSIGNMENT",
            OrAssign => "PUNCTUATOR_OR_ASSIGNMENT",
            XorAssign => "PUNCTUATOR_XOR_ASSIGNMENT",
            ShlAssign => "PUNCTUATOR_SHIFT_LEFT_ASSIGNMENT",
            ShrAssign => "PUNCTUATOR_SHIFT_RIGHT_ASSIGNMENT",
            Dot => "PUNCTUATOR_POINT",
            Arrow => "PUNCTUATOR_DEREFERENCE",
            Question => "PUNCTUATOR_CONDITIONAL",
            Colon => "PUNCTUATOR_COLON",
            Semicolon => "PUNCTUATOR_SEMICOLON",
            Comma => "PUNCTUATOR_COMMA",
            LParen => "PUNCTUATOR_PARENTHESE_LEFT",
            RParen => "PUNCTUATOR_PARENTHESE_RIGHT",
            LBracket => "PUNCTUATOR_BRACKET_LEFT",
            RBracket => "PUNCTUATOR_BRACKET_RIGHT",
            LBrace => "PUNCTUATOR_BRACE_LEFT",
            RBrace => "PUNCTUATOR_BRACE_RIGHT",
            Star => "PUNCTUATOR_ASTERISC",
            LitString => "LITERAL_STRING",
            ConstChar => "CONSTANT_CHAR",
            ConstInt => "CONSTANT_INT",
            ConstUInt => "CONSTANT_UNSIGNED_INT",
            ConstFloat => "CONSTANT_FLOAT",
            ConstDouble => "CONSTANT_DOUBLE",
            PpNumber => "PP_NUMBER",
            PpParam => "PP_PARAM",
            PpConcat => "PP_CONCAT",
            PpStringify => "PP_STRINGIFY",
            Eof => "TOKEN_EOF",
        }
    }

    /// Is this a reserved-word kind?
    pub fn is_keyword(&self) -> bool {
        matches!(
            *self as u8,
            k if k >= TokenKind::KwIf as u8 && k <= TokenKind::KwConstexpr as u8
        )
    }

    /// Does this kind carry a numeric or character constant payload?
    pub fn is_constant(&self) -> bool {
        matches!(
            self,
            TokenKind::ConstChar
                | TokenKind::ConstInt
                | TokenKind::ConstUInt
                | TokenKind::ConstFloat
                | TokenKind::ConstDouble
        )
    }

    /// Does this kind carry a string-set handle?
    pub fn has_string_value(&self) -> bool {
        matches!(
            self,
            TokenKind::Identifier | TokenKind::LitString | TokenKind::PpNumber
        )
    }
}

/// Value payload of a token.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TokenValue {
    /// Kinds with no payload (keywords, punctuators, end of file).
    None,
    /// Signed integer constant.
    Int(i64),
    /// Unsigned integer constant (`u` suffix).
    UInt(u64),
    /// Single-precision float constant (`f` suffix).
    Float(f32),
    /// Double-precision float constant.
    Double(f64),
    /// Character constant (possibly multi-character, accumulated 8 bits
    /// per byte).
    Char(i32),
    /// Handle into one of the string sets (identifiers, string literals,
    /// preprocessing numbers).
    Str(StrId),
    /// Formal-parameter ordinal inside a function-like macro body.
    Param(u8),
}

/// A lexed token.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: TokenValue,
    pub pos: SourcePos,
}

impl Token {
    pub fn new(kind: TokenKind, value: TokenValue, pos: SourcePos) -> Self {
        Self { kind, value, pos }
    }

    /// A token with no payload.
    pub fn simple(kind: TokenKind, pos: SourcePos) -> Self {
        Self::new(kind, TokenValue::None, pos)
    }

    pub fn eof(pos: SourcePos) -> Self {
        Self::simple(TokenKind::Eof, pos)
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    /// The string handle, for kinds that carry one.
    pub fn str_id(&self) -> Option<StrId> {
        match self.value {
            TokenValue::Str(id) => Some(id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert!(TokenKind::KwInt.is_keyword());
        assert!(TokenKind::KwConstexpr.is_keyword());
        assert!(!TokenKind::Identifier.is_keyword());
        assert!(!TokenKind::Plus.is_keyword());

        assert!(TokenKind::ConstInt.is_constant());
        assert!(!TokenKind::LitString.is_constant());

        assert!(TokenKind::LitString.has_string_value());
        assert!(TokenKind::PpNumber.has_string_value());
        assert!(!TokenKind::ConstInt.has_string_value());
    }

    #[test]
    fn test_names() {
        assert_eq!(TokenKind::KwInt.name(), "KEYWORD_INT");
        assert_eq!(TokenKind::Shl.name(), "PUNCTUATOR_SHIFT_LEFT");
        assert_eq!(TokenKind::Eof.name(), "TOKEN_EOF");
    }

    #[test]
    fn test_simple_token() {
        let t = Token::simple(TokenKind::Semicolon, SourcePos::START);
        assert_eq!(t.value, TokenValue::None);
        assert!(!t.is_eof());
        assert!(Token::eof(SourcePos::START).is_eof());
    }
}
