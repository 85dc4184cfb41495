//! Keyword recognition.
//!
//! The reserved words are C89 plus the C99/C11 underscore-prefixed
//! keywords plus the private `__constexpr`. Lookup hashes the candidate
//! lexeme with DJB2 and scans the table; only a hash match pays for the
//! byte comparison. The hash column is computed at compile time, so the
//! table is immutable data.

use crate::strings::djb2;
use crate::token::TokenKind;

macro_rules! kw {
    ($text:literal, $kind:ident) => {
        (djb2($text), $text, TokenKind::$kind)
    };
}

static KEYWORDS: &[(u32, &[u8], TokenKind)] = &[
    kw!(b"if", KwIf),
    kw!(b"else", KwElse),
    kw!(b"while", KwWhile),
    kw!(b"for", KwFor),
    kw!(b"do", KwDo),
    kw!(b"switch", KwSwitch),
    kw!(b"case", KwCase),
    kw!(b"break", KwBreak),
    kw!(b"continue", KwContinue),
    kw!(b"default", KwDefault),
    kw!(b"goto", KwGoto),
    kw!(b"return", KwReturn),
    kw!(b"struct", KwStruct),
    kw!(b"enum", KwEnum),
    kw!(b"union", KwUnion),
    kw!(b"typedef", KwTypedef),
    kw!(b"void", KwVoid),
    kw!(b"char", KwChar),
    kw!(b"short", KwShort),
    kw!(b"int", KwInt),
    kw!(b"long", KwLong),
    kw!(b"float", KwFloat),
    kw!(b"double", KwDouble),
    kw!(b"signed", KwSigned),
    kw!(b"unsigned", KwUnsigned),
    kw!(b"static", KwStatic),
    kw!(b"extern", KwExtern),
    kw!(b"const", KwConst),
    kw!(b"inline", KwInline),
    kw!(b"register", KwRegister),
    kw!(b"restrict", KwRestrict),
    kw!(b"volatile", KwVolatile),
    kw!(b"auto", KwAuto),
    kw!(b"sizeof", KwSizeof),
    kw!(b"_Alignas", KwAlignas),
    kw!(b"_Alignof", KwAlignof),
    kw!(b"_Bool", KwBool),
    kw!(b"_Complex", KwComplex),
    kw!(b"_Generic", KwGeneric),
    kw!(b"_Imaginary", KwImaginary),
    kw!(b"_Noreturn", KwNoreturn),
    kw!(b"_Static_assert", KwStaticAssert),
    kw!(b"__constexpr", KwConstexpr),
];

/// Match a lexeme against the reserved words.
///
/// `hash` must be the DJB2 hash of `bytes`; the caller usually has it
/// already because the identifier path hashes its scratch buffer once.
pub fn lookup(bytes: &[u8], hash: u32) -> Option<TokenKind> {
    for &(kw_hash, kw_text, kind) in KEYWORDS {
        if kw_hash == hash && kw_text == bytes {
            return Some(kind);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_text(text: &[u8]) -> Option<TokenKind> {
        lookup(text, djb2(text))
    }

    #[test]
    fn test_all_keywords_found() {
        for &(_, text, kind) in KEYWORDS {
            assert_eq!(lookup_text(text), Some(kind), "keyword {:?}", text);
        }
    }

    #[test]
    fn test_non_keywords_missed() {
        assert_eq!(lookup_text(b"foo"), None);
        assert_eq!(lookup_text(b"Int"), None);
        assert_eq!(lookup_text(b"whilee"), None);
        assert_eq!(lookup_text(b"whil"), None);
        assert_eq!(lookup_text(b""), None);
    }

    #[test]
    fn test_wrong_hash_never_matches() {
        // A correct-bytes/wrong-hash probe must miss; lookup trusts the
        // caller's hash for the early reject.
        assert_eq!(lookup(b"int", 0), None);
    }

    #[test]
    fn test_underscore_keywords() {
        assert_eq!(lookup_text(b"_Bool"), Some(TokenKind::KwBool));
        assert_eq!(lookup_text(b"_Static_assert"), Some(TokenKind::KwStaticAssert));
        assert_eq!(lookup_text(b"__constexpr"), Some(TokenKind::KwConstexpr));
    }

    #[test]
    fn test_table_hashes_are_distinct() {
        // DJB2 happens to be collision-free over this closed set; the
        // byte compare would still disambiguate if it were not.
        for (i, &(ha, _, _)) in KEYWORDS.iter().enumerate() {
            for &(hb, _, _) in &KEYWORDS[i + 1..] {
                assert_ne!(ha, hb);
            }
        }
    }
}
