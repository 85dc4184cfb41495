//! Tokenizer integration tests: plain lexing without macros.

use crex_lex::{Lexer, Token, TokenKind, TokenValue};

fn lex_all(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::from_source("test.c", source).unwrap();
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token().unwrap();
        let eof = token.is_eof();
        tokens.push(token);
        if eof {
            break;
        }
    }
    tokens
}

fn kinds(source: &str) -> Vec<TokenKind> {
    lex_all(source).iter().map(|t| t.kind).collect()
}

#[test]
fn declaration_with_hex_initializer() {
    let tokens = lex_all("int x = 0x2A;");
    let expected = [
        TokenKind::KwInt,
        TokenKind::Identifier,
        TokenKind::Assign,
        TokenKind::ConstInt,
        TokenKind::Semicolon,
        TokenKind::Eof,
    ];
    assert_eq!(
        tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
        expected
    );
    assert_eq!(tokens[3].value, TokenValue::Int(42));
}

#[test]
fn adjacent_string_literals_concatenate() {
    let mut lexer = Lexer::from_source("test.c", "\"abc\" \"def\"").unwrap();
    let token = lexer.next_token().unwrap();
    assert_eq!(token.kind, TokenKind::LitString);
    let id = token.str_id().unwrap();
    assert_eq!(lexer.string_literals().get_bytes(id), b"abcdef");
    assert!(lexer.next_token().unwrap().is_eof());
}

#[test]
fn concatenation_spans_lines_and_comments() {
    let mut lexer =
        Lexer::from_source("test.c", "\"ab\" /* glue */\n\"cd\" // tail\n;").unwrap();
    let token = lexer.next_token().unwrap();
    let id = token.str_id().unwrap();
    assert_eq!(lexer.string_literals().get_bytes(id), b"abcd");
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Semicolon);
}

#[test]
fn string_escapes_decode() {
    let mut lexer =
        Lexer::from_source("test.c", r#""a\tb\n\x41\102\\\"""#).unwrap();
    let token = lexer.next_token().unwrap();
    let id = token.str_id().unwrap();
    assert_eq!(lexer.string_literals().get_bytes(id), b"a\tb\nAB\\\"");
}

#[test]
fn character_constants() {
    let tokens = lex_all("'A' 'ab' '\\n' '\\x41' '\\101'");
    let values: Vec<_> = tokens[..5]
        .iter()
        .map(|t| match t.value {
            TokenValue::Char(v) => v,
            other => panic!("unexpected value {other:?}"),
        })
        .collect();
    assert_eq!(values, [65, 0x6162, 10, 65, 65]);
}

#[test]
fn keywords_and_identifiers() {
    assert_eq!(
        kinds("while whilex _Bool __constexpr foo"),
        [
            TokenKind::KwWhile,
            TokenKind::Identifier,
            TokenKind::KwBool,
            TokenKind::KwConstexpr,
            TokenKind::Identifier,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn identifier_handles_are_interned() {
    let tokens = lex_all("foo bar foo");
    assert_eq!(tokens[0].str_id(), tokens[2].str_id());
    assert_ne!(tokens[0].str_id(), tokens[1].str_id());
}

#[test]
fn operator_alphabet() {
    assert_eq!(
        kinds("+ ++ += - -- -= -> * *= / /= % %= & && &= | || |= ^ ^= ~ ! != = == < <= << <<= > >= >> >>= ? : ; , . ( ) [ ] { }"),
        [
            TokenKind::Plus,
            TokenKind::PlusPlus,
            TokenKind::PlusAssign,
            TokenKind::Minus,
            TokenKind::MinusMinus,
            TokenKind::MinusAssign,
            TokenKind::Arrow,
            TokenKind::Star,
            TokenKind::StarAssign,
            TokenKind::Div,
            TokenKind::DivAssign,
            TokenKind::Mod,
            TokenKind::ModAssign,
            TokenKind::Amp,
            TokenKind::AndAnd,
            TokenKind::AndAssign,
            TokenKind::Pipe,
            TokenKind::OrOr,
            TokenKind::OrAssign,
            TokenKind::Caret,
            TokenKind::XorAssign,
            TokenKind::Tilde,
            TokenKind::Not,
            TokenKind::NotEq,
            TokenKind::Assign,
            TokenKind::EqEq,
            TokenKind::Lt,
            TokenKind::Le,
            TokenKind::Shl,
            TokenKind::ShlAssign,
            TokenKind::Gt,
            TokenKind::Ge,
            TokenKind::Shr,
            TokenKind::ShrAssign,
            TokenKind::Question,
            TokenKind::Colon,
            TokenKind::Semicolon,
            TokenKind::Comma,
            TokenKind::Dot,
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::LBracket,
            TokenKind::RBracket,
            TokenKind::LBrace,
            TokenKind::RBrace,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn dot_is_context_sensitive() {
    // `.5` begins a number, `s.x` does not.
    let tokens = lex_all("s.x + .5");
    assert_eq!(
        tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
        [
            TokenKind::Identifier,
            TokenKind::Dot,
            TokenKind::Identifier,
            TokenKind::Plus,
            TokenKind::ConstDouble,
            TokenKind::Eof,
        ]
    );
    assert_eq!(tokens[4].value, TokenValue::Double(0.5));
}

#[test]
fn numeric_constants() {
    let tokens = lex_all("0 42 0x2A 0b101 017 42u 1.5 1.5f 2e3");
    let expected = [
        (TokenKind::ConstInt, TokenValue::Int(0)),
        (TokenKind::ConstInt, TokenValue::Int(42)),
        (TokenKind::ConstInt, TokenValue::Int(42)),
        (TokenKind::ConstInt, TokenValue::Int(5)),
        (TokenKind::ConstInt, TokenValue::Int(15)),
        (TokenKind::ConstUInt, TokenValue::UInt(42)),
        (TokenKind::ConstDouble, TokenValue::Double(1.5)),
        (TokenKind::ConstFloat, TokenValue::Float(1.5)),
        (TokenKind::ConstDouble, TokenValue::Double(2000.0)),
    ];
    for (token, (kind, value)) in tokens.iter().zip(expected.iter()) {
        assert_eq!(token.kind, *kind);
        assert_eq!(token.value, *value);
    }
}

#[test]
fn comments_are_transparent() {
    assert_eq!(
        kinds("a /* one */ b // two\nc"),
        [
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn block_comment_spans_lines() {
    let tokens = lex_all("a /* 1\n2\n3 */ b");
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].pos.line, 2);
}

#[test]
fn splice_joins_tokens() {
    // The backslash-newline splice makes `int` one keyword again.
    let tokens = lex_all("in\\\nt x;");
    assert_eq!(tokens[0].kind, TokenKind::KwInt);
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
}

#[test]
fn splice_with_trailing_blanks() {
    let tokens = lex_all("lo\\ \t\nng y;");
    assert_eq!(tokens[0].kind, TokenKind::KwLong);
}

#[test]
fn splice_inside_operator() {
    let tokens = lex_all("a <\\\n<= b");
    assert_eq!(tokens[1].kind, TokenKind::ShlAssign);
}

#[test]
fn positions_are_tracked() {
    let tokens = lex_all("int\n  x = 1;\n");
    // `int` at 1:1 (0:0 internally).
    assert_eq!((tokens[0].pos.line, tokens[0].pos.column), (0, 0));
    // `x` at 2:3.
    assert_eq!((tokens[1].pos.line, tokens[1].pos.column), (1, 2));
    assert_eq!(tokens[1].pos.line_start, 4);
    // `=` at 2:5.
    assert_eq!((tokens[2].pos.line, tokens[2].pos.column), (1, 4));
}

#[test]
fn crlf_and_cr_line_endings() {
    let unix = lex_all("int a;\nint b;\n");
    let dos = lex_all("int a;\r\nint b;\r\n");
    let mac = lex_all("int a;\rint b;\r");
    let unix_kinds: Vec<_> = unix.iter().map(|t| t.kind).collect();
    assert_eq!(unix_kinds, dos.iter().map(|t| t.kind).collect::<Vec<_>>());
    assert_eq!(unix_kinds, mac.iter().map(|t| t.kind).collect::<Vec<_>>());
    // Same logical lines and columns regardless of ending.
    for (u, d) in unix.iter().zip(dos.iter()) {
        assert_eq!((u.pos.line, u.pos.column), (d.pos.line, d.pos.column));
    }
}

#[test]
fn eof_is_idempotent() {
    let mut lexer = Lexer::from_source("test.c", "x").unwrap();
    lexer.next_token().unwrap();
    for _ in 0..3 {
        assert!(lexer.next_token().unwrap().is_eof());
    }
}

#[test]
fn empty_input_yields_eof() {
    let mut lexer = Lexer::from_source("test.c", "").unwrap();
    assert!(lexer.next_token().unwrap().is_eof());
}

#[test]
fn dollar_continues_identifiers() {
    let tokens = lex_all("a$b");
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens.len(), 2);
}
