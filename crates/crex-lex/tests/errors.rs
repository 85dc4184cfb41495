//! Failure-path integration tests.

use crex_lex::{LexError, Lexer};

fn first_error(source: &str) -> (LexError, Lexer) {
    let mut lexer = Lexer::from_source("test.c", source).unwrap();
    loop {
        match lexer.next_token() {
            Ok(token) if token.is_eof() => panic!("lexed {source:?} without error"),
            Ok(_) => {}
            Err(error) => return (error, lexer),
        }
    }
}

#[test]
fn unterminated_block_comment() {
    let (error, lexer) = first_error("/* unterminated");
    assert!(matches!(error, LexError::Lexical { .. }));
    assert!(error.to_string().contains("unterminated comment"));
    assert!(lexer.handler().has_errors());
}

#[test]
fn unterminated_string() {
    let (error, _) = first_error("\"abc");
    assert!(error.to_string().contains("unterminated string literal"));
}

#[test]
fn newline_in_string_is_illegal() {
    let (error, _) = first_error("\"ab\ncd\"");
    assert!(error.to_string().contains("unterminated string literal"));
}

#[test]
fn unterminated_char_constant() {
    let (error, _) = first_error("'a");
    assert!(error.to_string().contains("unterminated character constant"));
}

#[test]
fn empty_char_constant() {
    let (error, _) = first_error("'' x");
    assert!(error.to_string().contains("empty character constant"));
}

#[test]
fn char_constant_too_long() {
    let (error, _) = first_error("'abcde'");
    assert!(error.to_string().contains("character constant too long"));
}

#[test]
fn invalid_escape() {
    let (error, _) = first_error("\"\\q\"");
    assert!(error.to_string().contains("invalid escape sequence"));
}

#[test]
fn invalid_hex_escape() {
    let (error, _) = first_error("\"\\xzz\"");
    assert!(error.to_string().contains("invalid escape sequence"));
}

#[test]
fn invalid_numeric_literal() {
    let (error, _) = first_error("0x;");
    assert!(matches!(error, LexError::Lexical { .. }));
}

#[test]
fn exponent_out_of_range() {
    let (error, _) = first_error("1e200;");
    assert!(error.to_string().contains("out of range"));
}

#[test]
fn unexpected_character() {
    let (error, _) = first_error("int @;");
    assert!(error.to_string().contains("unexpected character"));
}

#[test]
fn stray_backslash() {
    let (error, _) = first_error("a \\ b");
    assert!(error.to_string().contains("unexpected character"));
}

#[test]
fn identifier_too_long() {
    let long = "a".repeat(300);
    let (error, _) = first_error(&long);
    assert!(error.to_string().contains("identifier too long"));
}

#[test]
fn string_literal_length_limit() {
    let source = format!("\"{}\"", "s".repeat(5000));
    let (error, _) = first_error(&source);
    assert!(error.to_string().contains("string literal too long"));
}

#[test]
fn errors_poison_the_lexer() {
    let mut lexer = Lexer::from_source("test.c", "@ x y z").unwrap();
    assert!(lexer.next_token().is_err());
    assert!(matches!(lexer.next_token(), Err(LexError::Poisoned)));
    assert!(matches!(lexer.next_token(), Err(LexError::Poisoned)));
}

#[test]
fn error_positions_are_reported() {
    let (error, _) = first_error("int x;\n  @");
    let pos = error.pos().expect("lexical errors carry a position");
    assert_eq!(pos.line, 1);
    assert_eq!(pos.column, 2);
    assert_eq!(pos.line_start, 7);
}

#[test]
fn diagnostic_is_recorded_once() {
    let mut lexer = Lexer::from_source("test.c", "@").unwrap();
    let _ = lexer.next_token();
    let _ = lexer.next_token();
    assert_eq!(lexer.handler().error_count(), 1);
}

#[test]
fn missing_file_reports_open_error() {
    let error = Lexer::new("/no/such/file.c").unwrap_err();
    assert!(matches!(error, LexError::Open { .. }));
}
