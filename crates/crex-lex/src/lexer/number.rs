//! Preprocessing-number lexing and secondary numeric parsing.
//!
//! The tokenizer first scans the maximal preprocessing-number lexeme (a
//! digit or `.`digit start, then alphanumerics, periods and signed
//! exponents). In macro-body mode the raw lexeme is kept and interned;
//! at the top level — and at the expansion boundary — the lexeme is
//! parsed secondarily into a concrete integer or floating constant.

use crate::error::{LexError, Result};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind, TokenValue};
use crate::MAX_NUMBER_LENGTH;

/// Powers of ten for the square-and-multiply evaluator: `10^(2^i)`.
/// Covers exponents up to 127 in at most seven multiplies.
const POW10: [f64; 7] = [1e1, 1e2, 1e4, 1e8, 1e16, 1e32, 1e64];

/// `10^k` for `k` in `[-127, 127]` by binary decomposition.
fn pow10(k: i32) -> f64 {
    debug_assert!((-127..=127).contains(&k));
    let mut e = k.unsigned_abs();
    let mut result = 1.0f64;
    let mut bit = 0;
    while e != 0 {
        if e & 1 != 0 {
            result *= POW10[bit];
        }
        e >>= 1;
        bit += 1;
    }
    if k < 0 {
        1.0 / result
    } else {
        result
    }
}

#[inline]
fn digit_value(c: u8) -> u64 {
    match c {
        b'0'..=b'9' => (c - b'0') as u64,
        b'a'..=b'f' => (c - b'a' + 10) as u64,
        b'A'..=b'F' => (c - b'A' + 10) as u64,
        _ => unreachable!(),
    }
}

fn is_digit_in_radix(c: u8, radix: u64) -> bool {
    match radix {
        2 => matches!(c, b'0' | b'1'),
        8 => matches!(c, b'0'..=b'7'),
        10 => c.is_ascii_digit(),
        16 => c.is_ascii_hexdigit(),
        _ => false,
    }
}

/// Integer suffixes: any permutation of one `u`/`U` and one-or-two
/// `l`/`L`. Returns whether the constant is unsigned.
fn parse_int_suffix(suffix: &[u8]) -> std::result::Result<bool, &'static str> {
    let mut unsigned = false;
    let mut l_count = 0;
    for &b in suffix {
        match b {
            b'u' | b'U' if !unsigned => unsigned = true,
            b'l' | b'L' if l_count < 2 => l_count += 1,
            _ => return Err("invalid numeric literal"),
        }
    }
    Ok(unsigned)
}

fn finish_int(value: u64, suffix: &[u8]) -> std::result::Result<(TokenKind, TokenValue), &'static str> {
    if parse_int_suffix(suffix)? {
        Ok((TokenKind::ConstUInt, TokenValue::UInt(value)))
    } else {
        Ok((TokenKind::ConstInt, TokenValue::Int(value as i64)))
    }
}

fn parse_radix_int(body: &[u8], radix: u64) -> std::result::Result<(TokenKind, TokenValue), &'static str> {
    let mut value: u64 = 0;
    let mut i = 0;
    while i < body.len() && is_digit_in_radix(body[i], radix) {
        value = value
            .checked_mul(radix)
            .and_then(|v| v.checked_add(digit_value(body[i])))
            .ok_or("integer constant too large")?;
        i += 1;
    }
    if i == 0 {
        return Err("invalid numeric literal");
    }
    finish_int(value, &body[i..])
}

fn parse_float(lexeme: &[u8]) -> std::result::Result<(TokenKind, TokenValue), &'static str> {
    let n = lexeme.len();
    let mut value: f64 = 0.0;
    let mut i = 0;
    while i < n && lexeme[i].is_ascii_digit() {
        value = value * 10.0 + (lexeme[i] - b'0') as f64;
        i += 1;
    }
    let mut frac_digits: i32 = 0;
    if i < n && lexeme[i] == b'.' {
        i += 1;
        while i < n && lexeme[i].is_ascii_digit() {
            value = value * 10.0 + (lexeme[i] - b'0') as f64;
            frac_digits += 1;
            i += 1;
        }
    }
    let mut exponent: i32 = 0;
    if i < n && (lexeme[i] == b'e' || lexeme[i] == b'E') {
        i += 1;
        let mut negative = false;
        if i < n && (lexeme[i] == b'+' || lexeme[i] == b'-') {
            negative = lexeme[i] == b'-';
            i += 1;
        }
        if i >= n || !lexeme[i].is_ascii_digit() {
            return Err("exponent has no digits");
        }
        let mut e: i32 = 0;
        while i < n && lexeme[i].is_ascii_digit() {
            e = (e * 10 + (lexeme[i] - b'0') as i32).min(10_000);
            i += 1;
        }
        exponent = if negative { -e } else { e };
    }
    let k = exponent - frac_digits;
    if !(-127..=127).contains(&k) {
        return Err("floating point exponent out of range");
    }
    let value = value * pow10(k);
    match &lexeme[i..] {
        b"" => Ok((TokenKind::ConstDouble, TokenValue::Double(value))),
        b"f" | b"F" => Ok((TokenKind::ConstFloat, TokenValue::Float(value as f32))),
        _ => Err("invalid numeric literal"),
    }
}

/// Parse a preprocessing-number lexeme into a concrete constant.
pub(crate) fn parse_pp_number(
    lexeme: &[u8],
) -> std::result::Result<(TokenKind, TokenValue), &'static str> {
    if lexeme.is_empty() {
        return Err("invalid numeric literal");
    }
    if lexeme.len() > 2 && lexeme[0] == b'0' && (lexeme[1] == b'x' || lexeme[1] == b'X') {
        return parse_radix_int(&lexeme[2..], 16);
    }
    if lexeme.len() > 2 && lexeme[0] == b'0' && lexeme[1] == b'b' {
        return parse_radix_int(&lexeme[2..], 2);
    }
    if lexeme.len() >= 2 && lexeme[0] == b'0' && (b'1'..=b'7').contains(&lexeme[1]) {
        return parse_radix_int(&lexeme[1..], 8);
    }

    let mut i = 0;
    while i < lexeme.len() && lexeme[i].is_ascii_digit() {
        i += 1;
    }
    let floatish =
        i < lexeme.len() && (lexeme[i] == b'.' || lexeme[i] == b'e' || lexeme[i] == b'E');
    if floatish {
        return parse_float(lexeme);
    }
    if i == 0 {
        return Err("invalid numeric literal");
    }
    let mut value: u64 = 0;
    for &d in &lexeme[..i] {
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add((d - b'0') as u64))
            .ok_or("integer constant too large")?;
    }
    finish_int(value, &lexeme[i..])
}

impl Lexer {
    /// Lex a preprocessing number starting at a digit.
    pub(crate) fn lex_number(&mut self) -> Result<Token> {
        self.scratch.clear();
        self.scan_pp_number()?;
        self.finish_number()
    }

    /// Lex a preprocessing number whose leading `.` was already
    /// consumed by the punctuator dispatch.
    pub(crate) fn lex_number_after_dot(&mut self) -> Result<Token> {
        self.scratch.clear();
        self.scratch.push(b'.');
        self.scan_pp_number()?;
        self.finish_number()
    }

    /// Accumulate the maximal preprocessing-number lexeme into the
    /// scratch buffer.
    fn scan_pp_number(&mut self) -> Result<()> {
        loop {
            let c = self.reader.current();
            if !(c.is_ascii_alphanumeric() || c == b'.') {
                break;
            }
            if self.scratch.len() >= MAX_NUMBER_LENGTH {
                return Err(self.lexical_error_at(self.token_pos, "numeric literal too long"));
            }
            self.scratch.push(c);
            self.consume_lexable()?;
            if (c == b'e' || c == b'E')
                && (self.reader.current() == b'+' || self.reader.current() == b'-')
            {
                self.scratch.push(self.reader.current());
                self.consume_lexable()?;
            }
        }
        Ok(())
    }

    fn finish_number(&mut self) -> Result<Token> {
        if self.macro_body {
            let (id, _) = self
                .pp_numbers
                .add(&self.scratch)
                .map_err(|_| LexError::Capacity {
                    what: "preprocessing-number table",
                })?;
            return Ok(Token::new(
                TokenKind::PpNumber,
                TokenValue::Str(id),
                self.token_pos,
            ));
        }
        let (kind, value) = parse_pp_number(&self.scratch)
            .map_err(|message| self.lexical_error_at(self.token_pos, message))?;
        Ok(Token::new(kind, value, self.token_pos))
    }
}
