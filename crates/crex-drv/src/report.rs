//! Diagnostic rendering: `file:line:column`, severity coloring, and a
//! verbatim excerpt of the offending source line with a caret under the
//! column.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crex_lex::Lexer;
use crex_util::{Diagnostic, Level, SourcePos};

const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const DEFAULT_FG: &str = "\x1b[39m";
const BOLD: &str = "\x1b[1m";
const NO_BOLD: &str = "\x1b[22m";

/// Widest column for which an excerpt is still printed.
const MAX_EXCERPT_COLUMN: u32 = 120;

/// Bytes read from the start of the offending line.
const EXCERPT_BYTES: usize = 128;

/// Print every diagnostic the lexer collected.
pub fn print_diagnostics(lexer: &Lexer, colors: bool) {
    let path = lexer.file_path();
    lexer
        .handler()
        .for_each(|diagnostic| print_diagnostic(diagnostic, path, colors));
}

fn print_diagnostic(diagnostic: &Diagnostic, path: Option<&Path>, colors: bool) {
    let paint = |code: &'static str| if colors { code } else { "" };

    eprint!("{}", paint(BOLD));
    if let (Some(file), Some(pos)) = (&diagnostic.file, &diagnostic.pos) {
        eprint!("{file}:{pos} ");
    } else if let Some(file) = &diagnostic.file {
        eprint!("{file} ");
    }
    let color = match diagnostic.level {
        Level::Error => RED,
        Level::Warning => YELLOW,
        Level::Note => DEFAULT_FG,
    };
    eprint!("{}{}{}", paint(color), diagnostic.level, paint(DEFAULT_FG));
    eprintln!(": {}", diagnostic.message);
    eprint!("{}", paint(NO_BOLD));

    if let (Some(path), Some(pos)) = (path, &diagnostic.pos) {
        if pos.column < MAX_EXCERPT_COLUMN {
            let _ = print_excerpt(path, pos, colors);
        }
    }
}

/// Seek to the line start recorded in the position, print the line
/// verbatim and a caret under the offending column (tabs expand to 8).
fn print_excerpt(path: &Path, pos: &SourcePos, colors: bool) -> std::io::Result<()> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::Start(pos.line_start as u64))?;
    let mut buffer = [0u8; EXCERPT_BYTES];
    let length = file.read(&mut buffer)?;

    let mut caret = 0usize;
    let mut end = 0usize;
    for (i, &byte) in buffer[..length].iter().enumerate() {
        if byte == b'\n' || byte == b'\r' {
            break;
        }
        if (i as u32) < pos.column {
            caret += if byte == b'\t' { 8 } else { 1 };
        }
        end = i + 1;
    }

    eprintln!("{}", String::from_utf8_lossy(&buffer[..end]));
    let paint = |code: &'static str| if colors { code } else { "" };
    eprintln!("{}{}^{}", " ".repeat(caret), paint(RED), paint(DEFAULT_FG));
    Ok(())
}
