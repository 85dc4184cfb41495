//! Byte-level source input.
//!
//! The reader presents a one-byte-lookahead stream over a file (or an
//! in-memory buffer), with line endings normalized and source positions
//! tracked centrally. Unix (`\n`), DOS (`\r\n`) and legacy Mac (`\r`)
//! line endings all reach the layers above as a single `\n`; the raw
//! byte offsets kept for error display still account for the original
//! bytes.
//!
//! Backslash-newline splicing is deliberately not applied globally:
//! inside string and character literals a `\` starts an escape
//! sequence. The reader therefore exposes
//! [`skip_backslash_newline`](SourceReader::skip_backslash_newline) as a
//! primitive the tokenizer invokes at each lexable character boundary.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crex_util::SourcePos;

use crate::error::{LexError, Result};

/// End-of-file sentinel; input files must not contain this byte.
pub const INPUT_EOF: u8 = 0x04;

/// Input is pulled in chunks of this size.
const INPUT_CHUNK_SIZE: usize = 16 * 1024;

/// The underlying byte source with chunked buffering.
struct InputFile {
    name: String,
    path: Option<PathBuf>,
    source: Box<dyn Read>,
    buffer: Vec<u8>,
    chunk_len: usize,
    chunk_pos: usize,
}

impl InputFile {
    fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| LexError::Open {
            path: path.display().to_string(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            name,
            path: Some(path.to_path_buf()),
            source: Box::new(file),
            buffer: vec![0u8; INPUT_CHUNK_SIZE],
            chunk_len: 0,
            chunk_pos: 0,
        })
    }

    fn from_bytes(name: &str, bytes: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            path: None,
            source: Box::new(std::io::Cursor::new(bytes)),
            buffer: vec![0u8; INPUT_CHUNK_SIZE],
            chunk_len: 0,
            chunk_pos: 0,
        }
    }

    /// Next raw byte, or `None` at end of input.
    fn read_byte(&mut self) -> Result<Option<u8>> {
        if self.chunk_pos == self.chunk_len {
            self.chunk_len = self.source.read(&mut self.buffer).map_err(LexError::Read)?;
            self.chunk_pos = 0;
            if self.chunk_len == 0 {
                return Ok(None);
            }
        }
        let b = self.buffer[self.chunk_pos];
        self.chunk_pos += 1;
        Ok(Some(b))
    }
}

impl std::fmt::Debug for InputFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputFile")
            .field("name", &self.name)
            .field("chunk_len", &self.chunk_len)
            .field("chunk_pos", &self.chunk_pos)
            .finish()
    }
}

/// One-byte-lookahead normalized source stream.
#[derive(Debug)]
pub struct SourceReader {
    input: InputFile,
    current: u8,
    lookahead: u8,
    pos: SourcePos,
    /// Raw offset of the first byte of `current`.
    cur_start: u32,
    /// Raw offset of the first byte of `lookahead`.
    la_start: u32,
    /// Raw bytes consumed from the input so far.
    raw_offset: u32,
    carriage_return: bool,
}

impl SourceReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::prime(InputFile::open(path.as_ref())?)
    }

    pub fn from_bytes(name: &str, bytes: impl Into<Vec<u8>>) -> Result<Self> {
        Self::prime(InputFile::from_bytes(name, bytes.into()))
    }

    fn prime(input: InputFile) -> Result<Self> {
        let mut reader = Self {
            input,
            current: INPUT_EOF,
            lookahead: INPUT_EOF,
            pos: SourcePos::START,
            cur_start: 0,
            la_start: 0,
            raw_offset: 0,
            carriage_return: false,
        };
        let (c, c_start) = reader.fetch()?;
        reader.current = c;
        reader.cur_start = c_start;
        let (l, l_start) = reader.fetch()?;
        reader.lookahead = l;
        reader.la_start = l_start;
        Ok(reader)
    }

    /// Pull one normalized byte and the raw offset of its first byte.
    ///
    /// The LF of a CRLF pair is charged to the `\n` already produced for
    /// the CR, so the next character's start offset lands past both.
    fn fetch(&mut self) -> Result<(u8, u32)> {
        loop {
            let start = self.raw_offset;
            match self.input.read_byte()? {
                None => {
                    self.carriage_return = false;
                    return Ok((INPUT_EOF, start));
                }
                Some(b'\r') => {
                    self.raw_offset += 1;
                    self.carriage_return = true;
                    return Ok((b'\n', start));
                }
                Some(b'\n') if self.carriage_return => {
                    self.raw_offset += 1;
                    self.carriage_return = false;
                }
                Some(b) => {
                    self.raw_offset += 1;
                    self.carriage_return = false;
                    return Ok((b, start));
                }
            }
        }
    }

    /// The current byte, or [`INPUT_EOF`].
    #[inline]
    pub fn current(&self) -> u8 {
        self.current
    }

    /// The byte after the current one.
    #[inline]
    pub fn lookahead(&self) -> u8 {
        self.lookahead
    }

    /// Position of the current byte.
    #[inline]
    pub fn pos(&self) -> SourcePos {
        self.pos
    }

    /// Raw byte offset of the current byte in the unprocessed input.
    #[inline]
    pub fn file_offset(&self) -> u32 {
        self.cur_start
    }

    #[inline]
    pub fn at_eof(&self) -> bool {
        self.current == INPUT_EOF
    }

    pub fn name(&self) -> &str {
        &self.input.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.input.path.as_deref()
    }

    /// Consume the current byte, promoting the lookahead.
    ///
    /// A no-op at end of file, so callers may over-advance safely.
    pub fn advance(&mut self) -> Result<()> {
        if self.current == INPUT_EOF {
            return Ok(());
        }
        if self.current == b'\n' {
            self.pos.line += 1;
            self.pos.column = 0;
            self.pos.line_start = self.la_start;
        } else {
            self.pos.column += 1;
        }
        self.current = self.lookahead;
        self.cur_start = self.la_start;
        let (l, l_start) = self.fetch()?;
        self.lookahead = l;
        self.la_start = l_start;
        Ok(())
    }

    /// Splice backslash-newline sequences at the current position.
    ///
    /// Consumes `\`, optional horizontal whitespace, then a newline,
    /// repeatedly. Returns false when something other than a newline
    /// follows the backslash; in that case the backslash and any
    /// whitespace after it have been consumed and the offending byte is
    /// current.
    pub fn skip_backslash_newline(&mut self) -> Result<bool> {
        while self.current == b'\\' {
            self.advance()?;
            while self.current == b' ' || self.current == b'\t' {
                self.advance()?;
            }
            if self.current == b'\n' {
                self.advance()?;
            } else {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
