//! Diagnostic reporting infrastructure.
//!
//! The lexer reports problems through a [`Handler`]: fatal errors are
//! recorded here *and* returned as error values, warnings are recorded and
//! lexing continues. The handler only collects; rendering (colors, source
//! excerpts) is the driver's business.

use std::cell::RefCell;
use std::fmt;

use crate::pos::SourcePos;

/// Diagnostic severity level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// A fatal problem; the token stream cannot continue.
    Error,
    /// A non-fatal problem; lexing continues.
    Warning,
    /// Additional context attached to another diagnostic.
    Note,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
            Level::Note => write!(f, "note"),
        }
    }
}

/// A single diagnostic message.
///
/// `pos` is absent for problems with no meaningful source location
/// (table capacity exhaustion, I/O failures).
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub file: Option<String>,
    pub pos: Option<SourcePos>,
}

impl Diagnostic {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            file: None,
            pos: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Level::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Level::Warning, message)
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_pos(mut self, pos: SourcePos) -> Self {
        self.pos = Some(pos);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, &self.pos) {
            (Some(file), Some(pos)) => {
                write!(f, "{}:{} {}: {}", file, pos, self.level, self.message)
            }
            (Some(file), None) => write!(f, "{} {}: {}", file, self.level, self.message),
            _ => write!(f, "{}: {}", self.level, self.message),
        }
    }
}

/// Collects diagnostics emitted during lexing.
///
/// Interior mutability lets components that only hold a shared reference
/// report problems; the driver drains the collected list at the end.
#[derive(Debug, Default)]
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
    errors: RefCell<usize>,
    warnings: RefCell<usize>,
}

impl Handler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic.
    pub fn emit(&self, diagnostic: Diagnostic) {
        match diagnostic.level {
            Level::Error => *self.errors.borrow_mut() += 1,
            Level::Warning => *self.warnings.borrow_mut() += 1,
            Level::Note => {}
        }
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        *self.errors.borrow() > 0
    }

    pub fn error_count(&self) -> usize {
        *self.errors.borrow()
    }

    pub fn warning_count(&self) -> usize {
        *self.warnings.borrow()
    }

    /// Remove and return everything collected so far.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.borrow_mut())
    }

    /// Run `f` over each collected diagnostic without draining.
    pub fn for_each(&self, mut f: impl FnMut(&Diagnostic)) {
        for diagnostic in self.diagnostics.borrow().iter() {
            f(diagnostic);
        }
    }
}
