//! crex-util - Shared plumbing for the crex front-end.
//!
//! This crate holds the pieces every other crate needs: source positions
//! and the diagnostic infrastructure (levels, messages, the handler that
//! collects them). It deliberately has no dependencies of its own.

pub mod diagnostic;
pub mod pos;

pub use diagnostic::{Diagnostic, Handler, Level};
pub use pos::SourcePos;
