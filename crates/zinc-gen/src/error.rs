//! Emitter errors.

use thiserror::Error;

/// Failures while lowering the AST to assembly
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmitError {
    /// A construct the emitter does not lower
    #[error("cannot emit code for {0}")]
    Unsupported(String),

    /// `break`/`continue` with no enclosing loop or switch
    #[error("'{0}' used outside of a loop")]
    StrayJump(&'static str),

    /// More call arguments than the integer-register convention carries
    #[error("calls with more than {max} arguments are not supported (found {found})")]
    TooManyArguments { max: usize, found: usize },
}
