// Dotlanth
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Error handling for the polyfill pass

use crate::lexer::Position;
use crate::validation::ValidationError;
use thiserror::Error;

/// Result type for polyfill operations
pub type PolyfillResult<T> = Result<T, PolyfillError>;

/// Errors that abort the polyfill pass
#[derive(Error, Debug)]
pub enum PolyfillError {
    #[error("{kind} at {position}")]
    Lex { kind: LexErrorKind, position: Position },

    #[error("module text has no closing delimiter to anchor injected functions")]
    MissingClosingDelimiter,

    #[error("unbalanced delimiter at {position}")]
    UnbalancedDelimiter { position: Position },

    #[error("unsupported memory operand `{operand}` for {mnemonic} at {position}: only the default memory (0) is supported")]
    UnsupportedMemoryOperand {
        mnemonic: &'static str,
        operand: String,
        position: Position,
    },

    #[error("output validation failed: {0}")]
    Validation(#[from] ValidationError),
}

impl PolyfillError {
    /// Structural errors mean the input is not a well-formed module
    pub fn is_structural(&self) -> bool {
        matches!(self, PolyfillError::MissingClosingDelimiter | PolyfillError::UnbalancedDelimiter { .. })
    }
}

/// Categories of lexical errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexErrorKind {
    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("unterminated block comment")]
    UnterminatedComment,
}
