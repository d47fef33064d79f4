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

//! Bulk memory instruction detection
//!
//! Only keyword tokens count as instructions; a mnemonic that appears in a
//! comment or inside a string literal is ignored.

use crate::lexer::{Token, TokenKind};
use std::fmt;

/// Bulk memory instructions handled by the polyfill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BulkMemoryOp {
    /// `memory.copy`
    Copy,
    /// `memory.fill`
    Fill,
}

impl BulkMemoryOp {
    /// All handled instructions, in injection order
    pub const ALL: [BulkMemoryOp; 2] = [BulkMemoryOp::Copy, BulkMemoryOp::Fill];

    /// Textual mnemonic of the instruction
    pub fn mnemonic(&self) -> &'static str {
        match self {
            BulkMemoryOp::Copy => "memory.copy",
            BulkMemoryOp::Fill => "memory.fill",
        }
    }

    /// Number of explicit memory index immediates the instruction may carry
    pub fn memory_operands(&self) -> usize {
        match self {
            BulkMemoryOp::Copy => 2,
            BulkMemoryOp::Fill => 1,
        }
    }

    /// Match a keyword text against the handled mnemonics
    pub fn from_mnemonic(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.mnemonic() == text)
    }
}

impl fmt::Display for BulkMemoryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Which bulk memory instructions a module uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Detection {
    pub copy: bool,
    pub fill: bool,
}

impl Detection {
    /// Scan a token stream for bulk memory instructions
    pub fn scan(source: &str, tokens: &[Token]) -> Self {
        let mut detection = Self::default();
        for token in tokens.iter().filter(|t| t.kind == TokenKind::Keyword) {
            match BulkMemoryOp::from_mnemonic(token.text(source)) {
                Some(BulkMemoryOp::Copy) => detection.copy = true,
                Some(BulkMemoryOp::Fill) => detection.fill = true,
                None => continue,
            }
            if detection.copy && detection.fill {
                break;
            }
        }
        detection
    }

    /// Cheap pre-check on raw text. `false` guarantees no instruction is present.
    pub fn may_contain(source: &str) -> bool {
        BulkMemoryOp::ALL.iter().any(|op| source.contains(op.mnemonic()))
    }

    pub fn contains(&self, op: BulkMemoryOp) -> bool {
        match op {
            BulkMemoryOp::Copy => self.copy,
            BulkMemoryOp::Fill => self.fill,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.copy && !self.fill
    }

    /// Detected instructions, in injection order
    pub fn ops(&self) -> impl Iterator<Item = BulkMemoryOp> + use<> {
        let detection = *self;
        BulkMemoryOp::ALL.into_iter().filter(move |op| detection.contains(*op))
    }
}
