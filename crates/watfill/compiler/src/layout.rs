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

//! Top-level module structure
//!
//! Locates where new functions can be inserted and which function
//! identifiers the module already defines, without parsing module fields.

use crate::error::{PolyfillError, PolyfillResult};
use crate::lexer::{Token, TokenKind};
use std::collections::HashSet;

/// Structural facts about a module buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleLayout {
    /// Byte offset where new module fields are inserted
    pub anchor: usize,
    /// Whether the fields are wrapped in an explicit `(module ...)` form
    pub wrapped: bool,
    /// Function identifiers defined or imported by the module, including the `$`
    pub function_names: HashSet<String>,
}

impl ModuleLayout {
    /// Analyze the token stream of a module.
    ///
    /// For a `(module ...)` form the anchor is its closing delimiter, so
    /// inserted text lands inside the module. Modules written as bare
    /// top-level fields get new fields appended after the last one.
    pub fn analyze(source: &str, tokens: &[Token]) -> PolyfillResult<Self> {
        let significant: Vec<&Token> = tokens.iter().filter(|t| !t.is_trivia()).collect();

        if !significant.iter().any(|t| t.kind == TokenKind::RightParen) {
            return Err(PolyfillError::MissingClosingDelimiter);
        }

        let mut open: Vec<&Token> = Vec::new();
        let mut module_close: Option<usize> = None;
        let mut last_close: Option<usize> = None;
        let mut in_module = false;
        let mut function_names = HashSet::new();

        for (index, token) in significant.iter().copied().enumerate() {
            match token.kind {
                TokenKind::LeftParen => {
                    let head = significant.get(index + 1);
                    if open.is_empty() && head.is_some_and(|t| t.is_keyword(source, "module")) {
                        in_module = module_close.is_none();
                    }
                    if head.is_some_and(|t| t.is_keyword(source, "func")) {
                        if let Some(id) = significant.get(index + 2).filter(|t| t.kind == TokenKind::Id) {
                            function_names.insert(id.text(source).to_string());
                        }
                    }
                    open.push(token);
                }
                TokenKind::RightParen => {
                    if open.pop().is_none() {
                        return Err(PolyfillError::UnbalancedDelimiter { position: token.position });
                    }
                    if open.is_empty() {
                        if in_module {
                            module_close = Some(token.span.start);
                            in_module = false;
                        }
                        last_close = Some(token.span.end);
                    }
                }
                _ => {}
            }
        }

        if let Some(unclosed) = open.first() {
            return Err(PolyfillError::UnbalancedDelimiter { position: unclosed.position });
        }

        let (anchor, wrapped) = match (module_close, last_close) {
            (Some(offset), _) => (offset, true),
            (None, Some(offset)) => (offset, false),
            (None, None) => return Err(PolyfillError::MissingClosingDelimiter),
        };

        Ok(Self {
            anchor,
            wrapped,
            function_names,
        })
    }

    /// Whether a function identifier (with `$`) is already taken
    pub fn defines_function(&self, id: &str) -> bool {
        self.function_names.contains(id)
    }
}
