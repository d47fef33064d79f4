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

//! Token definitions for WebAssembly text

use super::position::{Position, Span};
use std::fmt;

/// A token in the module text.
///
/// Tokens do not own their text; use [`Token::text`] with the buffer the
/// token was produced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// The type of token
    pub kind: TokenKind,
    /// Byte range of the token in the source
    pub span: Span,
    /// The position where this token starts
    pub position: Position,
}

impl Token {
    /// Create a new token
    pub fn new(kind: TokenKind, span: Span, position: Position) -> Self {
        Self { kind, span, position }
    }

    /// Source text of this token
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.range()]
    }

    /// Whitespace and comments carry no meaning for the module structure
    pub fn is_trivia(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment)
    }

    /// Check if this token is the given keyword
    pub fn is_keyword(&self, source: &str, keyword: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text(source) == keyword
    }

    /// Check if this token is a numeric literal with value zero
    pub fn is_zero(&self, source: &str) -> bool {
        if self.kind != TokenKind::Number {
            return false;
        }
        let text = self.text(source);
        let digits = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")).unwrap_or(text);
        let mut saw_digit = false;
        for ch in digits.chars() {
            match ch {
                '0' => saw_digit = true,
                '_' => {}
                _ => return false,
            }
        }
        saw_digit
    }
}

/// Types of tokens in WebAssembly text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    LeftParen,
    RightParen,
    /// Instruction or field keyword (`module`, `memory.copy`, ...)
    Keyword,
    /// Symbolic identifier (`$name`)
    Id,
    Number,
    String,
    /// Any other run of identifier characters
    Reserved,
    /// `;;` comment up to (not including) the end of line
    LineComment,
    /// `(; ... ;)` comment, possibly nested
    BlockComment,
    Whitespace,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::Keyword => "keyword",
            TokenKind::Id => "identifier",
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Reserved => "reserved token",
            TokenKind::LineComment => "line comment",
            TokenKind::BlockComment => "block comment",
            TokenKind::Whitespace => "whitespace",
        };
        write!(f, "{}", s)
    }
}
