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

//! Lossless lexical analyzer for WebAssembly text
//!
//! Every byte of the input belongs to exactly one token, so concatenating
//! the token texts reproduces the source. Comments and string literals are
//! single tokens, which keeps instruction matching out of them.

pub mod position;
pub mod token;

pub use position::{Position, Span};
pub use token::{Token, TokenKind};

use crate::error::{LexErrorKind, PolyfillError, PolyfillResult};

/// Tokenize a whole module buffer
pub fn tokenize(source: &str) -> PolyfillResult<Vec<Token>> {
    Lexer::new(source).tokenize()
}

/// WebAssembly text lexer
pub struct Lexer<'a> {
    source: &'a str,
    offset: usize,
    position: Position,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer over the source
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            offset: 0,
            position: Position::start(),
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(mut self) -> PolyfillResult<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn rest(&self) -> &'a str {
        &self.source[self.offset..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.offset += ch.len_utf8();
        self.position.advance(ch);
        Some(ch)
    }

    fn bump_str(&mut self, text: &str) {
        for _ in text.chars() {
            self.bump();
        }
    }

    /// Scan the next token from input
    fn next_token(&mut self) -> PolyfillResult<Option<Token>> {
        let start = self.offset;
        let position = self.position;
        let Some(ch) = self.peek() else {
            return Ok(None);
        };

        let kind = match ch {
            '(' if self.rest().starts_with("(;") => {
                self.scan_block_comment(position)?;
                TokenKind::BlockComment
            }
            '(' => {
                self.bump();
                TokenKind::LeftParen
            }
            ')' => {
                self.bump();
                TokenKind::RightParen
            }
            ';' if self.rest().starts_with(";;") => {
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.bump();
                }
                TokenKind::LineComment
            }
            '"' => {
                self.scan_string(position)?;
                TokenKind::String
            }
            c if c.is_whitespace() => {
                while self.peek().is_some_and(char::is_whitespace) {
                    self.bump();
                }
                TokenKind::Whitespace
            }
            _ => self.scan_atom(),
        };

        Ok(Some(Token::new(kind, Span::new(start, self.offset), position)))
    }

    fn scan_block_comment(&mut self, start: Position) -> PolyfillResult<()> {
        self.bump_str("(;");
        let mut depth = 1usize;
        while depth > 0 {
            if self.rest().starts_with("(;") {
                self.bump_str("(;");
                depth += 1;
            } else if self.rest().starts_with(";)") {
                self.bump_str(";)");
                depth -= 1;
            } else if self.bump().is_none() {
                return Err(PolyfillError::Lex {
                    kind: LexErrorKind::UnterminatedComment,
                    position: start,
                });
            }
        }
        Ok(())
    }

    fn scan_string(&mut self, start: Position) -> PolyfillResult<()> {
        let unterminated = || PolyfillError::Lex {
            kind: LexErrorKind::UnterminatedString,
            position: start,
        };

        self.bump();
        loop {
            match self.bump() {
                None => return Err(unterminated()),
                Some('\\') => {
                    self.bump().ok_or_else(unterminated)?;
                }
                Some('"') => return Ok(()),
                Some(_) => {}
            }
        }
    }

    /// Scan a run of non-delimiter characters and classify it
    fn scan_atom(&mut self) -> TokenKind {
        let start = self.offset;
        // The first character is always consumed so a stray ';' cannot stall the lexer
        self.bump();
        while let Some(c) = self.peek() {
            if c.is_whitespace() || matches!(c, '(' | ')' | '"' | ';') {
                break;
            }
            self.bump();
        }
        classify_atom(&self.source[start..self.offset])
    }
}

fn classify_atom(text: &str) -> TokenKind {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some('$'), Some(_)) => TokenKind::Id,
        (Some(c), _) if c.is_ascii_digit() => TokenKind::Number,
        (Some('+' | '-'), Some(c)) if c.is_ascii_digit() => TokenKind::Number,
        (Some(c), _) if c.is_ascii_lowercase() => TokenKind::Keyword,
        _ => TokenKind::Reserved,
    }
}
