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

//! Instruction rewriting
//!
//! Replaces bulk memory instructions with calls to their synthesized
//! replacements. Explicit default-memory immediates (`memory.copy 0 0`,
//! `memory.fill 0`) are consumed together with the mnemonic.

use crate::detector::BulkMemoryOp;
use crate::error::{PolyfillError, PolyfillResult};
use crate::lexer::{Span, Token, TokenKind, tokenize};
use crate::synthesizer::SynthesizedFunction;

/// Result of rewriting a buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    pub output: String,
    /// Number of `memory.copy` occurrences replaced
    pub copies: usize,
    /// Number of `memory.fill` occurrences replaced
    pub fills: usize,
}

/// One instruction occurrence and what replaces it
#[derive(Debug, Clone, PartialEq, Eq)]
struct Occurrence {
    span: Span,
    target: String,
}

/// Replace every occurrence of the instructions that have a synthesized
/// function. Instructions without one are left untouched.
pub fn rewrite(source: &str, functions: &[SynthesizedFunction]) -> PolyfillResult<Rewritten> {
    let tokens = tokenize(source)?;

    let mut occurrences = Vec::new();
    let mut copies = 0;
    let mut fills = 0;
    let mut index = 0;
    while index < tokens.len() {
        let token = &tokens[index];
        index += 1;
        if token.kind != TokenKind::Keyword {
            continue;
        }
        let Some(function) = functions.iter().find(|f| token.text(source) == f.op.mnemonic()) else {
            continue;
        };

        let (end, next) = consume_memory_operands(source, &tokens, index, function)?;
        match function.op {
            BulkMemoryOp::Copy => copies += 1,
            BulkMemoryOp::Fill => fills += 1,
        }
        occurrences.push(Occurrence {
            span: Span::new(token.span.start, end.unwrap_or(token.span.end)),
            target: function.call_target(),
        });
        index = next;
    }

    Ok(Rewritten {
        output: apply(source, &occurrences),
        copies,
        fills,
    })
}

/// Look for the optional zero memory immediates after a mnemonic.
///
/// Returns the end offset of the last consumed immediate (if all were
/// present) and the token index to resume scanning from.
fn consume_memory_operands(
    source: &str,
    tokens: &[Token],
    start: usize,
    function: &SynthesizedFunction,
) -> PolyfillResult<(Option<usize>, usize)> {
    let wanted = function.op.memory_operands();
    let mut found = 0;
    let mut end = None;
    let mut index = start;

    while found < wanted {
        let Some(offset) = tokens[index..].iter().position(|t| !t.is_trivia()) else {
            break;
        };
        let token = &tokens[index + offset];
        match token.kind {
            TokenKind::Number if token.is_zero(source) => {
                found += 1;
                end = Some(token.span.end);
                index += offset + 1;
            }
            TokenKind::Number | TokenKind::Id => {
                return Err(PolyfillError::UnsupportedMemoryOperand {
                    mnemonic: function.op.mnemonic(),
                    operand: token.text(source).to_string(),
                    position: token.position,
                });
            }
            _ => break,
        }
    }

    if found == wanted { Ok((end, index)) } else { Ok((None, start)) }
}

fn apply(source: &str, occurrences: &[Occurrence]) -> String {
    let mut output = String::with_capacity(source.len());
    let mut cursor = 0;
    for occurrence in occurrences {
        output.push_str(&source[cursor..occurrence.span.start]);
        output.push_str("call ");
        output.push_str(&occurrence.target);
        cursor = occurrence.span.end;
    }
    output.push_str(&source[cursor..]);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PolyfillConfig;
    use crate::detector::Detection;
    use crate::lexer::Position;
    use crate::synthesizer::synthesize;
    use std::collections::HashSet;
    use test_case::test_case;

    fn functions(copy: bool, fill: bool) -> Vec<SynthesizedFunction> {
        synthesize(Detection { copy, fill }, &PolyfillConfig::default(), &HashSet::new())
    }

    #[test_case("memory.copy", "call $memcpy"; "bare")]
    #[test_case("memory.copy 0 0", "call $memcpy"; "zero operands")]
    #[test_case("memory.copy\n    0\n    0\n", "call $memcpy\n"; "operands on separate lines")]
    #[test_case("memory.copy 0 (; a ;) 0 nop", "call $memcpy nop"; "comment between operands")]
    #[test_case("memory.copy 0x0 0", "call $memcpy"; "hex zero")]
    #[test_case("(memory.copy (local.get 0) (local.get 1) (local.get 2))", "(call $memcpy (local.get 0) (local.get 1) (local.get 2))"; "folded")]
    #[test_case("memory.copy 0 0 memory.copy", "call $memcpy call $memcpy"; "adjacent")]
    fn test_copy_rewrites(source: &str, expected: &str) {
        let rewritten = rewrite(source, &functions(true, false)).unwrap();
        assert_eq!(rewritten.output, expected);
    }

    #[test_case("memory.fill", "call $memset"; "bare")]
    #[test_case("memory.fill 0", "call $memset"; "zero operand")]
    #[test_case("memory.fill 0 drop", "call $memset drop"; "followed by instruction")]
    #[test_case("(memory.fill 0 (local.get $p) (i32.const 0) (i32.const 4))", "(call $memset (local.get $p) (i32.const 0) (i32.const 4))"; "folded with memidx")]
    fn test_fill_rewrites(source: &str, expected: &str) {
        let rewritten = rewrite(source, &functions(false, true)).unwrap();
        assert_eq!(rewritten.output, expected);
        assert_eq!(rewritten.fills, 1);
    }

    #[test]
    fn test_counts() {
        let source = "memory.copy memory.fill 0 memory.copy 0 0";
        let rewritten = rewrite(source, &functions(true, true)).unwrap();
        assert_eq!(rewritten.output, "call $memcpy call $memset call $memcpy");
        assert_eq!(rewritten.copies, 2);
        assert_eq!(rewritten.fills, 1);
    }

    #[test]
    fn test_only_targeted_instructions() {
        let source = "memory.copy memory.fill";
        let rewritten = rewrite(source, &functions(true, false)).unwrap();
        assert_eq!(rewritten.output, "call $memcpy memory.fill");
        assert_eq!(rewritten.fills, 0);
    }

    #[test]
    fn test_comments_and_strings_untouched() {
        let source = ";; memory.copy 0 0\n(data (i32.const 0) \"memory.fill\") memory.fill";
        let rewritten = rewrite(source, &functions(true, true)).unwrap();
        assert_eq!(
            rewritten.output,
            ";; memory.copy 0 0\n(data (i32.const 0) \"memory.fill\") call $memset"
        );
        assert_eq!(rewritten.copies, 0);
    }

    #[test]
    fn test_single_operand_copy_is_not_consumed() {
        let rewritten = rewrite("memory.copy 0)", &functions(true, false)).unwrap();
        assert_eq!(rewritten.output, "call $memcpy 0)");
    }

    #[test_case("memory.copy 1 0", "1", Position::new(1, 13); "non-zero index")]
    #[test_case("memory.copy 0 $other", "$other", Position::new(1, 15); "named second memory")]
    fn test_unsupported_copy_operands(source: &str, operand: &str, position: Position) {
        let err = rewrite(source, &functions(true, false)).unwrap_err();
        match err {
            PolyfillError::UnsupportedMemoryOperand {
                mnemonic,
                operand: found,
                position: at,
            } => {
                assert_eq!(mnemonic, "memory.copy");
                assert_eq!(found, operand);
                assert_eq!(at, position);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unsupported_fill_operand() {
        let err = rewrite("\n  memory.fill $heap", &functions(false, true)).unwrap_err();
        assert!(matches!(
            err,
            PolyfillError::UnsupportedMemoryOperand { mnemonic: "memory.fill", position, .. }
                if position == Position::new(2, 15)
        ));
    }

    #[test]
    fn test_renamed_targets() {
        let mut taken = HashSet::new();
        taken.insert("$memcpy".to_string());
        let functions = synthesize(Detection { copy: true, fill: false }, &PolyfillConfig::default(), &taken);
        let rewritten = rewrite("memory.copy", &functions).unwrap();
        assert_eq!(rewritten.output, "call $memcpy_1");
    }
}
