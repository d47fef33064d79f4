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

//! Replacement function synthesis
//!
//! Builds byte-at-a-time equivalents of `memory.copy` and `memory.fill` as
//! instruction trees, names them so they cannot collide with functions the
//! module already has, and renders them as module text.

pub mod instr;

pub use instr::{BinOp, Instr, WatWriter, render_body};

use crate::config::PolyfillConfig;
use crate::detector::{BulkMemoryOp, Detection};
use std::collections::HashSet;

/// A function definition with i32 parameters and locals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDef {
    /// Identifier without the leading `$`
    pub name: String,
    pub params: Vec<&'static str>,
    pub locals: Vec<&'static str>,
    pub body: Vec<Instr>,
}

impl FunctionDef {
    /// Render the definition starting at `depth` levels of `indent`
    pub fn render(&self, indent: &str, depth: usize) -> String {
        let mut out = WatWriter::new(indent, depth);
        let mut header = format!("(func ${}", self.name);
        for param in &self.params {
            header.push_str(&format!(" (param ${} i32)", param));
        }
        out.line(&header);
        out.nested(|out| {
            for local in &self.locals {
                out.line(&format!("(local ${} i32)", local));
            }
            render_body(&self.body, out);
        });
        out.line(")");
        out.finish()
    }
}

/// A replacement function for one bulk memory instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedFunction {
    pub op: BulkMemoryOp,
    pub definition: FunctionDef,
}

impl SynthesizedFunction {
    /// Identifier used as the `call` target, including the `$`
    pub fn call_target(&self) -> String {
        format!("${}", self.definition.name)
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn render(&self, indent: &str, depth: usize) -> String {
        self.definition.render(indent, depth)
    }
}

/// Synthesize replacement functions for every detected instruction.
///
/// `taken` holds the function identifiers (with `$`) already present in the
/// module. Functions are returned copy first, then fill.
pub fn synthesize(detection: Detection, config: &PolyfillConfig, taken: &HashSet<String>) -> Vec<SynthesizedFunction> {
    let mut taken = taken.clone();
    detection
        .ops()
        .map(|op| {
            let base = match op {
                BulkMemoryOp::Copy => config.copy_function.as_str(),
                BulkMemoryOp::Fill => config.fill_function.as_str(),
            };
            let name = unique_name(base, &taken);
            taken.insert(format!("${}", name));
            let definition = match op {
                BulkMemoryOp::Copy => memcpy(name),
                BulkMemoryOp::Fill => memset(name),
            };
            SynthesizedFunction { op, definition }
        })
        .collect()
}

/// `base` if free, otherwise the first free `base_N`
pub fn unique_name(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(&format!("${}", base)) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{}_{}", base, n))
        .find(|candidate| !taken.contains(&format!("${}", candidate)))
        .unwrap_or_else(|| base.to_string())
}

/// Copy `len` bytes from `src` to `dest`, correct for overlapping ranges
pub fn memcpy(name: String) -> FunctionDef {
    use Instr::*;

    let byte_at_i = || {
        Instr::store8(
            Instr::binary(BinOp::Add, local_get("dest"), local_get("i")),
            Instr::load8_u(Instr::binary(BinOp::Add, local_get("src"), local_get("i"))),
        )
    };

    let backward = vec![
        Comment("Backward copy (dest > src)"),
        Instr::local_set("i", local_get("len")),
        Block {
            label: "done_back",
            body: vec![Loop {
                label: "loop_back",
                body: vec![
                    Instr::br_if("done_back", Instr::eqz(local_get("i"))),
                    Instr::local_set("i", Instr::binary(BinOp::Sub, local_get("i"), I32Const(1))),
                    byte_at_i(),
                    Br("loop_back"),
                ],
            }],
        },
    ];

    let forward = vec![
        Comment("Forward copy (dest <= src)"),
        Instr::local_set("i", I32Const(0)),
        Block {
            label: "done_fwd",
            body: vec![Loop {
                label: "loop_fwd",
                body: vec![
                    Instr::br_if("done_fwd", Instr::binary(BinOp::GeU, local_get("i"), local_get("len"))),
                    byte_at_i(),
                    Instr::local_set("i", Instr::binary(BinOp::Add, local_get("i"), I32Const(1))),
                    Br("loop_fwd"),
                ],
            }],
        },
    ];

    FunctionDef {
        name,
        params: vec!["dest", "src", "len"],
        locals: vec!["i"],
        body: vec![If {
            cond: Box::new(Instr::binary(BinOp::GtU, local_get("dest"), local_get("src"))),
            then_body: backward,
            else_body: forward,
        }],
    }
}

/// Store the low byte of `val` into `len` bytes starting at `dest`
pub fn memset(name: String) -> FunctionDef {
    use Instr::*;

    FunctionDef {
        name,
        params: vec!["dest", "val", "len"],
        locals: vec!["i"],
        body: vec![
            Instr::local_set("i", I32Const(0)),
            Block {
                label: "done",
                body: vec![Loop {
                    label: "loop",
                    body: vec![
                        Instr::br_if("done", Instr::binary(BinOp::GeU, local_get("i"), local_get("len"))),
                        Instr::store8(
                            Instr::binary(BinOp::Add, local_get("dest"), local_get("i")),
                            local_get("val"),
                        ),
                        Instr::local_set("i", Instr::binary(BinOp::Add, local_get("i"), I32Const(1))),
                        Br("loop"),
                    ],
                }],
            },
        ],
    }
}

fn local_get(name: &'static str) -> Instr {
    Instr::local_get(name)
}
