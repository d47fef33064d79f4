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

//! Folded instruction trees and their text rendering

/// Binary i32 operators used by the generated functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    GtU,
    GeU,
}

impl BinOp {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            BinOp::Add => "i32.add",
            BinOp::Sub => "i32.sub",
            BinOp::GtU => "i32.gt_u",
            BinOp::GeU => "i32.ge_u",
        }
    }
}

/// A folded WebAssembly instruction with its operands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instr {
    LocalGet(&'static str),
    LocalSet(&'static str, Box<Instr>),
    I32Const(i32),
    Binary(BinOp, Box<Instr>, Box<Instr>),
    I32Eqz(Box<Instr>),
    I32Load8U(Box<Instr>),
    I32Store8 { addr: Box<Instr>, value: Box<Instr> },
    Block { label: &'static str, body: Vec<Instr> },
    Loop { label: &'static str, body: Vec<Instr> },
    If { cond: Box<Instr>, then_body: Vec<Instr>, else_body: Vec<Instr> },
    Br(&'static str),
    BrIf(&'static str, Box<Instr>),
    Comment(&'static str),
}

impl Instr {
    pub fn local_get(name: &'static str) -> Self {
        Instr::LocalGet(name)
    }

    pub fn local_set(name: &'static str, value: Instr) -> Self {
        Instr::LocalSet(name, Box::new(value))
    }

    pub fn binary(op: BinOp, lhs: Instr, rhs: Instr) -> Self {
        Instr::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    pub fn eqz(value: Instr) -> Self {
        Instr::I32Eqz(Box::new(value))
    }

    pub fn load8_u(addr: Instr) -> Self {
        Instr::I32Load8U(Box::new(addr))
    }

    pub fn store8(addr: Instr, value: Instr) -> Self {
        Instr::I32Store8 {
            addr: Box::new(addr),
            value: Box::new(value),
        }
    }

    pub fn br_if(label: &'static str, cond: Instr) -> Self {
        Instr::BrIf(label, Box::new(cond))
    }

    /// Instruction keyword plus immediates, without folded operands
    fn head(&self) -> String {
        match self {
            Instr::LocalGet(name) => format!("local.get ${}", name),
            Instr::LocalSet(name, _) => format!("local.set ${}", name),
            Instr::I32Const(value) => format!("i32.const {}", value),
            Instr::Binary(op, _, _) => op.mnemonic().to_string(),
            Instr::I32Eqz(_) => "i32.eqz".to_string(),
            Instr::I32Load8U(_) => "i32.load8_u".to_string(),
            Instr::I32Store8 { .. } => "i32.store8".to_string(),
            Instr::Block { label, .. } => format!("block ${}", label),
            Instr::Loop { label, .. } => format!("loop ${}", label),
            Instr::If { .. } => "if".to_string(),
            Instr::Br(label) => format!("br ${}", label),
            Instr::BrIf(label, _) => format!("br_if ${}", label),
            Instr::Comment(text) => format!(";; {}", text),
        }
    }

    /// Folded operands, evaluated left to right
    fn operands(&self) -> Vec<&Instr> {
        match self {
            Instr::LocalSet(_, value) | Instr::I32Eqz(value) | Instr::I32Load8U(value) | Instr::BrIf(_, value) => {
                vec![value.as_ref()]
            }
            Instr::Binary(_, lhs, rhs) => vec![lhs.as_ref(), rhs.as_ref()],
            Instr::I32Store8 { addr, value } => vec![addr.as_ref(), value.as_ref()],
            Instr::If { cond, .. } => vec![cond.as_ref()],
            _ => Vec::new(),
        }
    }

    /// Single-line form, if the instruction is short enough to keep on one line
    fn inline(&self) -> Option<String> {
        match self {
            Instr::I32Store8 { .. } | Instr::Block { .. } | Instr::Loop { .. } | Instr::If { .. } | Instr::Comment(_) => None,
            _ => {
                let mut text = format!("({}", self.head());
                for operand in self.operands() {
                    text.push(' ');
                    text.push_str(&operand.inline()?);
                }
                text.push(')');
                Some(text)
            }
        }
    }

    /// Render this instruction at the writer's current depth
    pub fn render(&self, out: &mut WatWriter) {
        if let Some(text) = self.inline() {
            out.line(&text);
            return;
        }

        match self {
            Instr::Comment(_) => out.line(&self.head()),
            Instr::If { cond, then_body, else_body } => {
                match cond.inline() {
                    Some(cond) => out.line(&format!("(if {}", cond)),
                    None => {
                        out.line("(if");
                        out.nested(|out| cond.render(out));
                    }
                }
                out.nested(|out| {
                    out.line("(then");
                    out.nested(|out| render_body(then_body, out));
                    out.line(")");
                    if !else_body.is_empty() {
                        out.line("(else");
                        out.nested(|out| render_body(else_body, out));
                        out.line(")");
                    }
                });
                out.line(")");
            }
            Instr::Block { body, .. } | Instr::Loop { body, .. } => {
                out.line(&format!("({}", self.head()));
                out.nested(|out| render_body(body, out));
                out.line(")");
            }
            _ => {
                out.line(&format!("({}", self.head()));
                out.nested(|out| {
                    for operand in self.operands() {
                        operand.render(out);
                    }
                });
                out.line(")");
            }
        }
    }
}

/// Render a sequence of instructions at the writer's current depth
pub fn render_body(body: &[Instr], out: &mut WatWriter) {
    for instr in body {
        instr.render(out);
    }
}

/// Line-oriented text writer with indentation tracking
#[derive(Debug)]
pub struct WatWriter {
    buffer: String,
    indent: String,
    depth: usize,
}

impl WatWriter {
    /// Create a writer that starts at the given nesting depth
    pub fn new(indent: impl Into<String>, depth: usize) -> Self {
        Self {
            buffer: String::new(),
            indent: indent.into(),
            depth,
        }
    }

    /// Write one indented line
    pub fn line(&mut self, text: &str) {
        if !self.buffer.is_empty() {
            self.buffer.push('\n');
        }
        for _ in 0..self.depth {
            self.buffer.push_str(&self.indent);
        }
        self.buffer.push_str(text);
    }

    /// Run `f` one level deeper
    pub fn nested(&mut self, f: impl FnOnce(&mut Self)) {
        self.depth += 1;
        f(self);
        self.depth -= 1;
    }

    pub fn finish(self) -> String {
        self.buffer
    }
}
