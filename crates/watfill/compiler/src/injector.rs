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

//! Splices synthesized functions into the module buffer

use crate::layout::ModuleLayout;
use crate::synthesizer::SynthesizedFunction;

/// Insert rendered functions at the layout anchor, in the given order.
///
/// Inside a `(module ...)` form the functions are indented one level;
/// bare-field modules get them at the top level.
pub fn inject(source: &str, layout: &ModuleLayout, functions: &[SynthesizedFunction], indent: &str) -> String {
    if functions.is_empty() {
        return source.to_string();
    }

    let depth = usize::from(layout.wrapped);
    let mut injected = String::new();
    for function in functions {
        injected.push('\n');
        injected.push_str(&function.render(indent, depth));
        injected.push('\n');
    }

    let mut output = String::with_capacity(source.len() + injected.len());
    output.push_str(&source[..layout.anchor]);
    output.push_str(&injected);
    output.push_str(&source[layout.anchor..]);
    output
}
