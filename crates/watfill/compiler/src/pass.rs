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

//! The bulk memory polyfill pass
//!
//! Runs detection, synthesis, injection and rewriting over one module
//! buffer. Either the whole pass succeeds and yields the new text, or it
//! fails before producing anything.

use crate::config::PolyfillConfig;
use crate::detector::Detection;
use crate::error::PolyfillResult;
use crate::injector::inject;
use crate::layout::ModuleLayout;
use crate::lexer::tokenize;
use crate::rewriter::rewrite;
use crate::synthesizer::synthesize;
use tracing::{debug, info};

/// Outcome of running the pass over a module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolyfillOutcome {
    /// Rewritten module text
    pub output: String,
    /// Instructions found in the input
    pub detection: Detection,
    /// Names of the injected functions, without `$`, in injection order
    pub injected: Vec<String>,
    /// Number of `memory.copy` instructions replaced
    pub copies_replaced: usize,
    /// Number of `memory.fill` instructions replaced
    pub fills_replaced: usize,
}

impl PolyfillOutcome {
    fn unchanged(source: &str, detection: Detection) -> Self {
        Self {
            output: source.to_string(),
            detection,
            injected: Vec::new(),
            copies_replaced: 0,
            fills_replaced: 0,
        }
    }

    /// Whether the output is the input, byte for byte
    pub fn is_noop(&self) -> bool {
        self.detection.is_empty()
    }
}

/// Replaces bulk memory instructions with calls to injected functions
#[derive(Debug, Clone, Default)]
pub struct BulkMemoryPolyfill {
    config: PolyfillConfig,
}

impl BulkMemoryPolyfill {
    /// Create a pass with the given configuration
    pub fn new(config: PolyfillConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PolyfillConfig {
        &self.config
    }

    /// Run the pass over a module buffer
    pub fn run(&self, source: &str) -> PolyfillResult<PolyfillOutcome> {
        if !Detection::may_contain(source) {
            info!("No bulk memory operations found");
            return Ok(PolyfillOutcome::unchanged(source, Detection::default()));
        }

        let tokens = tokenize(source)?;
        let detection = Detection::scan(source, &tokens);
        if detection.is_empty() {
            info!("No bulk memory operations found");
            return Ok(PolyfillOutcome::unchanged(source, detection));
        }
        info!("Found bulk memory ops: copy={}, fill={}", detection.copy, detection.fill);

        let layout = ModuleLayout::analyze(source, &tokens)?;
        debug!(
            "Module layout: anchor={}, wrapped={}, {} named functions",
            layout.anchor,
            layout.wrapped,
            layout.function_names.len()
        );

        let functions = synthesize(detection, &self.config, &layout.function_names);
        for function in &functions {
            debug!("Synthesized ${} for {}", function.name(), function.op);
        }

        let injected = inject(source, &layout, &functions, &self.config.indent);
        let rewritten = rewrite(&injected, &functions)?;
        debug!("Replaced {} copy and {} fill instructions", rewritten.copies, rewritten.fills);

        Ok(PolyfillOutcome {
            output: rewritten.output,
            detection,
            injected: functions.iter().map(|f| f.name().to_string()).collect(),
            copies_replaced: rewritten.copies,
            fills_replaced: rewritten.fills,
        })
    }
}

/// Run the pass with the default configuration
pub fn polyfill(source: &str) -> PolyfillResult<String> {
    BulkMemoryPolyfill::default().run(source).map(|outcome| outcome.output)
}
