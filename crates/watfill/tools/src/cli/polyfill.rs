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

//! Polyfill command: read a module, rewrite it, write the result
//!
//! The whole pass runs in memory before the output file is touched, so a
//! failing input never leaves a partial or stale-looking output behind.

use anyhow::{Context, Result};
use clap::Parser;
use std::{fs, path::PathBuf};
use tracing::{debug, info};
use watfill_compiler::{BulkMemoryPolyfill, PolyfillConfig, PolyfillOutcome, validate_without_bulk_memory};

/// CLI arguments for the polyfill tool
#[derive(Parser, Debug)]
#[command(name = "watfill")]
#[command(about = "Replace bulk memory instructions in WebAssembly text with injected functions")]
#[command(version)]
pub struct PolyfillArgs {
    /// Input module text (.wat)
    pub input: PathBuf,

    /// Output module text, overwritten if present
    pub output: PathBuf,

    /// Path to configuration file (TOML, overrides $WATFILL_CONFIG)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Check that the output assembles and validates without bulk memory
    #[arg(long)]
    pub validate: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Runs the polyfill pass over files
pub struct PolyfillCommand {
    args: PolyfillArgs,
    config: PolyfillConfig,
}

impl PolyfillCommand {
    /// Create a command from parsed arguments and a resolved configuration
    pub fn new(args: PolyfillArgs, config: PolyfillConfig) -> Self {
        Self { args, config }
    }

    /// Read, transform, optionally validate, then write
    pub fn execute(&self) -> Result<PolyfillOutcome> {
        info!("Polyfilling {:?} -> {:?}", self.args.input, self.args.output);

        let source = fs::read_to_string(&self.args.input).with_context(|| format!("Cannot read input file {:?}", self.args.input))?;

        let pass = BulkMemoryPolyfill::new(self.config.clone());
        let outcome = pass.run(&source).with_context(|| format!("Cannot polyfill {:?}", self.args.input))?;

        if self.args.validate && !outcome.is_noop() {
            validate_without_bulk_memory(&outcome.output).context("Rewritten module failed validation")?;
            debug!("Output validates without bulk memory");
        }

        self.write_output(&outcome.output)?;

        if outcome.is_noop() {
            info!("Output is an unchanged copy of the input");
        } else {
            info!(
                "Injected [{}], replaced {} memory.copy and {} memory.fill",
                outcome.injected.join(", "),
                outcome.copies_replaced,
                outcome.fills_replaced
            );
        }

        Ok(outcome)
    }

    fn write_output(&self, text: &str) -> Result<()> {
        if let Some(parent) = self.args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| format!("Cannot create output directory {:?}", parent))?;
        }
        fs::write(&self.args.output, text).with_context(|| format!("Cannot write output file {:?}", self.args.output))?;
        debug!("Wrote {} bytes to {:?}", text.len(), self.args.output);
        Ok(())
    }
}
