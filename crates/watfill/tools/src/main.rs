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

//! watfill CLI Tool
//!
//! Main entry point for the bulk memory polyfill command.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use watfill_tools::{PolyfillArgs, PolyfillCommand, resolve_config};

fn main() -> Result<()> {
    // Usage errors go to stdout with a non-zero exit; --help and --version exit normally
    let args = match PolyfillArgs::try_parse() {
        Ok(args) => args,
        Err(err) if err.use_stderr() => {
            print!("{}", err.render());
            std::process::exit(1);
        }
        Err(err) => err.exit(),
    };

    // Initialize tracing
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).init();

    let config = resolve_config(args.config.clone())?;
    PolyfillCommand::new(args, config).execute()?;

    Ok(())
}
