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

//! Bulk memory polyfill for WebAssembly text modules
//!
//! Rewrites `memory.copy` and `memory.fill` into calls to injected
//! byte-by-byte functions so the module runs on engines without the bulk
//! memory extension.

pub mod config;
pub mod detector;
pub mod error;
pub mod injector;
pub mod layout;
pub mod lexer;
pub mod pass;
pub mod rewriter;
pub mod synthesizer;
pub mod validation;

pub use config::{ConfigError, PolyfillConfig};
pub use detector::{BulkMemoryOp, Detection};
pub use error::{PolyfillError, PolyfillResult};
pub use pass::{BulkMemoryPolyfill, PolyfillOutcome, polyfill};
pub use validation::{ValidationError, validate_without_bulk_memory};
