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

//! Validation of rewritten modules against an engine without bulk memory

use thiserror::Error;
use wasmparser::{Validator, WasmFeatures};

/// Errors from assembling or validating a rewritten module
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("cannot assemble module text: {0}")]
    Assemble(String),

    #[error("module is not valid without bulk memory: {0}")]
    Invalid(String),
}

/// Feature set of an engine that predates the bulk memory proposal.
///
/// Reference types depend on bulk memory, so they are disabled as well.
pub fn bulk_memory_free_features() -> WasmFeatures {
    WasmFeatures {
        bulk_memory: false,
        reference_types: false,
        ..WasmFeatures::default()
    }
}

/// Assemble module text and validate it with bulk memory disabled
pub fn validate_without_bulk_memory(source: &str) -> Result<(), ValidationError> {
    let binary = wat::parse_str(source).map_err(|e| ValidationError::Assemble(e.to_string()))?;
    let mut validator = Validator::new_with_features(bulk_memory_free_features());
    validator
        .validate_all(&binary)
        .map_err(|e| ValidationError::Invalid(e.message().to_string()))?;
    Ok(())
}
