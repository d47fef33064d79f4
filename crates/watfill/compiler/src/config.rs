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

//! Polyfill pass configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or checking a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid function name `{0}`: expected a non-empty WAT identifier without `$`")]
    InvalidFunctionName(String),

    #[error("indent must consist of spaces or tabs")]
    InvalidIndent,
}

/// Configuration for the polyfill pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolyfillConfig {
    /// Base name of the injected `memory.copy` replacement
    pub copy_function: String,
    /// Base name of the injected `memory.fill` replacement
    pub fill_function: String,
    /// One level of indentation in generated code
    pub indent: String,
}

impl Default for PolyfillConfig {
    fn default() -> Self {
        Self {
            copy_function: "memcpy".to_string(),
            fill_function: "memset".to_string(),
            indent: "  ".to_string(),
        }
    }
}

impl PolyfillConfig {
    /// Create a new configuration with default names
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_copy_function(mut self, name: impl Into<String>) -> Self {
        self.copy_function = name.into();
        self
    }

    pub fn with_fill_function(mut self, name: impl Into<String>) -> Self {
        self.fill_function = name.into();
        self
    }

    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Check that the configured names produce valid module text
    pub fn validate(&self) -> Result<(), ConfigError> {
        for name in [&self.copy_function, &self.fill_function] {
            if !is_identifier(name) {
                return Err(ConfigError::InvalidFunctionName(name.clone()));
            }
        }
        if !self.indent.chars().all(|c| c == ' ' || c == '\t') {
            return Err(ConfigError::InvalidIndent);
        }
        Ok(())
    }
}

/// WAT `idchar` run, as allowed after `$`
fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| {
            c.is_ascii_alphanumeric()
                || matches!(
                    c,
                    '!' | '#' | '$' | '%' | '&' | '\'' | '*' | '+' | '-' | '.' | '/' | ':' | '<' | '=' | '>' | '?' | '@' | '\\' | '^' | '_' | '`' | '|' | '~'
                )
        })
}
