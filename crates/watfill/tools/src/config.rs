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

//! Configuration resolution for the command-line tool

use anyhow::{Context, Result};
use std::path::PathBuf;
use watfill_compiler::PolyfillConfig;

/// Environment variable naming a configuration file
pub const CONFIG_ENV: &str = "WATFILL_CONFIG";

/// Resolve the effective configuration.
///
/// An explicit path wins over `$WATFILL_CONFIG`; without either the
/// defaults are used.
pub fn resolve_config(cli_config: Option<PathBuf>) -> Result<PolyfillConfig> {
    let path = cli_config.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
    match path {
        Some(path) => {
            PolyfillConfig::load_from_file(&path).with_context(|| format!("Cannot load configuration {:?}", path))
        }
        None => Ok(PolyfillConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("watfill.toml");
        fs::write(&path, "copy_function = \"__copy\"\nfill_function = \"__fill\"\n").unwrap();

        let config = resolve_config(Some(path)).unwrap();
        assert_eq!(config.copy_function, "__copy");
        assert_eq!(config.fill_function, "__fill");
    }

    #[test]
    fn test_invalid_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("watfill.toml");
        fs::write(&path, "copy_function = \"\"\n").unwrap();

        let err = resolve_config(Some(path)).unwrap_err();
        assert!(format!("{:#}", err).contains("invalid function name"));
    }

    #[test]
    fn test_missing_config_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(resolve_config(Some(temp_dir.path().join("absent.toml"))).is_err());
    }
}
