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

//! Tests of the `watfill` binary's exit behavior

use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn watfill() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_watfill"));
    cmd.env_remove("WATFILL_CONFIG");
    cmd
}

#[test]
fn test_wrong_argument_count_prints_usage_to_stdout() {
    let output = watfill().arg("only-one.wat").output().unwrap();
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage"), "stdout was: {stdout}");
}

#[test]
fn test_polyfills_file() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("in.wat");
    let output = temp_dir.path().join("out.wat");
    fs::write(&input, "(module\n  (memory 1)\n  (func (param i32)\n    local.get 0\n    i32.const 0\n    i32.const 8\n    memory.fill 0)\n)\n").unwrap();

    let status = watfill().arg(&input).arg(&output).arg("--validate").status().unwrap();
    assert!(status.success());

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.contains("    call $memset)\n"));
    assert!(!written.contains("memory.fill"));
}

#[test]
fn test_structural_error_exits_without_output() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("in.wat");
    let output = temp_dir.path().join("out.wat");
    fs::write(&input, "memory.copy").unwrap();

    let result = watfill().arg(&input).arg(&output).output().unwrap();
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("no closing delimiter"));
    assert!(!output.exists());
}

#[test]
fn test_custom_config() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("in.wat");
    let output = temp_dir.path().join("out.wat");
    let config = temp_dir.path().join("watfill.toml");
    fs::write(&input, "(module (memory 1) (func memory.copy))").unwrap();
    fs::write(&config, "copy_function = \"__bulk_copy\"\n").unwrap();

    let status = watfill().arg(&input).arg(&output).arg("--config").arg(&config).status().unwrap();
    assert!(status.success());
    assert!(fs::read_to_string(&output).unwrap().contains("(func call $__bulk_copy)"));
}
