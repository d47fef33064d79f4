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

//! Execution tests for rewritten modules
//!
//! The original module (using native bulk memory instructions) and the
//! rewritten module (using the injected functions) are run side by side in
//! wasmtime and must leave memory in the same state.

use watfill_compiler::{BulkMemoryPolyfill, ValidationError, validate_without_bulk_memory};
use wasmtime::{Engine, Instance, Module, Store};

const BULK_MODULE: &str = r#"(module
  (memory (export "mem") 1)
  ;; flat form with explicit default memory
  (func (export "copy") (param $d i32) (param $s i32) (param $n i32)
    local.get $d
    local.get $s
    local.get $n
    memory.copy 0 0)
  ;; folded form without memory index
  (func (export "fill") (param $d i32) (param $v i32) (param $n i32)
    (memory.fill (local.get $d) (local.get $v) (local.get $n)))
)
"#;

struct Harness {
    engine: Engine,
    module: Module,
}

impl Harness {
    fn new(wat: &str) -> Self {
        let engine = Engine::default();
        let module = Module::new(&engine, wat).expect("module should compile");
        Self { engine, module }
    }

    /// Call an exported `(i32, i32, i32) -> ()` function on freshly
    /// initialized memory and return the first `init.len()` bytes afterwards
    fn call(&self, export: &str, init: &[u8], args: (i32, i32, i32)) -> Vec<u8> {
        let mut store = Store::new(&self.engine, ());
        let instance = Instance::new(&mut store, &self.module, &[]).expect("instantiation should succeed");
        let memory = instance.get_memory(&mut store, "mem").expect("memory should be exported");
        memory.data_mut(&mut store)[..init.len()].copy_from_slice(init);
        let func = instance
            .get_typed_func::<(i32, i32, i32), ()>(&mut store, export)
            .expect("export should have the expected signature");
        func.call(&mut store, args).expect("call should not trap");
        memory.data(&store)[..init.len()].to_vec()
    }
}

fn rewritten() -> String {
    BulkMemoryPolyfill::default().run(BULK_MODULE).expect("pass should succeed").output
}

fn pattern(len: usize) -> Vec<u8> {
    (1..=len as u8).collect()
}

#[test]
fn test_overlapping_copy_forward_overlap() {
    let polyfilled = Harness::new(&rewritten());
    let native = Harness::new(BULK_MODULE);

    let init = pattern(24);
    let mut expected = init.clone();
    expected.copy_within(0..10, 5);

    assert_eq!(polyfilled.call("copy", &init, (5, 0, 10)), expected);
    assert_eq!(native.call("copy", &init, (5, 0, 10)), expected);
}

#[test]
fn test_overlapping_copy_backward_overlap() {
    let polyfilled = Harness::new(&rewritten());

    let init = pattern(24);
    let mut expected = init.clone();
    expected.copy_within(5..15, 0);

    assert_eq!(polyfilled.call("copy", &init, (0, 5, 10)), expected);
}

#[test]
fn test_copy_matches_native_for_small_ranges() {
    let polyfilled = Harness::new(&rewritten());
    let native = Harness::new(BULK_MODULE);
    let init = pattern(16);

    for dest in 0..6 {
        for src in 0..6 {
            for len in 0..6 {
                let args = (dest, src, len);
                assert_eq!(
                    polyfilled.call("copy", &init, args),
                    native.call("copy", &init, args),
                    "dest={dest} src={src} len={len}"
                );
            }
        }
    }
}

#[test]
fn test_fill() {
    let polyfilled = Harness::new(&rewritten());
    let result = polyfilled.call("fill", &[0u8; 8], (0, 0xFF, 4));
    assert_eq!(result, vec![0xFF, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0]);
}

#[test]
fn test_fill_truncates_value_to_byte() {
    let polyfilled = Harness::new(&rewritten());
    let native = Harness::new(BULK_MODULE);
    let init = [0u8; 8];

    let result = polyfilled.call("fill", &init, (2, 0x1AB, 3));
    assert_eq!(result, vec![0, 0, 0xAB, 0xAB, 0xAB, 0, 0, 0]);
    assert_eq!(result, native.call("fill", &init, (2, 0x1AB, 3)));
}

#[test]
fn test_zero_length_is_noop() {
    let polyfilled = Harness::new(&rewritten());
    let init = pattern(12);

    assert_eq!(polyfilled.call("copy", &init, (6, 0, 0)), init);
    assert_eq!(polyfilled.call("copy", &init, (0, 6, 0)), init);
    assert_eq!(polyfilled.call("fill", &init, (3, 0xFF, 0)), init);
}

#[test]
fn test_rewritten_module_needs_no_bulk_memory() {
    let output = rewritten();
    assert!(!output.contains("memory.copy"));
    assert!(!output.contains("memory.fill"));
    validate_without_bulk_memory(&output).expect("rewritten module should validate");

    let err = validate_without_bulk_memory(BULK_MODULE).unwrap_err();
    assert!(matches!(err, ValidationError::Invalid(_)));
}
