//! Harness helpers for fuzz targets built on shapefuzz-core
//!
//! A target typically looks like:
//!
//! ```ignore
//! fuzz_target!(|data: &[u8]| {
//!     if let Some(input) = shapefuzz_fuzz::generate_or_skip::<MyInput>(data) {
//!         check(input);
//!     }
//! });
//! ```

use shapefuzz_core::{ByteCursor, Config, Generate, Generator};

/// Generate a `T` from `data`, or `None` when the input runs out of bytes
///
/// Budget exhaustion means the input is too short to be interesting. Any
/// other failure is a bug in the shape or its overrides and panics so the
/// fuzzer reports it.
pub fn generate_or_skip<T: Generate + Default>(data: &[u8]) -> Option<T> {
    generate_or_skip_with(data, Config::default())
}

/// Like [`generate_or_skip`] with an explicit configuration
pub fn generate_or_skip_with<T: Generate + Default>(data: &[u8], config: Config) -> Option<T> {
    let mut generator = match Generator::with_config(data.to_vec(), config) {
        Ok(generator) => generator,
        Err(e) => panic!("invalid generator configuration: {}", e),
    };

    match generator.generate::<T>() {
        Ok(value) => Some(value),
        Err(e) if e.is_insufficient_bytes() => None,
        Err(e) => panic!("generation of {} failed: {}", core::any::type_name::<T>(), e),
    }
}

/// Drive every cursor primitive over `data`; must never panic
pub fn fuzz_draws(data: &[u8]) {
    let mut cursor = ByteCursor::new(data.to_vec());
    while !cursor.is_exhausted() {
        let before = cursor.position();
        let _ = cursor.u16();
        let _ = cursor.length_framed_bytes();
        let _ = cursor.f64();
        let _ = cursor.chars();
        let _ = cursor.bool();
        if cursor.position() == before {
            // every draw failed; step over one byte
            let _ = cursor.byte();
        }
    }
}

/// Split `data` into calls; must never panic
pub fn fuzz_split(data: &[u8]) {
    let cursor = ByteCursor::new(data.to_vec());
    if let Ok(plan) = cursor.split_calls(1, 32) {
        for (_, arguments) in plan.calls() {
            let mut inner = ByteCursor::new(arguments);
            let _ = inner.string();
        }
    }
}

/// Generate a nested shape from `data`; must never panic
pub fn fuzz_generate(data: &[u8]) {
    type Nested = (
        String,
        Vec<(u16, Option<Box<Vec<u8>>>)>,
        std::collections::BTreeMap<String, [i32; 3]>,
    );
    let _ = generate_or_skip::<Nested>(data);
}
