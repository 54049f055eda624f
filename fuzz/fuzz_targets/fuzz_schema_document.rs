//! Fuzz target for schema document loading.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_schema_document
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = polaudit_settings::load_registry(text);
    }
});
