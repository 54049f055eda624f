//! Fuzz target for the JSON policy store parser.
//!
//! Goal: parsing should **never panic** on any input. Errors are fine.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_store_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(records) = polaudit_repo::parse_store(text) {
            // Whatever parses must render and read back.
            let rendered = polaudit_repo::render_store(&records).expect("render parsed store");
            let reparsed = polaudit_repo::parse_store(&rendered).expect("reparse rendered store");
            assert_eq!(records, reparsed);
        }
    }
});
