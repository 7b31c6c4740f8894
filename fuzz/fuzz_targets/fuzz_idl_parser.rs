#![no_main]

use libfuzzer_sys::fuzz_target;
use mdn_helper::idl::parser;

fuzz_target!(|data: &[u8]| {
    if let Ok(source) = std::str::from_utf8(data) {
        // Any input must produce definitions or a syntax error, never a panic
        let _ = parser::parse(source);
    }
});
