#![no_main]
use libfuzzer_sys::fuzz_target;

use nbtstream::{from_bytes, to_bytes};

fuzz_target!(|data: &[u8]| {
    if let Ok(root) = from_bytes(data) {
        // Anything that loads must save again.
        let bs = to_bytes(&root).unwrap();
        assert!(from_bytes(&bs).is_ok());
    }
});
