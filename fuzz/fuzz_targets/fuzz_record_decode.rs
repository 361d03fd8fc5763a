#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes may be rejected, never panic.
    let _ = aeat303::record::decode(data);
});
