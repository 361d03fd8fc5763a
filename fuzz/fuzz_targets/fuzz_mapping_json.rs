#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = aeat303::mapping::templates_from_json(s);
        let _ = aeat303::AeatConfig::from_json(s);
    }
});
