#![no_main]

use libfuzzer_sys::fuzz_target;
use msgpack_flavors_core::decode::decode_any;
use msgpack_flavors_core::options::DecodeOptions;

fuzz_target!(|data: &[u8]| {
    let opts = DecodeOptions::new();
    // Must never panic, regardless of how malformed `data` is; whether it
    // decodes or errors is uninteresting, the recursion guard and bounds
    // checks are what's under test here.
    let _ = decode_any(data, &opts);
});
