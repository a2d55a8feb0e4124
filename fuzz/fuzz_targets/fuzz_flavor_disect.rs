#![no_main]

use libfuzzer_sys::fuzz_target;
use msgpack_flavors_core::options::DecodeOptions;
use msgpack_flavors_transform::disect_flavor;
use std::collections::BTreeMap;

fuzz_target!(|data: &[u8]| {
    let mut selectors = BTreeMap::new();
    selectors.insert(0u64, 1u64);
    selectors.insert(1u64, 0u64);
    let opts = DecodeOptions::new().with_flavor_selectors(&selectors);
    // `data` is treated directly as a flavor pick's raw extension payload,
    // not a whole document: varint parsing must never panic on truncated
    // or adversarial byte runs.
    let _ = disect_flavor(data, &opts);
});
