#![no_main]

use libfuzzer_sys::fuzz_target;
use msgpack_flavors_core::options::DecodeOptions;
use msgpack_flavors_transform::Resolver;

fuzz_target!(|data: &[u8]| {
    let mut resolver = Resolver::new();
    resolver.add_field("a", 0);
    resolver.add_field("b.c", 1);
    let mut sub = Resolver::new();
    sub.add_field("x", 0);
    resolver.add_array_resolver("items", sub);

    let opts = DecodeOptions::new();
    let mut out = [None, None];
    // Arbitrary input may not even be a map; resolving must still never
    // panic, only return an error.
    let _ = resolver.resolve(data, &opts, &mut out);
});
