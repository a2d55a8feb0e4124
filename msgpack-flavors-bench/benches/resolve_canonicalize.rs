#![allow(unexpected_cfgs)]

#[cfg(not(codspeed))]
use divan::counter::BytesCount;
use msgpack_flavors_bench::map_of_records;
use msgpack_flavors_core::options::DecodeOptions;
use msgpack_flavors_transform::{length_encode, Resolver};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

const LENS: &[usize] = &[64, 1024];

fn key(i: usize) -> String {
    let mut s = String::from("key");
    s.push_str(&i.to_string());
    s
}

/// Resolving the FIRST key out of a map is the worst case for the tail:
/// once that one sought field is found, `Resolver::resolve_into` has
/// nothing left to look for and calls `Cursor::break_out` to get past the
/// remaining entries. On a plain map that's still an O(n) walk (one
/// `value_length` skip per remaining entry); on a length-prefix-wrapped map
/// it's the O(1) jump to the wrapper's stored end offset. This pair of
/// benches is the payoff for `length_encode`.
#[divan::bench(args = LENS)]
fn resolve_first_field_plain(bencher: divan::Bencher, len: usize) {
    let doc = map_of_records(len);
    let mut resolver = Resolver::new();
    resolver.add_field(&format!("{}.id", key(0)), 0);

    #[allow(unused_mut)]
    let mut bencher = bencher;
    #[cfg(not(codspeed))]
    {
        bencher = bencher.input_counter(BytesCount::of_slice(&doc));
    }
    let opts = DecodeOptions::new();
    bencher.bench_local(|| {
        let mut out = [None];
        resolver
            .resolve(core::hint::black_box(&doc), &opts, &mut out)
            .unwrap();
    });
}

#[divan::bench(args = LENS)]
fn resolve_first_field_length_encoded(bencher: divan::Bencher, len: usize) {
    let doc = length_encode(&map_of_records(len)).unwrap();
    let mut resolver = Resolver::new();
    resolver.add_field(&format!("{}.id", key(0)), 0);

    #[allow(unused_mut)]
    let mut bencher = bencher;
    #[cfg(not(codspeed))]
    {
        bencher = bencher.input_counter(BytesCount::of_slice(&doc));
    }
    let opts = DecodeOptions::new();
    bencher.bench_local(|| {
        let mut out = [None];
        resolver
            .resolve(core::hint::black_box(&doc), &opts, &mut out)
            .unwrap();
    });
}
