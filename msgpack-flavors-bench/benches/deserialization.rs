#![allow(unexpected_cfgs)]

#[cfg(not(codspeed))]
use divan::counter::BytesCount;
use msgpack_flavors_bench::{map_of_records, map_of_records_interned, primitive_array, string_array};
use msgpack_flavors_core::decode::decode_any;
use msgpack_flavors_core::options::DecodeOptions;

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

const LENS: &[usize] = &[16, 256];

#[divan::bench(args = LENS)]
fn decode_any_primitives(bencher: divan::Bencher, len: usize) {
    let doc = primitive_array(len);
    #[allow(unused_mut)]
    let mut bencher = bencher;
    #[cfg(not(codspeed))]
    {
        bencher = bencher.input_counter(BytesCount::of_slice(&doc));
    }
    let opts = DecodeOptions::new();
    bencher.bench_local(|| decode_any(core::hint::black_box(&doc), &opts).unwrap());
}

#[divan::bench(args = LENS)]
fn decode_any_strings(bencher: divan::Bencher, len: usize) {
    let doc = string_array(len);
    #[allow(unused_mut)]
    let mut bencher = bencher;
    #[cfg(not(codspeed))]
    {
        bencher = bencher.input_counter(BytesCount::of_slice(&doc));
    }
    let opts = DecodeOptions::new();
    bencher.bench_local(|| decode_any(core::hint::black_box(&doc), &opts).unwrap());
}

#[divan::bench(args = LENS)]
fn decode_any_records(bencher: divan::Bencher, len: usize) {
    let doc = map_of_records(len);
    #[allow(unused_mut)]
    let mut bencher = bencher;
    #[cfg(not(codspeed))]
    {
        bencher = bencher.input_counter(BytesCount::of_slice(&doc));
    }
    let opts = DecodeOptions::new();
    bencher.bench_local(|| decode_any(core::hint::black_box(&doc), &opts).unwrap());
}

#[divan::bench(args = LENS)]
fn decode_any_interned_records(bencher: divan::Bencher, len: usize) {
    let (doc, dict) = map_of_records_interned(len);
    #[allow(unused_mut)]
    let mut bencher = bencher;
    #[cfg(not(codspeed))]
    {
        bencher = bencher.input_counter(BytesCount::of_slice(&doc));
    }
    let opts = DecodeOptions::new().with_dict(&dict);
    bencher.bench_local(|| decode_any(core::hint::black_box(&doc), &opts).unwrap());
}
