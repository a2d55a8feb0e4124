//! Re-serialize a document into a canonical byte-for-byte form: flavor picks,
//! length prefixes and injections resolved away, interned strings expanded,
//! map keys sorted, voids elided, integers written in their shortest framing.

use alloc::vec::Vec;
use msgpack_flavors_core::decode::decode_any;
use msgpack_flavors_core::encode::{
    write_array_len, write_bin, write_bool, write_float64, write_int, write_map_len, write_nil,
    write_str, write_timestamp,
};
use msgpack_flavors_core::error::Result;
use msgpack_flavors_core::extension;
use msgpack_flavors_core::options::{DecodeOptions, EncodeOptions};
use msgpack_flavors_core::value::{Number, ValueRef};

/// Canonicalize the document at the start of `buf`, returning the canonical
/// encoding. Trailing bytes in `buf` beyond the first value are ignored.
pub fn canonicalize<'a>(buf: &'a [u8], opts: &DecodeOptions<'a>) -> Result<Vec<u8>> {
    let (value, _) = decode_any(buf, opts)?;
    let mut out = Vec::new();
    write_canonical(&mut out, &value);
    Ok(out)
}

fn write_canonical(out: &mut Vec<u8>, value: &ValueRef<'_>) {
    let compact = EncodeOptions::new().with_compact_ints(true);
    match value {
        ValueRef::Nil => write_nil(out),
        ValueRef::Bool(b) => write_bool(out, *b),
        ValueRef::Number(Number::Float(f)) => write_float64(out, *f),
        ValueRef::Number(n) => {
            let v = n
                .as_signed_int()
                .unwrap_or_else(|| n.as_unsigned_int().unwrap_or(0) as i64);
            write_int(out, v, &compact);
        }
        ValueRef::String(s) => write_str(out, s),
        ValueRef::Bin(b) => write_bin(out, b),
        ValueRef::Timestamp(t) => write_timestamp(out, t.seconds, t.nanos),
        ValueRef::Array(items) => {
            write_array_len(out, items.len());
            for item in items {
                write_canonical(out, item);
            }
        }
        ValueRef::Map(pairs) => {
            let mut sorted: Vec<&(&str, ValueRef<'_>)> = pairs.iter().collect();
            sorted.sort_by_key(|(k, _)| *k);
            write_map_len(out, sorted.len());
            for (k, v) in sorted {
                write_str(out, k);
                write_canonical(out, v);
            }
        }
        ValueRef::Extension(e) => {
            extension::write_ext(out, e.r#type, e.data)
                .expect("extension payload within size limit, already decoded from the wire");
        }
    }
}
