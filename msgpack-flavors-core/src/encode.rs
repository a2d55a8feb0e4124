//! Raw framing writers: the inverse of [`crate::decode`], used directly by
//! consumers that build MessagePack by hand and internally by
//! `msgpack-flavors-transform`'s canonicalizer, length encoder and flavor
//! builder.

use crate::formats::Format;
use crate::options::EncodeOptions;
use alloc::vec::Vec;

/// Append `nil`.
pub fn write_nil(dst: &mut Vec<u8>) {
    dst.push(Format::Nil.as_byte());
}

/// Append `true`/`false`.
pub fn write_bool(dst: &mut Vec<u8>, v: bool) {
    dst.push(if v { Format::True } else { Format::False }.as_byte());
}

/// Append a signed integer, in the canonical full-width framing unless
/// `opts.compact_ints` requests the shortest sufficient framing.
pub fn write_int(dst: &mut Vec<u8>, v: i64, opts: &EncodeOptions) {
    if opts.compact_ints {
        write_int_compact(dst, v);
    } else {
        write_int_full(dst, v);
    }
}

fn write_int_full(dst: &mut Vec<u8>, v: i64) {
    if v >= 0 {
        dst.push(Format::Uint64.as_byte());
        dst.extend_from_slice(&(v as u64).to_be_bytes());
    } else {
        dst.push(Format::Int64.as_byte());
        dst.extend_from_slice(&v.to_be_bytes());
    }
}

fn write_int_compact(dst: &mut Vec<u8>, v: i64) {
    if (0..=127).contains(&v) {
        dst.push(Format::PositiveFixInt(v as u8).as_byte());
    } else if (-32..0).contains(&v) {
        dst.push(Format::NegativeFixInt(v as i8).as_byte());
    } else if v >= 0 {
        let v = v as u64;
        if v <= u8::MAX as u64 {
            dst.push(Format::Uint8.as_byte());
            dst.push(v as u8);
        } else if v <= u16::MAX as u64 {
            dst.push(Format::Uint16.as_byte());
            dst.extend_from_slice(&(v as u16).to_be_bytes());
        } else if v <= u32::MAX as u64 {
            dst.push(Format::Uint32.as_byte());
            dst.extend_from_slice(&(v as u32).to_be_bytes());
        } else {
            dst.push(Format::Uint64.as_byte());
            dst.extend_from_slice(&v.to_be_bytes());
        }
    } else if v >= i8::MIN as i64 {
        dst.push(Format::Int8.as_byte());
        dst.push(v as i8 as u8);
    } else if v >= i16::MIN as i64 {
        dst.push(Format::Int16.as_byte());
        dst.extend_from_slice(&(v as i16).to_be_bytes());
    } else if v >= i32::MIN as i64 {
        dst.push(Format::Int32.as_byte());
        dst.extend_from_slice(&(v as i32).to_be_bytes());
    } else {
        dst.push(Format::Int64.as_byte());
        dst.extend_from_slice(&v.to_be_bytes());
    }
}

/// Append an `f32`.
pub fn write_float32(dst: &mut Vec<u8>, v: f32) {
    dst.push(Format::Float32.as_byte());
    dst.extend_from_slice(&v.to_be_bytes());
}

/// Append an `f64`.
pub fn write_float64(dst: &mut Vec<u8>, v: f64) {
    dst.push(Format::Float64.as_byte());
    dst.extend_from_slice(&v.to_be_bytes());
}

/// Append a UTF-8 string, choosing the shortest framing that fits.
pub fn write_str(dst: &mut Vec<u8>, s: &str) {
    let bytes = s.as_bytes();
    match bytes.len() {
        n if n <= 31 => dst.push(Format::FixStr(n as u8).as_byte()),
        n if n <= u8::MAX as usize => {
            dst.push(Format::Str8.as_byte());
            dst.push(n as u8);
        }
        n if n <= u16::MAX as usize => {
            dst.push(Format::Str16.as_byte());
            dst.extend_from_slice(&(n as u16).to_be_bytes());
        }
        n => {
            dst.push(Format::Str32.as_byte());
            dst.extend_from_slice(&(n as u32).to_be_bytes());
        }
    }
    dst.extend_from_slice(bytes);
}

/// Append raw binary data, choosing the shortest framing that fits.
pub fn write_bin(dst: &mut Vec<u8>, data: &[u8]) {
    match data.len() {
        n if n <= u8::MAX as usize => {
            dst.push(Format::Bin8.as_byte());
            dst.push(n as u8);
        }
        n if n <= u16::MAX as usize => {
            dst.push(Format::Bin16.as_byte());
            dst.extend_from_slice(&(n as u16).to_be_bytes());
        }
        n => {
            dst.push(Format::Bin32.as_byte());
            dst.extend_from_slice(&(n as u32).to_be_bytes());
        }
    }
    dst.extend_from_slice(data);
}

/// Append a map length header for `n` key/value pairs.
pub fn write_map_len(dst: &mut Vec<u8>, n: usize) {
    match n {
        n if n <= 15 => dst.push(Format::FixMap(n as u8).as_byte()),
        n if n <= u16::MAX as usize => {
            dst.push(Format::Map16.as_byte());
            dst.extend_from_slice(&(n as u16).to_be_bytes());
        }
        n => {
            dst.push(Format::Map32.as_byte());
            dst.extend_from_slice(&(n as u32).to_be_bytes());
        }
    }
}

/// Append an array length header for `n` elements.
pub fn write_array_len(dst: &mut Vec<u8>, n: usize) {
    match n {
        n if n <= 15 => dst.push(Format::FixArray(n as u8).as_byte()),
        n if n <= u16::MAX as usize => {
            dst.push(Format::Array16.as_byte());
            dst.extend_from_slice(&(n as u16).to_be_bytes());
        }
        n => {
            dst.push(Format::Array32.as_byte());
            dst.extend_from_slice(&(n as u32).to_be_bytes());
        }
    }
}

/// Append a standard MessagePack timestamp (extension `-1`), choosing the
/// shortest of the 4/8/12-byte forms that can represent it exactly.
pub fn write_timestamp(dst: &mut Vec<u8>, seconds: i64, nanos: u32) {
    let payload = if nanos == 0 && seconds >= 0 && seconds <= u32::MAX as i64 {
        let mut p = Vec::with_capacity(4);
        p.extend_from_slice(&(seconds as u32).to_be_bytes());
        p
    } else if seconds >= 0 && seconds < (1u64 << 34) as i64 {
        let packed = ((nanos as u64) << 34) | seconds as u64;
        let mut p = Vec::with_capacity(8);
        p.extend_from_slice(&packed.to_be_bytes());
        p
    } else {
        let mut p = Vec::with_capacity(12);
        p.extend_from_slice(&nanos.to_be_bytes());
        p.extend_from_slice(&seconds.to_be_bytes());
        p
    };
    crate::extension::write_ext(dst, crate::extension::ext_type::TIMESTAMP, &payload)
        .expect("timestamp payload is always well under the extension size limit");
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, &[0x00])]
    #[case(127, &[0x7f])]
    #[case(-1, &[0xff])]
    #[case(128, &[0xcc, 0x80])]
    fn compact_ints(#[case] v: i64, #[case] expected: &[u8]) {
        let mut out = Vec::new();
        write_int(&mut out, v, &EncodeOptions::new().with_compact_ints(true));
        assert_eq!(out, expected);
    }

    #[test]
    fn str_roundtrip_len() {
        let mut out = Vec::new();
        write_str(&mut out, "hello");
        assert_eq!(out, [0xa5, b'h', b'e', b'l', b'l', b'o']);
    }

    #[test]
    fn timestamp_32() {
        let mut out = Vec::new();
        write_timestamp(&mut out, 1, 0);
        assert_eq!(out, [0xd6, 0xff, 0x00, 0x00, 0x00, 0x01]);
    }
}
