//! Decode into the untyped [`ValueRef`], eliding void array elements and map
//! pairs, and surfacing unrecognized extensions as
//! [`crate::value::ExtensionRef`].

use super::{decode_array_len, decode_map_len, decode_string, peek_format, MAX_DEPTH};
use crate::error::{Error, Result};
use crate::extension::{self, ext_type, Recurse};
use crate::formats::Format;
use crate::options::DecodeOptions;
use crate::value::{ExtensionRef, Number, Timestamp, ValueRef};
use alloc::vec::Vec;

/// Decode any MessagePack value, resolving the reserved extension protocol
/// and dropping void array elements / map pairs along the way.
pub fn decode_any<'a>(buf: &'a [u8], opts: &DecodeOptions<'a>) -> Result<(ValueRef<'a>, &'a [u8])> {
    decode_any_depth(buf, opts, 0)
}

fn decode_any_depth<'a>(
    buf: &'a [u8],
    opts: &DecodeOptions<'a>,
    depth: usize,
) -> Result<(ValueRef<'a>, &'a [u8])> {
    if depth > MAX_DEPTH {
        return Err(Error::CorruptInput);
    }
    let format = peek_format(buf).ok_or(Error::ShortInput)?;
    match format {
        Format::Nil => Ok((ValueRef::Nil, &buf[1..])),
        Format::True => Ok((ValueRef::Bool(true), &buf[1..])),
        Format::False => Ok((ValueRef::Bool(false), &buf[1..])),
        Format::NeverUsed => Err(Error::UnexpectedByte(0xc1)),
        Format::PositiveFixInt(v) => Ok((ValueRef::Number(Number::PositiveInt(v as u64)), &buf[1..])),
        Format::NegativeFixInt(v) => Ok((ValueRef::Number(Number::NegativeInt(v as i64)), &buf[1..])),
        Format::Uint8 | Format::Uint16 | Format::Uint32 | Format::Uint64 => {
            decode_uint(format, buf)
        }
        Format::Int8 | Format::Int16 | Format::Int32 | Format::Int64 => decode_sint(format, buf),
        Format::Float32 => {
            if buf.len() < 5 {
                return Err(Error::ShortInput);
            }
            let v = f32::from_be_bytes(buf[1..5].try_into().unwrap());
            Ok((ValueRef::Number(Number::Float(v as f64)), &buf[5..]))
        }
        Format::Float64 => {
            if buf.len() < 9 {
                return Err(Error::ShortInput);
            }
            let v = f64::from_be_bytes(buf[1..9].try_into().unwrap());
            Ok((ValueRef::Number(Number::Float(v)), &buf[9..]))
        }
        Format::FixStr(_) | Format::Str8 | Format::Str16 | Format::Str32 => {
            let (s, rest) = decode_string(buf, opts)?;
            Ok((ValueRef::String(s), rest))
        }
        Format::Bin8 | Format::Bin16 | Format::Bin32 => decode_bin(format, buf),
        Format::FixArray(_) | Format::Array16 | Format::Array32 => {
            decode_array(buf, opts, depth)
        }
        Format::FixMap(_) | Format::Map16 | Format::Map32 => decode_map(buf, opts, depth),
        Format::FixExt1
        | Format::FixExt2
        | Format::FixExt4
        | Format::FixExt8
        | Format::FixExt16
        | Format::Ext8
        | Format::Ext16
        | Format::Ext32 => decode_ext_any(format, buf, opts, depth),
    }
}

fn decode_uint<'a>(format: Format, buf: &'a [u8]) -> Result<(ValueRef<'a>, &'a [u8])> {
    let n = match format {
        Format::Uint8 => {
            if buf.len() < 2 {
                return Err(Error::ShortInput);
            }
            (buf[1] as u64, 2)
        }
        Format::Uint16 => {
            if buf.len() < 3 {
                return Err(Error::ShortInput);
            }
            (u16::from_be_bytes([buf[1], buf[2]]) as u64, 3)
        }
        Format::Uint32 => {
            if buf.len() < 5 {
                return Err(Error::ShortInput);
            }
            (u32::from_be_bytes(buf[1..5].try_into().unwrap()) as u64, 5)
        }
        Format::Uint64 => {
            if buf.len() < 9 {
                return Err(Error::ShortInput);
            }
            (u64::from_be_bytes(buf[1..9].try_into().unwrap()), 9)
        }
        _ => unreachable!(),
    };
    Ok((ValueRef::Number(Number::PositiveInt(n.0)), &buf[n.1..]))
}

fn decode_sint<'a>(format: Format, buf: &'a [u8]) -> Result<(ValueRef<'a>, &'a [u8])> {
    let (v, consumed) = match format {
        Format::Int8 => {
            if buf.len() < 2 {
                return Err(Error::ShortInput);
            }
            (buf[1] as i8 as i64, 2)
        }
        Format::Int16 => {
            if buf.len() < 3 {
                return Err(Error::ShortInput);
            }
            (i16::from_be_bytes([buf[1], buf[2]]) as i64, 3)
        }
        Format::Int32 => {
            if buf.len() < 5 {
                return Err(Error::ShortInput);
            }
            (i32::from_be_bytes(buf[1..5].try_into().unwrap()) as i64, 5)
        }
        Format::Int64 => {
            if buf.len() < 9 {
                return Err(Error::ShortInput);
            }
            (i64::from_be_bytes(buf[1..9].try_into().unwrap()), 9)
        }
        _ => unreachable!(),
    };
    Ok((ValueRef::Number(Number::from(v)), &buf[consumed..]))
}

fn decode_bin<'a>(format: Format, buf: &'a [u8]) -> Result<(ValueRef<'a>, &'a [u8])> {
    let (len, hdr) = match format {
        Format::Bin8 => {
            if buf.len() < 2 {
                return Err(Error::ShortInput);
            }
            (buf[1] as usize, 2)
        }
        Format::Bin16 => {
            if buf.len() < 3 {
                return Err(Error::ShortInput);
            }
            (u16::from_be_bytes([buf[1], buf[2]]) as usize, 3)
        }
        Format::Bin32 => {
            if buf.len() < 5 {
                return Err(Error::ShortInput);
            }
            (u32::from_be_bytes(buf[1..5].try_into().unwrap()) as usize, 5)
        }
        _ => unreachable!(),
    };
    if buf.len() < hdr + len {
        return Err(Error::ShortInput);
    }
    Ok((ValueRef::Bin(&buf[hdr..hdr + len]), &buf[hdr + len..]))
}

fn decode_array<'a>(
    buf: &'a [u8],
    opts: &DecodeOptions<'a>,
    depth: usize,
) -> Result<(ValueRef<'a>, &'a [u8])> {
    let (n, consumed, fast_skip_end, force_jump, switch) = decode_array_len(buf, opts)?;
    let mut rest = &switch.unwrap_or(buf)[consumed..];
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        match decode_any_depth(rest, opts, depth + 1) {
            Ok((v, next)) => {
                out.push(v);
                rest = next;
            }
            Err(Error::Void) => {
                rest = &rest[super::value_length(rest)?..];
            }
            Err(e) => return Err(e),
        }
    }
    if force_jump {
        rest = &buf[fast_skip_end..];
    }
    Ok((ValueRef::Array(out), rest))
}

fn decode_map<'a>(
    buf: &'a [u8],
    opts: &DecodeOptions<'a>,
    depth: usize,
) -> Result<(ValueRef<'a>, &'a [u8])> {
    let (n, consumed, fast_skip_end, force_jump, switch) = decode_map_len(buf, opts)?;
    let mut rest = &switch.unwrap_or(buf)[consumed..];
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        let key = match decode_string(rest, opts) {
            Ok((key, after_key)) => {
                rest = after_key;
                key
            }
            Err(Error::Void) => {
                // A voided key elides the whole pair: drop the key and the
                // value that follows it.
                let after_key = &rest[super::value_length(rest)?..];
                rest = &after_key[super::value_length(after_key)?..];
                continue;
            }
            Err(e) => return Err(e),
        };
        match decode_any_depth(rest, opts, depth + 1) {
            Ok((v, next)) => {
                out.push((key, v));
                rest = next;
            }
            Err(Error::Void) => {
                rest = &rest[super::value_length(rest)?..];
            }
            Err(e) => return Err(e),
        }
    }
    if force_jump {
        rest = &buf[fast_skip_end..];
    }
    Ok((ValueRef::Map(out), rest))
}

fn decode_ext_any<'a>(
    format: Format,
    buf: &'a [u8],
    opts: &DecodeOptions<'a>,
    depth: usize,
) -> Result<(ValueRef<'a>, &'a [u8])> {
    let (et, payload, after) = extension::read_ext(format, &buf[1..])?;
    if et == ext_type::TIMESTAMP {
        let t: Timestamp = super::scalar::decode_timestamp_payload(payload)?;
        return Ok((ValueRef::Timestamp(t), after));
    }
    if et == ext_type::INTERNED_STRING {
        let idx = extension::decode_bytes_to_uint(payload).ok_or(Error::CorruptFlavor("interned index"))?;
        let dict = opts.dict.ok_or(Error::MissingDict)?;
        let s = dict.get(idx as usize).ok_or(Error::DictIndexOutOfRange(idx as usize))?;
        return Ok((ValueRef::String(s), after));
    }
    match extension::resolve_recurse(et, payload, opts) {
        Ok(Recurse::Bytes(inner)) => {
            let (v, _) = decode_any_depth(inner, opts, depth + 1)?;
            Ok((v, after))
        }
        Ok(Recurse::Void) => Err(Error::Void),
        Err(Error::UnsupportedExtension(t)) => {
            Ok((ValueRef::Extension(ExtensionRef { r#type: t, data: payload }), after))
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> DecodeOptions<'static> {
        DecodeOptions::new()
    }

    #[test]
    fn array_elides_void() {
        // [1, void, 2] where void is ext 19 fixext1 with a dummy byte.
        let buf = [0x93, 0x01, 0xd4, 19u8, 0x00, 0x02];
        let (v, rest) = decode_any(&buf, &opts()).unwrap();
        assert!(rest.is_empty());
        match v {
            ValueRef::Array(items) => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[0].as_number().unwrap().as_unsigned_int(), Some(1));
                assert_eq!(items[1].as_number().unwrap().as_unsigned_int(), Some(2));
            }
            _ => panic!("expected array"),
        }
    }

    #[test]
    fn map_elides_void_pair() {
        let buf = [
            0x82, 0xa1, b'a', 0x01, 0xa1, b'b', 0xd4, 19u8, 0x00,
        ];
        let (v, rest) = decode_any(&buf, &opts()).unwrap();
        assert!(rest.is_empty());
        match v {
            ValueRef::Map(pairs) => {
                assert_eq!(pairs.len(), 1);
                assert_eq!(pairs[0].0, "a");
            }
            _ => panic!("expected map"),
        }
    }

    #[test]
    fn map_elides_pair_with_voided_key() {
        // { <void>: 99, "a": 1 }
        let buf = [
            0x82, 0xd4, 19u8, 0x00, 0x63, 0xa1, b'a', 0x01,
        ];
        let (v, rest) = decode_any(&buf, &opts()).unwrap();
        assert!(rest.is_empty());
        match v {
            ValueRef::Map(pairs) => {
                assert_eq!(pairs.len(), 1);
                assert_eq!(pairs[0].0, "a");
                assert_eq!(pairs[0].1.as_number().unwrap().as_unsigned_int(), Some(1));
            }
            _ => panic!("expected map"),
        }
    }

    #[test]
    fn unknown_extension_is_surfaced() {
        let buf = [0xd4, 5u8, 0x42];
        let (v, rest) = decode_any(&buf, &opts()).unwrap();
        assert!(rest.is_empty());
        match v {
            ValueRef::Extension(e) => {
                assert_eq!(e.r#type, 5);
                assert_eq!(e.data, &[0x42]);
            }
            _ => panic!("expected extension"),
        }
    }
}
