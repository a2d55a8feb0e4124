//! Type-specialized scalar decoders: bool, int, float32/64, string, raw
//! bytes, timestamp. Every one of them understands the extension protocol
//! (17/18/20 recursion, plus the type-specific `-1`/`-128` extensions).

use super::{fixed_width_payload, peek_format, prefix_width, read_uint};
use crate::error::{Error, Result};
use crate::extension::{self, ext_type, Recurse};
use crate::formats::Format;
use crate::options::DecodeOptions;
use crate::value::Timestamp;

/// Split off the fixed-width immediate payload of a scalar numeric format,
/// just past its single format byte.
fn split_header(format: Format, buf: &[u8]) -> Result<(&[u8], &[u8])> {
    let len = fixed_width_payload(format).expect("split_header called with a non-scalar format");
    let body_start = 1;
    if buf.len() < body_start + len {
        return Err(Error::ShortInput);
    }
    Ok((&buf[body_start..body_start + len], &buf[body_start + len..]))
}

/// Decode a `bool`, following extensions 17/18/20 transparently.
pub fn decode_bool<'a>(buf: &'a [u8], opts: &DecodeOptions<'a>) -> Result<(bool, &'a [u8])> {
    let format = peek_format(buf).ok_or(Error::ShortInput)?;
    match format {
        Format::True => Ok((true, &buf[1..])),
        Format::False => Ok((false, &buf[1..])),
        _ if is_ext(format) => with_ext_recursion(format, buf, opts, decode_bool, "bool"),
        other => Err(Error::TypeMismatch {
            expected: "bool",
            found: other,
        }),
    }
}

/// Decode any MessagePack integer or float into an `i64`, truncating floats.
pub fn decode_int<'a>(buf: &'a [u8], opts: &DecodeOptions<'a>) -> Result<(i64, &'a [u8])> {
    let format = peek_format(buf).ok_or(Error::ShortInput)?;
    match format {
        Format::PositiveFixInt(v) => Ok((v as i64, &buf[1..])),
        Format::NegativeFixInt(v) => Ok((v as i64, &buf[1..])),
        Format::Uint8 | Format::Uint16 | Format::Uint32 | Format::Uint64 => {
            let (body, rest) = split_header(format, buf)?;
            Ok((read_uint(body, body.len())? as i64, rest))
        }
        Format::Int8 => {
            let (body, rest) = split_header(format, buf)?;
            Ok((body[0] as i8 as i64, rest))
        }
        Format::Int16 => {
            let (body, rest) = split_header(format, buf)?;
            Ok((i16::from_be_bytes([body[0], body[1]]) as i64, rest))
        }
        Format::Int32 => {
            let (body, rest) = split_header(format, buf)?;
            Ok((i32::from_be_bytes(body.try_into().unwrap()) as i64, rest))
        }
        Format::Int64 => {
            let (body, rest) = split_header(format, buf)?;
            Ok((i64::from_be_bytes(body.try_into().unwrap()), rest))
        }
        Format::Float32 => {
            let (body, rest) = split_header(format, buf)?;
            Ok((f32::from_be_bytes(body.try_into().unwrap()) as i64, rest))
        }
        Format::Float64 => {
            let (body, rest) = split_header(format, buf)?;
            Ok((f64::from_be_bytes(body.try_into().unwrap()) as i64, rest))
        }
        _ if is_ext(format) => with_ext_recursion(format, buf, opts, decode_int, "int"),
        other => Err(Error::TypeMismatch {
            expected: "int",
            found: other,
        }),
    }
}

/// Decode any MessagePack integer or float into an `f32`, lossily.
pub fn decode_float32<'a>(buf: &'a [u8], opts: &DecodeOptions<'a>) -> Result<(f32, &'a [u8])> {
    let (v, rest) = decode_float64(buf, opts)?;
    Ok((v as f32, rest))
}

/// Decode any MessagePack integer or float into an `f64`, lossily for ints
/// outside the exact range and for narrowing `f32` loses nothing.
pub fn decode_float64<'a>(buf: &'a [u8], opts: &DecodeOptions<'a>) -> Result<(f64, &'a [u8])> {
    let format = peek_format(buf).ok_or(Error::ShortInput)?;
    match format {
        Format::Float32 => {
            let (body, rest) = split_header(format, buf)?;
            Ok((f32::from_be_bytes(body.try_into().unwrap()) as f64, rest))
        }
        Format::Float64 => {
            let (body, rest) = split_header(format, buf)?;
            Ok((f64::from_be_bytes(body.try_into().unwrap()), rest))
        }
        Format::PositiveFixInt(_)
        | Format::NegativeFixInt(_)
        | Format::Uint8
        | Format::Uint16
        | Format::Uint32
        | Format::Uint64
        | Format::Int8
        | Format::Int16
        | Format::Int32
        | Format::Int64 => {
            let (v, rest) = decode_int(buf, opts)?;
            Ok((v as f64, rest))
        }
        _ if is_ext(format) => with_ext_recursion(format, buf, opts, decode_float64, "float"),
        other => Err(Error::TypeMismatch {
            expected: "float",
            found: other,
        }),
    }
}

/// Decode a UTF-8 string, following extensions 17/18/20, and resolving
/// interned strings (extension `-128`) against `opts.dict`.
pub fn decode_string<'a>(buf: &'a [u8], opts: &DecodeOptions<'a>) -> Result<(&'a str, &'a [u8])> {
    let format = peek_format(buf).ok_or(Error::ShortInput)?;
    match format {
        Format::FixStr(_) | Format::Str8 | Format::Str16 | Format::Str32 => {
            let len = str_len(format, buf)?;
            let hdr = 1 + prefix_width(format);
            if buf.len() < hdr + len {
                return Err(Error::ShortInput);
            }
            let s = core::str::from_utf8(&buf[hdr..hdr + len]).map_err(|_| Error::UnsupportedMapKey)?;
            Ok((s, &buf[hdr + len..]))
        }
        _ if is_ext(format) => {
            let (et, payload, after) = extension::read_ext(format, &buf[1..])?;
            if et == ext_type::INTERNED_STRING {
                let idx = extension::decode_bytes_to_uint(payload).ok_or(Error::CorruptFlavor("interned index"))?;
                let dict = opts.dict.ok_or(Error::MissingDict)?;
                let s = dict.get(idx as usize).ok_or(Error::DictIndexOutOfRange(idx as usize))?;
                return Ok((s, after));
            }
            match extension::resolve_recurse(et, payload, opts)? {
                Recurse::Bytes(inner) => {
                    let (s, _) = decode_string(inner, opts)?;
                    Ok((s, after))
                }
                Recurse::Void => Err(Error::Void),
            }
        }
        other => Err(Error::TypeMismatch {
            expected: "string",
            found: other,
        }),
    }
}

fn str_len(format: Format, buf: &[u8]) -> Result<usize> {
    Ok(match format {
        Format::FixStr(n) => n as usize,
        Format::Str8 => read_uint(&buf[1..], 1)? as usize,
        Format::Str16 => read_uint(&buf[1..], 2)? as usize,
        Format::Str32 => read_uint(&buf[1..], 4)? as usize,
        _ => unreachable!(),
    })
}

/// Decode raw bytes, accepting both `bin` and `str` framings (a string is
/// acceptable wherever raw bytes are requested).
pub fn decode_raw<'a>(buf: &'a [u8], opts: &DecodeOptions<'a>) -> Result<(&'a [u8], &'a [u8])> {
    let format = peek_format(buf).ok_or(Error::ShortInput)?;
    match format {
        Format::Bin8 | Format::Bin16 | Format::Bin32 => {
            let len = bin_len(format, buf)?;
            let hdr = 1 + prefix_width(format);
            if buf.len() < hdr + len {
                return Err(Error::ShortInput);
            }
            Ok((&buf[hdr..hdr + len], &buf[hdr + len..]))
        }
        Format::FixStr(_) | Format::Str8 | Format::Str16 | Format::Str32 => {
            let (s, rest) = decode_string(buf, opts)?;
            Ok((s.as_bytes(), rest))
        }
        _ if is_ext(format) => with_ext_recursion(format, buf, opts, decode_raw, "bytes"),
        other => Err(Error::TypeMismatch {
            expected: "bytes",
            found: other,
        }),
    }
}

fn bin_len(format: Format, buf: &[u8]) -> Result<usize> {
    Ok(match format {
        Format::Bin8 => read_uint(&buf[1..], 1)? as usize,
        Format::Bin16 => read_uint(&buf[1..], 2)? as usize,
        Format::Bin32 => read_uint(&buf[1..], 4)? as usize,
        _ => unreachable!(),
    })
}

/// Decode a standard MessagePack timestamp (extension `-1`), following
/// extensions 17/18/20 transparently.
pub fn decode_timestamp<'a>(buf: &'a [u8], opts: &DecodeOptions<'a>) -> Result<(Timestamp, &'a [u8])> {
    let format = peek_format(buf).ok_or(Error::ShortInput)?;
    if !is_ext(format) {
        return Err(Error::TypeMismatch {
            expected: "timestamp",
            found: format,
        });
    }
    let (et, payload, after) = extension::read_ext(format, &buf[1..])?;
    if et == ext_type::TIMESTAMP {
        return Ok((decode_timestamp_payload(payload)?, after));
    }
    match extension::resolve_recurse(et, payload, opts)? {
        Recurse::Bytes(inner) => {
            let (t, _) = decode_timestamp(inner, opts)?;
            Ok((t, after))
        }
        Recurse::Void => Err(Error::Void),
    }
}

pub(super) fn decode_timestamp_payload(data: &[u8]) -> Result<Timestamp> {
    match data.len() {
        4 => {
            let secs = u32::from_be_bytes(data.try_into().unwrap());
            Ok(Timestamp::new(secs as i64, 0))
        }
        8 => {
            let v = u64::from_be_bytes(data.try_into().unwrap());
            let nanos = (v >> 34) as u32;
            let secs = v & 0x3_ffff_ffff;
            Ok(Timestamp::new(secs as i64, nanos))
        }
        12 => {
            let nanos = u32::from_be_bytes(data[0..4].try_into().unwrap());
            let secs = i64::from_be_bytes(data[4..12].try_into().unwrap());
            Ok(Timestamp::new(secs, nanos))
        }
        _ => Err(Error::CorruptFlavor("timestamp payload length")),
    }
}

fn is_ext(format: Format) -> bool {
    matches!(
        format,
        Format::FixExt1
            | Format::FixExt2
            | Format::FixExt4
            | Format::FixExt8
            | Format::FixExt16
            | Format::Ext8
            | Format::Ext16
            | Format::Ext32
    )
}

fn with_ext_recursion<'a, T>(
    format: Format,
    buf: &'a [u8],
    opts: &DecodeOptions<'a>,
    decode: fn(&'a [u8], &DecodeOptions<'a>) -> Result<(T, &'a [u8])>,
    expected: &'static str,
) -> Result<(T, &'a [u8])> {
    let (et, payload, after) = extension::read_ext(format, &buf[1..])?;
    match extension::resolve_recurse(et, payload, opts) {
        Ok(Recurse::Bytes(inner)) => {
            let (v, _) = decode(inner, opts)?;
            Ok((v, after))
        }
        Ok(Recurse::Void) => Err(Error::Void),
        Err(Error::UnsupportedExtension(_)) => Err(Error::TypeMismatch {
            expected,
            found: format,
        }),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn opts() -> DecodeOptions<'static> {
        DecodeOptions::new()
    }

    #[rstest]
    #[case(&[0x00], 0)]
    #[case(&[0x7f], 127)]
    #[case(&[0xff], -1)]
    #[case(&[0xcc, 0x80], 128)]
    #[case(&[0xd0, 0xdf], -33)]
    #[case(&[0xd2, 0x7f, 0xff, 0xff, 0xff], 2147483647)]
    fn ints(#[case] input: &[u8], #[case] expected: i64) {
        let (v, rest) = decode_int(input, &opts()).unwrap();
        assert_eq!(v, expected);
        assert!(rest.is_empty());
    }

    #[test]
    fn bool_roundtrip() {
        assert_eq!(decode_bool(&[0xc3], &opts()).unwrap().0, true);
        assert_eq!(decode_bool(&[0xc2], &opts()).unwrap().0, false);
    }

    #[test]
    fn string_basic() {
        let (s, rest) = decode_string(&[0xa3, b'f', b'o', b'o'], &opts()).unwrap();
        assert_eq!(s, "foo");
        assert!(rest.is_empty());
    }

    #[test]
    fn string_requires_dict_for_interned() {
        let buf = [0xd4, (-128i8) as u8, 0x00];
        assert_eq!(decode_string(&buf, &opts()), Err(Error::MissingDict));
    }

    #[test]
    fn int_truncates_float() {
        let (v, _) = decode_int(&[0xcb, 0x40, 0x09, 0x1e, 0xb8, 0x51, 0xeb, 0x85, 0x1f], &opts()).unwrap();
        assert_eq!(v, 3);
    }

    #[test]
    fn timestamp_32() {
        let buf = [0xd6, (-1i8) as u8, 0x00, 0x00, 0x00, 0x01];
        let (t, rest) = decode_timestamp(&buf, &opts()).unwrap();
        assert_eq!(t, Timestamp::new(1, 0));
        assert!(rest.is_empty());
    }
}
