//! Wire primitives: format peeking, value length computation, and the
//! length-prefixed/flavor-aware container-length readers used by the
//! streaming cursor.

#[cfg(feature = "alloc")]
mod any;
mod scalar;

#[cfg(feature = "alloc")]
pub use any::decode_any;
pub use scalar::{
    decode_bool, decode_float32, decode_float64, decode_int, decode_raw, decode_string,
    decode_timestamp,
};

use crate::error::{Error, Result};
use crate::formats::Format;

/// Recursion guard shared by every recursive-descent routine in this crate
/// (value length, typed decode, resolver, canonicalizer, length encoder,
/// JSON converter). Chosen generously; legitimate documents rarely nest
/// more than a few dozen levels deep.
pub const MAX_DEPTH: usize = 512;

/// Byte width of the fixed-size immediate payload that follows the format
/// byte for scalar numeric formats, or `None` for formats whose length is
/// computed some other way (strings, binaries, containers, extensions).
pub(super) fn fixed_width_payload(format: Format) -> Option<usize> {
    match format {
        Format::PositiveFixInt(_) | Format::NegativeFixInt(_) => Some(0),
        Format::Nil | Format::False | Format::True => Some(0),
        Format::Uint8 | Format::Int8 => Some(1),
        Format::Uint16 | Format::Int16 => Some(2),
        Format::Uint32 | Format::Int32 | Format::Float32 => Some(4),
        Format::Uint64 | Format::Int64 | Format::Float64 => Some(8),
        _ => None,
    }
}

/// Width, in bytes, of the length prefix that follows the format byte for
/// `str`/`bin` 8/16/32 formats (used by the scalar string/bytes decoders,
/// which parse these formats directly rather than through [`value_length`]).
pub(super) fn prefix_width(format: Format) -> usize {
    match format {
        Format::Str8 | Format::Bin8 => 1,
        Format::Str16 | Format::Bin16 => 2,
        Format::Str32 | Format::Bin32 => 4,
        _ => 0,
    }
}

fn read_uint(buf: &[u8], n: usize) -> Result<u64> {
    if buf.len() < n {
        return Err(Error::ShortInput);
    }
    let mut v: u64 = 0;
    for &b in &buf[..n] {
        v = (v << 8) | b as u64;
    }
    Ok(v)
}

/// Peek the format byte without consuming anything. Returns `None` on an empty buffer.
pub fn peek_format(buf: &[u8]) -> Option<Format> {
    buf.first().map(|b| Format::from_byte(*b))
}

/// Length prefix width (in bytes, following the format byte) plus the
/// decoded payload length, for `str`/`bin`/`ext` 8/16/32 formats.
fn length_prefixed_len(format: Format, after_format: &[u8]) -> Result<(usize, usize)> {
    let (prefix_width, len) = match format {
        Format::Str8 | Format::Bin8 => (1, read_uint(after_format, 1)? as usize),
        Format::Str16 | Format::Bin16 => (2, read_uint(after_format, 2)? as usize),
        Format::Str32 | Format::Bin32 => (4, read_uint(after_format, 4)? as usize),
        Format::Ext8 => (1, read_uint(after_format, 1)? as usize + 1),
        Format::Ext16 => (2, read_uint(after_format, 2)? as usize + 1),
        Format::Ext32 => (4, read_uint(after_format, 4)? as usize + 1),
        _ => unreachable!("length_prefixed_len called with non-prefixed format"),
    };
    Ok((prefix_width, len))
}

/// Compute the number of bytes the first value in `buf` occupies, descending
/// into nested arrays/maps as needed. Fails on a truncated buffer.
pub fn value_length(buf: &[u8]) -> Result<usize> {
    value_length_depth(buf, 0)
}

fn value_length_depth(buf: &[u8], depth: usize) -> Result<usize> {
    if depth > MAX_DEPTH {
        return Err(Error::CorruptInput);
    }
    let format = peek_format(buf).ok_or(Error::ShortInput)?;
    if let Format::NeverUsed = format {
        return Err(Error::UnexpectedByte(0xc1));
    }
    if let Some(payload) = fixed_width_payload(format) {
        let total = 1 + payload;
        if buf.len() < total {
            return Err(Error::ShortInput);
        }
        return Ok(total);
    }
    match format {
        Format::FixStr(n) => {
            let total = 1 + n as usize;
            if buf.len() < total {
                return Err(Error::ShortInput);
            }
            Ok(total)
        }
        Format::Str8 | Format::Str16 | Format::Str32 | Format::Bin8 | Format::Bin16
        | Format::Bin32 => {
            let (prefix, len) = length_prefixed_len(format, &buf[1..])?;
            let total = 1 + prefix + len;
            if buf.len() < total {
                return Err(Error::ShortInput);
            }
            Ok(total)
        }
        Format::FixExt1 => Ok(fixext_total(buf, 1)?),
        Format::FixExt2 => Ok(fixext_total(buf, 2)?),
        Format::FixExt4 => Ok(fixext_total(buf, 4)?),
        Format::FixExt8 => Ok(fixext_total(buf, 8)?),
        Format::FixExt16 => Ok(fixext_total(buf, 16)?),
        Format::Ext8 | Format::Ext16 | Format::Ext32 => {
            let (prefix, len) = length_prefixed_len(format, &buf[1..])?;
            let total = 1 + prefix + len;
            if buf.len() < total {
                return Err(Error::ShortInput);
            }
            Ok(total)
        }
        Format::FixMap(n) => container_len(buf, 1, n as usize * 2, depth),
        Format::Map16 => {
            let n = read_uint(&buf[1..], 2)? as usize;
            container_len(buf, 3, n * 2, depth)
        }
        Format::Map32 => {
            let n = read_uint(&buf[1..], 4)? as usize;
            container_len(buf, 5, n * 2, depth)
        }
        Format::FixArray(n) => container_len(buf, 1, n as usize, depth),
        Format::Array16 => {
            let n = read_uint(&buf[1..], 2)? as usize;
            container_len(buf, 3, n, depth)
        }
        Format::Array32 => {
            let n = read_uint(&buf[1..], 4)? as usize;
            container_len(buf, 5, n, depth)
        }
        Format::NeverUsed => unreachable!(),
        _ => unreachable!("fixed-width formats handled above"),
    }
}

fn fixext_total(buf: &[u8], payload: usize) -> Result<usize> {
    let total = 2 + payload;
    if buf.len() < total {
        return Err(Error::ShortInput);
    }
    Ok(total)
}

fn container_len(buf: &[u8], header: usize, elements: usize, depth: usize) -> Result<usize> {
    if buf.len() < header {
        return Err(Error::ShortInput);
    }
    let mut offset = header;
    for _ in 0..elements {
        offset += value_length_depth(&buf[offset..], depth + 1)?;
    }
    Ok(offset)
}

/// Advance past `n` successive values starting at `buf[offset..]`, returning
/// the new offset.
pub fn skip_multiple(buf: &[u8], mut offset: usize, n: usize) -> Result<usize> {
    for _ in 0..n {
        offset += value_length(&buf[offset..])?;
    }
    Ok(offset)
}

/// Render the value at the start of `buf` as a short, human-readable tag for
/// error messages, e.g. `"map 16 (7 entries)"`, `"fixstr (3 bytes)"`. Falls
/// back to the bare format name if the declared count or length can't be
/// read from a truncated buffer.
pub fn describe(buf: &[u8]) -> alloc::string::String {
    use alloc::format;
    let Some(format) = peek_format(buf) else {
        return alloc::string::String::from("<empty>");
    };
    match format {
        Format::PositiveFixInt(v) => format!("positive fixint {v}"),
        Format::NegativeFixInt(v) => format!("negative fixint {v}"),
        Format::Nil => "nil".into(),
        Format::NeverUsed => "never-used (0xc1)".into(),
        Format::False => "false".into(),
        Format::True => "true".into(),
        Format::Uint8 => "uint8".into(),
        Format::Uint16 => "uint16".into(),
        Format::Uint32 => "uint32".into(),
        Format::Uint64 => "uint64".into(),
        Format::Int8 => "int8".into(),
        Format::Int16 => "int16".into(),
        Format::Int32 => "int32".into(),
        Format::Int64 => "int64".into(),
        Format::Float32 => "float32".into(),
        Format::Float64 => "float64".into(),
        Format::FixStr(n) => format!("fixstr ({n} bytes)"),
        Format::Str8 => describe_prefixed(buf, "str8"),
        Format::Str16 => describe_prefixed(buf, "str16"),
        Format::Str32 => describe_prefixed(buf, "str32"),
        Format::Bin8 => describe_prefixed(buf, "bin8"),
        Format::Bin16 => describe_prefixed(buf, "bin16"),
        Format::Bin32 => describe_prefixed(buf, "bin32"),
        Format::Ext8 => describe_prefixed(buf, "ext8"),
        Format::Ext16 => describe_prefixed(buf, "ext16"),
        Format::Ext32 => describe_prefixed(buf, "ext32"),
        Format::FixExt1 => "fixext1".into(),
        Format::FixExt2 => "fixext2".into(),
        Format::FixExt4 => "fixext4".into(),
        Format::FixExt8 => "fixext8".into(),
        Format::FixExt16 => "fixext16".into(),
        Format::FixMap(n) => format!("fixmap ({n} entries)"),
        Format::FixArray(n) => format!("fixarray ({n} entries)"),
        Format::Map16 => describe_counted(buf, 2, "map 16", "entries"),
        Format::Map32 => describe_counted(buf, 4, "map 32", "entries"),
        Format::Array16 => describe_counted(buf, 2, "array 16", "entries"),
        Format::Array32 => describe_counted(buf, 4, "array 32", "entries"),
    }
}

fn describe_prefixed(buf: &[u8], name: &str) -> alloc::string::String {
    let format = peek_format(buf).expect("already matched by describe");
    match length_prefixed_len(format, buf.get(1..).unwrap_or(&[])) {
        Ok((_, len)) => alloc::format!("{name} ({len} bytes)"),
        Err(_) => alloc::string::String::from(name),
    }
}

fn describe_counted(buf: &[u8], width: usize, name: &str, unit: &str) -> alloc::string::String {
    match buf.get(1..).ok_or(Error::ShortInput).and_then(|rest| read_uint(rest, width)) {
        Ok(n) => alloc::format!("{name} ({n} {unit})"),
        Err(_) => alloc::string::String::from(name),
    }
}

/// Read a map length header, consuming any wrapping length-prefix (17),
/// flavor pick (18) or injection (20) extension. Returns
/// `(element_pairs, consumed, fast_skip_end, force_jump, switch)`.
/// `fast_skip_end` is the absolute offset (relative to the start of `buf`)
/// to seek to on `break_out`, or `0` if not known, and `force_jump` means
/// the cursor must seek there even after reading every element (because the
/// wrapper's visible framing is shorter than the full wrapped content, e.g.
/// a flavor pick with an unreachable tail). `switch`, when `Some`, is a
/// different buffer the elements actually live in (an injection's bytes are
/// not a subslice of `buf`); `consumed` is then an offset into `switch`
/// rather than into `buf`, and callers must read elements from there and
/// land back on `buf` at `fast_skip_end` once the container closes.
pub fn decode_map_len<'a>(
    buf: &'a [u8],
    opts: &crate::options::DecodeOptions<'a>,
) -> Result<(usize, usize, usize, bool, Option<&'a [u8]>)> {
    decode_container_len(buf, opts, true)
}

/// See [`decode_map_len`]; the array-length counterpart.
pub fn decode_array_len<'a>(
    buf: &'a [u8],
    opts: &crate::options::DecodeOptions<'a>,
) -> Result<(usize, usize, usize, bool, Option<&'a [u8]>)> {
    decode_container_len(buf, opts, false)
}

fn decode_container_len<'a>(
    buf: &'a [u8],
    opts: &crate::options::DecodeOptions<'a>,
    is_map: bool,
) -> Result<(usize, usize, usize, bool, Option<&'a [u8]>)> {
    let format = peek_format(buf).ok_or(Error::ShortInput)?;
    match format {
        Format::FixExt1
        | Format::FixExt2
        | Format::FixExt4
        | Format::FixExt8
        | Format::FixExt16
        | Format::Ext8
        | Format::Ext16
        | Format::Ext32 => {
            let (ext_type, payload, after) = crate::extension::read_ext(format, &buf[1..])?;
            let wrapper_len = buf.len() - after.len();
            match crate::extension::resolve_recurse(ext_type, payload, opts)? {
                crate::extension::Recurse::Bytes(inner) => {
                    let (n, inner_consumed, _end, _force, inner_switch) =
                        decode_container_len(inner, opts, is_map)?;
                    // An injection's bytes live in a buffer with no positional
                    // relationship to `buf`, so elements must be read from
                    // there directly rather than located via subslice
                    // arithmetic against `buf`. Length-prefix/flavor wrappers
                    // stay same-buffer unless they themselves wrap an
                    // injection, in which case the switch propagates up.
                    let switch = if ext_type == crate::extension::ext_type::INJECTION {
                        Some(inner_switch.unwrap_or(inner))
                    } else {
                        inner_switch
                    };
                    let consumed = match switch {
                        Some(_) => inner_consumed,
                        None => {
                            // Bytes between the start of the outer wrapper and the
                            // first element: the wrapper's own header plus the
                            // inner container's header (e.g. the
                            // FixArray/FixMap byte).
                            let outer_header = buf.len() - after.len() - inner.len();
                            outer_header + inner_consumed
                        }
                    };
                    // The wrapper is transparent for reading elements, but its
                    // visible framing (wrapper_len) is the only reliable place
                    // to jump to on break_out: the inner framing may end sooner
                    // (an unselected flavor branch, a shorter injection) or the
                    // inner container may not tile exactly to wrapper_len.
                    Ok((n, consumed, wrapper_len, true, switch))
                }
                crate::extension::Recurse::Void => Err(Error::Void),
            }
        }
        _ if is_map => match format {
            Format::FixMap(n) => Ok((n as usize, 1, 0, false, None)),
            Format::Map16 => Ok((read_uint(&buf[1..], 2)? as usize, 3, 0, false, None)),
            Format::Map32 => Ok((read_uint(&buf[1..], 4)? as usize, 5, 0, false, None)),
            other => Err(Error::TypeMismatch {
                expected: "map",
                found: other,
            }),
        },
        _ => match format {
            Format::FixArray(n) => Ok((n as usize, 1, 0, false, None)),
            Format::Array16 => Ok((read_uint(&buf[1..], 2)? as usize, 3, 0, false, None)),
            Format::Array32 => Ok((read_uint(&buf[1..], 4)? as usize, 5, 0, false, None)),
            other => Err(Error::TypeMismatch {
                expected: "array",
                found: other,
            }),
        },
    }
}
