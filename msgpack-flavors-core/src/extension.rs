//! The extension protocol: header framing plus dispatch for extensions
//! 17 (length prefix), 18 (flavor pick), 19 (void) and 20 (injection).

use crate::error::{Error, Result};
use crate::formats::Format;
use crate::options::DecodeOptions;
use crate::varint::read_uvarint;

/// Reserved extension type codes.
pub mod ext_type {
    /// Interned string: payload is a big-endian unsigned dictionary index.
    pub const INTERNED_STRING: i8 = -128;
    /// Standard MessagePack timestamp.
    pub const TIMESTAMP: i8 = -1;
    /// Length-prefix wrapper: transparent, payload is the wrapped value.
    pub const LENGTH_PREFIX: i8 = 17;
    /// Flavor pick: payload is a decision table, see [`decode_flavor_pick`].
    pub const FLAVOR: i8 = 18;
    /// Void sentinel.
    pub const VOID: i8 = 19;
    /// Injection: payload is a varint index into `opts.injections`.
    pub const INJECTION: i8 = 20;
}

/// Parse an extension header starting at `buf`.
///
/// Returns `(ext_type, payload, rest)` where `rest` is what follows the
/// extension's payload in `buf`.
pub fn read_ext<'a>(format: Format, buf: &'a [u8]) -> Result<(i8, &'a [u8], &'a [u8])> {
    let fixed_len = match format {
        Format::FixExt1 => Some(1),
        Format::FixExt2 => Some(2),
        Format::FixExt4 => Some(4),
        Format::FixExt8 => Some(8),
        Format::FixExt16 => Some(16),
        _ => None,
    };
    if let Some(len) = fixed_len {
        let ext_type = *buf.first().ok_or(Error::ShortInput)? as i8;
        let rest = &buf[1..];
        if rest.len() < len {
            return Err(Error::ShortInput);
        }
        return Ok((ext_type, &rest[..len], &rest[len..]));
    }
    let (len, header_len) = match format {
        Format::Ext8 => (*buf.first().ok_or(Error::ShortInput)? as usize, 1),
        Format::Ext16 => {
            if buf.len() < 2 {
                return Err(Error::ShortInput);
            }
            (u16::from_be_bytes([buf[0], buf[1]]) as usize, 2)
        }
        Format::Ext32 => {
            if buf.len() < 4 {
                return Err(Error::ShortInput);
            }
            (u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize, 4)
        }
        other => {
            return Err(Error::TypeMismatch {
                expected: "extension",
                found: other,
            });
        }
    };
    let buf = &buf[header_len..];
    let ext_type = *buf.first().ok_or(Error::ShortInput)? as i8;
    let buf = &buf[1..];
    if buf.len() < len {
        return Err(Error::ShortInput);
    }
    Ok((ext_type, &buf[..len], &buf[len..]))
}

/// Append an extension with the given type and payload, choosing the
/// shortest framing that fits (fixext 1/2/4/8/16, else ext 8/16/32).
#[cfg(feature = "alloc")]
pub fn write_ext(dst: &mut alloc::vec::Vec<u8>, ext_type: i8, payload: &[u8]) -> Result<()> {
    match payload.len() {
        1 => dst.extend_from_slice(&[Format::FixExt1.as_byte(), ext_type as u8]),
        2 => dst.extend_from_slice(&[Format::FixExt2.as_byte(), ext_type as u8]),
        4 => dst.extend_from_slice(&[Format::FixExt4.as_byte(), ext_type as u8]),
        8 => dst.extend_from_slice(&[Format::FixExt8.as_byte(), ext_type as u8]),
        16 => dst.extend_from_slice(&[Format::FixExt16.as_byte(), ext_type as u8]),
        n if n <= u8::MAX as usize => {
            dst.extend_from_slice(&[Format::Ext8.as_byte(), n as u8, ext_type as u8])
        }
        n if n <= u16::MAX as usize => {
            dst.push(Format::Ext16.as_byte());
            dst.extend_from_slice(&(n as u16).to_be_bytes());
            dst.push(ext_type as u8);
        }
        n if n as u64 <= u32::MAX as u64 => {
            dst.push(Format::Ext32.as_byte());
            dst.extend_from_slice(&(n as u32).to_be_bytes());
            dst.push(ext_type as u8);
        }
        _ => return Err(Error::EncodeTooLarge),
    }
    dst.extend_from_slice(payload);
    Ok(())
}

/// Decode a big-endian unsigned integer occupying the whole of `data`
/// (1/2/4/8 bytes), used for interned-string indices.
pub fn decode_bytes_to_uint(data: &[u8]) -> Option<u64> {
    match data.len() {
        1 => Some(data[0] as u64),
        2 => Some(u16::from_be_bytes([data[0], data[1]]) as u64),
        4 => Some(u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as u64),
        8 => Some(u64::from_be_bytes(data.try_into().ok()?)),
        _ => None,
    }
}

/// Append an unsigned integer as a big-endian run of exactly 1, 2, 4 or 8
/// bytes (whichever is shortest), the mirror of [`decode_bytes_to_uint`].
#[cfg(feature = "alloc")]
pub fn encode_uint_bytes(n: u64) -> alloc::vec::Vec<u8> {
    if n <= u8::MAX as u64 {
        alloc::vec![n as u8]
    } else if n <= u16::MAX as u64 {
        (n as u16).to_be_bytes().to_vec()
    } else if n <= u32::MAX as u64 {
        (n as u32).to_be_bytes().to_vec()
    } else {
        n.to_be_bytes().to_vec()
    }
}

/// Evaluate a flavor pick (extension 18) payload and return the byte offset
/// into `payload` at which the selected branch begins.
pub fn decode_flavor_pick(payload: &[u8], opts: &DecodeOptions<'_>) -> Result<usize> {
    let (selector, n) = read_uvarint(payload).ok_or(Error::CorruptFlavor("selector field"))?;
    let mut rest = &payload[n..];
    let (tagged, n) = read_uvarint(rest).ok_or(Error::CorruptFlavor("case count"))?;
    rest = &rest[n..];
    let has_else = tagged & 1 == 1;
    let num_cases = tagged >> 1;

    let target = *opts
        .flavor_selectors
        .and_then(|m| m.get(&selector))
        .ok_or(Error::FlavorUnselected(selector))?;

    let mut matched = None;
    for _ in 0..num_cases {
        let (case_match, n) = read_uvarint(rest).ok_or(Error::CorruptFlavor("case match"))?;
        rest = &rest[n..];
        let (jump, n) = read_uvarint(rest).ok_or(Error::CorruptFlavor("case jump"))?;
        rest = &rest[n..];
        if case_match == target && matched.is_none() {
            matched = Some(jump as usize);
        }
    }
    if let Some(j) = matched {
        return Ok(j);
    }
    if has_else {
        let (jump, _) = read_uvarint(rest).ok_or(Error::CorruptFlavor("else jump"))?;
        return Ok(jump as usize);
    }
    Err(Error::FlavorUnmatched(selector))
}

/// What a "recurse" extension (17/18/20) resolves to.
pub enum Recurse<'a> {
    /// Decode should continue at these bytes.
    Bytes(&'a [u8]),
    /// Extension 19: the value is void.
    Void,
}

/// Resolve extensions 17, 18, 19 and 20 into the bytes decoding should
/// actually continue at. Extensions `-1` and `-128` are not handled here;
/// callers that accept a timestamp or a string must special-case those
/// codes themselves before falling back to this function.
pub fn resolve_recurse<'a>(
    ext_type: i8,
    payload: &'a [u8],
    opts: &DecodeOptions<'a>,
) -> Result<Recurse<'a>> {
    match ext_type {
        ext_type::LENGTH_PREFIX => Ok(Recurse::Bytes(payload)),
        ext_type::FLAVOR => {
            let jump = decode_flavor_pick(payload, opts)?;
            let branch = payload.get(jump..).ok_or(Error::CorruptFlavor("jump offset out of range"))?;
            Ok(Recurse::Bytes(branch))
        }
        ext_type::VOID => Ok(Recurse::Void),
        ext_type::INJECTION => {
            let (index, _) = read_uvarint(payload).ok_or(Error::CorruptFlavor("injection index"))?;
            let bytes = opts
                .injections
                .and_then(|m| m.get(&index))
                .ok_or(Error::MissingInjection(index))?;
            Ok(Recurse::Bytes(bytes))
        }
        other => Err(Error::UnsupportedExtension(other)),
    }
}
