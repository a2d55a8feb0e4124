//! Wrap every map and array in the document with an extension-`17`
//! length-prefix, so a decoder can `break_out` of any of them in O(1)
//! without having walked their elements. The recursive descent determines
//! each container's wrapped size bottom-up, and the `write_ext` call once a
//! container's body is fully built prepends the wrapper. Plain scalars and
//! values already wrapped in an extension are copied through unchanged.

use alloc::vec::Vec;
use msgpack_flavors_core::decode::{peek_format, value_length};
use msgpack_flavors_core::error::{Error, Result};
use msgpack_flavors_core::extension::{self, ext_type};
use msgpack_flavors_core::formats::Format;
use msgpack_flavors_core::io::BufferPool;

/// Length-prefix every map and array in the document at the start of `buf`,
/// returning the rewritten bytes. Trailing bytes beyond the first value are
/// ignored.
pub fn length_encode(buf: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut pool = BufferPool::new();
    wrap_value(buf, &mut out, &mut pool)?;
    Ok(out)
}

fn wrap_value(buf: &[u8], out: &mut Vec<u8>, pool: &mut BufferPool) -> Result<()> {
    let format = peek_format(buf).ok_or(Error::ShortInput)?;
    match format {
        Format::FixMap(_) | Format::Map16 | Format::Map32 => {
            let body = wrap_container(buf, true, pool)?;
            let result = extension::write_ext(out, ext_type::LENGTH_PREFIX, &body);
            pool.recycle(body);
            result
        }
        Format::FixArray(_) | Format::Array16 | Format::Array32 => {
            let body = wrap_container(buf, false, pool)?;
            let result = extension::write_ext(out, ext_type::LENGTH_PREFIX, &body);
            pool.recycle(body);
            result
        }
        _ => {
            let len = value_length(buf)?;
            out.extend_from_slice(&buf[..len]);
            Ok(())
        }
    }
}

fn wrap_container(buf: &[u8], is_map: bool, pool: &mut BufferPool) -> Result<Vec<u8>> {
    let (header_len, elements) = match peek_format(buf).ok_or(Error::ShortInput)? {
        Format::FixMap(n) => (1, n as usize * 2),
        Format::Map16 => (3, read_u16(buf)? as usize * 2),
        Format::Map32 => (5, read_u32(buf)? as usize * 2),
        Format::FixArray(n) => (1, n as usize),
        Format::Array16 => (3, read_u16(buf)? as usize),
        Format::Array32 => (5, read_u32(buf)? as usize),
        other => {
            return Err(Error::TypeMismatch {
                expected: if is_map { "map" } else { "array" },
                found: other,
            })
        }
    };
    if buf.len() < header_len {
        return Err(Error::ShortInput);
    }
    let mut body = pool.take();
    body.extend_from_slice(&buf[..header_len]);
    let mut offset = header_len;
    for _ in 0..elements {
        wrap_value(&buf[offset..], &mut body, pool)?;
        offset += value_length(&buf[offset..])?;
    }
    Ok(body)
}

fn read_u16(buf: &[u8]) -> Result<u16> {
    if buf.len() < 3 {
        return Err(Error::ShortInput);
    }
    Ok(u16::from_be_bytes([buf[1], buf[2]]))
}

fn read_u32(buf: &[u8]) -> Result<u32> {
    if buf.len() < 5 {
        return Err(Error::ShortInput);
    }
    Ok(u32::from_be_bytes([buf[1], buf[2], buf[3], buf[4]]))
}
