//! Convert a decoded document to JSON text.
//!
//! Nulls are dropped from arrays and maps when `json_hide_nulls` is set,
//! timestamps render as RFC3339 (with a `.NNNNNNNNN` fraction only when
//! nonzero), and an opaque extension this crate doesn't resolve is a hard
//! error rather than silently dropped. This converts by first fully
//! materializing the value with [`msgpack_flavors_core::decode::decode_any`]
//! (the same simplification [`crate::canonicalize`] makes) — simpler at the
//! cost of peak memory, and it lets "drop this entry if its value is null"
//! be a plain lookahead instead of a buffer-and-maybe-discard state machine.
//!
//! `Bin` values have no JSON counterpart, so they are rendered as an array
//! of byte values, a common fallback for msgpack-to-JSON converters.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write as _;
use msgpack_flavors_core::decode::decode_any;
use msgpack_flavors_core::error::{Error, Result};
use msgpack_flavors_core::json_escape::escape_into;
use msgpack_flavors_core::options::DecodeOptions;
use msgpack_flavors_core::value::{Number, Timestamp, ValueRef};

/// Convert the document at the start of `buf` to a JSON string.
///
/// `opts.json_hide_nulls` drops any array element or map entry whose value
/// is `nil`, rather than rendering it as `null`.
pub fn to_json<'a>(buf: &'a [u8], opts: &DecodeOptions<'a>) -> Result<String> {
    let (value, _) = decode_any(buf, opts)?;
    let mut out = String::new();
    write_json(&mut out, &value, opts.json_hide_nulls)?;
    Ok(out)
}

fn write_json(out: &mut String, value: &ValueRef<'_>, hide_nulls: bool) -> Result<()> {
    match value {
        ValueRef::Nil => out.push_str("null"),
        ValueRef::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        ValueRef::Number(Number::Float(f)) => {
            let _ = write!(out, "{f}");
        }
        ValueRef::Number(n) => {
            if let Some(v) = n.as_unsigned_int() {
                let _ = write!(out, "{v}");
            } else if let Some(v) = n.as_signed_int() {
                let _ = write!(out, "{v}");
            }
        }
        ValueRef::String(s) => {
            out.push('"');
            escape_into(s, out);
            out.push('"');
        }
        ValueRef::Bin(bytes) => write_bin_array(out, bytes),
        ValueRef::Timestamp(t) => {
            out.push('"');
            write_rfc3339(out, *t);
            out.push('"');
        }
        ValueRef::Array(items) => {
            out.push('[');
            let mut first = true;
            for item in items {
                if hide_nulls && item.is_nil() {
                    continue;
                }
                if !first {
                    out.push(',');
                }
                first = false;
                write_json(out, item, hide_nulls)?;
            }
            out.push(']');
        }
        ValueRef::Map(pairs) => {
            out.push('{');
            let mut first = true;
            for (key, v) in pairs {
                if hide_nulls && v.is_nil() {
                    continue;
                }
                if !first {
                    out.push(',');
                }
                first = false;
                out.push('"');
                escape_into(key, out);
                out.push('"');
                out.push(':');
                write_json(out, v, hide_nulls)?;
            }
            out.push('}');
        }
        ValueRef::Extension(e) => return Err(Error::UnsupportedExtension(e.r#type)),
    }
    Ok(())
}

fn write_bin_array(out: &mut String, bytes: &[u8]) {
    out.push('[');
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{b}");
    }
    out.push(']');
}

fn write_rfc3339(out: &mut String, t: Timestamp) {
    let days = t.seconds.div_euclid(86_400);
    let secs_of_day = t.seconds.rem_euclid(86_400);
    let (year, month, day) = civil_from_days(days);
    let hour = secs_of_day / 3600;
    let minute = (secs_of_day % 3600) / 60;
    let second = secs_of_day % 60;
    let _ = write!(
        out,
        "{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}"
    );
    if t.nanos != 0 {
        let mut frac = Vec::with_capacity(9);
        let mut n = t.nanos;
        for _ in 0..9 {
            frac.push(b'0' + (n % 10) as u8);
            n /= 10;
        }
        frac.reverse();
        while frac.last() == Some(&b'0') {
            frac.pop();
        }
        out.push('.');
        for b in frac {
            out.push(b as char);
        }
    }
    out.push('Z');
}

/// Proleptic Gregorian civil date from a day count relative to the Unix
/// epoch (1970-01-01 = day 0). Howard Hinnant's `civil_from_days`.
fn civil_from_days(z: i64) -> (i64, u32, u32) {
    let z = z + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = (z - era * 146_097) as u64;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let m = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    (if m <= 2 { y + 1 } else { y }, m, d)
}
