//! Build and disect extension-`18` flavor picks: a selector field plus a
//! jump table of cases, each naming a branch to take. Building a payload
//! iterates to a fixed point over the header size, since the varint width
//! of each jump offset can itself grow once earlier offsets are counted.
//! Disecting a built payload reuses
//! `msgpack-flavors-core`'s [`extension::decode_flavor_pick`], since
//! decoding must resolve flavor picks the same way a decoder would on the
//! wire.

use alloc::vec::Vec;
use msgpack_flavors_core::error::Result;
use msgpack_flavors_core::extension::{self, ext_type};
use msgpack_flavors_core::options::DecodeOptions;
use msgpack_flavors_core::varint::{uvarint_size, write_uvarint};

/// One case in a flavor pick: the selector value it matches, and the
/// already-encoded MessagePack value for that branch.
pub struct Case<'b> {
    /// The selector value this case matches.
    pub matches: u64,
    /// The branch's already-encoded MessagePack bytes.
    pub body: &'b [u8],
}

/// Build a flavor pick over `selector` and append it to `dst`.
///
/// When there is exactly one case and no `else_body`, the choice isn't
/// actually conditional: `dst` gets that one body appended unwrapped,
/// instead of paying for an extension header nothing will ever branch on.
pub fn build_flavor(
    dst: &mut Vec<u8>,
    selector: u64,
    cases: &[Case<'_>],
    else_body: Option<&[u8]>,
) -> Result<()> {
    if cases.len() == 1 && else_body.is_none() {
        dst.extend_from_slice(cases[0].body);
        return Ok(());
    }
    let payload = build_payload(selector, cases, else_body);
    extension::write_ext(dst, ext_type::FLAVOR, &payload)
}

fn build_payload(selector: u64, cases: &[Case<'_>], else_body: Option<&[u8]>) -> Vec<u8> {
    let num_cases = cases.len() as u64;
    let has_else = else_body.is_some();
    let tagged = (num_cases << 1) | (has_else as u64);

    let fixed_prefix = uvarint_size(selector)
        + uvarint_size(tagged)
        + cases.iter().map(|c| uvarint_size(c.matches)).sum::<usize>();

    let body_lens: Vec<usize> = cases.iter().map(|c| c.body.len()).collect();
    let mut cumulative = Vec::with_capacity(body_lens.len());
    let mut acc = 0usize;
    for len in &body_lens {
        cumulative.push(acc);
        acc += len;
    }
    let total_body_len = acc;

    // Jump offsets are absolute positions within the payload, so they
    // depend on the header size, which in turn depends on how many bytes
    // the jump offsets themselves take to encode. Iterate to a fixed point,
    // seeding with the smallest possible (1-byte) varint per jump.
    let mut jump_bytes_total = cases.len() + has_else as usize;
    loop {
        let header_size = fixed_prefix + jump_bytes_total;
        let mut new_total = 0usize;
        for off in &cumulative {
            new_total += uvarint_size((header_size + off) as u64);
        }
        if has_else {
            new_total += uvarint_size((header_size + total_body_len) as u64);
        }
        if new_total == jump_bytes_total {
            break;
        }
        jump_bytes_total = new_total;
    }
    let header_size = fixed_prefix + jump_bytes_total;

    let mut out = Vec::with_capacity(header_size + total_body_len);
    write_uvarint(&mut out, selector);
    write_uvarint(&mut out, tagged);
    for (case, off) in cases.iter().zip(&cumulative) {
        write_uvarint(&mut out, case.matches);
        write_uvarint(&mut out, (header_size + off) as u64);
    }
    if has_else {
        write_uvarint(&mut out, (header_size + total_body_len) as u64);
    }
    for case in cases {
        out.extend_from_slice(case.body);
    }
    if let Some(e) = else_body {
        out.extend_from_slice(e);
    }
    out
}

/// Given a flavor pick's raw extension payload, return the bytes of the
/// branch selected by `opts.flavor_selectors`.
pub fn disect_flavor<'a>(payload: &'a [u8], opts: &DecodeOptions<'a>) -> Result<&'a [u8]> {
    let jump = extension::decode_flavor_pick(payload, opts)?;
    payload
        .get(jump..)
        .ok_or(msgpack_flavors_core::error::Error::CorruptFlavor(
            "jump offset out of range",
        ))
}
