//! Build the `flavor_selectors` map an encoder needs from a source document,
//! by resolving each selector field's integer value through a [`Resolver`].
//! These are the same values a decoder would otherwise need supplied
//! externally; here they're read straight out of the document being encoded.

use crate::resolver::Resolver;
use alloc::collections::BTreeMap;
use msgpack_flavors_core::error::Result;
use msgpack_flavors_core::options::DecodeOptions;

/// One selector field to pull out of the source document: its dot-separated
/// path, and the flavor-pick `selector` id it feeds.
pub struct SelectorField<'p> {
    /// Dot-separated path to the field carrying the decision value.
    pub path: &'p str,
    /// The flavor pick's selector id this field's value decides.
    pub selector: u64,
}

/// Resolve every field in `fields` out of the document at `buf` and build the
/// `flavor_selectors` map a flavor pick (extension `18`) needs at encode
/// time. Fields that are absent, void, or not an integer are left out of the
/// map; a later flavor-pick encode against a selector with no value becomes
/// `FlavorUnselected`.
pub fn select_flavor_values<'a>(
    buf: &'a [u8],
    opts: &DecodeOptions<'a>,
    fields: &[SelectorField<'_>],
) -> Result<BTreeMap<u64, u64>> {
    let mut resolver = Resolver::new();
    for (i, f) in fields.iter().enumerate() {
        resolver.add_field(f.path, i);
    }
    let mut slots = alloc::vec![None; fields.len()];
    resolver.resolve(buf, opts, &mut slots)?;

    let mut out = BTreeMap::new();
    for (field, slot) in fields.iter().zip(slots) {
        if let Some(value) = slot.and_then(|v| v.as_number().and_then(|n| n.as_unsigned_int())) {
            out.insert(field.selector, value);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use msgpack_flavors_core::encode::{write_int, write_map_len, write_str};

    #[test]
    fn pulls_selector_values() {
        let mut buf = alloc::vec::Vec::new();
        write_map_len(&mut buf, 1);
        write_str(&mut buf, "region");
        write_int(&mut buf, 2, &Default::default());

        let fields = [SelectorField { path: "region", selector: 7 }];
        let selectors = select_flavor_values(&buf, &DecodeOptions::new(), &fields).unwrap();
        assert_eq!(selectors.get(&7), Some(&2));
    }
}
