//! Configuration threaded through every decode/encode call.

use crate::dict::Dictionary;
use alloc::collections::BTreeMap;

/// Options consulted by every typed decoder and by the streaming [`crate::cursor::Cursor`].
///
/// All fields are optional; a default `DecodeOptions` decodes everything
/// that doesn't rely on dictionary, flavor, or injection extensions.
#[derive(Default, Clone, Copy)]
pub struct DecodeOptions<'o> {
    /// Dictionary used to resolve interned strings (extension `-128`).
    pub dict: Option<&'o Dictionary>,
    /// Decision values for flavor picks (extension `18`), keyed by selector field.
    pub flavor_selectors: Option<&'o BTreeMap<u64, u64>>,
    /// Replacement byte runs for injections (extension `20`), keyed by index.
    pub injections: Option<&'o BTreeMap<u64, &'o [u8]>>,
    /// When converting to JSON, treat an explicit `nil` like `void` for elision purposes.
    pub json_hide_nulls: bool,
}

impl<'o> DecodeOptions<'o> {
    /// Options that decode everything except dictionary/flavor/injection extensions.
    pub const fn new() -> Self {
        Self {
            dict: None,
            flavor_selectors: None,
            injections: None,
            json_hide_nulls: false,
        }
    }

    /// Attach a dictionary for interned-string resolution.
    pub fn with_dict(mut self, dict: &'o Dictionary) -> Self {
        self.dict = Some(dict);
        self
    }

    /// Attach flavor selector values.
    pub fn with_flavor_selectors(mut self, selectors: &'o BTreeMap<u64, u64>) -> Self {
        self.flavor_selectors = Some(selectors);
        self
    }

    /// Attach injection replacement bytes.
    pub fn with_injections(mut self, injections: &'o BTreeMap<u64, &'o [u8]>) -> Self {
        self.injections = Some(injections);
        self
    }

    /// Toggle `json_hide_nulls`.
    pub fn with_json_hide_nulls(mut self, hide: bool) -> Self {
        self.json_hide_nulls = hide;
        self
    }
}

/// Options consulted while encoding raw MessagePack framing (used by the
/// canonicalizer, length encoder, and flavor builder in `msgpack-flavors-transform`).
#[derive(Default, Clone, Copy)]
pub struct EncodeOptions {
    /// Re-encode integers using the shortest sufficient framing.
    pub compact_ints: bool,
}

impl EncodeOptions {
    /// Options that always use the canonical, full-width framing.
    pub const fn new() -> Self {
        Self {
            compact_ints: false,
        }
    }

    /// Enable shortest-framing integer encoding.
    pub fn with_compact_ints(mut self, compact: bool) -> Self {
        self.compact_ints = compact;
        self
    }
}
