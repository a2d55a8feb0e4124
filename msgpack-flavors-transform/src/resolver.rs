//! Field-path resolver: pull a fixed set of fields out of a document without
//! materializing the parts the caller doesn't want.
//!
//! `Resolver` is a trie keyed by one path segment per level: a leaf names an
//! output slot, a `Subtree` descends into a nested map, and an
//! `ArrayResolver` leaf applies a sub-resolver to every element of an array
//! of maps. `Resolver::resolve_into`'s `remaining_sought` counter plus
//! [`msgpack_flavors_core::cursor::Cursor::break_out`] count down the fields
//! still wanted at a level and bail out of the rest of the map once they're
//! all found.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use msgpack_flavors_core::cursor::Cursor;
use msgpack_flavors_core::decode::decode_any;
use msgpack_flavors_core::encode::{write_array_len, write_map_len, write_str};
use msgpack_flavors_core::error::{Error, Result};
use msgpack_flavors_core::options::DecodeOptions;
use msgpack_flavors_core::value::ValueRef;

enum Node {
    Slot(usize),
    Subtree(Resolver),
    ArrayResolver(Box<Resolver>),
}

/// A trie of field paths to resolve out of a map-shaped document.
///
/// There is no overlap invariant: a given path may only be registered once
/// (as a slot, a subtree, or an array resolver), never more than one of
/// these at the same trie position.
#[derive(Default)]
pub struct Resolver {
    fields: BTreeMap<String, Node>,
}

impl Resolver {
    /// An empty resolver that resolves nothing (and skips the whole document).
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dot-separated field path to resolve into output slot `slot`.
    ///
    /// Intermediate segments become [`Node::Subtree`] resolvers; it is an
    /// error to register two different kinds of node at the same path.
    pub fn add_field(&mut self, path: &str, slot: usize) {
        let mut segments = path.split('.');
        let Some(first) = segments.next() else {
            return;
        };
        let rest: Vec<&str> = segments.collect();
        if rest.is_empty() {
            self.fields.insert(String::from(first), Node::Slot(slot));
            return;
        }
        let sub = self
            .fields
            .entry(String::from(first))
            .or_insert_with(|| Node::Subtree(Resolver::new()));
        if let Node::Subtree(sub) = sub {
            sub.add_field(&rest.join("."), slot);
        }
    }

    /// Register a dot-separated field path as an array of maps, applying
    /// `sub` to every element.
    pub fn add_array_resolver(&mut self, path: &str, sub: Resolver) {
        let mut segments = path.split('.');
        let Some(first) = segments.next() else {
            return;
        };
        let rest: Vec<&str> = segments.collect();
        if rest.is_empty() {
            self.fields
                .insert(String::from(first), Node::ArrayResolver(Box::new(sub)));
            return;
        }
        let node = self
            .fields
            .entry(String::from(first))
            .or_insert_with(|| Node::Subtree(Resolver::new()));
        if let Node::Subtree(inner) = node {
            inner.add_array_resolver(&rest.join("."), sub);
        }
    }

    /// Resolve this resolver's registered fields out of the map-shaped
    /// document at the start of `buf`, writing each slot's value (or leaving
    /// it `None` if absent or void) into `out`.
    pub fn resolve<'a>(
        &self,
        buf: &'a [u8],
        opts: &DecodeOptions<'a>,
        out: &mut [Option<ValueRef<'a>>],
    ) -> Result<()> {
        let mut cursor = Cursor::new(buf);
        self.resolve_into(&mut cursor, opts, out)
    }

    fn resolve_into<'a>(
        &self,
        cursor: &mut Cursor<'a>,
        opts: &DecodeOptions<'a>,
        out: &mut [Option<ValueRef<'a>>],
    ) -> Result<()> {
        let n = cursor.decode_map_len(opts)?;
        let mut remaining_sought = self.fields.len();
        for _ in 0..n {
            if remaining_sought == 0 {
                cursor.break_out()?;
                return Ok(());
            }
            let key = cursor.decode_string(opts)?;
            match self.fields.get(key) {
                Some(Node::Slot(slot)) => {
                    let slot = *slot;
                    match cursor.decode_raw_value().and_then(|bytes| decode_any(bytes, opts)) {
                        Ok((v, _)) => out[slot] = Some(v),
                        Err(Error::Void) => out[slot] = None,
                        Err(e) => return Err(e),
                    }
                    remaining_sought -= 1;
                }
                Some(Node::Subtree(sub)) => {
                    sub.resolve_into(cursor, opts, out)?;
                    remaining_sought -= 1;
                }
                Some(Node::ArrayResolver(sub)) => {
                    let elements = cursor.decode_array_len(opts)?;
                    for _ in 0..elements {
                        sub.resolve_into(cursor, opts, out)?;
                    }
                    remaining_sought -= 1;
                }
                None => cursor.skip()?,
            }
        }
        Ok(())
    }

    /// Project the document at the start of `buf` down to this resolver's
    /// registered paths, re-emitting a new, self-contained document
    /// containing only them: nested maps are reconstructed down to each
    /// kept leaf, array sub-resolvers re-emit a new array of the selected
    /// per-element projections, and every other sibling is dropped rather
    /// than copied through. A leaf whose value is void drops that pair
    /// entirely, the same as [`Resolver::resolve`]'s slot-left-empty rule.
    ///
    /// Uses the same `remaining_sought`/`break_out` discipline as
    /// [`Resolver::resolve`], so selecting a shallow prefix of a deep
    /// document is still bounded by the size of the kept subset, not the
    /// size of the input.
    pub fn select<'a>(
        &self,
        buf: &'a [u8],
        opts: &DecodeOptions<'a>,
        dst: &mut Vec<u8>,
    ) -> Result<()> {
        let mut cursor = Cursor::new(buf);
        self.select_into(&mut cursor, opts, dst)
    }

    fn select_into<'a>(
        &self,
        cursor: &mut Cursor<'a>,
        opts: &DecodeOptions<'a>,
        dst: &mut Vec<u8>,
    ) -> Result<()> {
        let n = cursor.decode_map_len(opts)?;
        let mut remaining_sought = self.fields.len();
        let mut body = Vec::new();
        let mut kept = 0usize;
        for _ in 0..n {
            if remaining_sought == 0 {
                cursor.break_out()?;
                break;
            }
            let key = cursor.decode_string(opts)?;
            match self.fields.get(key) {
                Some(Node::Slot(_)) => {
                    let bytes = cursor.decode_raw_value()?;
                    match decode_any(bytes, opts) {
                        Ok(_) => {
                            write_str(&mut body, key);
                            body.extend_from_slice(bytes);
                            kept += 1;
                        }
                        Err(Error::Void) => {}
                        Err(e) => return Err(e),
                    }
                    remaining_sought -= 1;
                }
                Some(Node::Subtree(sub)) => {
                    write_str(&mut body, key);
                    sub.select_into(cursor, opts, &mut body)?;
                    kept += 1;
                    remaining_sought -= 1;
                }
                Some(Node::ArrayResolver(sub)) => {
                    write_str(&mut body, key);
                    let elements = cursor.decode_array_len(opts)?;
                    let mut items = Vec::new();
                    for _ in 0..elements {
                        sub.select_into(cursor, opts, &mut items)?;
                    }
                    write_array_len(&mut body, elements);
                    body.extend_from_slice(&items);
                    kept += 1;
                    remaining_sought -= 1;
                }
                None => cursor.skip()?,
            }
        }
        write_map_len(dst, kept);
        dst.extend_from_slice(&body);
        Ok(())
    }
}
