//! Apply a patch document to a base document without fully decoding either:
//! an [`Edit`] tree names which map keys and array indices change, and
//! everything it doesn't name is copied through as raw bytes. Descending
//! through a container goes through
//! [`msgpack_flavors_core::decode::decode_map_len`]/`decode_array_len`, so
//! length prefixes, flavor picks and injections around a container are
//! already resolved before the edit tree has to look at it.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use msgpack_flavors_core::decode::{decode_array_len, decode_map_len, decode_string, value_length};
use msgpack_flavors_core::encode::{write_array_len, write_map_len, write_str};
use msgpack_flavors_core::error::{Error, Result};
use msgpack_flavors_core::options::DecodeOptions;

/// A change to apply to a document, or a subtree of changes.
pub enum Edit {
    /// Descend into a map, applying per-key edits. Keys absent from the
    /// source document are inserted (only [`Edit::Replace`] is valid there);
    /// keys present in the source but absent here are copied through
    /// unchanged.
    Object(BTreeMap<String, Edit>),
    /// Descend into an array, applying per-index edits. An edit at an index
    /// beyond the source array's length appends (only [`Edit::Replace`] is
    /// valid there); indices present in the source but beyond the last edit
    /// are copied through unchanged.
    Array(Vec<Edit>),
    /// Apply the same edit to every element of a map's values or an array
    /// (the source document may be either shape).
    Each(Box<Edit>),
    /// Remove this entry entirely.
    Delete,
    /// Replace this entry with the given already-encoded MessagePack bytes.
    Replace(Vec<u8>),
    /// Copy this entry through unchanged. Only meaningful inside
    /// [`Edit::Array`], to hold a position open between edited indices
    /// without naming a map key to omit it by.
    Keep,
}

/// Apply `edit` to the document at the start of `buf`, appending the merged
/// result to `dst`.
pub fn merge<'a>(
    dst: &mut Vec<u8>,
    buf: &'a [u8],
    opts: &DecodeOptions<'a>,
    edit: &Edit,
) -> Result<()> {
    match edit {
        Edit::Object(changes) => merge_object(dst, buf, opts, changes),
        Edit::Array(changes) => merge_array(dst, buf, opts, changes),
        Edit::Each(change) => merge_each(dst, buf, opts, change),
        Edit::Replace(bytes) => {
            dst.extend_from_slice(bytes);
            Ok(())
        }
        Edit::Keep => {
            dst.extend_from_slice(buf);
            Ok(())
        }
        Edit::Delete => Err(Error::ConflictingFields),
    }
}

fn merge_object<'a>(
    dst: &mut Vec<u8>,
    buf: &'a [u8],
    opts: &DecodeOptions<'a>,
    changes: &BTreeMap<String, Edit>,
) -> Result<()> {
    let (n, consumed, _end, _force, switch) = decode_map_len(buf, opts)?;
    let source = switch.unwrap_or(buf);
    let mut offset = consumed;
    let mut keys = Vec::with_capacity(n);
    let mut values = Vec::with_capacity(n);
    for _ in 0..n {
        let (key, _) = decode_string(&source[offset..], opts)?;
        offset += value_length(&source[offset..])?;
        let vlen = value_length(&source[offset..])?;
        values.push(&source[offset..offset + vlen]);
        offset += vlen;
        keys.push(key);
    }

    let mut new_size = changes.len();
    for edit in changes.values() {
        if matches!(edit, Edit::Delete) {
            new_size -= 1;
        }
    }
    for key in &keys {
        if !changes.contains_key(*key) {
            new_size += 1;
        }
    }
    write_map_len(dst, new_size);

    for (key, value) in keys.iter().zip(&values) {
        match changes.get(*key) {
            Some(Edit::Delete) => continue,
            None => {
                write_str(dst, key);
                dst.extend_from_slice(value);
            }
            Some(child) => {
                write_str(dst, key);
                merge(dst, value, opts, child)?;
            }
        }
    }
    for (key, edit) in changes {
        if keys.contains(&key.as_str()) {
            continue;
        }
        match edit {
            Edit::Delete => continue,
            Edit::Replace(bytes) => {
                write_str(dst, key);
                dst.extend_from_slice(bytes);
            }
            _ => return Err(Error::ConflictingFields),
        }
    }
    Ok(())
}

fn merge_array<'a>(
    dst: &mut Vec<u8>,
    buf: &'a [u8],
    opts: &DecodeOptions<'a>,
    changes: &[Edit],
) -> Result<()> {
    let (elements, consumed, _end, _force, switch) = decode_array_len(buf, opts)?;
    let source = switch.unwrap_or(buf);

    let mut new_size = changes.len().max(elements);
    for edit in changes {
        if matches!(edit, Edit::Delete) {
            new_size -= 1;
        }
    }
    write_array_len(dst, new_size);

    let mut offset = consumed;
    for (i, edit) in changes.iter().enumerate() {
        if i >= elements {
            match edit {
                Edit::Replace(bytes) => dst.extend_from_slice(bytes),
                Edit::Delete => {}
                _ => return Err(Error::ConflictingFields),
            }
            continue;
        }
        let vlen = value_length(&source[offset..])?;
        if !matches!(edit, Edit::Delete) {
            merge(dst, &source[offset..offset + vlen], opts, edit)?;
        }
        offset += vlen;
    }
    for _ in changes.len()..elements {
        let vlen = value_length(&source[offset..])?;
        dst.extend_from_slice(&source[offset..offset + vlen]);
        offset += vlen;
    }
    Ok(())
}

fn merge_each<'a>(
    dst: &mut Vec<u8>,
    buf: &'a [u8],
    opts: &DecodeOptions<'a>,
    change: &Edit,
) -> Result<()> {
    let (mut elements, consumed, is_map, switch) = match decode_map_len(buf, opts) {
        Ok((n, c, _, _, switch)) => (n, c, true, switch),
        Err(Error::TypeMismatch { .. }) => {
            let (n, c, _, _, switch) = decode_array_len(buf, opts)?;
            (n, c, false, switch)
        }
        Err(e) => return Err(e),
    };
    let source = switch.unwrap_or(buf);
    if matches!(change, Edit::Delete) {
        elements = 0;
    }
    if is_map {
        write_map_len(dst, elements);
    } else {
        write_array_len(dst, elements);
    }

    let mut offset = consumed;
    for _ in 0..elements {
        if is_map {
            let klen = value_length(&source[offset..])?;
            dst.extend_from_slice(&source[offset..offset + klen]);
            offset += klen;
        }
        let vlen = value_length(&source[offset..])?;
        merge(dst, &source[offset..offset + vlen], opts, change)?;
        offset += vlen;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use msgpack_flavors_core::encode::write_int;

    fn doc() -> Vec<u8> {
        // {"a": 1, "b": 2, "c": 3}
        let mut buf = Vec::new();
        write_map_len(&mut buf, 3);
        write_str(&mut buf, "a");
        write_int(&mut buf, 1, &Default::default());
        write_str(&mut buf, "b");
        write_int(&mut buf, 2, &Default::default());
        write_str(&mut buf, "c");
        write_int(&mut buf, 3, &Default::default());
        buf
    }

    #[test]
    fn object_edit_deletes_replaces_and_inserts() {
        let mut changes = BTreeMap::new();
        changes.insert(String::from("b"), Edit::Delete);
        let mut replacement = Vec::new();
        write_int(&mut replacement, 99, &Default::default());
        changes.insert(String::from("c"), Edit::Replace(replacement));
        let mut inserted = Vec::new();
        write_int(&mut inserted, 7, &Default::default());
        changes.insert(String::from("d"), Edit::Replace(inserted));

        let buf = doc();
        let mut out = Vec::new();
        merge(&mut out, &buf, &DecodeOptions::new(), &Edit::Object(changes)).unwrap();

        // {"a": 1, "c": 99, "d": 7}
        let mut expected = Vec::new();
        write_map_len(&mut expected, 3);
        write_str(&mut expected, "a");
        write_int(&mut expected, 1, &Default::default());
        write_str(&mut expected, "c");
        write_int(&mut expected, 99, &Default::default());
        write_str(&mut expected, "d");
        write_int(&mut expected, 7, &Default::default());
        assert_eq!(out, expected);
    }

    #[test]
    fn array_edit_deletes_and_appends() {
        let mut buf = Vec::new();
        write_array_len(&mut buf, 2);
        write_int(&mut buf, 1, &Default::default());
        write_int(&mut buf, 2, &Default::default());

        let mut appended = Vec::new();
        write_int(&mut appended, 3, &Default::default());
        let changes = vec![Edit::Delete, Edit::Keep, Edit::Replace(appended)];

        let mut out = Vec::new();
        merge(&mut out, &buf, &DecodeOptions::new(), &Edit::Array(changes)).unwrap();
        // index 0 deleted, index 1 kept, index 2 appended: [2, 3]
        let mut expected = Vec::new();
        write_array_len(&mut expected, 2);
        write_int(&mut expected, 2, &Default::default());
        write_int(&mut expected, 3, &Default::default());
        assert_eq!(out, expected);
    }

    #[test]
    fn each_clears_every_entry_on_delete() {
        let buf = doc();
        let mut out = Vec::new();
        merge(
            &mut out,
            &buf,
            &DecodeOptions::new(),
            &Edit::Each(Box::new(Edit::Delete)),
        )
        .unwrap();
        let mut expected = Vec::new();
        write_map_len(&mut expected, 0);
        assert_eq!(out, expected);
    }
}
