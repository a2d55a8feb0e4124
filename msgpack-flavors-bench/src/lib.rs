//! Synthetic documents used by the benches in this crate: no serde, no
//! external data files, just MessagePack built directly with
//! `msgpack-flavors-core::encode` so the shapes benchmarked are the ones
//! the wire format actually supports (including the dictionary and
//! length-prefix extensions).

use msgpack_flavors_core::dict::Dictionary;
use msgpack_flavors_core::encode::{
    write_array_len, write_bool, write_float64, write_int, write_map_len, write_str,
};
use msgpack_flavors_core::extension::{self, ext_type};
use msgpack_flavors_core::options::EncodeOptions;

const LOREM_WORD: &str = "lorem";

fn repeated_text(words: usize) -> String {
    let mut s = String::with_capacity(words * 6);
    for i in 0..words {
        if i > 0 {
            s.push(' ');
        }
        s.push_str(LOREM_WORD);
    }
    s
}

/// A flat record of every primitive numeric format plus a bool, as an
/// `N`-element array.
pub fn primitive_array(n: usize) -> Vec<u8> {
    let mut buf = Vec::new();
    write_array_len(&mut buf, n);
    let opts = EncodeOptions::new();
    for i in 0..n {
        write_array_len(&mut buf, 3);
        write_int(&mut buf, i as i64, &opts);
        write_bool(&mut buf, i % 2 == 0);
        write_float64(&mut buf, i as f64 * 0.5);
    }
    buf
}

/// `N` copies of short/medium/long strings, as a 3-element array per entry.
pub fn string_array(n: usize) -> Vec<u8> {
    let short = repeated_text(4);
    let medium = repeated_text(400);
    let long = repeated_text(4000);
    let mut buf = Vec::new();
    write_array_len(&mut buf, n);
    for _ in 0..n {
        write_array_len(&mut buf, 3);
        write_str(&mut buf, &short);
        write_str(&mut buf, &medium);
        write_str(&mut buf, &long);
    }
    buf
}

/// A document with `n` map entries, every value a nested two-field record,
/// used to exercise the resolver and cursor break-out paths.
pub fn map_of_records(n: usize) -> Vec<u8> {
    let mut buf = Vec::new();
    write_map_len(&mut buf, n);
    for i in 0..n {
        write_str(&mut buf, &alloc_key(i));
        write_map_len(&mut buf, 2);
        write_str(&mut buf, "id");
        write_int(&mut buf, i as i64, &EncodeOptions::new());
        write_str(&mut buf, "name");
        write_str(&mut buf, &repeated_text(3));
    }
    buf
}

fn alloc_key(i: usize) -> String {
    let mut s = String::from("key");
    s.push_str(&i.to_string());
    s
}

/// A document identical in shape to [`map_of_records`], built over a
/// dictionary so every record's `name` is an interned-string reference
/// rather than an inline string.
pub fn map_of_records_interned(n: usize) -> (Vec<u8>, Dictionary) {
    let dict = Dictionary::new(vec![repeated_text(3)]);
    let mut buf = Vec::new();
    write_map_len(&mut buf, n);
    for i in 0..n {
        write_str(&mut buf, &alloc_key(i));
        write_map_len(&mut buf, 2);
        write_str(&mut buf, "id");
        write_int(&mut buf, i as i64, &EncodeOptions::new());
        write_str(&mut buf, "name");
        let idx_bytes = extension::encode_uint_bytes(0);
        extension::write_ext(&mut buf, ext_type::INTERNED_STRING, &idx_bytes).unwrap();
    }
    (buf, dict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use msgpack_flavors_core::decode::decode_any;
    use msgpack_flavors_core::options::DecodeOptions;

    #[test]
    fn generators_produce_decodable_documents() {
        let opts = DecodeOptions::new();
        assert!(decode_any(&primitive_array(8), &opts).is_ok());
        assert!(decode_any(&string_array(4), &opts).is_ok());
        assert!(decode_any(&map_of_records(16), &opts).is_ok());

        let (buf, dict) = map_of_records_interned(4);
        let opts = DecodeOptions::new().with_dict(&dict);
        assert!(decode_any(&buf, &opts).is_ok());
    }
}
