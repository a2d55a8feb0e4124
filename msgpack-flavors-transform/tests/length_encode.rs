//! Integration coverage for `length_encode`: every map and array gets
//! wrapped, scalars pass through untouched, and the result still decodes to
//! the same value as the unwrapped source.

use msgpack_flavors_core::cursor::Cursor;
use msgpack_flavors_core::decode::decode_any;
use msgpack_flavors_core::encode::{write_array_len, write_int, write_map_len, write_str};
use msgpack_flavors_core::options::DecodeOptions;
use msgpack_flavors_transform::length_encode;

#[test]
fn scalar_document_passes_through_unchanged() {
    let mut buf = Vec::new();
    write_int(&mut buf, 42, &Default::default());
    assert_eq!(length_encode(&buf).unwrap(), buf);
}

#[test]
fn wrapped_document_decodes_to_the_same_value() {
    let mut buf = Vec::new();
    write_map_len(&mut buf, 2);
    write_str(&mut buf, "a");
    write_int(&mut buf, 1, &Default::default());
    write_str(&mut buf, "b");
    write_array_len(&mut buf, 2);
    write_int(&mut buf, 2, &Default::default());
    write_int(&mut buf, 3, &Default::default());

    let wrapped = length_encode(&buf).unwrap();
    assert_ne!(wrapped, buf);

    let opts = DecodeOptions::new();
    let (plain_value, _) = decode_any(&buf, &opts).unwrap();
    let (wrapped_value, _) = decode_any(&wrapped, &opts).unwrap();
    assert_eq!(plain_value, wrapped_value);
}

#[test]
fn every_level_supports_o1_break_out() {
    let mut buf = Vec::new();
    write_map_len(&mut buf, 1);
    write_str(&mut buf, "outer");
    write_map_len(&mut buf, 1);
    write_str(&mut buf, "inner");
    write_array_len(&mut buf, 3);
    write_int(&mut buf, 1, &Default::default());
    write_int(&mut buf, 2, &Default::default());
    write_int(&mut buf, 3, &Default::default());

    let wrapped = length_encode(&buf).unwrap();
    let opts = DecodeOptions::new();
    let mut cursor = Cursor::new(&wrapped);
    assert_eq!(cursor.decode_map_len(&opts).unwrap(), 1);
    assert_eq!(cursor.decode_string(&opts).unwrap(), "outer");
    assert_eq!(cursor.decode_map_len(&opts).unwrap(), 1);
    assert_eq!(cursor.decode_string(&opts).unwrap(), "inner");
    cursor.break_out().unwrap();
    assert!(cursor.remaining().is_empty());
}
