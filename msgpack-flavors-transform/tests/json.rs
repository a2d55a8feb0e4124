//! Integration coverage for `to_json`: arrays, timestamps, binary data and
//! the unresolved-extension error path.

use msgpack_flavors_core::encode::{
    write_array_len, write_bin, write_bool, write_int, write_map_len, write_nil, write_str,
    write_timestamp,
};
use msgpack_flavors_core::error::Error;
use msgpack_flavors_core::options::DecodeOptions;
use msgpack_flavors_transform::to_json;

#[test]
fn array_with_hidden_nulls() {
    let mut buf = Vec::new();
    write_array_len(&mut buf, 3);
    write_int(&mut buf, 1, &Default::default());
    write_nil(&mut buf);
    write_int(&mut buf, 2, &Default::default());

    let opts = DecodeOptions::new().with_json_hide_nulls(true);
    assert_eq!(to_json(&buf, &opts).unwrap(), "[1,2]");

    let plain = to_json(&buf, &DecodeOptions::new()).unwrap();
    assert_eq!(plain, "[1,null,2]");
}

#[test]
fn nested_object_renders_in_key_order() {
    let mut buf = Vec::new();
    write_map_len(&mut buf, 2);
    write_str(&mut buf, "b");
    write_bool(&mut buf, false);
    write_str(&mut buf, "a");
    write_map_len(&mut buf, 1);
    write_str(&mut buf, "n");
    write_int(&mut buf, 3, &Default::default());

    let json = to_json(&buf, &DecodeOptions::new()).unwrap();
    assert_eq!(json, r#"{"b":false,"a":{"n":3}}"#);
}

#[test]
fn binary_renders_as_byte_array() {
    let mut buf = Vec::new();
    write_bin(&mut buf, &[1, 2, 255]);
    assert_eq!(to_json(&buf, &DecodeOptions::new()).unwrap(), "[1,2,255]");
}

#[test]
fn timestamp_renders_as_quoted_rfc3339() {
    let mut buf = Vec::new();
    write_timestamp(&mut buf, 1_700_000_000, 0);
    let json = to_json(&buf, &DecodeOptions::new()).unwrap();
    assert!(json.starts_with('"') && json.ends_with('"'));
    assert!(json.contains('T'));
    assert!(json.ends_with("Z\""));
}

#[test]
fn unresolved_extension_is_an_error() {
    let buf = [0xd4u8, 5, 0x42];
    assert_eq!(
        to_json(&buf, &DecodeOptions::new()),
        Err(Error::UnsupportedExtension(5))
    );
}
