//! Integration coverage for string/bytes decode, including dictionary
//! interning (extension `-128`) and the string-accepted-as-bytes rule.

use msgpack_flavors_core::decode::{decode_raw, decode_string};
use msgpack_flavors_core::dict::Dictionary;
use msgpack_flavors_core::encode::write_str;
use msgpack_flavors_core::error::Error;
use msgpack_flavors_core::extension::{self, ext_type};
use msgpack_flavors_core::options::DecodeOptions;

#[test]
fn short_and_long_strings_roundtrip() {
    let mut buf = Vec::new();
    write_str(&mut buf, "hello");
    let (s, rest) = decode_string(&buf, &DecodeOptions::new()).unwrap();
    assert_eq!(s, "hello");
    assert!(rest.is_empty());

    let long = "x".repeat(300);
    let mut buf = Vec::new();
    write_str(&mut buf, &long);
    let (s, rest) = decode_string(&buf, &DecodeOptions::new()).unwrap();
    assert_eq!(s, long);
    assert!(rest.is_empty());
}

#[test]
fn interned_string_resolves_against_dict() {
    let dict = Dictionary::new(vec!["eu-west-1".into(), "us-east-1".into()]);
    let idx_bytes = extension::encode_uint_bytes(1);
    let mut buf = Vec::new();
    extension::write_ext(&mut buf, ext_type::INTERNED_STRING, &idx_bytes).unwrap();

    let opts = DecodeOptions::new().with_dict(&dict);
    let (s, rest) = decode_string(&buf, &opts).unwrap();
    assert_eq!(s, "us-east-1");
    assert!(rest.is_empty());
}

#[test]
fn interned_string_out_of_range_errors() {
    let dict = Dictionary::new(vec!["only".into()]);
    let idx_bytes = extension::encode_uint_bytes(5);
    let mut buf = Vec::new();
    extension::write_ext(&mut buf, ext_type::INTERNED_STRING, &idx_bytes).unwrap();

    let opts = DecodeOptions::new().with_dict(&dict);
    assert_eq!(
        decode_string(&buf, &opts),
        Err(Error::DictIndexOutOfRange(5))
    );
}

#[test]
fn decode_raw_accepts_both_bin_and_str() {
    let mut buf = Vec::new();
    write_str(&mut buf, "abc");
    let (bytes, _) = decode_raw(&buf, &DecodeOptions::new()).unwrap();
    assert_eq!(bytes, b"abc");

    let mut buf = Vec::new();
    msgpack_flavors_core::encode::write_bin(&mut buf, &[1, 2, 3]);
    let (bytes, _) = decode_raw(&buf, &DecodeOptions::new()).unwrap();
    assert_eq!(bytes, [1, 2, 3]);
}

#[test]
fn missing_dict_is_an_error() {
    let idx_bytes = extension::encode_uint_bytes(0);
    let mut buf = Vec::new();
    extension::write_ext(&mut buf, ext_type::INTERNED_STRING, &idx_bytes).unwrap();
    assert_eq!(
        decode_string(&buf, &DecodeOptions::new()),
        Err(Error::MissingDict)
    );
}
