//! Integration coverage for `Resolver`: array-of-maps resolution and the
//! absent/void field distinction.

use msgpack_flavors_core::encode::{
    write_array_len, write_int, write_map_len, write_nil, write_str,
};
use msgpack_flavors_core::extension::{self, ext_type};
use msgpack_flavors_core::options::DecodeOptions;
use msgpack_flavors_transform::Resolver;

#[test]
fn resolves_into_every_element_of_an_array_of_maps() {
    let mut buf = Vec::new();
    write_map_len(&mut buf, 1);
    write_str(&mut buf, "items");
    write_array_len(&mut buf, 2);
    write_map_len(&mut buf, 1);
    write_str(&mut buf, "x");
    write_int(&mut buf, 10, &Default::default());
    write_map_len(&mut buf, 1);
    write_str(&mut buf, "x");
    write_int(&mut buf, 20, &Default::default());

    let mut sub = Resolver::new();
    sub.add_field("x", 0);
    let mut resolver = Resolver::new();
    resolver.add_array_resolver("items", sub);

    let mut out = [None];
    resolver.resolve(&buf, &DecodeOptions::new(), &mut out).unwrap();
    // Each element overwrites the shared slot; the last element wins.
    assert_eq!(out[0].as_ref().unwrap().as_number().unwrap().as_unsigned_int(), Some(20));
}

#[test]
fn absent_field_stays_none() {
    let mut buf = Vec::new();
    write_map_len(&mut buf, 1);
    write_str(&mut buf, "present");
    write_int(&mut buf, 1, &Default::default());

    let mut resolver = Resolver::new();
    resolver.add_field("missing", 0);

    let mut out = [None];
    resolver.resolve(&buf, &DecodeOptions::new(), &mut out).unwrap();
    assert!(out[0].is_none());
}

#[test]
fn void_field_resolves_to_none_not_an_error() {
    let mut buf = Vec::new();
    write_map_len(&mut buf, 1);
    write_str(&mut buf, "a");
    extension::write_ext(&mut buf, ext_type::VOID, &[0]).unwrap();

    let mut resolver = Resolver::new();
    resolver.add_field("a", 0);

    let mut out = [None];
    resolver.resolve(&buf, &DecodeOptions::new(), &mut out).unwrap();
    assert!(out[0].is_none());
}

#[test]
fn nil_field_resolves_to_nil_value_not_none() {
    let mut buf = Vec::new();
    write_map_len(&mut buf, 1);
    write_str(&mut buf, "a");
    write_nil(&mut buf);

    let mut resolver = Resolver::new();
    resolver.add_field("a", 0);

    let mut out = [None];
    resolver.resolve(&buf, &DecodeOptions::new(), &mut out).unwrap();
    assert!(out[0].as_ref().unwrap().is_nil());
}
