//! Integration coverage for `build_flavor`/`disect_flavor`: many cases, an
//! else branch, and feeding a built payload back through the core crate's
//! own extension-18 resolution path (as a decoder would see it on the wire).

use msgpack_flavors_core::decode::{decode_any, peek_format};
use msgpack_flavors_core::encode::{write_int, write_str};
use msgpack_flavors_core::extension;
use msgpack_flavors_core::options::DecodeOptions;
use msgpack_flavors_transform::flavor::Case;
use msgpack_flavors_transform::{build_flavor, disect_flavor};
use std::collections::BTreeMap;

fn encoded_str(s: &str) -> Vec<u8> {
    let mut buf = Vec::new();
    write_str(&mut buf, s);
    buf
}

#[test]
fn many_cases_pick_the_matching_branch() {
    let bodies: Vec<Vec<u8>> = (0..5).map(|i| encoded_str(&format!("case-{i}"))).collect();
    let cases: Vec<Case<'_>> = bodies
        .iter()
        .enumerate()
        .map(|(i, b)| Case { matches: i as u64, body: b })
        .collect();

    let mut dst = Vec::new();
    build_flavor(&mut dst, 0, &cases, None).unwrap();

    for target in 0..5u64 {
        let mut selectors = BTreeMap::new();
        selectors.insert(0u64, target);
        let opts = DecodeOptions::new().with_flavor_selectors(&selectors);

        let format = peek_format(&dst).unwrap();
        let (_, payload, _) = extension::read_ext(format, &dst[1..]).unwrap();
        let branch = disect_flavor(payload, &opts).unwrap();
        assert_eq!(branch, bodies[target as usize].as_slice());
    }
}

#[test]
fn built_payload_decodes_through_decode_any_like_a_real_document() {
    let case_a = encoded_str("matched");
    let else_body = encoded_str("fallback");
    let cases = [Case { matches: 1, body: &case_a }];

    let mut dst = Vec::new();
    build_flavor(&mut dst, 3, &cases, Some(&else_body)).unwrap();

    let mut selectors = BTreeMap::new();
    selectors.insert(3u64, 1u64);
    let opts = DecodeOptions::new().with_flavor_selectors(&selectors);
    let (v, rest) = decode_any(&dst, &opts).unwrap();
    assert!(rest.is_empty());
    assert_eq!(v.as_str(), Some("matched"));

    let mut selectors = BTreeMap::new();
    selectors.insert(3u64, 99u64); // no matching case, falls to else
    let opts = DecodeOptions::new().with_flavor_selectors(&selectors);
    let (v, _) = decode_any(&dst, &opts).unwrap();
    assert_eq!(v.as_str(), Some("fallback"));
}

#[test]
fn unmatched_without_else_is_an_error() {
    let case_a = encoded_str("only");
    let cases = [
        Case { matches: 1, body: &case_a },
        Case { matches: 2, body: &case_a },
    ];
    let mut dst = Vec::new();
    build_flavor(&mut dst, 0, &cases, None).unwrap();

    let mut selectors = BTreeMap::new();
    selectors.insert(0u64, 7u64);
    let opts = DecodeOptions::new().with_flavor_selectors(&selectors);
    assert_eq!(
        decode_any(&dst, &opts),
        Err(msgpack_flavors_core::error::Error::FlavorUnmatched(0))
    );
}
