#![forbid(unsafe_code)]
#![cfg_attr(all(not(test), not(feature = "std")), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[doc = include_str!("../README.md")]
pub mod resolver;
pub mod selector;
pub mod canonicalize;
pub mod length_encode;
pub mod flavor;
pub mod json;
pub mod merge;

pub use canonicalize::canonicalize;
pub use flavor::{build_flavor, disect_flavor};
pub use json::to_json;
pub use length_encode::length_encode;
pub use merge::merge;
pub use resolver::Resolver;
pub use selector::select_flavor_values;
