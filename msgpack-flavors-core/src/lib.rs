#![forbid(unsafe_code)]
#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod error;
pub mod formats;
pub mod varint;
pub mod io;
// Options carries dictionary/flavor/injection maps (`BTreeMap`), so
// everything downstream of it — extension resolution, typed decoding, the
// streaming cursor — needs `alloc` too.
#[cfg(feature = "alloc")]
pub mod options;
#[cfg(feature = "alloc")]
pub mod extension;
#[cfg(feature = "alloc")]
pub mod decode;
#[cfg(feature = "alloc")]
pub mod dict;
#[cfg(feature = "alloc")]
pub mod json_escape;
#[cfg(feature = "alloc")]
pub mod value;
#[cfg(feature = "alloc")]
pub mod encode;
#[cfg(feature = "alloc")]
pub mod cursor;

pub use error::{Error, Result};
pub use formats::Format;
pub use io::SliceWriter;
#[cfg(feature = "alloc")]
pub use options::{DecodeOptions, EncodeOptions};
