//! The closed set of decode/encode failures this crate can produce.

use crate::formats::Format;

/// Everything that can go wrong while decoding or encoding a flavored
/// MessagePack document.
///
/// Each variant carries the offending byte or value rather than a bare
/// string, so `Display` can render something actionable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The buffer ended before a framing's declared length was satisfied.
    ShortInput,
    /// A header byte was encountered that is never valid (`0xc1`).
    UnexpectedByte(u8),
    /// The value's format doesn't match what the caller asked to decode.
    TypeMismatch {
        /// Name of the type the caller requested.
        expected: &'static str,
        /// Format that was actually found.
        found: Format,
    },
    /// A map key decoded to something other than a string.
    UnsupportedMapKey,
    /// An extension type this decoder cannot resolve in this context.
    UnsupportedExtension(i8),
    /// A flavor (extension 18) payload was structurally invalid.
    CorruptFlavor(&'static str),
    /// A flavor pick was encountered but no selector was configured for its field.
    FlavorUnselected(u64),
    /// A flavor pick's selector value matched no case and there was no `else`.
    FlavorUnmatched(u64),
    /// An injection (extension 20) index has no configured replacement.
    MissingInjection(u64),
    /// An interned string was encountered but no dictionary was configured.
    MissingDict,
    /// An interned string index is out of range for the configured dictionary.
    DictIndexOutOfRange(usize),
    /// Encoded length would exceed the wire format's 32-bit length ceiling.
    EncodeTooLarge,
    /// A resolver or selector was built with overlapping field paths.
    ConflictingFields,
    /// Extension 19: "no value here". Recovered by array/map/JSON callers.
    Void,
    /// Catch-all for internal invariants that should be unreachable; used by
    /// the panic-safety wrapper at top-level decode/resolve entry points.
    CorruptInput,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::ShortInput => write!(f, "input ended before the value was fully framed"),
            Error::UnexpectedByte(b) => write!(f, "unexpected header byte 0x{b:02x}"),
            Error::TypeMismatch { expected, found } => {
                write!(f, "expected {expected}, found {found:?}")
            }
            Error::UnsupportedMapKey => write!(f, "map keys must decode to a string"),
            Error::UnsupportedExtension(t) => write!(f, "unsupported extension type {t}"),
            Error::CorruptFlavor(why) => write!(f, "corrupt flavor payload: {why}"),
            Error::FlavorUnselected(field) => {
                write!(f, "flavor field {field} has no configured selector")
            }
            Error::FlavorUnmatched(field) => {
                write!(f, "flavor field {field}'s selector matched no case")
            }
            Error::MissingInjection(idx) => write!(f, "injection index {idx} has no replacement"),
            Error::MissingDict => write!(f, "interned string encountered but no dict configured"),
            Error::DictIndexOutOfRange(n) => write!(f, "dict index {n} out of range"),
            Error::EncodeTooLarge => write!(f, "encoded length exceeds the wire format's ceiling"),
            Error::ConflictingFields => write!(f, "conflicting or overlapping field paths"),
            Error::Void => write!(f, "value is void"),
            Error::CorruptInput => write!(f, "corrupt input"),
        }
    }
}

impl core::error::Error for Error {}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
