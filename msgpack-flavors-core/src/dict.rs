//! Shared string dictionary used by interned-string extensions (`-128`).

use alloc::string::String;
use alloc::vec::Vec;

/// An ordered list of strings used for interning. Identity is positional:
/// index `n` always refers to the same string for as long as the dictionary
/// lives, so dictionaries may safely grow by appending new entries at the
/// end without invalidating data encoded against an older, shorter version.
pub struct Dictionary {
    strings: Vec<String>,
    #[cfg(feature = "std")]
    json_cache: std::sync::OnceLock<Vec<String>>,
    #[cfg(not(feature = "std"))]
    json_cache: Vec<String>,
}

impl Dictionary {
    /// Build a dictionary from an ordered list of strings.
    #[cfg(feature = "std")]
    pub fn new(strings: Vec<String>) -> Self {
        Self {
            strings,
            json_cache: std::sync::OnceLock::new(),
        }
    }

    /// Build a dictionary from an ordered list of strings.
    ///
    /// Without `std` there is no portable lazy-init primitive available
    /// without `unsafe`, so the JSON-escaped cache is computed eagerly here
    /// instead of on first use.
    #[cfg(not(feature = "std"))]
    pub fn new(strings: Vec<String>) -> Self {
        let json_cache = strings
            .iter()
            .map(|s| crate::json_escape::escape_quoted(s))
            .collect();
        Self {
            strings,
            json_cache,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Whether the dictionary has no entries.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Look up the literal string at `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(String::as_str)
    }

    /// Find the index of `s`, for on-the-fly interning while encoding.
    ///
    /// This is a linear scan; callers that intern many values out of a large
    /// dictionary should build their own `str -> index` index instead of
    /// calling this repeatedly.
    pub fn index_of(&self, s: &str) -> Option<usize> {
        self.strings.iter().position(|entry| entry == s)
    }

    /// Look up the JSON-escaped form (including the surrounding quotes) of
    /// the string at `index`. Under `std`, computed lazily on first use and
    /// cached for the lifetime of the dictionary: concurrent callers racing
    /// to initialize the cache just redo the same deterministic computation,
    /// `OnceLock` keeps only the first result.
    #[cfg(feature = "std")]
    pub fn get_json_escaped(&self, index: usize) -> Option<&str> {
        let cache = self.json_cache.get_or_init(|| {
            self.strings
                .iter()
                .map(|s| crate::json_escape::escape_quoted(s))
                .collect()
        });
        cache.get(index).map(String::as_str)
    }

    /// Look up the JSON-escaped form (including the surrounding quotes) of
    /// the string at `index`.
    #[cfg(not(feature = "std"))]
    pub fn get_json_escaped(&self, index: usize) -> Option<&str> {
        self.json_cache.get(index).map(String::as_str)
    }
}

impl core::fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Dictionary")
            .field("len", &self.strings.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_and_growth() {
        let dict = Dictionary::new(alloc::vec!["hello".into(), "world".into()]);
        assert_eq!(dict.get(0), Some("hello"));
        assert_eq!(dict.get(1), Some("world"));
        assert_eq!(dict.get(2), None);

        let grown = Dictionary::new(alloc::vec!["hello".into(), "world".into(), "new".into()]);
        assert_eq!(grown.get(0), dict.get(0));
        assert_eq!(grown.get(2), Some("new"));
    }

    #[test]
    fn json_cache_escapes() {
        let dict = Dictionary::new(alloc::vec!["a\"b".into()]);
        assert_eq!(dict.get_json_escaped(0), Some("\"a\\\"b\""));
        // second call hits the cache
        assert_eq!(dict.get_json_escaped(0), Some("\"a\\\"b\""));
    }
}
