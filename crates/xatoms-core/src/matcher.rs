//! Name filtering.
//!
//! Names are compared as opaque byte strings: no case folding, no encoding
//! assumptions, embedded control bytes included.

/// Which atom names a scan keeps.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum MatchSpec {
    /// Every name matches.
    #[default]
    All,
    /// The pattern occurs anywhere in the name.
    Partial(Vec<u8>),
    /// The name equals the pattern exactly.
    Full(Vec<u8>),
}

impl MatchSpec {
    /// Builds a spec from the `--name` and `--partial` flags.
    ///
    /// A name without `--partial` means an exact match. `--partial` alone has
    /// nothing to match against and keeps every name.
    pub fn from_flags(name: Option<&str>, partial: bool) -> Self {
        match (name, partial) {
            (None, _) => Self::All,
            (Some(pattern), true) => Self::Partial(pattern.as_bytes().to_vec()),
            (Some(pattern), false) => Self::Full(pattern.as_bytes().to_vec()),
        }
    }

    /// Returns `true` if `name` passes this filter.
    pub fn matches(&self, name: &[u8]) -> bool {
        match self {
            Self::All => true,
            Self::Partial(pattern) => contains(name, pattern),
            Self::Full(pattern) => name == pattern.as_slice(),
        }
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty()
        || haystack
            .windows(needle.len())
            .any(|window| window == needle)
}
