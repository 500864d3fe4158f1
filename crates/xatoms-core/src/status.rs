/// Represents the outcome of resolving a single atom name lookup.
///
/// This type models the non-fatal results of
/// [`AtomSource::resolve_name`](crate::AtomSource::resolve_name):
///
/// - [`NameLookup::Named`] carries the name the server registered for the
///   atom.
/// - [`NameLookup::Unknown`] means the server has no atom with that
///   identifier (`BadAtom`). This is routine while scanning a range and is
///   never treated as an error.
///
/// Transport failures are reported through the `Err` side of the lookup
/// instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameLookup {
    /// The atom exists and has this name.
    Named(Vec<u8>),
    /// No atom is registered under the requested identifier.
    Unknown,
}

impl From<Option<Vec<u8>>> for NameLookup {
    fn from(name: Option<Vec<u8>>) -> Self {
        name.map_or(Self::Unknown, Self::Named)
    }
}
