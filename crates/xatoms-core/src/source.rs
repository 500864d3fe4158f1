use crate::{atom::AtomId, error::Result, status::NameLookup};

/// A minimal interface to a server that can resolve atom names.
///
/// Lookups are split in two so that many requests can be in flight on one
/// connection: [`AtomSource::request_name`] queues a request and returns a
/// handle immediately, [`AtomSource::resolve_name`] blocks until the reply for
/// that handle has arrived.
///
/// Handles borrow the source and are consumed exactly once. Dropping a handle
/// without resolving it must be allowed; the source discards the reply.
pub trait AtomSource {
    /// Handle for a request that has been issued but not yet resolved.
    type Pending<'a>
    where
        Self: 'a;

    /// Issues a name lookup for `atom` without waiting for the reply.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`](crate::Error::Protocol) if the request
    /// cannot be sent.
    fn request_name(&self, atom: AtomId) -> Result<Self::Pending<'_>>;

    /// Waits for the reply to `pending`, which was issued for `atom`.
    ///
    /// An atom the server does not know is [`NameLookup::Unknown`], not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`](crate::Error::Protocol) if the connection
    /// fails or the reply is malformed.
    fn resolve_name(&self, atom: AtomId, pending: Self::Pending<'_>) -> Result<NameLookup>;
}
