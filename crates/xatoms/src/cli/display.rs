//! Connection to the X server.
//!
//! [`DisplayConnection`] owns the only connection of a run. Lookups are plain
//! `GetAtomName` requests: `x11rb` queues them without blocking and hands back
//! a [`Cookie`], and the reply is read when the cookie is resolved. Cookies
//! dropped unresolved have their replies discarded by `x11rb`.

use x11rb::{
    connection::Connection,
    cookie::Cookie,
    errors::ReplyError,
    protocol::{
        ErrorKind,
        xproto::{ConnectionExt, GetAtomNameReply},
    },
    rust_connection::RustConnection,
};
use xatoms_core::{AtomId, AtomSource, Error, NameLookup, Result};

/// An open connection to an X display.
pub struct DisplayConnection {
    conn: RustConnection,
}

impl DisplayConnection {
    /// Connects to `display`, or to `$DISPLAY` when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connect`] if the server cannot be reached or rejects
    /// the connection. There is no retry.
    pub fn open(display: Option<&str>) -> Result<Self> {
        let (conn, screen) = x11rb::connect(display).map_err(|e| Error::Connect {
            context: e.to_string(),
        })?;

        let setup = conn.setup();
        let display_name = display.unwrap_or("$DISPLAY");
        tracing::debug!(
            display = display_name,
            screen,
            vendor = %String::from_utf8_lossy(&setup.vendor),
            release = setup.release_number,
            "Connected to display"
        );

        Ok(Self { conn })
    }

    /// Closes the connection.
    pub fn close(self) {
        tracing::debug!("Closing display connection");
        drop(self.conn);
    }
}

impl AtomSource for DisplayConnection {
    type Pending<'a> = Cookie<'a, RustConnection, GetAtomNameReply>;

    fn request_name(&self, atom: AtomId) -> Result<Self::Pending<'_>> {
        self.conn.get_atom_name(atom).map_err(|e| Error::Protocol {
            atom,
            context: format!("failed to send GetAtomName: {e}"),
        })
    }

    fn resolve_name(&self, atom: AtomId, pending: Self::Pending<'_>) -> Result<NameLookup> {
        lookup_from_reply(atom, pending.reply())
    }
}

/// Maps a `GetAtomName` reply onto a lookup outcome.
///
/// `BadAtom` means the server has no atom with this id and is not an error.
/// Every other X11 error and any connection failure is fatal.
fn lookup_from_reply(
    atom: AtomId,
    reply: core::result::Result<GetAtomNameReply, ReplyError>,
) -> Result<NameLookup> {
    match reply {
        Ok(reply) => Ok(NameLookup::Named(reply.name)),
        Err(ReplyError::X11Error(e)) if e.error_kind == ErrorKind::Atom => {
            tracing::trace!(atom, "No such atom");
            Ok(NameLookup::Unknown)
        }
        Err(e) => Err(Error::Protocol {
            atom,
            context: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use x11rb::{errors::ConnectionError, x11_utils::X11Error};

    const GET_ATOM_NAME_OPCODE: u8 = 17;

    fn x11_error(atom: AtomId, error_kind: ErrorKind, error_code: u8) -> ReplyError {
        ReplyError::X11Error(X11Error {
            error_kind,
            error_code,
            sequence: 1,
            bad_value: atom,
            minor_opcode: 0,
            major_opcode: GET_ATOM_NAME_OPCODE,
            extension_name: None,
            request_name: Some("GetAtomName"),
        })
    }

    #[test]
    fn reply_yields_name() {
        let reply = GetAtomNameReply {
            sequence: 1,
            length: 2,
            name: b"WM_NAME".to_vec(),
        };
        let lookup = lookup_from_reply(39, Ok(reply)).unwrap();
        assert_eq!(lookup, NameLookup::Named(b"WM_NAME".to_vec()));
    }

    #[test]
    fn bad_atom_is_unknown() {
        let lookup = lookup_from_reply(7000, Err(x11_error(7000, ErrorKind::Atom, 5))).unwrap();
        assert_eq!(lookup, NameLookup::Unknown);
    }

    #[test]
    fn other_x11_errors_are_fatal() {
        let err = lookup_from_reply(12, Err(x11_error(12, ErrorKind::Value, 2))).unwrap_err();
        assert!(
            matches!(err, Error::Protocol { atom: 12, .. }),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn connection_failure_is_fatal() {
        let reply = Err(ReplyError::ConnectionError(ConnectionError::UnknownError));
        let err = lookup_from_reply(3, reply).unwrap_err();
        assert!(
            matches!(err, Error::Protocol { atom: 3, .. }),
            "unexpected error: {err:?}"
        );
    }
}
