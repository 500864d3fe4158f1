//! # Atom identifiers and scan ranges
//!
//! Atoms are server-assigned 32-bit identifiers naming interned strings. The
//! X11 core protocol predefines atoms `1..=68`; everything above is assigned
//! on demand by clients, so a live server's table is dense at the bottom and
//! sparse towards the top.
//!
//! An [`AtomRange`] is the closed interval of identifiers a scan visits. It is
//! split into fixed-size [`Batches`] so that only a bounded number of lookups
//! is ever outstanding on the connection.

use crate::error::{Error, Result};
use core::{fmt, num::NonZeroUsize, str::FromStr};

/// A server-assigned atom identifier (`ATOM` in the X11 protocol).
pub type AtomId = u32;

/// The reserved atom `None`. It never names anything.
pub const ATOM_NONE: AtomId = 0;

/// Lowest identifier scanned when no range is given, the first after
/// [`ATOM_NONE`].
pub const DEFAULT_LOW: AtomId = ATOM_NONE + 1;

/// Highest identifier scanned when no upper bound is given.
///
/// Servers hand out atoms sequentially, so this covers every table seen in
/// practice while keeping a full scan short.
pub const DEFAULT_CEILING: AtomId = 65_535;

/// Default number of lookups kept in flight per batch.
pub const DEFAULT_BATCH_SIZE: NonZeroUsize = NonZeroUsize::new(100).unwrap();

/// A closed interval `[low, high]` of atom identifiers.
///
/// `low <= high` always holds, so every range visits at least one atom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AtomRange {
    low: AtomId,
    high: AtomId,
}

#[allow(clippy::len_without_is_empty)]
impl AtomRange {
    /// Creates a range from two bounds.
    ///
    /// Inverted bounds are normalized by raising `high` to `low`, so
    /// `new(400, 300)` visits exactly atom `400`.
    pub const fn new(low: AtomId, high: AtomId) -> Self {
        let high = if high < low { low } else { high };
        Self { low, high }
    }

    pub const fn low(&self) -> AtomId {
        self.low
    }

    pub const fn high(&self) -> AtomId {
        self.high
    }

    /// Number of atoms in the range. Never zero.
    pub const fn len(&self) -> u64 {
        (self.high - self.low) as u64 + 1
    }

    pub const fn contains(&self, atom: AtomId) -> bool {
        self.low <= atom && atom <= self.high
    }

    /// Iterates every atom of the range in ascending order.
    pub fn iter(&self) -> core::ops::RangeInclusive<AtomId> {
        self.low..=self.high
    }

    /// Splits the range into contiguous, ascending sub-ranges of at most
    /// `size` atoms each.
    pub fn batches(&self, size: NonZeroUsize) -> Batches {
        // Anything wider than the id space is a single batch anyway.
        let span = AtomId::try_from(size.get() - 1).unwrap_or(AtomId::MAX);
        Batches {
            next: Some(self.low),
            high: self.high,
            span,
        }
    }
}

impl Default for AtomRange {
    fn default() -> Self {
        Self::new(DEFAULT_LOW, DEFAULT_CEILING)
    }
}

impl fmt::Display for AtomRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

/// Parses the `low-high` range syntax.
///
/// | input     | range             |
/// |-----------|-------------------|
/// | `-20`     | `[0, 20]`         |
/// | `300-`    | `[300, ceiling]`  |
/// | `300`     | `[300, ceiling]`  |
/// | `300-400` | `[300, 400]`      |
/// | `400-300` | `[400, 400]`      |
///
/// The ceiling is [`DEFAULT_CEILING`].
impl FromStr for AtomRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let input = s.trim();
        if input.is_empty() {
            return Err(invalid_range(s, "range is empty"));
        }

        let (low, high) = match input.split_once('-') {
            Some((low, high)) => (low, high),
            None => (input, ""),
        };

        let low = if low.is_empty() {
            0
        } else {
            parse_bound(s, low)?
        };
        let high = if high.is_empty() {
            DEFAULT_CEILING
        } else {
            parse_bound(s, high)?
        };

        Ok(Self::new(low, high))
    }
}

fn parse_bound(input: &str, bound: &str) -> Result<AtomId> {
    bound
        .trim()
        .parse::<AtomId>()
        .map_err(|e| invalid_range(input, &format!("bad bound `{bound}`: {e}")))
}

fn invalid_range(input: &str, reason: &str) -> Error {
    Error::InvalidRange {
        input: input.to_owned(),
        reason: reason.to_owned(),
    }
}

/// Iterator over the batches of an [`AtomRange`], see [`AtomRange::batches`].
#[derive(Clone, Debug)]
pub struct Batches {
    next: Option<AtomId>,
    high: AtomId,
    span: AtomId,
}

impl Iterator for Batches {
    type Item = AtomRange;

    fn next(&mut self) -> Option<AtomRange> {
        let low = self.next?;
        let high = low.saturating_add(self.span).min(self.high);
        // `None` once `high` reaches the end of the range or of the id space.
        self.next = if high < self.high {
            high.checked_add(1)
        } else {
            None
        };
        Some(AtomRange::new(low, high))
    }
}

impl core::iter::FusedIterator for Batches {}
