//! # Batched atom scan
//!
//! [`scan`] walks an [`AtomRange`] one batch at a time. Each batch runs two
//! phases against an [`AtomSource`]:
//!
//! 1. **Issue**: one lookup per atom, in ascending order, without waiting for
//!    any reply.
//! 2. **Resolve**: the handles are drained in issue order, so records come out
//!    in ascending atom order even if the server answers faster for some.
//!
//! Resolved names go through the [`MatchSpec`] filter and are rendered with
//! the [`Template`]. Output is flushed after every batch.
//!
//! Only one batch of handles is alive at any time. A fatal error drops the
//! unresolved handles of the current batch and no further batch is issued.
//! Records already written stay written.

use crate::{
    atom::{ATOM_NONE, AtomId, AtomRange, DEFAULT_BATCH_SIZE},
    error::{Error, Result},
    matcher::MatchSpec,
    source::AtomSource,
    status::NameLookup,
    template::Template,
};
use core::num::NonZeroUsize;
use std::io::Write;


/// Largest atom name accepted before the scan aborts with
/// [`Error::NameOverflow`].
pub const DEFAULT_MAX_NAME_LEN: usize = 1024;

/// Immutable settings for one scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanConfig {
    /// Atoms to visit.
    pub range: AtomRange,
    /// Names to keep.
    pub matcher: MatchSpec,
    /// Output format for kept names.
    pub template: Template,
    /// Lookups in flight per batch.
    pub batch_size: NonZeroUsize,
    /// Names longer than this abort the scan instead of being truncated.
    pub max_name_len: usize,
    /// Names shorter than this are skipped. `0` keeps every name.
    pub min_name_len: usize,
    /// End the scan at the first atom that has no name. [`ATOM_NONE`] never
    /// has one and does not count as a gap.
    pub stop_at_unknown: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            range: AtomRange::default(),
            matcher: MatchSpec::All,
            template: Template::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            max_name_len: DEFAULT_MAX_NAME_LEN,
            min_name_len: 0,
            stop_at_unknown: false,
        }
    }
}

/// Counters collected while scanning.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Batches started.
    pub batches: u64,
    /// Lookups issued.
    pub requested: u64,
    /// Lookups that returned a name.
    pub named: u64,
    /// Lookups for atoms the server does not know.
    pub unknown: u64,
    /// Names skipped for being shorter than `min_name_len`.
    pub degenerate: u64,
    /// Records written.
    pub matched: u64,
    /// Set when `stop_at_unknown` ended the scan at this atom.
    pub stopped_at: Option<AtomId>,
}

enum Flow {
    Continue,
    Stop,
}

/// Resolves every atom in `config.range` through `source` and writes one
/// rendered record per kept name to `out`.
///
/// # Errors
///
/// - [`Error::Protocol`] if a lookup cannot be issued or resolved.
/// - [`Error::NameOverflow`] if a name exceeds `config.max_name_len`.
/// - [`Error::Output`] if writing to `out` fails.
///
/// Atoms without a name and names rejected by the filter are not errors.
pub fn scan<'s, S, W>(source: &'s S, config: &ScanConfig, out: &mut W) -> Result<ScanReport>
where
    S: AtomSource,
    W: Write + ?Sized,
{
    #[cfg(feature = "tracing")]
    tracing::debug!(
        range = %config.range,
        batch_size = config.batch_size.get(),
        "Starting atom scan"
    );

    let mut report = ScanReport::default();
    // Reused for every batch; never holds more than one batch of handles.
    let mut inflight: Vec<(AtomId, S::Pending<'s>)> = Vec::with_capacity(config.batch_size.get());

    for batch in config.range.batches(config.batch_size) {
        report.batches += 1;

        let flow = run_batch(source, config, batch, &mut inflight, out, &mut report);
        // Push out what was rendered before surfacing any failure.
        let flushed = out.flush();
        inflight.clear();

        if let Err(_e) = &flow {
            #[cfg(feature = "tracing")]
            tracing::debug!(batch = %batch, "Batch aborted: {_e}");
        }

        let flow = flow?;
        flushed?;
        if let Flow::Stop = flow {
            break;
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(?report, "Atom scan finished");

    Ok(report)
}

fn run_batch<'s, S, W>(
    source: &'s S,
    config: &ScanConfig,
    batch: AtomRange,
    inflight: &mut Vec<(AtomId, S::Pending<'s>)>,
    out: &mut W,
    report: &mut ScanReport,
) -> Result<Flow>
where
    S: AtomSource,
    W: Write + ?Sized,
{
    #[cfg(feature = "tracing")]
    tracing::trace!(batch = %batch, "Issuing batch");

    for atom in batch.iter() {
        inflight.push((atom, source.request_name(atom)?));
        report.requested += 1;
    }

    // Drain in issue order. Returning early drops the remaining handles.
    for (atom, pending) in inflight.drain(..) {
        let name = match source.resolve_name(atom, pending)? {
            NameLookup::Named(name) => name,
            NameLookup::Unknown => {
                report.unknown += 1;
                if config.stop_at_unknown && atom != ATOM_NONE {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(atom, "Stopping at first unknown atom");
                    report.stopped_at = Some(atom);
                    return Ok(Flow::Stop);
                }
                continue;
            }
        };

        if name.len() > config.max_name_len {
            return Err(Error::NameOverflow {
                atom,
                len: name.len(),
                max: config.max_name_len,
            });
        }
        report.named += 1;

        if name.len() < config.min_name_len {
            report.degenerate += 1;
            continue;
        }
        if !config.matcher.matches(&name) {
            continue;
        }

        config.template.render(out, atom, &name)?;
        report.matched += 1;
    }

    Ok(Flow::Continue)
}
