//! HTTP byte-range windows for media streaming

use crate::error::{Result, TuneError};

/// Bytes served when the client leaves the end of the range open
pub const DEFAULT_CHUNK_SIZE: u64 = 1_000_000;

/// Inclusive byte interval of a file to send in a partial response
///
/// Always satisfies `start <= end < total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeWindow {
    start: u64,
    end: u64,
    total: u64,
}

impl RangeWindow {
    /// Compute the window for a `Range` header against a file of `total` bytes
    ///
    /// - no header, or one that does not parse: window starts at byte 0
    /// - open end: `min(start + chunk_size, total - 1)`
    /// - explicit end past the file: clamped to `total - 1`
    /// - start at/after the end of the file, or after the explicit end:
    ///   [`TuneError::RangeNotSatisfiable`]
    pub fn resolve(header: Option<&str>, total: u64, chunk_size: u64) -> Result<Self> {
        let (start, end) = match header {
            Some(raw) => parse_byte_range(raw).unwrap_or_else(|| {
                tracing::debug!(header = raw, "Ignoring malformed Range header");
                (None, None)
            }),
            None => (None, None),
        };

        let start = start.unwrap_or(0);
        if start >= total {
            return Err(TuneError::RangeNotSatisfiable { total });
        }
        let last = total - 1;

        let end = match end {
            Some(end) if end < start => return Err(TuneError::RangeNotSatisfiable { total }),
            Some(end) => end.min(last),
            None => start.saturating_add(chunk_size).min(last),
        };

        Ok(Self { start, end, total })
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of bytes in the window
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// A window always holds at least one byte
    pub fn is_empty(&self) -> bool {
        false
    }

    /// `Content-Range` header value
    pub fn content_range(&self) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, self.total)
    }

    /// `Content-Range` value for a 416 response
    pub fn unsatisfied_content_range(total: u64) -> String {
        format!("bytes */{total}")
    }
}

/// Parse `bytes=<start>-<end>` with either side optional
///
/// Only the first range of a multi-range header is considered.
fn parse_byte_range(raw: &str) -> Option<(Option<u64>, Option<u64>)> {
    let (unit, ranges) = raw.trim().split_once('=')?;
    if !unit.trim().eq_ignore_ascii_case("bytes") {
        return None;
    }

    let first = ranges.split(',').next()?.trim();
    let (start, end) = first.split_once('-')?;
    let start = parse_offset(start)?;
    let end = parse_offset(end)?;

    if start.is_none() && end.is_none() {
        return None;
    }
    Some((start, end))
}

/// `Some(None)` for an omitted offset, `None` for garbage
#[allow(clippy::option_option)]
fn parse_offset(raw: &str) -> Option<Option<u64>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(None);
    }
    raw.parse().ok().map(Some)
}
