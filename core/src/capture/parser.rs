use std::path::Path;

use chrono::DateTime;

use super::{Backend, ParseError, SnapshotState};

#[cfg(test)]
mod tests;

/// Timestamps embedded in snapshot identifiers: ISO-like with hyphens
/// replacing colons in the time portion, plus a UTC offset.
const STAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%z";

/// Length of the fixed marker prefixing restic tag values (`ts=`).
const TAG_MARKER_LEN: usize = 3;

type Extractor = fn(&str) -> Option<&str>;

/// Backend-specific identifier extraction. The timestamp sits in a
/// different position per backend, so each tag maps to its own strategy.
const EXTRACTORS: [(Backend, Extractor); 3] = [
    (Backend::Data, path_name),
    (Backend::BackupBtr, path_stem),
    (Backend::BackupRst, marker_suffix),
];

// final path segment
fn path_name(value: &str) -> Option<&str> {
    Path::new(value).file_name()?.to_str()
}

// final path segment with extension stripped
fn path_stem(value: &str) -> Option<&str> {
    Path::new(value).file_stem()?.to_str()
}

// marker stripped by fixed offset, not by search
fn marker_suffix(value: &str) -> Option<&str> {
    value.get(TAG_MARKER_LEN..)
}

/// Parses capture blobs into [`SnapshotState`] relative to a base
/// timestamp (the test run's start, in seconds since epoch).
pub struct StateParser {
    base_timestamp: i64,
}

impl StateParser {
    pub fn new(base_timestamp: i64) -> Self {
        Self { base_timestamp }
    }

    /// Parse a whole capture blob into per-backend offset sequences.
    ///
    /// Lines with unrecognized tags are skipped without error; a
    /// recognized tag whose value lacks a parseable timestamp is an
    /// error. Offsets keep source line order, no dedup, no sorting.
    pub fn parse(&self, raw: &str) -> Result<SnapshotState, ParseError> {
        let mut state = SnapshotState::default();
        for (idx, line) in raw.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            if let Some((backend, offset)) = self.parse_line(idx as u64 + 1, line)? {
                state.sequence_mut(backend).push(offset);
            }
        }
        Ok(state)
    }

    /// Parse one `<tag>:<value>` record. The tag is everything before
    /// the first colon; any further colons stay in the value.
    fn parse_line(
        &self,
        line_number: u64,
        line: &str,
    ) -> Result<Option<(Backend, i64)>, ParseError> {
        let Some((tag, value)) = line.split_once(':') else {
            return Ok(None);
        };
        let Some(&(backend, extract)) = EXTRACTORS.iter().find(|(b, _)| b.tag() == tag) else {
            return Ok(None);
        };

        let stamp = extract(value).ok_or_else(|| ParseError::InvalidIdentifier {
            line_number,
            value: value.to_string(),
        })?;
        let timestamp = parse_stamp(stamp).ok_or_else(|| ParseError::InvalidTimestamp {
            line_number,
            segment: stamp.to_string(),
        })?;

        Ok(Some((backend, timestamp - self.base_timestamp)))
    }
}

/// Parse an embedded timestamp to whole epoch seconds (truncating).
fn parse_stamp(stamp: &str) -> Option<i64> {
    DateTime::parse_from_str(stamp, STAMP_FORMAT)
        .ok()
        .map(|dt| dt.timestamp())
}
