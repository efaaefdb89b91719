//! Snapshot capture listings and their parsed state.
//!
//! A capture is a line-oriented text blob collected on the machine under
//! test, one record per line: `<backend-tag>:<identifier>`. Parsing
//! normalizes the timestamp embedded in each identifier to an elapsed
//! offset in whole seconds relative to the test run's start.

use std::fmt;

use serde::{Deserialize, Serialize};

mod error;
mod parser;

pub use error::ParseError;
pub use parser::StateParser;

/// Snapshot-producing subsystems under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Primary dataset
    Data,
    /// Filesystem-native (btrfs) backup target
    BackupBtr,
    /// Content-addressed (restic) repository backup target
    BackupRst,
}

impl Backend {
    /// Fixed comparison order
    pub const ALL: [Backend; 3] = [Backend::Data, Backend::BackupBtr, Backend::BackupRst];

    /// Literal tag prefixing capture lines for this backend
    pub fn tag(self) -> &'static str {
        match self {
            Backend::Data => "data",
            Backend::BackupBtr => "backupbtr",
            Backend::BackupRst => "backuprst",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Per-backend snapshot offsets from one capture, in source line order.
///
/// Order matters: sequences are compared positionally, never as sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotState {
    #[serde(default)]
    pub data: Vec<i64>,
    #[serde(default)]
    pub backupbtr: Vec<i64>,
    #[serde(default)]
    pub backuprst: Vec<i64>,
}

impl SnapshotState {
    pub fn sequence(&self, backend: Backend) -> &[i64] {
        match backend {
            Backend::Data => &self.data,
            Backend::BackupBtr => &self.backupbtr,
            Backend::BackupRst => &self.backuprst,
        }
    }

    pub(crate) fn sequence_mut(&mut self, backend: Backend) -> &mut Vec<i64> {
        match backend {
            Backend::Data => &mut self.data,
            Backend::BackupBtr => &mut self.backupbtr,
            Backend::BackupRst => &mut self.backuprst,
        }
    }
}

/// Parse one capture blob against a base timestamp.
pub fn parse_state(raw: &str, base_timestamp: i64) -> Result<SnapshotState, ParseError> {
    StateParser::new(base_timestamp).parse(raw)
}
