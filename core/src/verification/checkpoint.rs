//! Stage-checkpoint verification of parsed snapshot state
//!
//! Compares per-backend offset sequences against a reference schedule,
//! one capture stage at a time, under an inclusive tolerance. The
//! reference tables are fixture data tied to a specific test schedule
//! (snapshot interval, prune schedule, stage timing) and are injectable
//! so alternate schedules can reuse the same comparator.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::capture::{Backend, ParseError, SnapshotState, StateParser};

/// Capture stages in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    First,
    Second,
    Third,
    Final,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::First, Stage::Second, Stage::Third, Stage::Final];

    pub fn name(self) -> &'static str {
        match self {
            Stage::First => "first",
            Stage::Second => "second",
            Stage::Third => "third",
            Stage::Final => "final",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Expected per-stage snapshot timelines plus comparison tolerance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expectations {
    #[serde(default)]
    pub meta: ExpectationsMeta,

    pub stages: StageReferences,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpectationsMeta {
    /// Optional description of the schedule
    #[serde(default)]
    pub description: Option<String>,

    /// Tolerance in seconds for offset comparisons (default 2)
    #[serde(default = "default_tolerance")]
    pub tolerance_secs: i64,
}

impl Default for ExpectationsMeta {
    fn default() -> Self {
        Self {
            description: None,
            tolerance_secs: default_tolerance(),
        }
    }
}

fn default_tolerance() -> i64 {
    2
}

/// One reference [`SnapshotState`] per capture stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageReferences {
    pub first: SnapshotState,
    pub second: SnapshotState,
    pub third: SnapshotState,
    #[serde(rename = "final")]
    pub final_: SnapshotState,
}

impl StageReferences {
    pub fn stage(&self, stage: Stage) -> &SnapshotState {
        match stage {
            Stage::First => &self.first,
            Stage::Second => &self.second,
            Stage::Third => &self.third,
            Stage::Final => &self.final_,
        }
    }
}

impl Expectations {
    /// Load an alternate schedule from a TOML file
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let expectations: Expectations = toml::from_str(&content)?;
        Ok(expectations)
    }
}

impl Default for Expectations {
    /// Baseline schedule: 10s snapshot interval over a ~3 minute run
    /// with staged prunes, captures at ~63s, ~123s, ~183s and a final
    /// capture after service shutdown.
    fn default() -> Self {
        Self {
            meta: ExpectationsMeta::default(),
            stages: StageReferences {
                first: SnapshotState {
                    data: vec![10, 20, 30, 40, 50, 60],
                    backupbtr: vec![10, 20, 30, 40, 50, 60],
                    backuprst: vec![10, 20, 30, 40, 50, 60],
                },
                second: SnapshotState {
                    data: vec![40, 50, 60, 70, 80, 90, 100, 110, 120],
                    backupbtr: vec![20, 30, 50, 60, 70, 80, 90, 100, 110, 120],
                    backuprst: vec![20, 50, 60, 70, 80, 90, 100, 110, 120],
                },
                third: SnapshotState {
                    data: vec![100, 110, 120, 130, 140, 150, 160, 170, 180],
                    backupbtr: vec![50, 60, 80, 90, 110, 120, 130, 140, 150, 160, 170, 180],
                    backuprst: vec![20, 80, 110, 120, 130, 140, 150, 160, 170, 180],
                },
                final_: SnapshotState {
                    data: vec![160, 170, 180],
                    backupbtr: vec![110, 120, 140, 150, 170, 180],
                    backuprst: vec![80, 140, 170, 180],
                },
            },
        }
    }
}

/// One failed stage×backend comparison.
#[derive(Debug, Clone)]
pub struct StageFailure {
    pub stage: Stage,
    pub backend: Backend,
    pub actual: Vec<i64>,
    pub expected: Vec<i64>,
}

/// Overall verification result.
#[derive(Debug, Clone)]
pub struct VerificationResult {
    pub stages_passed: u32,
    pub stages_checked: u32,
    pub failure: Option<StageFailure>,
}

impl VerificationResult {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

/// Compares parsed stage captures against a reference schedule.
#[derive(Debug, Default)]
pub struct StateVerifier {
    expectations: Expectations,
}

impl StateVerifier {
    pub fn new(expectations: Expectations) -> Self {
        Self { expectations }
    }

    /// Verify the four stage captures in order. A failing stage stops
    /// evaluation; later captures are not parsed.
    pub fn verify(
        &self,
        first: &str,
        second: &str,
        third: &str,
        final_: &str,
        base_timestamp: i64,
    ) -> Result<VerificationResult, ParseError> {
        let parser = StateParser::new(base_timestamp);
        let captures = [
            (Stage::First, first),
            (Stage::Second, second),
            (Stage::Third, third),
            (Stage::Final, final_),
        ];

        let mut stages_passed = 0;
        let mut stages_checked = 0;
        for (stage, raw) in captures {
            stages_checked += 1;
            let actual = parser.parse(raw)?;
            if let Some(failure) = self.check_stage(stage, &actual) {
                return Ok(VerificationResult {
                    stages_passed,
                    stages_checked,
                    failure: Some(failure),
                });
            }
            stages_passed += 1;
        }

        Ok(VerificationResult {
            stages_passed,
            stages_checked,
            failure: None,
        })
    }

    /// Compare one parsed capture against its stage reference.
    ///
    /// All three backends are checked even after one fails; a single
    /// failure record is kept per call, the last failing backend in
    /// `data → backupbtr → backuprst` order.
    pub fn check_stage(&self, stage: Stage, actual: &SnapshotState) -> Option<StageFailure> {
        let reference = self.expectations.stages.stage(stage);
        let tolerance = self.expectations.meta.tolerance_secs;

        let mut failed = None;
        for backend in Backend::ALL {
            if !sequences_match(actual.sequence(backend), reference.sequence(backend), tolerance) {
                failed = Some(backend);
            }
        }

        let backend = failed?;
        let failure = StageFailure {
            stage,
            backend,
            actual: actual.sequence(backend).to_vec(),
            expected: reference.sequence(backend).to_vec(),
        };
        error!("'{}' in stage '{}' failed validation", failure.backend, failure.stage);
        error!("actual: {:?}", failure.actual);
        error!("expect: {:?}", failure.expected);
        Some(failure)
    }
}

/// Tolerant element-wise equality: lengths must match exactly, then
/// every pair must be within `tolerance` seconds (inclusive).
fn sequences_match(actual: &[i64], reference: &[i64], tolerance: i64) -> bool {
    if actual.len() != reference.len() {
        return false;
    }

    actual
        .iter()
        .zip(reference.iter())
        .all(|(a, r)| (r - a).abs() <= tolerance)
}

/// Validate the four stage captures against the baseline schedule.
///
/// Returns `Ok(true)` iff every stage passes; parse errors on a
/// recognized backend tag propagate.
pub fn validate(
    first: &str,
    second: &str,
    third: &str,
    final_: &str,
    base_timestamp: i64,
) -> Result<bool, ParseError> {
    let result = StateVerifier::default().verify(first, second, third, final_, base_timestamp)?;
    Ok(result.passed())
}
