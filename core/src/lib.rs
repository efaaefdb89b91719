pub mod capture;
pub mod verification;

// Re-exports for convenience
pub use capture::{Backend, ParseError, SnapshotState, StateParser, parse_state};
pub use verification::{
    Expectations, ExpectationsMeta, Stage, StageFailure, StageReferences, StateVerifier,
    VerificationResult, validate,
};
