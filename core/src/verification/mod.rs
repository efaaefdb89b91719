//! Checkpoint verification of captured snapshot state

mod checkpoint;

pub use checkpoint::{
    Expectations, ExpectationsMeta, Stage, StageFailure, StageReferences, StateVerifier,
    VerificationResult, validate,
};
