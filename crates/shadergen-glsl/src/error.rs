use thiserror::Error;

use crate::binding::BindingError;
use crate::ir::StageKind;
use crate::syntax::SyntaxError;

/// Failure of a generation session. Any partial output must be discarded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenError {
    #[error("invalid dialect configuration: {0}")]
    Configuration(#[from] SyntaxError),

    #[error(transparent)]
    Binding(#[from] BindingError),

    #[error("program {program:?} declares more than one {stage} stage")]
    DuplicateStage { program: String, stage: StageKind },

    #[error("inter-stage block mismatch between {producer} output and {consumer} input: {reason}")]
    InterStageMismatch {
        producer: StageKind,
        consumer: StageKind,
        reason: String,
    },
}
