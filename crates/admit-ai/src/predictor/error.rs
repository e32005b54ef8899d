use super::domain::{InputKind, QualifierField};

/// Raised when an exam id is not part of the catalogue.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LookupError {
    #[error("exam '{0}' is not supported")]
    ExamNotFound(String),
}

/// Malformed or out-of-range predictor input, detected before any network call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("a score value is required")]
    MissingValue,
    #[error("score value '{0}' is not a number")]
    NonNumeric(String),
    #[error("an input type is required")]
    MissingInputType,
    #[error("input type '{0}' is not supported")]
    UnsupportedInputType(String),
    #[error("{exam_id} does not accept {kind} input")]
    InputKindNotAccepted { exam_id: String, kind: InputKind },
    #[error("rank must be a whole number of at least 1 (found {0})")]
    InvalidRank(f64),
    #[error("percentile must be between 0 and 100 (found {0})")]
    PercentileOutOfRange(f64),
    #[error("{kind} must not exceed {max} (found {value})")]
    ScoreOutOfRange {
        kind: InputKind,
        value: f64,
        max: u32,
    },
    #[error("missing required field: {0}")]
    MissingField(QualifierField),
    #[error("category '{0}' is not recognised")]
    InvalidCategory(String),
}

impl ValidationError {
    /// Form field the error should be attached to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingField(field) => field.wire_name(),
            ValidationError::InvalidCategory(_) => QualifierField::Category.wire_name(),
            ValidationError::MissingInputType
            | ValidationError::UnsupportedInputType(_)
            | ValidationError::InputKindNotAccepted { .. } => "inputType",
            _ => "rawValue",
        }
    }
}
