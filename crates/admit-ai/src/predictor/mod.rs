//! Exam score normalization and predictor request assembly.
//!
//! Candidates enter a rank, percentile, marks, or score for one of the catalogued exams. The
//! normalizer converts that value into a single canonical rank, the assembler packages it with
//! the qualifier answers the exam requires, and the service forwards the payload to the
//! external prediction backend.

pub mod capability;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod normalizer;
pub mod registry;
pub mod request;
pub mod router;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use capability::{form_fields, requires, requires_field, FieldCapability, FormCapabilities};
pub use domain::{
    Category, ExamDefinition, FieldSet, InputKind, InputModes, QualifierField, Stream,
};
pub use error::{LookupError, ValidationError};
pub use gateway::{GatewayError, PredictionGateway, PredictionResults};
pub use normalizer::{
    band_for_percentage, BandPlacement, NormalizationInput, NormalizationResult,
    QualifierValues, RankBand, ScoreNormalizer, ScoreSubmission,
};
pub use registry::ExamRegistry;
pub use request::{assemble, PredictorRequest};
pub use router::predictor_router;
pub use service::{NormalizedScore, PredictionOutcome, PredictorError, PredictorService};
pub use session::{PredictorSession, SessionError, SessionId, SessionStore};
