use berth_model::ModelError;
use thiserror::Error;

/// Errors from constraint evaluation.
///
/// None of these are placement verdicts. They mean the job configuration
/// slipped past upstream validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The constraint body is neither a value nor a limit constraint.
    #[error("failed to recognize the constraint type: {0}")]
    UnrecognizedConstraint(#[source] ModelError),
}

impl From<ModelError> for FilterError {
    fn from(err: ModelError) -> Self {
        FilterError::UnrecognizedConstraint(err)
    }
}
