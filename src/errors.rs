use crate::core::projection::ProjectionError;
use crate::core::series::SeriesAlignmentError;
use crate::core::validation::UndefinedErrorRateError;
use crate::input::ParameterError;
use crate::statistics::FitError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PvemError {
    #[error("Request was considered invalid due to error: {0}")]
    InvalidRequest(#[from] ParameterError),
    #[error("Input could not be read as a measurement table: {0}")]
    MalformedInput(#[from] anyhow::Error),
    #[error("Uploaded series could not be aligned: {0}")]
    SeriesAlignment(#[from] SeriesAlignmentError),
    #[error("Efficiency model could not be fitted: {0}")]
    FailureInFit(#[from] FitError),
    #[error("Model validation could not be computed: {0}")]
    UndefinedErrorRate(#[from] UndefinedErrorRateError),
    #[error("Candidate-site projection could not be computed: {0}")]
    FailureInProjection(#[from] ProjectionError),
    #[error("Results could not be written: {0}")]
    FailureInOutput(anyhow::Error),
}
