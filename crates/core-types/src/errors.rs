use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("fit score {0} is outside [0, 1]")]
    InvalidFitScore(f64),

    #[error("unrecognised application status: {0}")]
    UnknownStatus(String),

    #[error("job link must not be empty")]
    EmptyLink,
}
