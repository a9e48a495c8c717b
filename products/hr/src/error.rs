use thiserror::Error;

pub type HrResult<T> = Result<T, HrError>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum HrError {
    /// Input rejected by a registry rule. Carries the reason verbatim.
    #[error("{0}")]
    Validation(String),
    #[error("no employee found with id {0}")]
    NotFound(String),
}

impl HrError {
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation(reason.into())
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }
}
