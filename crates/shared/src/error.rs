use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Validation,
    Internal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown artifact kind '{0}' (expected source, processed or summary)")]
pub struct ParseArtifactKindError(pub String);

impl From<ParseArtifactKindError> for ApiError {
    fn from(value: ParseArtifactKindError) -> Self {
        Self::new(ErrorCode::Validation, value.to_string())
    }
}
