use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{PlayerId, TableId};
use crate::engine::EngineError;

/// Ошибки внешнего API (то, что отдаём фронту / клиенту).
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum ApiError {
    /// Неправильные входные данные (например, битый JSON).
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("table {0} not found")]
    TableNotFound(TableId),

    #[error("player {0} is not at the table")]
    PlayerNotAtTable(PlayerId),

    #[error("player {0} is not allowed to act for this seat")]
    Forbidden(PlayerId),

    /// Действие не в свою очередь или недопустимое по правилам.
    #[error("rejected: {0}")]
    Rejected(String),

    /// Стол заблокирован до ручной проверки.
    #[error("table {0} is under review")]
    UnderReview(TableId),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::TableNotFound(id) => ApiError::TableNotFound(id),
            EngineError::PlayerNotAtTable(id) => ApiError::PlayerNotAtTable(id),
            EngineError::Unauthorized(id) => ApiError::Forbidden(id),
            EngineError::TableUnderReview(id) => ApiError::UnderReview(id),
            EngineError::Internal(_)
            | EngineError::Ledger(_)
            | EngineError::DeckExhausted
            | EngineError::InvalidEvaluationState { .. }
            | EngineError::DuplicateCard(_) => ApiError::Internal(err.to_string()),
            other => ApiError::Rejected(other.to_string()),
        }
    }
}
