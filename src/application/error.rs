//! 应用层错误定义
//!
//! 统一的命令/查询错误类型。所有对外可见的失败都是一条可读消息。

use thiserror::Error;

use crate::application::ports::{BackendError, TaskError};
use crate::domain::podcast::FieldViolation;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 本地校验错误（未发出网络请求）
    #[error("Invalid request: {}", join_violations(.violations))]
    Validation { violations: Vec<FieldViolation> },

    /// 后端返回的失败消息，原样展示
    #[error("{0}")]
    Backend(String),

    /// 响应结构不符合约定
    #[error("Unexpected response from backend: {0}")]
    Contract(String),

    /// 无法连接后端
    #[error("Cannot reach backend: {0}")]
    Transport(String),

    /// 状态无效
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    Internal(String),
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ApplicationError {
    /// 创建校验错误
    pub fn validation(violations: Vec<FieldViolation>) -> Self {
        Self::Validation { violations }
    }

    /// 创建约定违反错误
    pub fn contract(message: impl Into<String>) -> Self {
        Self::Contract(message.into())
    }

    /// 创建状态无效错误
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// 违反的字段列表（仅校验错误）
    pub fn violated_fields(&self) -> Vec<&'static str> {
        match self {
            Self::Validation { violations } => violations.iter().map(|v| v.field).collect(),
            _ => Vec::new(),
        }
    }
}

impl From<BackendError> for ApplicationError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Network(msg) => Self::Transport(msg),
            BackendError::Timeout => Self::Transport("request timed out".to_string()),
            BackendError::Http { detail, .. } => Self::Backend(detail),
            BackendError::InvalidResponse(msg) => Self::Contract(msg),
            BackendError::InvalidRequest(msg) => Self::Internal(msg),
        }
    }
}

impl From<TaskError> for ApplicationError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::AlreadyPolling(_) => Self::InvalidState(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_every_field() {
        let err = ApplicationError::validation(vec![
            FieldViolation::new("text_content", "is required"),
            FieldViolation::new("speaker_1_voice", "must not be empty"),
        ]);
        assert_eq!(
            err.to_string(),
            "Invalid request: text_content: is required, speaker_1_voice: must not be empty"
        );
        assert_eq!(err.violated_fields(), vec!["text_content", "speaker_1_voice"]);
    }

    #[test]
    fn test_backend_detail_is_shown_verbatim() {
        let err: ApplicationError = BackendError::Http {
            status: 403,
            detail: "You don't have permission to create podcasts in this search space".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "You don't have permission to create podcasts in this search space"
        );
    }

    #[test]
    fn test_invalid_response_maps_to_contract() {
        let err: ApplicationError = BackendError::InvalidResponse("missing task_id".to_string()).into();
        assert!(matches!(err, ApplicationError::Contract(_)));
    }
}
