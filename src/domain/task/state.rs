//! Task Context - Poll State Machine
//!
//! `Idle → Polling → {Succeeded, Failed}`
//!
//! 终态只会被进入一次；终态之后收到的任何状态都被忽略。

use super::status::{TaskStatus, TaskSuccess};

/// 轮询状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    /// 无活动句柄
    Idle,
    /// 轮询中
    Polling { phase: Option<String> },
    /// 成功（终态）
    Succeeded(TaskSuccess),
    /// 失败（终态）
    Failed { message: String },
}

/// 应用一次状态响应后的可观察效果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// 仍在处理，阶段标签未变化
    Unchanged,
    /// 仍在处理，阶段标签变化
    PhaseChanged(Option<String>),
    /// 进入成功终态
    Succeeded(TaskSuccess),
    /// 进入失败终态
    Failed(String),
    /// 当前状态不接受更新（Idle 或已是终态）
    Ignored,
}

impl Default for PollState {
    fn default() -> Self {
        PollState::Idle
    }
}

impl PollState {
    /// 取得句柄后进入轮询
    pub fn polling() -> Self {
        PollState::Polling { phase: None }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PollState::Idle => "idle",
            PollState::Polling { .. } => "polling",
            PollState::Succeeded(_) => "succeeded",
            PollState::Failed { .. } => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PollState::Succeeded(_) | PollState::Failed { .. })
    }

    /// 当前阶段标签
    pub fn phase(&self) -> Option<&str> {
        match self {
            PollState::Polling { phase } => phase.as_deref(),
            _ => None,
        }
    }

    /// 应用一次状态响应
    pub fn apply(&mut self, status: TaskStatus) -> Transition {
        let PollState::Polling { phase } = self else {
            return Transition::Ignored;
        };

        match status {
            TaskStatus::Processing { state } => {
                if *phase == state {
                    Transition::Unchanged
                } else {
                    *phase = state.clone();
                    Transition::PhaseChanged(state)
                }
            }
            TaskStatus::Success(success) => {
                *self = PollState::Succeeded(success.clone());
                Transition::Succeeded(success)
            }
            TaskStatus::Error { error } => {
                *self = PollState::Failed {
                    message: error.clone(),
                };
                Transition::Failed(error)
            }
        }
    }

    /// 非后端状态导致的失败（例如响应结构不符合约定）
    pub fn fail(&mut self, message: impl Into<String>) -> Transition {
        if !matches!(self, PollState::Polling { .. }) {
            return Transition::Ignored;
        }
        let message = message.into();
        *self = PollState::Failed {
            message: message.clone(),
        };
        Transition::Failed(message)
    }
}
