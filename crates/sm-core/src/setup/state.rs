use serde::Serialize;

use crate::node::{IdentityAddress, NodeMode};
use crate::setup::SetupError;

#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum SetupState {
    /// 输入节点密码
    Password { error: Option<SetupError> },

    /// 欢迎消息（可留空）
    WelcomeMessage,

    /// Payment / Minimal
    ModeSelect,

    /// NAT 地址（可留空）
    NatAddress,

    /// 仅在 payment 模式下出现
    RpcEndpoint { error: Option<SetupError> },

    /// 正在探测 RPC 端点
    VerifyingEndpoint { endpoint: String },

    /// 确认并启动
    Confirm { error: Option<SetupError> },

    /// 节点启动中
    Starting,

    /// 节点已运行
    Running { identity_address: IdentityAddress },

    /// 节点实际模式与请求不一致，本次会话不再继续
    Inconsistent {
        requested: NodeMode,
        actual: NodeMode,
    },
}

impl SetupState {
    pub fn initial() -> Self {
        SetupState::Password { error: None }
    }

    pub fn error(&self) -> Option<&SetupError> {
        match self {
            SetupState::Password { error }
            | SetupState::RpcEndpoint { error }
            | SetupState::Confirm { error } => error.as_ref(),
            _ => None,
        }
    }

    /// A probe or a node start is running; navigation is frozen.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            SetupState::VerifyingEndpoint { .. } | SetupState::Starting
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SetupState::Running { .. } | SetupState::Inconsistent { .. }
        )
    }
}

impl Default for SetupState {
    fn default() -> Self {
        Self::initial()
    }
}
