use thiserror::Error;

use super::StageKind;

/// Fatal shader program failures. There is no degraded mode; callers abort startup.
#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("{stage} shader failed to compile:\n{message}")]
    ShaderCompile { stage: StageKind, message: String },

    #[error("shader program failed to link: {reason}")]
    ShaderLink { reason: String },
}

impl ProgramError {
    pub(crate) fn compile(stage: StageKind, message: impl Into<String>) -> Self {
        Self::ShaderCompile {
            stage,
            message: message.into(),
        }
    }

    pub(crate) fn link(reason: impl Into<String>) -> Self {
        Self::ShaderLink {
            reason: reason.into(),
        }
    }
}
