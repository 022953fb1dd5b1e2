//! # Error 模块
//!
//! 定义 fx-runtime 中使用的错误类型。

use thiserror::Error;

use crate::surface::SurfaceId;

/// 逐字显示错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RevealError {
    /// 目标显示区域不存在
    #[error("显示区域 '{id}' 不存在")]
    TargetNotFound { id: SurfaceId },
}

/// 滚动显现观察器错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ObserverError {
    /// 阈值超出范围
    #[error("显现阈值 {threshold} 必须在 0.0 - 1.0 之间")]
    InvalidThreshold { threshold: f32 },
}

/// fx-runtime 统一错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FxError {
    /// 逐字显示错误
    #[error("逐字显示错误: {0}")]
    Reveal(#[from] RevealError),

    /// 观察器错误
    #[error("观察器错误: {0}")]
    Observer(#[from] ObserverError),
}

/// Result 类型别名
pub type FxResult<T> = Result<T, FxError>;
