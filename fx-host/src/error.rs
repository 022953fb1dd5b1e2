//! # Error 模块
//!
//! Host 层错误类型。

use fx_runtime::ObserverError;
use thiserror::Error;

use crate::config::ConfigError;

/// Host 层错误
#[derive(Error, Debug, Clone)]
pub enum HostError {
    /// 配置错误
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// 观察器初始化失败
    #[error("滚动显现初始化失败: {0}")]
    Observer(#[from] ObserverError),
}
