//! # FX Host
//!
//! 逐字显示效果的宿主层实现，使用 tokio 作为计时与调度引擎。
//!
//! ## 架构说明
//!
//! Host 层负责：
//! - 定时驱动 `fx-runtime` 的逐字显示会话
//! - 配置加载
//! - 日志初始化
//! - 滚动事件节流与显现
//!
//! Host 层不包含显示逻辑本身，只负责按 Runtime 给出的等待时长推进会话。
//! 所有任务都在单线程 `LocalSet` 上协作运行。

pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod revealer;

pub use app::{ANIMATE_IN_CLASS, FxHost};
pub use config::{AppConfig, ChoicesConfig, ConfigError, ObserverConfig, TypewriterConfig};
pub use error::HostError;
pub use revealer::{CompletionCallback, RevealHandle, Revealer};
