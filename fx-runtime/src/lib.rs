//! # FX Runtime
//!
//! 逐字显示（打字机）效果的纯逻辑核心。
//!
//! ## 架构概述
//!
//! `fx-runtime` 不依赖任何 IO、计时器或渲染引擎。
//! 它通过 **等待驱动模式** 与宿主层（Host）通信：
//!
//! ```text
//! Host                               Runtime
//!   │                                   │
//!   │──── RevealRequest::start ───────►│ 清空显示区域、标记 typing、显示首字
//!   │◄─── (RevealSession, RevealWait) ──│
//!   │                                   │
//!   │  sleep(RevealWait::Delay)         │
//!   │──── RevealSession::tick ────────►│ 追加一个字符 / 显示光标 / 移除光标
//!   │◄─── RevealWait ───────────────────│
//!   │                                   │
//!   │  RevealWait::Finished(outcome) → 调用完成回调
//! ```
//!
//! ## 核心类型
//!
//! - [`SurfaceRegistry`]：所有显示区域（按 [`SurfaceId`] 索引）
//! - [`RevealRequest`]：尚未开始的显示请求（Idle 状态）
//! - [`RevealSession`]：进行中的显示会话
//! - [`RevealWait`]：会话告诉宿主下一步要等待多久
//! - [`Throttle`]：节流器
//! - [`RevealObserver`]：滚动触发的一次性显现
//!
//! ## 模块结构
//!
//! - [`surface`]：显示区域与节点
//! - [`reveal`]：逐字显示会话
//! - [`throttle`]：节流
//! - [`observer`]：滚动显现观察器
//! - [`error`]：错误类型定义

pub mod error;
pub mod observer;
pub mod reveal;
pub mod surface;
pub mod throttle;

// 重导出核心类型
pub use error::{FxError, FxResult, ObserverError, RevealError};
pub use observer::{ObserverOptions, Rect, RevealObserver};
pub use reveal::{
    DEFAULT_INDICATOR, DEFAULT_SPEED, GRACE_INTERVAL, RevealOutcome, RevealPhase, RevealRequest,
    RevealSession, RevealStyle, RevealWait, TYPING_CLASS,
};
pub use surface::{SessionToken, Surface, SurfaceId, SurfaceNode, SurfaceRegistry};
pub use throttle::Throttle;
