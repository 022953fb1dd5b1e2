//! # Reveal 模块
//!
//! 逐字显示（打字机效果）会话。
//!
//! ## 状态流转
//!
//! ```text
//! RevealRequest (Idle)
//!     │ start()：清空区域、添加 typing 类、显示首字
//!     ▼
//! Revealing ── 每 speed 显示一个字符 ──┐
//!     │ 光标到达末尾                    │
//!     ▼                                 │
//! Completing：移除 typing 类、显示光标指示符，等待 grace
//!     │
//!     ▼
//! Done(Completed)：移除光标指示符，宿主调用完成回调
//! ```
//!
//! 任一 tick 发现区域已被新会话占用（或已被移除）时，直接进入
//! `Done(Superseded)`，不再修改区域，也不触发回调。

mod session;

use std::time::Duration;

pub use session::{RevealPhase, RevealRequest, RevealSession};

/// 默认每字间隔
pub const DEFAULT_SPEED: Duration = Duration::from_millis(50);

/// 完成后光标停留时长
pub const GRACE_INTERVAL: Duration = Duration::from_millis(2000);

/// 默认光标指示符
pub const DEFAULT_INDICATOR: &str = "|";

/// 显示进行中时添加到区域上的样式类
pub const TYPING_CLASS: &str = "typing";

/// 显示样式参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealStyle {
    /// 光标指示符字形
    pub indicator: String,
    /// 进行中样式类
    pub typing_class: String,
    /// 光标停留时长
    pub grace: Duration,
}

impl Default for RevealStyle {
    fn default() -> Self {
        Self {
            indicator: DEFAULT_INDICATOR.to_string(),
            typing_class: TYPING_CLASS.to_string(),
            grace: GRACE_INTERVAL,
        }
    }
}

/// 会话结束方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    /// 正常完成（应触发完成回调）
    Completed,
    /// 被同一区域上的新会话取代，或区域已被移除
    Superseded,
}

/// 会话的下一步
///
/// 宿主获取此值后，等待指定时长再调用 `tick`。
/// 会话本身不需要知道真实时间流逝。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealWait {
    /// 等待指定时长后再 tick
    Delay(Duration),
    /// 会话已结束
    Finished(RevealOutcome),
}

impl RevealWait {
    /// 是否已结束
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished(_))
    }
}
