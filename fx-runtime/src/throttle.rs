//! # Throttle 模块
//!
//! 前沿节流：第一次调用立即通过，之后 `limit` 时间内的调用全部丢弃，
//! 不会在窗口结束时补发。时钟由调用方传入。

use std::time::{Duration, Instant};

/// 节流器
#[derive(Debug, Clone)]
pub struct Throttle {
    limit: Duration,
    /// 上一次放行的时间
    last_pass: Option<Instant>,
}

impl Throttle {
    pub fn new(limit: Duration) -> Self {
        Self {
            limit,
            last_pass: None,
        }
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    /// 尝试放行一次调用
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        if self.is_throttled(now) {
            return false;
        }
        self.last_pass = Some(now);
        true
    }

    /// 是否处于节流窗口内
    pub fn is_throttled(&self, now: Instant) -> bool {
        self.last_pass
            .is_some_and(|last| now.saturating_duration_since(last) < self.limit)
    }

    /// 清除节流状态，下一次调用立即放行
    pub fn reset(&mut self) {
        self.last_pass = None;
    }
}
