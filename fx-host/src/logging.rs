//! 日志初始化

use std::str::FromStr;
use tracing::{Level, warn};

/// 安装全局 fmt 订阅者
///
/// 无法识别的级别按 `info` 处理。已安装过订阅者时返回 `false`。
pub fn init(level: &str) -> bool {
    let parsed = Level::from_str(level).ok();

    let installed = tracing_subscriber::fmt()
        .with_max_level(parsed.unwrap_or(Level::INFO))
        .with_target(false)
        .try_init()
        .is_ok();

    if parsed.is_none() {
        warn!(level = %level, "无法识别的日志级别，使用 info");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init("debug");
        assert!(!init("not-a-level"));
    }
}
