//! # Config 模块
//!
//! 运行时配置管理，集中管理所有配置项。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (config.json)
//! 3. 默认值（最低）

use fx_runtime::{ObserverOptions, RevealStyle};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 打字机效果配置
    #[serde(default)]
    pub typewriter: TypewriterConfig,

    /// 滚动显现配置
    #[serde(default)]
    pub observer: ObserverConfig,

    /// 选项区延迟显示配置
    #[serde(default)]
    pub choices: ChoicesConfig,

    /// 日志级别（trace/debug/info/warn/error）
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// 打字机效果配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypewriterConfig {
    /// 每字间隔（毫秒）
    #[serde(default = "default_speed_ms")]
    pub speed_ms: u64,

    /// 完成后光标停留时长（毫秒）
    #[serde(default = "default_grace_ms")]
    pub grace_ms: u64,

    /// 光标指示符字形
    #[serde(default = "default_indicator")]
    pub indicator: String,

    /// 进行中样式类
    #[serde(default = "default_typing_class")]
    pub typing_class: String,
}

/// 滚动显现配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObserverConfig {
    /// 相交比例阈值 (0.0 - 1.0)
    #[serde(default = "default_threshold")]
    pub threshold: f32,

    /// 视口底边外扩量（像素，负值为内缩）
    #[serde(default = "default_root_margin_bottom")]
    pub root_margin_bottom: f32,

    /// 滚动事件节流间隔（毫秒）
    #[serde(default = "default_scroll_throttle_ms")]
    pub scroll_throttle_ms: u64,
}

/// 选项区延迟显示配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoicesConfig {
    /// 延迟时长（毫秒）
    #[serde(default = "default_choices_delay_ms")]
    pub delay_ms: u64,
}

// 默认值函数
fn default_log_level() -> String {
    "info".to_string()
}

fn default_speed_ms() -> u64 {
    50
}

fn default_grace_ms() -> u64 {
    2000
}

fn default_indicator() -> String {
    fx_runtime::DEFAULT_INDICATOR.to_string()
}

fn default_typing_class() -> String {
    fx_runtime::TYPING_CLASS.to_string()
}

fn default_threshold() -> f32 {
    0.1
}

fn default_root_margin_bottom() -> f32 {
    -50.0
}

fn default_scroll_throttle_ms() -> u64 {
    16
}

fn default_choices_delay_ms() -> u64 {
    1000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            typewriter: TypewriterConfig::default(),
            observer: ObserverConfig::default(),
            choices: ChoicesConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            speed_ms: default_speed_ms(),
            grace_ms: default_grace_ms(),
            indicator: default_indicator(),
            typing_class: default_typing_class(),
        }
    }
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            root_margin_bottom: default_root_margin_bottom(),
            scroll_throttle_ms: default_scroll_throttle_ms(),
        }
    }
}

impl Default for ChoicesConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_choices_delay_ms(),
        }
    }
}

impl TypewriterConfig {
    pub fn speed(&self) -> Duration {
        Duration::from_millis(self.speed_ms)
    }

    pub fn style(&self) -> RevealStyle {
        RevealStyle {
            indicator: self.indicator.clone(),
            typing_class: self.typing_class.clone(),
            grace: Duration::from_millis(self.grace_ms),
        }
    }
}

impl ObserverConfig {
    pub fn options(&self) -> ObserverOptions {
        ObserverOptions {
            threshold: self.threshold,
            root_margin_bottom: self.root_margin_bottom,
        }
    }

    pub fn scroll_throttle(&self) -> Duration {
        Duration::from_millis(self.scroll_throttle_ms)
    }
}

impl ChoicesConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl AppConfig {
    /// 加载配置文件
    ///
    /// 如果文件不存在或解析失败，返回默认配置并打印警告。
    /// 此时日志系统尚未初始化（日志级别本身来自配置），因此直接输出到 stderr。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            eprintln!("⚠️ 配置文件不存在: {:?}，使用默认配置", path);
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("⚠️ 配置文件解析失败: {}，使用默认配置", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("⚠️ 配置文件读取失败: {}，使用默认配置", e);
                Self::default()
            }
        }
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        fs::write(path, json).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// 验证配置有效性
    ///
    /// 每字间隔不做检查（由调用方负责）。
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.typewriter.indicator.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "光标指示符不能为空".to_string(),
            ));
        }

        if self.typewriter.typing_class.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "进行中样式类不能为空".to_string(),
            ));
        }

        self.observer
            .options()
            .validate()
            .map_err(|e| ConfigError::ValidationFailed(e.to_string()))?;

        Ok(())
    }
}

/// 配置错误
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    SerializationFailed(String),
    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    IoError(String),
    /// 验证失败
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),
}
