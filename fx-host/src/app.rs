//! # App 模块
//!
//! `FxHost`：把显示区域、打字机驱动、滚动显现与节流组合在一起的宿主状态。

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use fx_runtime::{Rect, RevealObserver, Surface, SurfaceId, SurfaceRegistry, Throttle};
use tokio::time::{Instant, sleep};
use tracing::{debug, error, info};

use crate::config::AppConfig;
use crate::error::HostError;
use crate::revealer::{CompletionCallback, Revealer};

/// 滚动显现后添加到区域上的样式类
pub const ANIMATE_IN_CLASS: &str = "animate-in";

/// 宿主状态
pub struct FxHost {
    config: AppConfig,
    surfaces: Rc<RefCell<SurfaceRegistry>>,
    revealer: Revealer,
    observer: RevealObserver,
    scroll_throttle: Throttle,
}

impl FxHost {
    /// 根据配置创建宿主（配置无效时返回错误）
    pub fn new(config: AppConfig) -> Result<Self, HostError> {
        config.validate()?;

        let surfaces = Rc::new(RefCell::new(SurfaceRegistry::new()));
        let revealer = Revealer::from_config(Rc::clone(&surfaces), &config.typewriter);
        let observer = RevealObserver::new(config.observer.options())?;
        let scroll_throttle = Throttle::new(config.observer.scroll_throttle());

        info!(
            speed_ms = config.typewriter.speed_ms,
            grace_ms = config.typewriter.grace_ms,
            "宿主初始化完成"
        );

        Ok(Self {
            config,
            surfaces,
            revealer,
            observer,
            scroll_throttle,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn revealer(&self) -> &Revealer {
        &self.revealer
    }

    pub fn surfaces(&self) -> Rc<RefCell<SurfaceRegistry>> {
        Rc::clone(&self.surfaces)
    }

    /// 注册显示区域
    pub fn register_surface(&self, id: &str) {
        self.surfaces.borrow_mut().insert(id);
    }

    /// 读取显示区域快照
    pub fn surface(&self, id: &str) -> Option<Surface> {
        self.surfaces.borrow().get(id).cloned()
    }

    /// 在目标区域逐字显示文本（见 [`Revealer::reveal_text`]）
    pub fn reveal_text(
        &self,
        target_id: &str,
        text: &str,
        speed: Option<Duration>,
        on_complete: Option<CompletionCallback>,
    ) {
        self.revealer.reveal_text(target_id, text, speed, on_complete);
    }

    /// 立即隐藏区域，`delay` 后再显示（默认取配置中的选项区延迟）
    ///
    /// 必须在 `LocalSet` 内调用。
    pub fn show_after(&self, target_id: &str, delay: Option<Duration>) {
        let delay = delay.unwrap_or_else(|| self.config.choices.delay());

        match self.surfaces.borrow_mut().get_mut(target_id) {
            Some(surface) => surface.set_visible(false),
            None => {
                error!(target_id = %target_id, "延迟显示的目标区域不存在");
                return;
            }
        }

        let surfaces = Rc::clone(&self.surfaces);
        let id = SurfaceId::new(target_id);
        tokio::task::spawn_local(async move {
            sleep(delay).await;
            if let Some(surface) = surfaces.borrow_mut().get_mut(id.as_str()) {
                surface.set_visible(true);
                debug!(target_id = %id, "延迟显示完成");
            }
        });
    }

    /// 开始观察区域的滚动显现
    pub fn watch(&mut self, id: &str) {
        self.observer.watch(id);
    }

    pub fn observer(&self) -> &RevealObserver {
        &self.observer
    }

    /// 处理滚动事件
    ///
    /// 受节流限制；返回本次新显现的区域，并为它们添加 `animate-in` 类。
    pub fn on_scroll(&mut self, viewport: Rect, rects: &HashMap<SurfaceId, Rect>) -> Vec<SurfaceId> {
        if !self.scroll_throttle.try_acquire(Instant::now().into_std()) {
            return Vec::new();
        }

        let revealed = self.observer.observe(viewport, rects);
        let mut surfaces = self.surfaces.borrow_mut();
        for id in &revealed {
            if let Some(surface) = surfaces.get_mut(id.as_str()) {
                surface.add_class(ANIMATE_IN_CLASS);
            }
        }
        if !revealed.is_empty() {
            debug!(count = revealed.len(), "滚动显现");
        }
        revealed
    }
}
