//! # Observer 模块
//!
//! 滚动触发的一次性显现：被观察的区域初始处于暂停状态，
//! 当它与视口的相交比例达到阈值时标记为已显现，之后不再变化。

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::ObserverError;
use crate::surface::SurfaceId;

/// 矩形（左上角坐标 + 宽高）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn area(&self) -> f32 {
        self.w.max(0.0) * self.h.max(0.0)
    }

    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.w && y >= self.y && y <= self.y + self.h
    }

    /// 相交区域；不相交（或仅接触边缘）时返回 `None`
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = (self.x + self.w).min(other.x + other.w);
        let bottom = (self.y + self.h).min(other.y + other.h);

        if right > left && bottom > top {
            Some(Rect::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }
}

/// 观察器参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObserverOptions {
    /// 相交比例阈值 (0.0 - 1.0)
    pub threshold: f32,
    /// 视口底边外扩量（负值表示内缩）
    pub root_margin_bottom: f32,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin_bottom: -50.0,
        }
    }
}

impl ObserverOptions {
    pub fn validate(&self) -> Result<(), ObserverError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ObserverError::InvalidThreshold {
                threshold: self.threshold,
            });
        }
        Ok(())
    }

    /// 应用边距后的判定区域
    fn root(&self, viewport: Rect) -> Rect {
        Rect {
            h: (viewport.h + self.root_margin_bottom).max(0.0),
            ..viewport
        }
    }
}

/// 被观察区域的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Observed {
    /// 动画暂停，等待进入视口
    Paused,
    /// 已显现
    Revealed,
}

/// 滚动显现观察器
#[derive(Debug, Clone)]
pub struct RevealObserver {
    options: ObserverOptions,
    watched: BTreeMap<SurfaceId, Observed>,
}

impl RevealObserver {
    pub fn new(options: ObserverOptions) -> Result<Self, ObserverError> {
        options.validate()?;
        Ok(Self {
            options,
            watched: BTreeMap::new(),
        })
    }

    pub fn options(&self) -> &ObserverOptions {
        &self.options
    }

    /// 开始观察（已观察的区域保持原状态）
    pub fn watch(&mut self, id: impl Into<SurfaceId>) {
        self.watched.entry(id.into()).or_insert(Observed::Paused);
    }

    pub fn unwatch(&mut self, id: &str) {
        self.watched.remove(id);
    }

    pub fn is_watching(&self, id: &str) -> bool {
        self.watched.contains_key(id)
    }

    pub fn is_revealed(&self, id: &str) -> bool {
        self.watched.get(id) == Some(&Observed::Revealed)
    }

    /// 尚未显现的区域数
    pub fn pending_count(&self) -> usize {
        self.watched
            .values()
            .filter(|state| **state == Observed::Paused)
            .count()
    }

    /// 区域与判定区域的相交比例
    pub fn intersection_ratio(&self, viewport: Rect, target: Rect) -> f32 {
        ratio_in(self.options.root(viewport), target)
    }

    /// 根据当前视口与各区域位置更新状态
    ///
    /// 返回本次新显现的区域（按 id 排序）。没有提供位置的区域保持暂停。
    pub fn observe(&mut self, viewport: Rect, rects: &HashMap<SurfaceId, Rect>) -> Vec<SurfaceId> {
        let root = self.options.root(viewport);
        let threshold = self.options.threshold;
        let mut revealed = Vec::new();

        for (id, state) in &mut self.watched {
            if *state == Observed::Revealed {
                continue;
            }
            let Some(rect) = rects.get(id) else {
                continue;
            };

            let ratio = ratio_in(root, *rect);
            if ratio > 0.0 && ratio >= threshold {
                *state = Observed::Revealed;
                revealed.push(id.clone());
            }
        }

        revealed
    }
}

fn ratio_in(root: Rect, target: Rect) -> f32 {
    let area = target.area();
    if area <= 0.0 {
        return if root.contains_point(target.x, target.y) {
            1.0
        } else {
            0.0
        };
    }
    root.intersection(&target)
        .map_or(0.0, |overlap| overlap.area() / area)
}
