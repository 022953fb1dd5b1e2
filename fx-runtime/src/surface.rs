//! # Surface 模块
//!
//! 显示区域（display surface）：接收逐字显示内容的目标元素。
//!
//! 显示区域由调用方通过 [`SurfaceRegistry`] 持有，会话只在每次
//! tick 时按 [`SurfaceId`] 重新查找，不保留引用。

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::error::RevealError;

/// 显示区域标识符
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceId(String);

impl SurfaceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SurfaceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SurfaceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for SurfaceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// 会话令牌
///
/// 每次在显示区域上开始新会话时分配，用于让过期会话识别自己已被取代。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionToken(u64);

/// 显示区域中的一个节点
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceNode {
    /// 单个字符
    Text(char),
    /// 换行
    LineBreak,
    /// 临时光标指示符（闪烁光标）
    Indicator(String),
}

/// 显示区域
#[derive(Debug, Clone)]
pub struct Surface {
    id: SurfaceId,
    nodes: Vec<SurfaceNode>,
    classes: BTreeSet<String>,
    visible: bool,
    /// 当前拥有此区域的会话
    owner: Option<SessionToken>,
    /// 变更计数（每次内容/样式/可见性变化 +1）
    mutations: usize,
}

impl Surface {
    pub fn new(id: impl Into<SurfaceId>) -> Self {
        Self {
            id: id.into(),
            nodes: Vec::new(),
            classes: BTreeSet::new(),
            visible: true,
            owner: None,
            mutations: 0,
        }
    }

    pub fn id(&self) -> &SurfaceId {
        &self.id
    }

    pub fn nodes(&self) -> &[SurfaceNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 清空全部内容
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.mutations += 1;
    }

    /// 在末尾追加节点
    pub fn append(&mut self, node: SurfaceNode) {
        self.nodes.push(node);
        self.mutations += 1;
    }

    /// 移除最后一个与 `glyph` 相同的光标指示符，返回是否找到
    pub fn remove_indicator(&mut self, glyph: &str) -> bool {
        let position = self
            .nodes
            .iter()
            .rposition(|node| matches!(node, SurfaceNode::Indicator(g) if g == glyph));

        match position {
            Some(index) => {
                self.nodes.remove(index);
                self.mutations += 1;
                true
            }
            None => false,
        }
    }

    /// 是否存在光标指示符
    pub fn has_indicator(&self) -> bool {
        self.nodes
            .iter()
            .any(|node| matches!(node, SurfaceNode::Indicator(_)))
    }

    /// 添加样式类（已存在时不计为变更）
    pub fn add_class(&mut self, class: &str) {
        if self.classes.insert(class.to_string()) {
            self.mutations += 1;
        }
    }

    /// 移除样式类
    pub fn remove_class(&mut self, class: &str) {
        if self.classes.remove(class) {
            self.mutations += 1;
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.mutations += 1;
        }
    }

    pub fn owner(&self) -> Option<SessionToken> {
        self.owner
    }

    pub fn mutation_count(&self) -> usize {
        self.mutations
    }

    /// 已显示的字符数（换行计为一个字符，不含光标）
    pub fn revealed_len(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| !matches!(node, SurfaceNode::Indicator(_)))
            .count()
    }

    /// 渲染为 HTML 风格的标记（换行为 `<br>`，光标原样输出）
    pub fn render_markup(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                SurfaceNode::Text(c) => out.push(*c),
                SurfaceNode::LineBreak => out.push_str("<br>"),
                SurfaceNode::Indicator(glyph) => out.push_str(glyph),
            }
        }
        out
    }

    /// 渲染为纯文本（换行为 `\n`，不含光标）
    pub fn render_text(&self) -> String {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                SurfaceNode::Text(c) => Some(*c),
                SurfaceNode::LineBreak => Some('\n'),
                SurfaceNode::Indicator(_) => None,
            })
            .collect()
    }
}

/// 显示区域注册表
///
/// 调用方持有所有显示区域；会话通过 id 查找目标。
#[derive(Debug, Default)]
pub struct SurfaceRegistry {
    surfaces: HashMap<SurfaceId, Surface>,
    next_token: u64,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册显示区域（已存在时替换为空区域）
    pub fn insert(&mut self, id: impl Into<SurfaceId>) -> &mut Surface {
        let id = id.into();
        let slot = self
            .surfaces
            .entry(id.clone())
            .or_insert_with(|| Surface::new(id.clone()));
        *slot = Surface::new(id);
        slot
    }

    pub fn remove(&mut self, id: &str) -> Option<Surface> {
        self.surfaces.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&Surface> {
        self.surfaces.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Surface> {
        self.surfaces.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.surfaces.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// 所有区域的变更总数
    pub fn total_mutations(&self) -> usize {
        self.surfaces.values().map(Surface::mutation_count).sum()
    }

    /// 为新会话占用显示区域
    ///
    /// 分配新令牌并记录为区域的拥有者，之前的会话自此过期。
    /// 目标不存在时不做任何修改。
    pub fn claim(&mut self, id: &SurfaceId) -> Result<(SessionToken, &mut Surface), RevealError> {
        let surface = self
            .surfaces
            .get_mut(id.as_str())
            .ok_or_else(|| RevealError::TargetNotFound { id: id.clone() })?;

        self.next_token += 1;
        let token = SessionToken(self.next_token);
        surface.owner = Some(token);
        Ok((token, surface))
    }

    /// 获取仍由 `token` 拥有的显示区域
    ///
    /// 区域已被移除或已被新会话占用时返回 `None`。
    pub fn owned_mut(&mut self, id: &str, token: SessionToken) -> Option<&mut Surface> {
        self.surfaces
            .get_mut(id)
            .filter(|surface| surface.owner == Some(token))
    }
}
