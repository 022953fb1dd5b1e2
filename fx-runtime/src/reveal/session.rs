//! 逐字显示会话实现

use std::time::Duration;

use super::{DEFAULT_SPEED, RevealOutcome, RevealStyle, RevealWait};
use crate::error::RevealError;
use crate::surface::{SessionToken, Surface, SurfaceId, SurfaceNode, SurfaceRegistry};

/// 会话阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    /// 正在逐字显示
    Revealing,
    /// 全部字符已显示，光标指示符停留中
    Completing,
    /// 已结束
    Done(RevealOutcome),
}

/// 尚未开始的逐字显示请求
#[derive(Debug, Clone)]
pub struct RevealRequest {
    target: SurfaceId,
    text: Vec<char>,
    speed: Duration,
    style: RevealStyle,
}

impl RevealRequest {
    pub fn new(target: impl Into<SurfaceId>, text: &str) -> Self {
        Self {
            target: target.into(),
            text: text.chars().collect(),
            speed: DEFAULT_SPEED,
            style: RevealStyle::default(),
        }
    }

    /// 设置每字间隔（不做范围检查）
    pub fn with_speed(mut self, speed: Duration) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_style(mut self, style: RevealStyle) -> Self {
        self.style = style;
        self
    }

    /// 开始显示
    ///
    /// 占用目标区域、清空内容、添加进行中样式类，并立即执行第一次 tick
    /// （显示首字；空文本则直接显示光标指示符）。
    ///
    /// 目标不存在时返回 [`RevealError::TargetNotFound`]，且不修改任何区域。
    pub fn start(
        self,
        surfaces: &mut SurfaceRegistry,
    ) -> Result<(RevealSession, RevealWait), RevealError> {
        let (token, surface) = surfaces.claim(&self.target)?;

        surface.clear();
        surface.add_class(&self.style.typing_class);

        let mut session = RevealSession {
            target: self.target,
            text: self.text,
            speed: self.speed,
            style: self.style,
            cursor: 0,
            phase: RevealPhase::Revealing,
            token,
        };
        let wait = session.step(surface);
        Ok((session, wait))
    }
}

/// 进行中的逐字显示会话
///
/// 每次 tick 只推进一步；同一会话同时最多只有一个待执行的 tick。
#[derive(Debug, Clone)]
pub struct RevealSession {
    target: SurfaceId,
    text: Vec<char>,
    speed: Duration,
    style: RevealStyle,
    /// 下一个待显示字符的索引
    cursor: usize,
    phase: RevealPhase,
    token: SessionToken,
}

impl RevealSession {
    pub fn target(&self) -> &SurfaceId {
        &self.target
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// 文本总字符数
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn speed(&self) -> Duration {
        self.speed
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    pub fn token(&self) -> SessionToken {
        self.token
    }

    /// 推进一步
    ///
    /// 区域已不属于本会话时不做任何修改，直接结束为 `Superseded`。
    pub fn tick(&mut self, surfaces: &mut SurfaceRegistry) -> RevealWait {
        if let RevealPhase::Done(outcome) = self.phase {
            return RevealWait::Finished(outcome);
        }

        match surfaces.owned_mut(self.target.as_str(), self.token) {
            Some(surface) => self.step(surface),
            None => self.finish(RevealOutcome::Superseded),
        }
    }

    /// 跳过剩余的逐字过程，立即显示全部文本并进入光标停留阶段
    ///
    /// 仅在 `Revealing` 阶段有效，其他阶段返回 `None`。
    pub fn skip(&mut self, surfaces: &mut SurfaceRegistry) -> Option<RevealWait> {
        if self.phase != RevealPhase::Revealing {
            return None;
        }

        let Some(surface) = surfaces.owned_mut(self.target.as_str(), self.token) else {
            return Some(self.finish(RevealOutcome::Superseded));
        };

        for &c in &self.text[self.cursor..] {
            surface.append(node_for(c));
        }
        self.cursor = self.text.len();
        Some(self.enter_completing(surface))
    }

    fn step(&mut self, surface: &mut Surface) -> RevealWait {
        match self.phase {
            RevealPhase::Revealing => match self.text.get(self.cursor) {
                Some(&c) => {
                    surface.append(node_for(c));
                    self.cursor += 1;
                    RevealWait::Delay(self.speed)
                }
                None => self.enter_completing(surface),
            },
            RevealPhase::Completing => {
                surface.remove_indicator(&self.style.indicator);
                self.finish(RevealOutcome::Completed)
            }
            RevealPhase::Done(outcome) => RevealWait::Finished(outcome),
        }
    }

    fn enter_completing(&mut self, surface: &mut Surface) -> RevealWait {
        surface.remove_class(&self.style.typing_class);
        surface.append(SurfaceNode::Indicator(self.style.indicator.clone()));
        self.phase = RevealPhase::Completing;
        RevealWait::Delay(self.style.grace)
    }

    fn finish(&mut self, outcome: RevealOutcome) -> RevealWait {
        self.phase = RevealPhase::Done(outcome);
        RevealWait::Finished(outcome)
    }
}

fn node_for(c: char) -> SurfaceNode {
    if c == '\n' {
        SurfaceNode::LineBreak
    } else {
        SurfaceNode::Text(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reveal::{GRACE_INTERVAL, TYPING_CLASS};

    const SPEED: Duration = Duration::from_millis(10);

    fn registry(ids: &[&str]) -> SurfaceRegistry {
        let mut surfaces = SurfaceRegistry::new();
        for id in ids {
            surfaces.insert(*id);
        }
        surfaces
    }

    fn markup(surfaces: &SurfaceRegistry, id: &str) -> String {
        surfaces.get(id).unwrap().render_markup()
    }

    #[test]
    fn test_reveal_sequence() {
        let mut surfaces = registry(&["msg"]);
        let (mut session, wait) = RevealRequest::new("msg", "Hi\nBye")
            .with_speed(SPEED)
            .start(&mut surfaces)
            .unwrap();

        assert_eq!(wait, RevealWait::Delay(SPEED));
        assert_eq!(markup(&surfaces, "msg"), "H");
        assert!(surfaces.get("msg").unwrap().has_class(TYPING_CLASS));

        let mut frames = Vec::new();
        for _ in 0..5 {
            assert_eq!(session.tick(&mut surfaces), RevealWait::Delay(SPEED));
            frames.push(markup(&surfaces, "msg"));
        }
        assert_eq!(
            frames,
            vec!["Hi", "Hi<br>", "Hi<br>B", "Hi<br>By", "Hi<br>Bye"]
        );
        assert_eq!(session.cursor(), session.len());
        assert_eq!(session.phase(), RevealPhase::Revealing);

        // 光标到达末尾后的下一次 tick 进入停留阶段
        assert_eq!(session.tick(&mut surfaces), RevealWait::Delay(GRACE_INTERVAL));
        assert_eq!(session.phase(), RevealPhase::Completing);
        let surface = surfaces.get("msg").unwrap();
        assert!(!surface.has_class(TYPING_CLASS));
        insta::assert_snapshot!(surface.render_markup(), @"Hi<br>Bye|");

        assert_eq!(
            session.tick(&mut surfaces),
            RevealWait::Finished(RevealOutcome::Completed)
        );
        assert_eq!(markup(&surfaces, "msg"), "Hi<br>Bye");

        // 结束后继续 tick 不再修改
        let before = surfaces.total_mutations();
        assert!(session.tick(&mut surfaces).is_finished());
        assert_eq!(surfaces.total_mutations(), before);
    }

    #[test]
    fn test_line_breaks_never_render_as_text() {
        let mut surfaces = registry(&["msg"]);
        let (mut session, _) = RevealRequest::new("msg", "\n\na\n")
            .start(&mut surfaces)
            .unwrap();
        while !session.tick(&mut surfaces).is_finished() {}

        let nodes = surfaces.get("msg").unwrap().nodes();
        assert_eq!(
            nodes,
            &[
                SurfaceNode::LineBreak,
                SurfaceNode::LineBreak,
                SurfaceNode::Text('a'),
                SurfaceNode::LineBreak,
            ]
        );
    }

    #[test]
    fn test_empty_text_goes_straight_to_completion() {
        let mut surfaces = registry(&["msg"]);
        surfaces.get_mut("msg").unwrap().append(SurfaceNode::Text('x'));

        let (mut session, wait) = RevealRequest::new("msg", "").start(&mut surfaces).unwrap();

        assert_eq!(wait, RevealWait::Delay(GRACE_INTERVAL));
        assert_eq!(session.phase(), RevealPhase::Completing);
        assert_eq!(markup(&surfaces, "msg"), "|");
        assert!(!surfaces.get("msg").unwrap().has_class(TYPING_CLASS));

        assert_eq!(
            session.tick(&mut surfaces),
            RevealWait::Finished(RevealOutcome::Completed)
        );
        assert!(surfaces.get("msg").unwrap().is_empty());
    }

    #[test]
    fn test_missing_target_mutates_nothing() {
        let mut surfaces = registry(&["other"]);
        let err = RevealRequest::new("msg", "Hi")
            .start(&mut surfaces)
            .unwrap_err();

        assert_eq!(
            err,
            RevealError::TargetNotFound {
                id: SurfaceId::new("msg")
            }
        );
        assert_eq!(surfaces.total_mutations(), 0);
    }

    #[test]
    fn test_superseded_session_stops_mutating() {
        let mut surfaces = registry(&["msg"]);
        let (mut old, _) = RevealRequest::new("msg", "AAAA")
            .start(&mut surfaces)
            .unwrap();
        let (mut new, _) = RevealRequest::new("msg", "BB")
            .start(&mut surfaces)
            .unwrap();

        let before = surfaces.total_mutations();
        assert_eq!(
            old.tick(&mut surfaces),
            RevealWait::Finished(RevealOutcome::Superseded)
        );
        assert_eq!(old.phase(), RevealPhase::Done(RevealOutcome::Superseded));
        assert_eq!(surfaces.total_mutations(), before);

        new.tick(&mut surfaces);
        assert_eq!(markup(&surfaces, "msg"), "BB");
    }

    #[test]
    fn test_removed_target_supersedes_session() {
        let mut surfaces = registry(&["msg"]);
        let (mut session, _) = RevealRequest::new("msg", "abc")
            .start(&mut surfaces)
            .unwrap();
        surfaces.remove("msg");

        assert_eq!(
            session.tick(&mut surfaces),
            RevealWait::Finished(RevealOutcome::Superseded)
        );
    }

    #[test]
    fn test_skip_reveals_remaining_text() {
        let mut surfaces = registry(&["msg"]);
        let (mut session, _) = RevealRequest::new("msg", "Hello\nworld")
            .start(&mut surfaces)
            .unwrap();
        session.tick(&mut surfaces);

        assert_eq!(
            session.skip(&mut surfaces),
            Some(RevealWait::Delay(GRACE_INTERVAL))
        );
        assert_eq!(markup(&surfaces, "msg"), "Hello<br>world|");
        assert_eq!(session.cursor(), session.len());

        // 停留阶段再次跳过无效
        assert_eq!(session.skip(&mut surfaces), None);
        assert_eq!(
            session.tick(&mut surfaces),
            RevealWait::Finished(RevealOutcome::Completed)
        );
        assert_eq!(session.skip(&mut surfaces), None);
    }

    #[test]
    fn test_custom_style() {
        let mut surfaces = registry(&["msg"]);
        let style = RevealStyle {
            indicator: "▌".to_string(),
            typing_class: "busy".to_string(),
            grace: Duration::from_millis(500),
        };
        let (mut session, _) = RevealRequest::new("msg", "a")
            .with_style(style)
            .start(&mut surfaces)
            .unwrap();
        assert!(surfaces.get("msg").unwrap().has_class("busy"));

        assert_eq!(
            session.tick(&mut surfaces),
            RevealWait::Delay(Duration::from_millis(500))
        );
        assert_eq!(markup(&surfaces, "msg"), "a▌");
    }

    #[test]
    fn test_multibyte_text_counts_chars() {
        let mut surfaces = registry(&["msg"]);
        let (mut session, _) = RevealRequest::new("msg", "星空")
            .start(&mut surfaces)
            .unwrap();
        assert_eq!(session.len(), 2);
        assert_eq!(markup(&surfaces, "msg"), "星");

        session.tick(&mut surfaces);
        assert_eq!(markup(&surfaces, "msg"), "星空");
    }
}
