//! # Revealer 模块
//!
//! 打字机效果的定时驱动。
//!
//! 每个会话对应一个 `spawn_local` 任务：任务内依次等待 `RevealWait::Delay`，
//! 再调用 `RevealSession::tick`，因此同一会话任意时刻最多只有一个待执行的 tick。
//! 所有任务运行在同一线程的 `LocalSet` 上，显示区域以 `Rc<RefCell<_>>` 共享，
//! 借用从不跨越 `.await`。

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use fx_runtime::{
    RevealError, RevealOutcome, RevealRequest, RevealSession, RevealStyle, RevealWait,
    SurfaceId, SurfaceRegistry,
};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, error, warn};

use crate::config::TypewriterConfig;

/// 完成回调
pub type CompletionCallback = Box<dyn FnOnce() + 'static>;

/// 打字机效果驱动器
pub struct Revealer {
    surfaces: Rc<RefCell<SurfaceRegistry>>,
    style: RevealStyle,
    default_speed: Duration,
}

impl Revealer {
    pub fn new(
        surfaces: Rc<RefCell<SurfaceRegistry>>,
        style: RevealStyle,
        default_speed: Duration,
    ) -> Self {
        Self {
            surfaces,
            style,
            default_speed,
        }
    }

    pub fn from_config(surfaces: Rc<RefCell<SurfaceRegistry>>, config: &TypewriterConfig) -> Self {
        Self::new(surfaces, config.style(), config.speed())
    }

    pub fn default_speed(&self) -> Duration {
        self.default_speed
    }

    /// 在目标区域逐字显示文本
    ///
    /// 目标不存在时只记录错误，不做任何修改。
    /// 必须在 `LocalSet` 内调用。
    pub fn reveal_text(
        &self,
        target_id: &str,
        text: &str,
        speed: Option<Duration>,
        on_complete: Option<CompletionCallback>,
    ) {
        if let Err(e) = self.spawn_reveal(target_id, text, speed, on_complete) {
            error!(target_id = %target_id, error = %e, "打字机效果启动失败");
        }
    }

    /// 启动逐字显示并返回任务句柄
    ///
    /// 清空区域与首字显示在调用期间同步完成，之后的 tick 由后台任务驱动。
    pub fn spawn_reveal(
        &self,
        target_id: &str,
        text: &str,
        speed: Option<Duration>,
        on_complete: Option<CompletionCallback>,
    ) -> Result<RevealHandle, RevealError> {
        let speed = speed.unwrap_or(self.default_speed);
        let request = RevealRequest::new(target_id, text)
            .with_speed(speed)
            .with_style(self.style.clone());

        let (session, wait) = request.start(&mut self.surfaces.borrow_mut())?;
        debug!(
            target_id = %target_id,
            chars = session.len(),
            speed_ms = speed.as_millis() as u64,
            "开始打字机效果"
        );

        let skip = Rc::new(Notify::new());
        let task = tokio::task::spawn_local(drive(
            session,
            wait,
            Rc::clone(&self.surfaces),
            Rc::clone(&skip),
            on_complete,
        ));

        Ok(RevealHandle {
            target: SurfaceId::new(target_id),
            skip,
            task,
        })
    }
}

/// 进行中会话的句柄
///
/// 丢弃句柄不会停止会话。
pub struct RevealHandle {
    target: SurfaceId,
    skip: Rc<Notify>,
    task: JoinHandle<RevealOutcome>,
}

impl RevealHandle {
    pub fn target(&self) -> &SurfaceId {
        &self.target
    }

    /// 跳过剩余的逐字过程（光标停留与回调照常进行）
    pub fn skip(&self) {
        self.skip.notify_one();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// 等待会话结束
    pub async fn finished(self) -> RevealOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(target_id = %self.target, error = %e, "打字机任务异常结束");
                RevealOutcome::Superseded
            }
        }
    }
}

async fn drive(
    mut session: RevealSession,
    mut wait: RevealWait,
    surfaces: Rc<RefCell<SurfaceRegistry>>,
    skip: Rc<Notify>,
    mut on_complete: Option<CompletionCallback>,
) -> RevealOutcome {
    loop {
        let delay = match wait {
            RevealWait::Delay(delay) => delay,
            RevealWait::Finished(outcome) => {
                match outcome {
                    RevealOutcome::Completed => {
                        debug!(target_id = %session.target(), "打字机效果完成");
                        if let Some(callback) = on_complete.take() {
                            callback();
                        }
                    }
                    RevealOutcome::Superseded => {
                        debug!(target_id = %session.target(), "打字机效果已被新的会话取代");
                    }
                }
                return outcome;
            }
        };

        let deadline = Instant::now() + delay;
        wait = 'waiting: loop {
            tokio::select! {
                _ = sleep_until(deadline) => {
                    break 'waiting session.tick(&mut surfaces.borrow_mut());
                }
                _ = skip.notified() => {
                    if let Some(next) = session.skip(&mut surfaces.borrow_mut()) {
                        debug!(target_id = %session.target(), "跳过打字机效果");
                        break 'waiting next;
                    }
                }
            }
        };
    }
}
