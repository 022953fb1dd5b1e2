//! # 宿主效果集成测试
//!
//! 测试 FxHost 上的延迟显示、滚动显现节流与配置驱动的打字机效果。

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use fx_host::{ANIMATE_IN_CLASS, AppConfig, FxHost, HostError};
use fx_runtime::{Rect, SurfaceId};
use tokio::task::LocalSet;
use tokio::time::{Instant, sleep_until};

const VIEWPORT: Rect = Rect {
    x: 0.0,
    y: 0.0,
    w: 1280.0,
    h: 720.0,
};

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn host_with(ids: &[&str], config: AppConfig) -> FxHost {
    let host = FxHost::new(config).unwrap();
    for id in ids {
        host.register_surface(id);
    }
    host
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut config = AppConfig::default();
    config.observer.threshold = -0.5;

    let result = FxHost::new(config);
    assert!(matches!(result, Err(HostError::Config(_))));
}

#[tokio::test(start_paused = true)]
async fn test_reveal_uses_configured_speed_and_grace() {
    LocalSet::new()
        .run_until(async {
            let mut config = AppConfig::default();
            config.typewriter.speed_ms = 20;
            config.typewriter.grace_ms = 100;
            config.typewriter.indicator = "_".to_string();
            let host = host_with(&["story"], config);

            let done = Rc::new(Cell::new(false));
            let flag = Rc::clone(&done);
            let start = Instant::now();

            host.reveal_text("story", "ab", None, Some(Box::new(move || flag.set(true))));
            assert_eq!(host.surface("story").unwrap().render_markup(), "a");

            sleep_until(start + ms(25)).await;
            assert_eq!(host.surface("story").unwrap().render_markup(), "ab");

            // t = 40ms 显示光标，t = 140ms 回调
            sleep_until(start + ms(45)).await;
            assert_eq!(host.surface("story").unwrap().render_markup(), "ab_");
            assert!(!done.get());

            sleep_until(start + ms(145)).await;
            assert_eq!(host.surface("story").unwrap().render_markup(), "ab");
            assert!(done.get());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_show_after_hides_then_shows() {
    LocalSet::new()
        .run_until(async {
            let host = host_with(&["choices"], AppConfig::default());
            let start = Instant::now();

            host.show_after("choices", None);
            assert!(!host.surface("choices").unwrap().is_visible());

            sleep_until(start + ms(990)).await;
            assert!(!host.surface("choices").unwrap().is_visible());

            sleep_until(start + ms(1010)).await;
            assert!(host.surface("choices").unwrap().is_visible());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_show_after_missing_target() {
    LocalSet::new()
        .run_until(async {
            let host = host_with(&["choices"], AppConfig::default());

            host.show_after("missing", Some(ms(10)));
            sleep_until(Instant::now() + ms(50)).await;

            assert_eq!(host.surfaces().borrow().total_mutations(), 0);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_scroll_reveal_is_throttled() {
    let mut host = host_with(&["card-a", "card-b"], AppConfig::default());
    host.watch("card-a");
    host.watch("card-b");
    let start = Instant::now();

    let mut rects = HashMap::new();
    rects.insert(SurfaceId::new("card-a"), Rect::new(0.0, 100.0, 300.0, 200.0));
    rects.insert(SurfaceId::new("card-b"), Rect::new(0.0, 2000.0, 300.0, 200.0));

    let revealed = host.on_scroll(VIEWPORT, &rects);
    assert_eq!(revealed, vec![SurfaceId::new("card-a")]);
    assert!(host.surface("card-a").unwrap().has_class(ANIMATE_IN_CLASS));
    assert!(!host.surface("card-b").unwrap().has_class(ANIMATE_IN_CLASS));

    // 节流窗口内的滚动事件被丢弃
    rects.insert(SurfaceId::new("card-b"), Rect::new(0.0, 300.0, 300.0, 200.0));
    sleep_until(start + ms(5)).await;
    assert!(host.on_scroll(VIEWPORT, &rects).is_empty());
    assert!(!host.observer().is_revealed("card-b"));

    sleep_until(start + ms(20)).await;
    let revealed = host.on_scroll(VIEWPORT, &rects);
    assert_eq!(revealed, vec![SurfaceId::new("card-b")]);
    assert!(host.surface("card-b").unwrap().has_class(ANIMATE_IN_CLASS));

    // 已显现的区域不会重复报告
    sleep_until(start + ms(40)).await;
    assert!(host.on_scroll(VIEWPORT, &rects).is_empty());
}
