//! fx-demo - 打字机效果演示
//!
//! 把文本逐字显示到内存中的显示区域，并把新出现的字符实时输出到终端。
//!
//! ## 使用方法
//!
//! ```bash
//! # 使用默认文本与 config.json
//! cargo run -p fx-host
//!
//! # 指定文本与速度
//! cargo run -p fx-host -- --text "Hi\nBye" --speed 80
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use fx_host::{AppConfig, FxHost, logging};
use tokio::task::LocalSet;
use tracing::info;

const SURFACE_ID: &str = "message";
const DEFAULT_TEXT: &str = "夜空中的星星一颗颗亮起。\n故事，从这里开始。";

#[derive(Parser)]
#[command(name = "fx-demo")]
#[command(about = "打字机效果演示")]
struct Cli {
    /// 要显示的文本（支持 \n 换行转义）
    #[arg(short, long)]
    text: Option<String>,

    /// 每字间隔（毫秒），覆盖配置文件
    #[arg(short, long)]
    speed: Option<u64>,

    /// 配置文件路径
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// 日志级别，覆盖配置文件
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config);
    if let Some(speed) = cli.speed {
        config.typewriter.speed_ms = speed;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    logging::init(&config.log_level);

    let text = cli
        .text
        .map(|t| t.replace("\\n", "\n"))
        .unwrap_or_else(|| DEFAULT_TEXT.to_string());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("无法创建 tokio 运行时")?;

    LocalSet::new().block_on(&runtime, run(config, text))
}

async fn run(config: AppConfig, text: String) -> Result<()> {
    let host = FxHost::new(config).context("宿主初始化失败")?;
    host.register_surface(SURFACE_ID);

    let handle = host
        .revealer()
        .spawn_reveal(
            SURFACE_ID,
            &text,
            None,
            Some(Box::new(|| info!("显示完成"))),
        )
        .context("打字机效果启动失败")?;

    // 按每字间隔轮询区域，输出新增字符
    let poll = host.revealer().default_speed().max(Duration::from_millis(1));
    let mut printed = 0;
    let mut stdout = std::io::stdout();
    loop {
        if let Some(surface) = host.surface(SURFACE_ID) {
            let rendered = surface.render_text();
            let fresh: String = rendered.chars().skip(printed).collect();
            if !fresh.is_empty() {
                printed += fresh.chars().count();
                write!(stdout, "{fresh}")?;
                stdout.flush()?;
            }
        }
        if handle.is_finished() {
            break;
        }
        tokio::time::sleep(poll).await;
    }
    writeln!(stdout)?;

    let outcome = handle.finished().await;
    info!(?outcome, "演示结束");
    Ok(())
}
