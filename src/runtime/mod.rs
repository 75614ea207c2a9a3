//! 运行时模块

pub mod lifetime;

use crate::config::AppConfig;
use tracing_appender::non_blocking::WorkerGuard;

/// 初始化 tracing 日志
///
/// 返回的 guard 决定非阻塞写线程的生命周期，宿主需持有到进程退出。
/// 必须在 AppConfig::init 之后调用。
pub fn init_tracing() -> WorkerGuard {
    let config = AppConfig::get();

    let stdout_log = std::io::stdout();
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(stdout_log);
    let filter = tracing_subscriber::EnvFilter::new(&config.app.log_level);
    let tracing_format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_ansi(true);

    let tracing_builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking_writer)
        .event_format(tracing_format);

    if config.is_development() {
        tracing_builder
            .with_file(true)
            .with_line_number(true)
            .init();
    } else {
        tracing_builder.json().init();
    }

    guard
}
