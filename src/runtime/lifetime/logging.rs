use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

const LOG_FILE_PREFIX: &str = "schooldesk.log";

/// 初始化全局日志
///
/// 开发环境输出带文件与行号的彩色文本，其余环境输出 JSON。
/// 配置了 `app.log_dir` 时按天滚动写入文件，否则写标准输出。
/// 返回的 guard 必须存活到进程结束，否则缓冲中的日志会丢失。
pub fn init_logging(config: &AppConfig) -> WorkerGuard {
    let (writer, guard) = if config.app.log_dir.trim().is_empty() {
        tracing_appender::non_blocking(std::io::stdout())
    } else {
        let appender = tracing_appender::rolling::daily(&config.app.log_dir, LOG_FILE_PREFIX);
        tracing_appender::non_blocking(appender)
    };

    let filter = EnvFilter::try_new(&config.app.log_level).unwrap_or_else(|e| {
        eprintln!(
            "Invalid log level '{}': {e}, falling back to info",
            config.app.log_level
        );
        EnvFilter::new("info")
    });
    let to_terminal = config.app.log_dir.trim().is_empty();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_level(true)
        .with_ansi(to_terminal);

    if config.is_development() {
        builder.with_file(true).with_line_number(true).init();
    } else {
        builder.json().init();
    }

    guard
}
