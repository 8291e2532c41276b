use tracing_subscriber::EnvFilter;

use crate::core::constants::log;

/// `-v` 次数对应的日志级别
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => log::DEFAULT_LOG_LEVEL,
        1 => "info",
        _ => "debug",
    }
}

/// 初始化日志：优先 RUST_LOG，否则按 `-v` 次数；输出到 stderr
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_env(log::LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
