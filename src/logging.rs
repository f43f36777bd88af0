// ==========================================
// 日志系统初始化
// ==========================================
// tracing-subscriber，输出到 stderr（stdout 只留给导入报告）
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 日志格式环境变量（值为 json 时输出结构化日志）
pub const LOG_FORMAT_ENV: &str = "CLASS_SCHEDULE_LOG_FORMAT";

/// 初始化日志系统
///
/// # 环境变量
/// - RUST_LOG: 日志级别过滤器（默认: info）
///   例如: RUST_LOG=class_schedule::engine=debug
/// - CLASS_SCHEDULE_LOG_FORMAT: json | text（默认 text）
///
/// # 示例
/// ```no_run
/// use class_schedule::logging;
/// logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr);

    // 重复初始化时忽略
    let _ = if wants_json(std::env::var(LOG_FORMAT_ENV).ok().as_deref()) {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

/// 初始化测试环境的日志系统（debug 级别）
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

fn wants_json(format: Option<&str>) -> bool {
    format.is_some_and(|f| f.trim().eq_ignore_ascii_case("json"))
}
