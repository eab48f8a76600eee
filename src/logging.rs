// ==========================================
// 赛事数据导入 - 日志初始化
// ==========================================
// 输出: 人读格式（命令行）/ JSON（上传服务采集）/ 测试 writer
// 级别: RUST_LOG 优先，缺省 info
// 导入批次相关字段（batch_id / event_id / mode）由 ImportCoordinator 的 span 携带
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 缺省过滤级别
pub const DEFAULT_FILTER: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// 人读格式日志（import_event_file 缺省使用）
///
/// # 环境变量
/// - RUST_LOG: 例如 `contest_import::importer=debug` 可看到逐行跳过、
///   组别新建与序号冲突重试
///
/// # 示例
/// ```no_run
/// contest_import::logging::init();
/// ```
pub fn init() {
    fmt()
        .with_env_filter(env_filter())
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// JSON 日志，每条事件一行，span 字段（batch_id 等）一并输出
pub fn init_json() {
    fmt()
        .with_env_filter(env_filter())
        .json()
        .with_current_span(true)
        .init();
}

/// 测试用：debug 级别写入测试输出，多个测试重复调用不会报错
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
