// ==========================================
// 赛事数据导入 - 命令行导入工具
// ==========================================
// 用法: import_event_file <db|-> <event_id> <file> [combined|participants|divisions]
// - db 为 "-" 时使用默认路径（CONTEST_IMPORT_DB_PATH 或用户数据目录）
// - 导入统计以 JSON 输出到 stdout
// - 设置 CONTEST_IMPORT_LOG_JSON=1 输出 JSON 日志
// ==========================================

use anyhow::{bail, Context};
use contest_import::config::ConfigManager;
use contest_import::db::{default_db_path, init_schema, open_sqlite_connection};
use contest_import::importer::{EventImporter, EventImporterImpl, UniversalFileParser};
use contest_import::logging;
use contest_import::repository::ImportRepositoryImpl;
use contest_import::ImportMode;
use std::sync::{Arc, Mutex};

const USAGE: &str =
    "usage: import_event_file <db|-> <event_id> <file> [combined|participants|divisions]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::var("CONTEST_IMPORT_LOG_JSON").is_ok_and(|v| v == "1") {
        logging::init_json();
    } else {
        logging::init();
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 3 {
        bail!(USAGE);
    }

    let db_path = match args[0].as_str() {
        "-" => default_db_path(),
        path => path.to_string(),
    };
    let event_id = &args[1];
    let file_path = &args[2];
    let mode = ImportMode::parse_or_default(args.get(3).map(String::as_str));

    let conn = open_sqlite_connection(&db_path)
        .with_context(|| format!("无法打开数据库: {}", db_path))?;
    init_schema(&conn).context("建表失败")?;
    let conn = Arc::new(Mutex::new(conn));

    let importer = EventImporterImpl::new(
        ImportRepositoryImpl::from_connection(conn.clone()),
        ConfigManager::from_connection(conn)?,
        Box::new(UniversalFileParser),
    );

    let stats = importer
        .import_file(event_id, file_path, mode)
        .await
        .with_context(|| format!("导入失败: {}", file_path))?;

    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
