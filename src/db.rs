// ==========================================
// 赛事数据导入 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，多个导入任务同时写同一赛事库时排队等待而非直接失败
// - 提供幂等建表（event_template / event / division / participant / entry / config_kv）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::path::PathBuf;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 默认数据库路径
///
/// 优先级: 环境变量 CONTEST_IMPORT_DB_PATH → 用户数据目录/contest-import/contest_import.db → ./contest_import.db
pub fn default_db_path() -> String {
    if let Ok(path) = std::env::var("CONTEST_IMPORT_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./contest_import.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("contest-import");
        // 目录创建失败时由后续 open 报错
        std::fs::create_dir_all(&dir).ok();
        path = dir.join("contest_import.db");
    }

    path.to_string_lossy().to_string()
}

/// 建表（幂等）
///
/// 约束:
/// - entry: UNIQUE(event_id, entry_number)，序号分配器依赖此约束检测并发冲突
/// - division: (event_id, code) 在 code 非空时唯一
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS event_template (
            template_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            division_types_json TEXT NOT NULL DEFAULT '[]'
        );

        CREATE TABLE IF NOT EXISTS event (
            event_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            template_id TEXT REFERENCES event_template(template_id),
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS division (
            division_id TEXT PRIMARY KEY,
            event_id TEXT NOT NULL REFERENCES event(event_id) ON DELETE CASCADE,
            code TEXT,
            name TEXT NOT NULL,
            type TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS ux_division_event_code
            ON division(event_id, code) WHERE code IS NOT NULL;

        CREATE TABLE IF NOT EXISTS participant (
            participant_id TEXT PRIMARY KEY,
            event_id TEXT NOT NULL REFERENCES event(event_id) ON DELETE CASCADE,
            division_id TEXT REFERENCES division(division_id),
            name TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS entry (
            entry_id TEXT PRIMARY KEY,
            event_id TEXT NOT NULL REFERENCES event(event_id) ON DELETE CASCADE,
            division_id TEXT REFERENCES division(division_id),
            participant_id TEXT REFERENCES participant(participant_id),
            entry_number INTEGER NOT NULL,
            name TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            UNIQUE (event_id, entry_number)
        );
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;

    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();

        assert_eq!(read_schema_version(&conn).unwrap(), None);

        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();

        assert_eq!(
            read_schema_version(&conn).unwrap(),
            Some(CURRENT_SCHEMA_VERSION)
        );
    }
}
