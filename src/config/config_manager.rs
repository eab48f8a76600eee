// ==========================================
// 赛事数据导入 - 配置管理器
// ==========================================
// 职责: 导入配置加载、查询、覆写
// 存储: config_kv 表 (key-value + scope)，缺省键回退到内置默认值
// ==========================================

use crate::config::import_config::{
    ImportConfig, DEFAULT_DIVISION_TYPE, DEFAULT_HEADER_ROWS, DEFAULT_MAX_ALLOCATION_ATTEMPTS,
};
use crate::config::import_config_trait::ImportConfigReader;
use crate::db::open_sqlite_connection;
use crate::importer::error::{ImportError, ImportResult};
use crate::repository::RepositoryError;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

/// 配置键
pub mod config_keys {
    pub const MAX_ALLOCATION_ATTEMPTS: &str = "import/max_allocation_attempts";
    pub const DEFAULT_DIVISION_TYPE: &str = "import/default_division_type";
    pub const HEADER_ROWS: &str = "import/header_rows";
    pub const DIVISION_ALIASES: &str = "import/division_aliases";
    pub const PARTICIPANT_ALIASES: &str = "import/participant_aliases";
}

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ImportResult<Self> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ImportResult<Self> {
        {
            let guard = lock(&conn)?;
            crate::db::configure_sqlite_connection(&guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> ImportResult<Option<String>> {
        let conn = lock(&self.conn)?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    /// 写入配置值（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> ImportResult<()> {
        let conn = lock(&self.conn)?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;

        Ok(())
    }

    fn parse_number<T: std::str::FromStr>(&self, key: &str, default: T) -> ImportResult<T> {
        match self.get_config_value(key)? {
            None => Ok(default),
            Some(raw) => raw.trim().parse::<T>().map_err(|_| ImportError::ConfigError {
                key: key.to_string(),
                value: raw.clone(),
                message: "无法解析为非负整数".to_string(),
            }),
        }
    }

    /// 逗号分隔的列名列表
    fn parse_aliases(&self, key: &str, default: Vec<String>) -> ImportResult<Vec<String>> {
        let raw = match self.get_config_value(key)? {
            None => return Ok(default),
            Some(raw) => raw,
        };

        let aliases: Vec<String> = raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if aliases.is_empty() {
            return Err(ImportError::ConfigError {
                key: key.to_string(),
                value: raw,
                message: "列名别名不能为空".to_string(),
            });
        }
        Ok(aliases)
    }
}

fn lock(conn: &Arc<Mutex<Connection>>) -> ImportResult<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|e| ImportError::Repository(RepositoryError::LockError(e.to_string())))
}

#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_max_allocation_attempts(&self) -> ImportResult<u32> {
        let attempts = self.parse_number(
            config_keys::MAX_ALLOCATION_ATTEMPTS,
            DEFAULT_MAX_ALLOCATION_ATTEMPTS,
        )?;
        if attempts == 0 {
            return Err(ImportError::ConfigError {
                key: config_keys::MAX_ALLOCATION_ATTEMPTS.to_string(),
                value: "0".to_string(),
                message: "至少需要 1 次尝试".to_string(),
            });
        }
        Ok(attempts)
    }

    async fn get_default_division_type(&self) -> ImportResult<String> {
        Ok(self
            .get_config_value(config_keys::DEFAULT_DIVISION_TYPE)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_DIVISION_TYPE.to_string()))
    }

    async fn get_header_rows(&self) -> ImportResult<usize> {
        self.parse_number(config_keys::HEADER_ROWS, DEFAULT_HEADER_ROWS)
    }

    async fn get_division_aliases(&self) -> ImportResult<Vec<String>> {
        self.parse_aliases(
            config_keys::DIVISION_ALIASES,
            ImportConfig::default().division_aliases,
        )
    }

    async fn get_participant_aliases(&self) -> ImportResult<Vec<String>> {
        self.parse_aliases(
            config_keys::PARTICIPANT_ALIASES,
            ImportConfig::default().participant_aliases,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[tokio::test]
    async fn test_defaults_when_keys_missing() {
        let manager = setup();

        let config = manager.load_import_config().await.unwrap();

        assert_eq!(config, ImportConfig::default());
    }

    #[tokio::test]
    async fn test_overrides_from_config_kv() {
        let manager = setup();
        manager
            .set_config_value(config_keys::MAX_ALLOCATION_ATTEMPTS, "8")
            .unwrap();
        manager
            .set_config_value(config_keys::PARTICIPANT_ALIASES, " cook , team ,")
            .unwrap();
        manager
            .set_config_value(config_keys::DEFAULT_DIVISION_TYPE, "Open")
            .unwrap();

        let config = manager.load_import_config().await.unwrap();

        assert_eq!(config.max_allocation_attempts, 8);
        assert_eq!(config.participant_aliases, vec!["cook", "team"]);
        assert_eq!(config.default_division_type, "Open");
        assert_eq!(config.division_aliases, vec!["division"]);
    }

    #[tokio::test]
    async fn test_malformed_values_are_rejected() {
        let manager = setup();
        manager
            .set_config_value(config_keys::HEADER_ROWS, "two")
            .unwrap();
        manager
            .set_config_value(config_keys::MAX_ALLOCATION_ATTEMPTS, "0")
            .unwrap();
        manager
            .set_config_value(config_keys::DIVISION_ALIASES, " , ")
            .unwrap();

        assert!(matches!(
            manager.get_header_rows().await,
            Err(ImportError::ConfigError { .. })
        ));
        assert!(manager.get_max_allocation_attempts().await.is_err());
        assert!(manager.get_division_aliases().await.is_err());
    }
}
