// ==========================================
// 赛事数据导入 - 赛事/模板数据仓储
// ==========================================
// 职责: 管理 event / event_template 表
// 说明: 赛事由外部应用创建，此仓储供宿主应用与工具脚本建档使用
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::{Event, EventTemplate};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct EventRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EventRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新建或覆盖赛事模板
    pub fn upsert_template(&self, template: &EventTemplate) -> RepositoryResult<()> {
        let types_json = serde_json::to_string(&template.division_types)?;
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO event_template (template_id, name, division_types_json)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(template_id) DO UPDATE SET
                name = excluded.name,
                division_types_json = excluded.division_types_json
            "#,
            params![template.template_id, template.name, types_json],
        )?;
        Ok(())
    }

    pub fn find_template(&self, template_id: &str) -> RepositoryResult<Option<EventTemplate>> {
        let conn = self.get_conn()?;
        let raw: Option<(String, String, String)> = conn
            .query_row(
                "SELECT template_id, name, division_types_json FROM event_template WHERE template_id = ?1",
                params![template_id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        match raw {
            Some((template_id, name, json)) => Ok(Some(EventTemplate {
                template_id,
                name,
                division_types: serde_json::from_str(&json)?,
            })),
            None => Ok(None),
        }
    }

    /// 创建赛事
    ///
    /// # 错误
    /// - ForeignKeyViolation: template_id 不存在
    pub fn create_event(&self, event: &Event) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO event (event_id, name, template_id, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![event.event_id, event.name, event.template_id, event.created_at],
        )?;
        Ok(())
    }
}
