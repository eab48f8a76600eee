// ==========================================
// 赛事数据导入 - 导入 Repository 实现
// ==========================================
// 职责: 实现导入相关数据访问（使用 rusqlite）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::{Division, DivisionTypeTable, Entry, Event, Participant};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::import_repo::ImportRepository;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

#[cfg(test)]
mod tests;

// ==========================================
// ImportRepositoryImpl
// ==========================================
pub struct ImportRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl ImportRepositoryImpl {
    /// 创建新的 Repository 实例（独立连接）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ===== 查询（供上层展示与测试使用）=====

    /// 查询赛事全部组别
    pub fn list_divisions(&self, event_id: &str) -> RepositoryResult<Vec<Division>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT division_id, event_id, code, name, type, is_active, created_at
            FROM division
            WHERE event_id = ?1
            ORDER BY created_at ASC, rowid ASC
            "#,
        )?;

        let divisions = stmt
            .query_map(params![event_id], map_division)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(divisions)
    }

    /// 查询赛事全部选手
    pub fn list_participants(&self, event_id: &str) -> RepositoryResult<Vec<Participant>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT participant_id, event_id, division_id, name, is_active, created_at
            FROM participant
            WHERE event_id = ?1
            ORDER BY rowid ASC
            "#,
        )?;

        let participants = stmt
            .query_map(params![event_id], |row| {
                Ok(Participant {
                    participant_id: row.get(0)?,
                    event_id: row.get(1)?,
                    division_id: row.get(2)?,
                    name: row.get(3)?,
                    is_active: row.get(4)?,
                    created_at: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(participants)
    }

    /// 查询赛事全部作品（按编号升序）
    pub fn list_entries(&self, event_id: &str) -> RepositoryResult<Vec<Entry>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT entry_id, event_id, division_id, participant_id,
                   entry_number, name, is_active, created_at
            FROM entry
            WHERE event_id = ?1
            ORDER BY entry_number ASC
            "#,
        )?;

        let entries = stmt
            .query_map(params![event_id], |row| {
                Ok(Entry {
                    entry_id: row.get(0)?,
                    event_id: row.get(1)?,
                    division_id: row.get(2)?,
                    participant_id: row.get(3)?,
                    entry_number: row.get(4)?,
                    name: row.get(5)?,
                    is_active: row.get(6)?,
                    created_at: row.get(7)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}

fn map_division(row: &Row<'_>) -> rusqlite::Result<Division> {
    Ok(Division {
        division_id: row.get(0)?,
        event_id: row.get(1)?,
        code: row.get(2)?,
        name: row.get(3)?,
        division_type: row.get(4)?,
        is_active: row.get(5)?,
        created_at: row.get(6)?,
    })
}

impl ImportRepository for ImportRepositoryImpl {
    fn find_event(&self, event_id: &str) -> RepositoryResult<Option<Event>> {
        let conn = self.get_conn()?;
        let event = conn
            .query_row(
                "SELECT event_id, name, template_id, created_at FROM event WHERE event_id = ?1",
                params![event_id],
                |row| {
                    Ok(Event {
                        event_id: row.get(0)?,
                        name: row.get(1)?,
                        template_id: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(event)
    }

    fn load_division_types(&self, event_id: &str) -> RepositoryResult<DivisionTypeTable> {
        let conn = self.get_conn()?;
        let raw: Option<String> = conn
            .query_row(
                r#"
                SELECT t.division_types_json
                FROM event e
                JOIN event_template t ON t.template_id = e.template_id
                WHERE e.event_id = ?1
                "#,
                params![event_id],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(json) if !json.trim().is_empty() => Ok(serde_json::from_str(&json)?),
            _ => Ok(Vec::new()),
        }
    }

    fn find_division_by_code(
        &self,
        event_id: &str,
        code: &str,
    ) -> RepositoryResult<Option<Division>> {
        let conn = self.get_conn()?;
        let division = conn
            .query_row(
                r#"
                SELECT division_id, event_id, code, name, type, is_active, created_at
                FROM division
                WHERE event_id = ?1 AND code = ?2
                LIMIT 1
                "#,
                params![event_id, code],
                map_division,
            )
            .optional()?;
        Ok(division)
    }

    fn insert_division(&self, division: &Division) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO division (division_id, event_id, code, name, type, is_active, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                division.division_id,
                division.event_id,
                division.code,
                division.name,
                division.division_type,
                division.is_active,
                division.created_at,
            ],
        )?;
        Ok(())
    }

    fn insert_participant(&self, participant: &Participant) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO participant (participant_id, event_id, division_id, name, is_active, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                participant.participant_id,
                participant.event_id,
                participant.division_id,
                participant.name,
                participant.is_active,
                participant.created_at,
            ],
        )?;
        Ok(())
    }

    fn max_entry_number(&self, event_id: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let max: i64 = conn.query_row(
            "SELECT COALESCE(MAX(entry_number), 0) FROM entry WHERE event_id = ?1",
            params![event_id],
            |row| row.get(0),
        )?;
        Ok(max)
    }

    fn insert_entry(&self, entry: &Entry) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO entry (
                entry_id, event_id, division_id, participant_id,
                entry_number, name, is_active, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                entry.entry_id,
                entry.event_id,
                entry.division_id,
                entry.participant_id,
                entry.entry_number,
                entry.name,
                entry.is_active,
                entry.created_at,
            ],
        )?;
        Ok(())
    }
}
