// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库初始化、赛事/模板种子数据、临时 CSV 文件
// ==========================================
#![allow(dead_code)]

use chrono::Utc;
use contest_import::db::{init_schema, open_sqlite_connection};
use contest_import::domain::{DivisionTypeRule, Event, EventTemplate};
use contest_import::repository::EventRepository;
use std::error::Error;
use std::io::Write;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 插入赛事（附带组别类型模板）
///
/// # 参数
/// - division_types: (前缀, 类型名) 列表；为空时赛事不挂模板
pub fn seed_event(
    db_path: &str,
    event_id: &str,
    division_types: &[(&str, &str)],
) -> Result<(), Box<dyn Error>> {
    let repo = EventRepository::new(db_path)?;

    let template_id = if division_types.is_empty() {
        None
    } else {
        let template = EventTemplate {
            template_id: format!("tpl-{}", event_id),
            name: "Test Template".to_string(),
            division_types: division_types
                .iter()
                .map(|(code, name)| DivisionTypeRule::new(*code, *name))
                .collect(),
        };
        repo.upsert_template(&template)?;
        Some(template.template_id)
    };

    repo.create_event(&Event {
        event_id: event_id.to_string(),
        name: format!("Event {}", event_id),
        template_id,
        created_at: Utc::now(),
    })?;

    Ok(())
}

/// 标准测试赛事: K → Kids, A → Adults
pub fn seed_default_event(db_path: &str, event_id: &str) -> Result<(), Box<dyn Error>> {
    seed_event(db_path, event_id, &[("K", "Kids"), ("A", "Adults")])
}

/// 写入临时 CSV 文件（首行为表头）
pub fn write_csv(lines: &[&str]) -> Result<NamedTempFile, Box<dyn Error>> {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile()?;
    for line in lines {
        writeln!(file, "{}", line)?;
    }
    file.flush()?;
    Ok(file)
}
