// ==========================================
// 单元测试辅助: 内存版 ImportRepository
// ==========================================
// 支持故障注入: 指定选手姓名插入失败 / 指定作品名称插入失败 / 组别插入抢先
// ==========================================

use crate::domain::{Division, DivisionTypeRule, DivisionTypeTable, Entry, Event, Participant};
use crate::repository::{ImportRepository, RepositoryError, RepositoryResult};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Mutex;

#[derive(Default)]
pub struct MemoryState {
    pub events: Vec<Event>,
    pub division_types: DivisionTypeTable,
    pub divisions: Vec<Division>,
    pub participants: Vec<Participant>,
    pub entries: Vec<Entry>,
    pub failing_participants: HashSet<String>,
    pub failing_entries: HashSet<String>,
    // 插入组别时模拟“并发导入已抢先创建同 code 组别”
    pub division_insert_races: HashSet<String>,
}

#[derive(Default)]
pub struct MemoryRepository {
    pub state: Mutex<MemoryState>,
}

impl MemoryRepository {
    pub fn with_event(event_id: &str, division_types: Vec<DivisionTypeRule>) -> Self {
        let repo = Self::default();
        {
            let mut state = repo.state.lock().unwrap();
            state.events.push(Event {
                event_id: event_id.to_string(),
                name: "Test Event".to_string(),
                template_id: None,
                created_at: Utc::now(),
            });
            state.division_types = division_types;
        }
        repo
    }

    pub fn fail_participant(&self, name: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_participants
            .insert(name.to_string());
    }

    pub fn fail_entry(&self, name: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_entries
            .insert(name.to_string());
    }

    pub fn race_division(&self, code: &str) {
        self.state
            .lock()
            .unwrap()
            .division_insert_races
            .insert(code.to_string());
    }

    pub fn divisions(&self) -> Vec<Division> {
        self.state.lock().unwrap().divisions.clone()
    }

    pub fn participants(&self) -> Vec<Participant> {
        self.state.lock().unwrap().participants.clone()
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.state.lock().unwrap().entries.clone()
    }
}

impl ImportRepository for MemoryRepository {
    fn find_event(&self, event_id: &str) -> RepositoryResult<Option<Event>> {
        let state = self.state.lock().unwrap();
        Ok(state.events.iter().find(|e| e.event_id == event_id).cloned())
    }

    fn load_division_types(&self, _event_id: &str) -> RepositoryResult<DivisionTypeTable> {
        Ok(self.state.lock().unwrap().division_types.clone())
    }

    fn find_division_by_code(
        &self,
        event_id: &str,
        code: &str,
    ) -> RepositoryResult<Option<Division>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .divisions
            .iter()
            .find(|d| d.event_id == event_id && d.code.as_deref() == Some(code))
            .cloned())
    }

    fn insert_division(&self, division: &Division) -> RepositoryResult<()> {
        let mut state = self.state.lock().unwrap();
        let code = division.code.clone().unwrap_or_default();
        if state.division_insert_races.remove(&code) {
            let mut winner = division.clone();
            winner.division_id = format!("winner-{}", code);
            state.divisions.push(winner);
            return Err(RepositoryError::UniqueConstraintViolation(
                "UNIQUE constraint failed: division.event_id, division.code".to_string(),
            ));
        }
        state.divisions.push(division.clone());
        Ok(())
    }

    fn insert_participant(&self, participant: &Participant) -> RepositoryResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.failing_participants.contains(&participant.name) {
            return Err(RepositoryError::DatabaseQueryError(format!(
                "participant rejected: {}",
                participant.name
            )));
        }
        state.participants.push(participant.clone());
        Ok(())
    }

    fn max_entry_number(&self, event_id: &str) -> RepositoryResult<i64> {
        let state = self.state.lock().unwrap();
        Ok(state
            .entries
            .iter()
            .filter(|e| e.event_id == event_id)
            .map(|e| e.entry_number)
            .max()
            .unwrap_or(0))
    }

    fn insert_entry(&self, entry: &Entry) -> RepositoryResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.failing_entries.contains(&entry.name) {
            return Err(RepositoryError::DatabaseQueryError(format!(
                "entry rejected: {}",
                entry.name
            )));
        }
        if state
            .entries
            .iter()
            .any(|e| e.event_id == entry.event_id && e.entry_number == entry.entry_number)
        {
            return Err(RepositoryError::UniqueConstraintViolation(
                "UNIQUE constraint failed: entry.event_id, entry.entry_number".to_string(),
            ));
        }
        state.entries.push(entry.clone());
        Ok(())
    }
}
