//! In-memory port implementations for tests

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::entities::{ChatRequest, ChatResponse, Message, MessageChoice};
use crate::domain::errors::DomainError;
use crate::ports::{CompletionService, CorpusStore, Table};

pub fn essay_row(id: i64) -> Vec<String> {
    vec![
        id.to_string(),
        format!("dream essay {id}"),
        format!("dejavu essay {id}"),
        format!("conflict essay {id}"),
        format!("award essay {id}"),
    ]
}

pub fn reply(content: &str) -> ChatResponse {
    ChatResponse {
        model: "test-model".to_string(),
        choices: vec![MessageChoice {
            message: Message::assistant(content),
            index: 0,
            finish_reason: Some("stop".to_string()),
        }],
        ..Default::default()
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<PathBuf, Table>>,
}

impl MemoryStore {
    pub fn with_table(path: &str, header: &[&str], rows: Vec<Vec<String>>) -> Self {
        let store = Self::default();
        let mut table = Table::new(header);
        table.rows = rows;
        store
            .tables
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), table);
        store
    }

    pub fn table(&self, path: &str) -> Option<Table> {
        self.tables.lock().unwrap().get(Path::new(path)).cloned()
    }
}

impl CorpusStore for MemoryStore {
    fn load_records(&self, path: &Path) -> Result<Table, DomainError> {
        self.tables
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| DomainError::Repository(format!("no such file {}", path.display())))
    }

    fn write_records(&self, path: &Path, table: &Table) -> Result<(), DomainError> {
        self.tables
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), table.clone());
        Ok(())
    }
}

/// Answers every request with "<id/100> ..." keyed by the request's user tag
#[derive(Default)]
pub struct ScriptedService {
    pub failing: HashSet<String>,
    pub panicking: HashSet<String>,
    pub unscorable: HashSet<String>,
    pub delay: Option<Duration>,
    pub calls: AtomicUsize,
}

impl ScriptedService {
    pub fn failing(ids: &[&str]) -> Self {
        Self {
            failing: ids.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionService for ScriptedService {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let id = request.user.clone().unwrap_or_default();
        if self.panicking.contains(&id) {
            panic!("connection reset for {id}");
        }
        if self.failing.contains(&id) {
            return Err(DomainError::ExternalService(format!(
                "status code 500 for {id}"
            )));
        }
        if self.unscorable.contains(&id) {
            return Ok(reply("I cannot score this response."));
        }

        let pid: f32 = id.parse().unwrap_or_default();
        Ok(reply(&format!(
            "{:.2} The participant's response is mostly consistent.",
            pid / 100.0
        )))
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }
}
