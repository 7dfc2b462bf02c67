#![allow(dead_code)]

use std::sync::{Arc, Condvar, Mutex};

use espresso_core::{
    GatewayError, MemoryGateway, NoteId, NoteRecord, NoteStore, SyncConfig, SyncGateway, SyncOp,
};
use uuid::Uuid;

pub fn note(title: &str, content: &str) -> NoteRecord {
    NoteRecord::new(Uuid::new_v4(), title.to_string(), content.to_string())
}

/// Store over a memory gateway seeded with `records`
pub fn store_with(records: Vec<NoteRecord>) -> (Arc<MemoryGateway>, NoteStore) {
    let gateway = Arc::new(MemoryGateway::with_records(records));
    let store = NoteStore::load(gateway.clone(), &SyncConfig::default()).unwrap();
    (gateway, store)
}

/// A call as seen by the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create(NoteId),
    Write(SyncOp),
}

/// Gateway whose queued writes wait until the gate is opened, recording
/// the order every call arrives in. Creates are journaled but never gated.
pub struct GatedGateway {
    pub inner: MemoryGateway,
    open: Mutex<bool>,
    opened: Condvar,
    journal: Mutex<Vec<Call>>,
}

impl GatedGateway {
    pub fn closed(records: Vec<NoteRecord>) -> Self {
        Self {
            inner: MemoryGateway::with_records(records),
            open: Mutex::new(false),
            opened: Condvar::new(),
            journal: Mutex::new(Vec::new()),
        }
    }

    pub fn open(&self) {
        *self.open.lock().unwrap() = true;
        self.opened.notify_all();
    }

    pub fn journal(&self) -> Vec<Call> {
        self.journal.lock().unwrap().clone()
    }

    fn pass(&self, op: SyncOp) {
        let mut open = self.open.lock().unwrap();
        while !*open {
            open = self.opened.wait(open).unwrap();
        }
        self.journal.lock().unwrap().push(Call::Write(op));
    }
}

impl SyncGateway for GatedGateway {
    fn load_all(&self) -> Result<Vec<NoteRecord>, GatewayError> {
        self.inner.load_all()
    }

    fn create(&self, title: &str, content: &str) -> Result<NoteRecord, GatewayError> {
        let record = self.inner.create(title, content)?;
        self.journal.lock().unwrap().push(Call::Create(record.id));
        Ok(record)
    }

    fn update_title(&self, id: NoteId, title: &str) -> Result<(), GatewayError> {
        self.pass(SyncOp::UpdateTitle {
            id,
            title: title.to_string(),
        });
        self.inner.update_title(id, title)
    }

    fn update_content(&self, id: NoteId, content: &str) -> Result<(), GatewayError> {
        self.pass(SyncOp::UpdateContent {
            id,
            content: content.to_string(),
        });
        self.inner.update_content(id, content)
    }

    fn delete(&self, id: NoteId) -> Result<(), GatewayError> {
        self.pass(SyncOp::Delete { id });
        self.inner.delete(id)
    }
}
