//! Trust store - the local registry of explicitly trusted agents.
//!
//! The store is externally owned relative to verification: the trust
//! assessor only reads it, and lookups degrade to "not trusted" instead of
//! erroring. Mutations (trusting or untrusting an agent) sit outside the
//! verification path; last write wins.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::StoreError;

/// Store of trusted agent documents - trait to allow different backends.
pub trait TrustStore {
    /// Whether the given agent id is explicitly trusted.
    fn is_trusted(&self, agent_id: &str) -> bool;

    /// All trusted agent ids.
    fn list_trusted(&self) -> Vec<String>;

    /// Add an agent document to the store, returning its id.
    fn trust(&mut self, agent: &Value) -> Result<String, StoreError>;

    /// Remove an agent from the store. Removing an unknown id is a no-op.
    fn untrust(&mut self, agent_id: &str) -> Result<(), StoreError>;
}

/// Identifier of an agent document: `agentId`, falling back to `id`.
fn agent_document_id(agent: &Value) -> Result<String, StoreError> {
    agent
        .get("agentId")
        .or_else(|| agent.get("id"))
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or(StoreError::MissingAgentId)
}

/// In-memory trust store for tests and short-lived processes.
#[derive(Debug, Default)]
pub struct MemoryTrustStore {
    agents: HashMap<String, Value>,
}

impl MemoryTrustStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TrustStore for MemoryTrustStore {
    fn is_trusted(&self, agent_id: &str) -> bool {
        self.agents.contains_key(agent_id)
    }

    fn list_trusted(&self) -> Vec<String> {
        self.agents.keys().cloned().collect()
    }

    fn trust(&mut self, agent: &Value) -> Result<String, StoreError> {
        let id = agent_document_id(agent)?;
        self.agents.insert(id.clone(), agent.clone());
        Ok(id)
    }

    fn untrust(&mut self, agent_id: &str) -> Result<(), StoreError> {
        self.agents.remove(agent_id);
        Ok(())
    }
}

/// File-backed trust store: one JSON document mapping agent id to agent
/// document. Loaded on open; persisted on every mutation. An unreadable or
/// corrupt file opens as an empty store.
#[derive(Debug)]
pub struct FileTrustStore {
    path: PathBuf,
    agents: HashMap<String, Value>,
}

impl FileTrustStore {
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let agents = fs::read_to_string(&path)
            .ok()
            .and_then(|contents| serde_json::from_str(&contents).ok())
            .unwrap_or_default();
        Self { path, agents }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StoreError> {
        let contents = serde_json::to_string_pretty(&self.agents)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl TrustStore for FileTrustStore {
    fn is_trusted(&self, agent_id: &str) -> bool {
        self.agents.contains_key(agent_id)
    }

    fn list_trusted(&self) -> Vec<String> {
        self.agents.keys().cloned().collect()
    }

    fn trust(&mut self, agent: &Value) -> Result<String, StoreError> {
        let id = agent_document_id(agent)?;
        self.agents.insert(id.clone(), agent.clone());
        self.persist()?;
        Ok(id)
    }

    fn untrust(&mut self, agent_id: &str) -> Result<(), StoreError> {
        if self.agents.remove(agent_id).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}
