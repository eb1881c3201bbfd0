//! Audit trail sinks.
//!
//! The store persists every audit entry in its own `audit` table and also
//! hands it to an [`AuditSink`], so that callers can observe the trail
//! without reading the database back.

use crate::model::AuditEntry;
use std::sync::{Arc, Mutex};

/// Receives one entry per completed store operation.
///
/// Implementations must be `Send + Sync`; the store holds its sink behind
/// an `Arc`.
pub trait AuditSink: Send + Sync {
    fn record(&self, entry: &AuditEntry);
}

/// Emits every entry as a structured `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, entry: &AuditEntry) {
        tracing::info!(
            target: "sbom_manager::audit",
            command = %entry.command,
            timestamp = %entry.timestamp.to_rfc3339(),
            "audit"
        );
    }
}

/// Keeps entries in memory; used by tests and embedders.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAuditSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Snapshot of the entries recorded so far, oldest first.
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Command labels only, oldest first.
    pub fn commands(&self) -> Vec<String> {
        self.entries().into_iter().map(|e| e.command).collect()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, entry: &AuditEntry) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry.clone());
        }
    }
}
