// crates/riskarea-core/src/sink/memory.rs

use super::RecordSink;
use crate::config::DEFAULT_TARGET_TABLE;
use crate::error::Result;
use crate::record::RiskAreaRecord;
use std::sync::Mutex;

/// In-process sink: keeps appended rows in memory. Used for dry runs and
/// as the fake store in tests.
#[derive(Debug)]
pub struct MemorySink {
    target: String,
    rows: Mutex<Vec<RiskAreaRecord>>,
}

impl MemorySink {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            rows: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of every appended row, in append order.
    pub fn rows(&self) -> Vec<RiskAreaRecord> {
        self.rows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.rows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_TABLE)
    }
}

impl RecordSink for MemorySink {
    fn append(&self, record: &RiskAreaRecord) -> Result<()> {
        self.rows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(record.clone());
        Ok(())
    }

    fn target(&self) -> &str {
        &self.target
    }
}
