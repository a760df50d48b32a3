//! In-process key-value slot.
//!
//! Clones share one map, so a test can hand a clone to the store and later
//! reopen another store over the same contents to simulate a restart.
//! Reads and writes can be switched to fail to exercise recovery paths.

use crate::persistence::{KeyValueSlot, SlotError, SlotResult};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle over the same map whose reads fail.
    pub fn failing_reads(&self) -> Self {
        Self {
            fail_reads: true,
            ..self.clone()
        }
    }

    /// Returns a handle over the same map whose writes fail.
    pub fn failing_writes(&self) -> Self {
        Self {
            fail_writes: true,
            ..self.clone()
        }
    }

    /// Stores a raw value directly, bypassing failure switches.
    pub fn seed(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    /// Raw stored value, bypassing failure switches.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl KeyValueSlot for MemorySlot {
    fn read(&self, key: &str) -> SlotResult<Option<String>> {
        if self.fail_reads {
            return Err(SlotError::Unavailable("reads disabled".to_string()));
        }
        Ok(self.peek(key))
    }

    fn write(&mut self, key: &str, value: &str) -> SlotResult<()> {
        if self.fail_writes {
            return Err(SlotError::Unavailable("writes disabled".to_string()));
        }
        self.seed(key, value);
        Ok(())
    }
}
