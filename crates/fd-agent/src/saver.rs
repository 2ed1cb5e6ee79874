// SPDX-License-Identifier: MIT OR Apache-2.0
//! In-memory conversation checkpointing, keyed by thread id.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use fd_core::Content;

/// Keeps each thread's full conversation history for the process lifetime.
///
/// Cheap to clone — clones share the same store. Durable storage is out of
/// scope by contract; a restart starts every thread fresh.
#[derive(Debug, Clone, Default)]
pub struct MemorySaver {
    threads: Arc<Mutex<HashMap<String, Vec<Content>>>>,
}

impl MemorySaver {
    /// Create an empty saver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// History for a thread; empty for unknown threads.
    #[must_use]
    pub fn load(&self, thread_id: &str) -> Vec<Content> {
        self.threads
            .lock()
            .expect("saver lock poisoned")
            .get(thread_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Replace a thread's history with `history`.
    pub fn save(&self, thread_id: &str, history: Vec<Content>) {
        self.threads
            .lock()
            .expect("saver lock poisoned")
            .insert(thread_id.to_string(), history);
    }

    /// Known thread ids, sorted.
    #[must_use]
    pub fn thread_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .threads
            .lock()
            .expect("saver lock poisoned")
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }
}
