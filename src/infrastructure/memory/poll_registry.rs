//! In-Memory Poll Registry Implementation

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{PollRegistryPort, PollTicket, TaskError};
use crate::domain::task::TaskHandle;

struct PollEntry {
    ticket: PollTicket,
    token: CancellationToken,
    started_at: DateTime<Utc>,
}

/// 内存轮询登记表
pub struct InMemoryPollRegistry {
    /// task_id -> 活跃会话
    sessions: DashMap<String, PollEntry>,
    next_ticket: AtomicU64,
}

impl Default for InMemoryPollRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPollRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
            next_ticket: AtomicU64::new(1),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl PollRegistryPort for InMemoryPollRegistry {
    fn register(&self, handle: &TaskHandle, token: CancellationToken) -> Result<PollTicket, TaskError> {
        match self.sessions.entry(handle.as_str().to_string()) {
            Entry::Occupied(_) => Err(TaskError::AlreadyPolling(handle.to_string())),
            Entry::Vacant(slot) => {
                let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
                slot.insert(PollEntry {
                    ticket,
                    token,
                    started_at: Utc::now(),
                });
                tracing::debug!(task_id = %handle, ticket, "Poll session registered");
                Ok(ticket)
            }
        }
    }

    fn remove(&self, handle: &TaskHandle, ticket: PollTicket) {
        if let Some((_, entry)) = self
            .sessions
            .remove_if(handle.as_str(), |_, entry| entry.ticket == ticket)
        {
            let elapsed = Utc::now() - entry.started_at;
            tracing::debug!(
                task_id = %handle,
                elapsed_secs = elapsed.num_seconds(),
                "Poll session retired"
            );
        }
    }

    fn cancel(&self, handle: &TaskHandle) -> bool {
        match self.sessions.remove(handle.as_str()) {
            Some((_, entry)) => {
                entry.token.cancel();
                tracing::debug!(task_id = %handle, "Poll session cancelled");
                true
            }
            None => false,
        }
    }

    fn cancel_all(&self) -> usize {
        let ids: Vec<String> = self.sessions.iter().map(|e| e.key().clone()).collect();
        let mut cancelled = 0;
        for id in ids {
            if let Some((_, entry)) = self.sessions.remove(&id) {
                entry.token.cancel();
                cancelled += 1;
            }
        }
        tracing::debug!(cancelled, "All poll sessions cancelled");
        cancelled
    }

    fn is_active(&self, handle: &TaskHandle) -> bool {
        self.sessions.contains_key(handle.as_str())
    }

    fn active_count(&self) -> usize {
        self.sessions.len()
    }
}
