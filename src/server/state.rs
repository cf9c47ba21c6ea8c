//! Process-wide server state
//!
//! Shared by the accept loop, every connection task and the admin console.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Notify;

#[derive(Debug)]
pub struct ServerState {
    total_users: AtomicU64,
    active_users: AtomicU64,
    shutdown: AtomicBool,
    started_at: Instant,
    directory: PathBuf,
    /// Signalled whenever the active count drops to zero
    idle: Notify,
}

/// Point-in-time copy of the counters, for status output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub uptime: Duration,
    pub total_users: u64,
    pub active_users: u64,
    pub shutting_down: bool,
}

impl ServerState {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            total_users: AtomicU64::new(0),
            active_users: AtomicU64::new(0),
            shutdown: AtomicBool::new(false),
            started_at: Instant::now(),
            directory: directory.into(),
            idle: Notify::new(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn total_users(&self) -> u64 {
        self.total_users.load(Ordering::SeqCst)
    }

    pub fn active_users(&self) -> u64 {
        self.active_users.load(Ordering::SeqCst)
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// Sets the shutdown flag. Returns `true` only for the call that
    /// actually flipped it.
    pub fn request_shutdown(&self) -> bool {
        !self.shutdown.swap(true, Ordering::SeqCst)
    }

    /// Counts a newly accepted connection. The active count is released
    /// when the returned guard is dropped.
    pub fn connection_opened(self: &Arc<Self>) -> ConnectionGuard {
        let total = self.total_users.fetch_add(1, Ordering::SeqCst) + 1;
        let active = self.active_users.fetch_add(1, Ordering::SeqCst) + 1;
        ConnectionGuard {
            state: Arc::clone(self),
            user: total,
            active_at_open: active,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            uptime: self.uptime(),
            total_users: self.total_users(),
            active_users: self.active_users(),
            shutting_down: self.is_shutting_down(),
        }
    }

    /// Waits until no connection is active or `timeout` elapses. Returns
    /// whether the server went idle.
    pub async fn wait_idle(&self, timeout: Duration) -> bool {
        let wait = async {
            loop {
                let notified = self.idle.notified();
                tokio::pin!(notified);
                notified.as_mut().enable();

                if self.active_users() == 0 {
                    return;
                }
                notified.await;
            }
        };

        tokio::time::timeout(timeout, wait).await.is_ok()
    }
}

/// Holds one slot of the active-user count for a live connection.
#[derive(Debug)]
pub struct ConnectionGuard {
    state: Arc<ServerState>,
    user: u64,
    active_at_open: u64,
}

impl ConnectionGuard {
    /// Sequence number of this connection (1-based)
    pub fn user(&self) -> u64 {
        self.user
    }

    /// Active count right after this connection was counted
    pub fn active_at_open(&self) -> u64 {
        self.active_at_open
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        let remaining = self.state.active_users.fetch_sub(1, Ordering::SeqCst) - 1;
        if remaining == 0 {
            self.state.idle.notify_waiters();
        }
    }
}
