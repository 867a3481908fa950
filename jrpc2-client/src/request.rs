//! Pending request tracking for multiplexed transports
//!
//! A WebSocket carries many calls at once, and replies come back in whatever
//! order the server finishes them. This module pairs each reply with the call
//! waiting for it.
//!
//! # Request Lifecycle
//!
//! 1. **Register**: the call's id gets a oneshot channel and a [`Registration`]
//! 2. **Send**: the transport writes the request to the socket
//! 3. **Wait**: the caller awaits the oneshot receiver
//! 4. **Complete**: the receive loop reads a reply, finds the id, and sends the
//!    raw bytes down the matching channel
//!
//! Dropping the `Registration` removes the entry, so a caller that gives up
//! (a timeout, a cancelled future) leaves nothing behind.
//!
//! When the connection goes away the table is closed: every waiting call gets
//! `Error::ConnectionClosed`, and registering afterwards fails immediately.

use jrpc2_core::{Error, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;

/// Raw reply bytes, or the reason none will arrive
pub(crate) type Reply = Result<Vec<u8>>;

#[derive(Default)]
struct Table {
    waiting: HashMap<u64, oneshot::Sender<Reply>>,
    closed: bool,
}

/// Table of calls waiting for a reply, keyed by request id
///
/// The lock is never held across an await.
#[derive(Clone, Default)]
pub(crate) struct PendingRequests {
    table: Arc<Mutex<Table>>,
}

/// A call's place in the table, released on drop
pub(crate) struct Registration {
    pending: PendingRequests,
    id: u64,
    rx: oneshot::Receiver<Reply>,
}

impl Registration {
    /// Wait for the reply
    ///
    /// A dropped sender means the table went away with the connection.
    pub(crate) async fn reply(&mut self) -> Reply {
        (&mut self.rx).await.unwrap_or(Err(Error::ConnectionClosed))
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.pending.forget(self.id);
    }
}

impl PendingRequests {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a call and get the handle its reply will arrive on
    ///
    /// Fails if the table is closed or the id is already waiting.
    pub(crate) fn register(&self, id: u64) -> Result<Registration> {
        let mut table = self.table();
        if table.closed {
            return Err(Error::ConnectionClosed);
        }
        if table.waiting.contains_key(&id) {
            return Err(Error::InvalidRequest(format!("request id {} is already in flight", id)));
        }

        let (tx, rx) = oneshot::channel();
        table.waiting.insert(id, tx);
        Ok(Registration {
            pending: self.clone(),
            id,
            rx,
        })
    }

    /// Hand a reply to the call waiting on `id`
    ///
    /// Returns false if no call was waiting.
    pub(crate) fn complete(&self, id: u64, reply: Vec<u8>) -> bool {
        match self.table().waiting.remove(&id) {
            Some(tx) => {
                // The caller may have given up; nothing to do then
                let _ = tx.send(Ok(reply));
                true
            }
            None => false,
        }
    }

    /// Drop a registration without answering it
    pub(crate) fn forget(&self, id: u64) {
        self.table().waiting.remove(&id);
    }

    /// Fail every waiting call and refuse new ones
    pub(crate) fn close(&self, error: Error) {
        let mut table = self.table();
        table.closed = true;
        for (_, tx) in table.waiting.drain() {
            let _ = tx.send(Err(error.clone()));
        }
    }

    #[cfg(test)]
    pub(crate) fn pending_count(&self) -> usize {
        self.table().waiting.len()
    }
}
