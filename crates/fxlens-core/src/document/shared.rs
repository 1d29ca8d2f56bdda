//! Shared, observable handle to a document.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::trace;

use super::mutation::MutationBatch;
use super::tree::Document;

struct Inner {
    document: Document,
    subscribers: Vec<mpsc::UnboundedSender<MutationBatch>>,
}

/// Cloneable handle to one document.
///
/// All access goes through a closure that runs under the document lock.
/// Records produced inside one [`with`](Self::with) call are delivered to
/// every subscriber as a single batch before the lock is released, so
/// batches arrive in mutation order.
#[derive(Clone)]
pub struct SharedDocument {
    inner: Arc<Mutex<Inner>>,
}

impl SharedDocument {
    pub fn new(document: Document) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                document,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Run `f` with mutable access and publish the resulting mutations.
    pub fn with<R>(&self, f: impl FnOnce(&mut Document) -> R) -> R {
        let mut inner = self.inner.lock();
        let result = f(&mut inner.document);

        let records = inner.document.take_records();
        if !records.is_empty() {
            let batch = MutationBatch { records };
            trace!("Publishing mutation batch of {} records", batch.len());
            inner
                .subscribers
                .retain(|tx| tx.send(batch.clone()).is_ok());
        }
        result
    }

    /// Run `f` with shared access.
    pub fn read<R>(&self, f: impl FnOnce(&Document) -> R) -> R {
        let inner = self.inner.lock();
        f(&inner.document)
    }

    /// Receive every future mutation batch.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<MutationBatch> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.lock().subscribers.push(tx);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }
}

impl Default for SharedDocument {
    fn default() -> Self {
        Self::new(Document::new())
    }
}
