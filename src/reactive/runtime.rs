use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::trace;

/// Callback invoked when an observed source changes.
pub type Callback = Rc<dyn Fn()>;

/// Identity of one observer inside a [`Runtime`].
///
/// An observer subscribed to several sources under the same id runs at most
/// once per flush, however many of those sources changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Single-threaded update cycle shared by every reactive source of a host.
///
/// Notifications are queued while a batch is open and flushed, deduplicated
/// per observer, when the outermost batch closes. Writes performed by
/// observers during a flush are appended to the same queue, so callbacks never
/// re-enter each other.
#[derive(Clone, Default)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

#[derive(Default)]
struct RuntimeInner {
    depth: Cell<usize>,
    next_observer: Cell<u64>,
    pending: RefCell<IndexMap<ObserverId, Callback>>,
}

struct DepthGuard<'a>(&'a RuntimeInner);

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.depth.set(self.0.depth.get().saturating_sub(1));
    }
}

impl Runtime {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` with notifications deferred until the outermost batch ends.
    pub fn batch<R>(&self, f: impl FnOnce() -> R) -> R {
        let result = {
            self.inner.depth.set(self.inner.depth.get() + 1);
            let _guard = DepthGuard(&self.inner);
            f()
        };
        if self.inner.depth.get() == 0 {
            self.flush();
        }
        result
    }

    #[must_use]
    pub fn is_batching(&self) -> bool {
        self.inner.depth.get() > 0
    }

    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.inner.pending.borrow().len()
    }

    #[must_use]
    pub fn next_observer_id(&self) -> ObserverId {
        let id = self.inner.next_observer.get();
        self.inner.next_observer.set(id + 1);
        ObserverId(id)
    }

    /// Queues `callback` under `id`; an already queued observer keeps its slot.
    pub fn schedule(&self, id: ObserverId, callback: Callback) {
        if self.is_batching() {
            self.inner.pending.borrow_mut().entry(id).or_insert(callback);
        } else {
            self.batch(|| self.schedule(id, callback));
        }
    }

    fn flush(&self) {
        self.inner.depth.set(self.inner.depth.get() + 1);
        let _guard = DepthGuard(&self.inner);
        let mut flushed = 0usize;
        loop {
            let next = self.inner.pending.borrow_mut().shift_remove_index(0);
            let Some((_, callback)) = next else {
                break;
            };
            callback();
            flushed += 1;
        }
        trace!(flushed, "reactive flush complete");
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("depth", &self.inner.depth.get())
            .field("pending", &self.pending_len())
            .finish()
    }
}
