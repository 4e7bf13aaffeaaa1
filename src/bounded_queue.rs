//! Capacity-bounded, thread-safe FIFO with blocking push and pop.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

/// A synchronized FIFO holding at most `capacity` elements at once.
///
/// `push` blocks while the queue is full and `pop_blocking_or_closed` blocks
/// while it is empty. Closing the queue turns both waits into immediate
/// returns: pushers get their item back and poppers see end-of-stream once
/// the remaining items are drained. Both condition variables are notified
/// with `notify_all`, and every waiter rechecks its predicate in a loop, so
/// a wakeup is never lost and no waiter can be starved by single-target
/// notifications.
pub struct BoundedQueue<T> {
    inner: Mutex<QueueState<T>>,
    not_empty: Condvar,
    not_full: Condvar,
    capacity: usize,
}

struct QueueState<T> {
    queue: VecDeque<T>,
    closed: bool,
    max_len: usize,
}

impl<T> BoundedQueue<T> {
    /// Create an empty queue bounded at `capacity` elements (must be > 0).
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "queue capacity must be > 0");
        Self {
            inner: Mutex::new(QueueState {
                queue: VecDeque::with_capacity(capacity),
                closed: false,
                max_len: 0,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity,
        }
    }

    /// Append `item` at the tail, blocking while the queue is full.
    ///
    /// Returns the item back if the queue is (or becomes) closed before
    /// space opens up. The capacity check and the append happen under one
    /// lock acquisition, so the length never transiently exceeds capacity.
    pub fn push(&self, item: T) -> Result<(), T> {
        let mut guard = self.inner.lock().expect("queue mutex poisoned");
        loop {
            if guard.closed {
                return Err(item);
            }
            if guard.queue.len() < self.capacity {
                break;
            }
            // Wait releases the lock and re-acquires it before returning.
            guard = self.not_full.wait(guard).expect("condvar wait failed");
        }
        guard.queue.push_back(item);
        if guard.queue.len() > guard.max_len {
            guard.max_len = guard.queue.len();
        }
        drop(guard);
        self.not_empty.notify_all();
        Ok(())
    }

    /// Remove and return the head item, blocking while the queue is empty.
    ///
    /// Returns `None` only once the queue is both closed and drained.
    pub fn pop_blocking_or_closed(&self) -> Option<T> {
        let mut guard = self.inner.lock().expect("queue mutex poisoned");
        loop {
            if let Some(item) = guard.queue.pop_front() {
                drop(guard);
                self.not_full.notify_all();
                return Some(item);
            }
            if guard.closed {
                return None;
            }
            guard = self.not_empty.wait(guard).expect("condvar wait failed");
        }
    }

    /// Try to pop immediately without blocking.
    pub fn try_pop(&self) -> Option<T> {
        let mut guard = self.inner.lock().expect("queue mutex poisoned");
        let item = guard.queue.pop_front();
        if item.is_some() {
            drop(guard);
            self.not_full.notify_all();
        }
        item
    }

    /// Close the queue and wake every blocked pusher and popper.
    pub fn close(&self) {
        let mut guard = self.inner.lock().expect("queue mutex poisoned");
        guard.closed = true;
        drop(guard);
        self.not_full.notify_all();
        self.not_empty.notify_all();
    }

    /// Current number of queued items.
    pub fn len(&self) -> usize {
        let guard = self.inner.lock().expect("queue mutex poisoned");
        guard.queue.len()
    }

    /// Configured capacity bound.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Highest length ever observed, recorded under the lock on each push.
    pub fn max_len(&self) -> usize {
        let guard = self.inner.lock().expect("queue mutex poisoned");
        guard.max_len
    }
}
