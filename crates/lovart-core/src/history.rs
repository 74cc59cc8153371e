//! Linear undo/redo history with debounced commits.
//!
//! Values are full snapshots compared by equality. A `set` does not commit
//! right away: it parks the value as pending and (re)starts the debounce
//! deadline, so a burst of changes collapses into one entry holding only
//! the final value. The owner drives commits with [`History::tick`] or
//! [`History::flush`].

use std::collections::VecDeque;
use std::time::Duration;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Label of the entry a history starts with.
pub const INITIAL_ACTION: &str = "Initial state";
/// Label of the entry left after [`History::reset`].
pub const RESET_ACTION: &str = "Reset";

/// A committed snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry<T> {
    pub state: T,
    pub timestamp: Instant,
    pub action_name: String,
}

impl<T> HistoryEntry<T> {
    fn new(state: T, action_name: impl Into<String>, timestamp: Instant) -> Self {
        Self {
            state,
            timestamp,
            action_name: action_name.into(),
        }
    }
}

#[derive(Debug, Clone)]
struct Pending<T> {
    entry: HistoryEntry<T>,
    deadline: Instant,
}

/// Undo/redo stacks around a current value.
#[derive(Debug, Clone)]
pub struct History<T> {
    current: HistoryEntry<T>,
    undo_stack: VecDeque<HistoryEntry<T>>,
    redo_stack: Vec<HistoryEntry<T>>,
    pending: Option<Pending<T>>,
    max_len: usize,
    debounce: Duration,
}

impl<T: Clone + PartialEq> History<T> {
    /// Create a history holding `initial`. `max_len` caps the undo stack.
    pub fn new(initial: T, max_len: usize, debounce: Duration) -> Self {
        Self {
            current: HistoryEntry::new(initial, INITIAL_ACTION, Instant::now()),
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            pending: None,
            max_len: max_len.max(1),
            debounce,
        }
    }

    /// The latest value, pending or committed.
    pub fn current(&self) -> &T {
        match &self.pending {
            Some(p) => &p.entry.state,
            None => &self.current.state,
        }
    }

    /// The latest committed value.
    pub fn committed(&self) -> &T {
        &self.current.state
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn set_debounce(&mut self, debounce: Duration) {
        self.debounce = debounce;
    }

    /// Record a new value now.
    pub fn set(&mut self, value: T, action_name: impl Into<String>) {
        self.set_at(value, action_name, Instant::now());
    }

    /// Record a new value at `now`.
    ///
    /// No-op when `value` equals the latest value. With a zero debounce the
    /// value commits immediately; otherwise it replaces any pending value
    /// and the deadline restarts.
    pub fn set_at(&mut self, value: T, action_name: impl Into<String>, now: Instant) {
        if *self.current() == value {
            return;
        }
        let entry = HistoryEntry::new(value, action_name, now);
        if self.debounce.is_zero() {
            self.pending = None;
            self.commit(entry);
        } else {
            self.pending = Some(Pending {
                entry,
                deadline: now + self.debounce,
            });
        }
    }

    /// Commit the pending value if its deadline has passed.
    /// Returns true if an entry was committed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match &self.pending {
            Some(p) if now >= p.deadline => self.flush(),
            _ => false,
        }
    }

    /// Commit the pending value immediately.
    /// Returns true if an entry was committed.
    pub fn flush(&mut self) -> bool {
        match self.pending.take() {
            Some(p) => self.commit(p.entry),
            None => false,
        }
    }

    /// Drop the pending value without committing it.
    pub fn cancel_pending(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Deadline of the pending value, for scheduling a tick.
    pub fn pending_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    fn commit(&mut self, entry: HistoryEntry<T>) -> bool {
        if entry.state == self.current.state {
            return false;
        }
        log::debug!("History commit: {}", entry.action_name);
        let previous = std::mem::replace(&mut self.current, entry);
        self.undo_stack.push_back(previous);
        // A new action invalidates the redo path
        self.redo_stack.clear();
        if self.undo_stack.len() > self.max_len {
            self.undo_stack.pop_front();
        }
        true
    }

    /// Step back one entry, flushing pending work first.
    /// Returns the restored value, or `None` if there is nothing to undo.
    pub fn undo(&mut self) -> Option<&T> {
        self.flush();
        let previous = self.undo_stack.pop_back()?;
        let undone = std::mem::replace(&mut self.current, previous);
        self.redo_stack.push(undone);
        Some(&self.current.state)
    }

    /// Step forward one entry, flushing pending work first.
    /// Returns the restored value, or `None` if there is nothing to redo.
    pub fn redo(&mut self) -> Option<&T> {
        self.flush();
        let next = self.redo_stack.pop()?;
        let redone = std::mem::replace(&mut self.current, next);
        self.undo_stack.push_back(redone);
        Some(&self.current.state)
    }

    /// Replace the value and clear both stacks.
    pub fn reset(&mut self, value: T) {
        self.pending = None;
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current = HistoryEntry::new(value, RESET_ACTION, Instant::now());
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty() || self.pending.is_some()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty() && self.pending.is_none()
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len() + usize::from(self.pending.is_some())
    }

    pub fn redo_count(&self) -> usize {
        if self.pending.is_some() { 0 } else { self.redo_stack.len() }
    }

    /// Label of the latest value.
    pub fn last_action(&self) -> &str {
        match &self.pending {
            Some(p) => &p.entry.action_name,
            None => &self.current.action_name,
        }
    }

    /// Committed entries, oldest first, ending with the current one.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry<T>> {
        self.undo_stack.iter().chain(std::iter::once(&self.current))
    }
}
