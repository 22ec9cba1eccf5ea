//! Navigation history
//!
//! Bounded back-stack of browsing contexts for "go back" in the UI

use std::collections::VecDeque;

/// Default number of contexts kept
pub const DEFAULT_NAVIGATION_CAPACITY: usize = 50;

/// Capacity-bounded stack of UI contexts
///
/// Generic over the context so the UI decides what a "place" is (a search
/// result, an album view, a queue position). Pushing past capacity evicts the
/// oldest context.
#[derive(Debug, Clone)]
pub struct NavigationHistory<C> {
    /// Stack buffer (most recent = back)
    contexts: VecDeque<C>,

    capacity: usize,
}

impl<C> NavigationHistory<C> {
    /// Create history holding at most `capacity` contexts
    pub fn new(capacity: usize) -> Self {
        Self {
            contexts: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Remember a context to come back to
    pub fn push(&mut self, context: C) {
        if self.capacity == 0 {
            return;
        }
        if self.contexts.len() >= self.capacity {
            self.contexts.pop_front();
        }
        self.contexts.push_back(context);
    }

    /// Most recent context, removed
    ///
    /// `None` when empty; the UI stays where it is.
    pub fn pop(&mut self) -> Option<C> {
        self.contexts.pop_back()
    }

    pub fn peek(&self) -> Option<&C> {
        self.contexts.back()
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    pub fn clear(&mut self) {
        self.contexts.clear();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<C> Default for NavigationHistory<C> {
    fn default() -> Self {
        Self::new(DEFAULT_NAVIGATION_CAPACITY)
    }
}
