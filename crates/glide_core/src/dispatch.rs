//! Deferred dispatch
//!
//! Work that must run "after the current layout pass" is posted to a
//! [`DeferredQueue`] owned by the component that needs it. The host drains
//! the queue once layout has settled. Nothing here spawns threads.

use smallvec::SmallVec;

/// Dispatch priority for deferred work
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

#[derive(Debug)]
struct Entry<T> {
    priority: Priority,
    seq: u64,
    task: T,
}

/// A single-threaded queue of deferred tasks.
///
/// Posting a task that is already queued is a no-op, so repeated layout
/// passes coalesce into one unit of work. Draining yields higher priorities
/// first and FIFO order within a priority.
#[derive(Debug)]
pub struct DeferredQueue<T> {
    entries: SmallVec<[Entry<T>; 4]>,
    next_seq: u64,
}

impl<T: PartialEq> DeferredQueue<T> {
    pub fn new() -> Self {
        Self {
            entries: SmallVec::new(),
            next_seq: 0,
        }
    }

    /// Queue `task`. Returns false if an equal task was already queued.
    ///
    /// A duplicate posted at a higher priority raises the queued entry to
    /// that priority.
    pub fn post(&mut self, task: T, priority: Priority) -> bool {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.task == task) {
            existing.priority = existing.priority.max(priority);
            return false;
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry {
            priority,
            seq,
            task,
        });
        true
    }

    /// Take every queued task in dispatch order
    pub fn drain(&mut self) -> Vec<T> {
        let mut entries: Vec<Entry<T>> = self.entries.drain(..).collect();
        entries.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.seq.cmp(&b.seq)));
        entries.into_iter().map(|e| e.task).collect()
    }

    pub fn contains(&self, task: &T) -> bool {
        self.entries.iter().any(|e| &e.task == task)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all queued tasks without running them
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T: PartialEq> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_within_priority() {
        let mut queue = DeferredQueue::new();
        queue.post("a", Priority::Low);
        queue.post("b", Priority::Low);
        queue.post("c", Priority::Low);

        assert_eq!(queue.drain(), vec!["a", "b", "c"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_priority_order() {
        let mut queue = DeferredQueue::new();
        queue.post("low", Priority::Low);
        queue.post("high", Priority::High);
        queue.post("normal", Priority::Normal);

        assert_eq!(queue.drain(), vec!["high", "normal", "low"]);
    }

    #[test]
    fn test_duplicates_coalesce() {
        let mut queue = DeferredQueue::new();
        assert!(queue.post(1, Priority::Low));
        assert!(queue.post(2, Priority::Normal));
        assert!(!queue.post(1, Priority::High));

        assert_eq!(queue.len(), 2);
        assert!(queue.contains(&1));
        // The duplicate raised task 1 to high priority
        assert_eq!(queue.drain(), vec![1, 2]);
    }

    #[test]
    fn test_clear() {
        let mut queue = DeferredQueue::new();
        queue.post((), Priority::Normal);
        queue.clear();
        assert!(queue.drain().is_empty());
    }
}
