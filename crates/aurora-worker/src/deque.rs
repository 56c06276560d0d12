//! Per-worker double-ended work queues.

use std::collections::VecDeque;
use std::sync::Mutex;

/// A work-stealing deque.
///
/// The owning worker pushes and pops at the back, so local execution is
/// LIFO and the search stays depth-first with bounded memory. Thieves pop
/// at the front, which holds the shallowest (largest) pending branches.
/// Every operation is a short lock-guarded critical section.
#[derive(Debug)]
pub struct StealDeque<T> {
    inner: Mutex<VecDeque<T>>,
}

impl<T> StealDeque<T> {
    /// Creates an empty deque.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
        }
    }

    /// Owner push.
    pub fn push_back(&self, item: T) {
        self.inner.lock().unwrap().push_back(item);
    }

    /// Owner pop, newest first.
    pub fn pop_back(&self) -> Option<T> {
        self.inner.lock().unwrap().pop_back()
    }

    /// Thief pop, oldest (shallowest) first.
    pub fn pop_front(&self) -> Option<T> {
        self.inner.lock().unwrap().pop_front()
    }

    /// Current length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    /// Whether the deque is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }
}

impl<T> Default for StealDeque<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_is_lifo() {
        let d = StealDeque::new();
        d.push_back(1);
        d.push_back(2);
        d.push_back(3);
        assert_eq!(d.pop_back(), Some(3));
        assert_eq!(d.pop_back(), Some(2));
        assert_eq!(d.pop_back(), Some(1));
        assert_eq!(d.pop_back(), None);
    }

    #[test]
    fn test_thief_is_fifo() {
        let d = StealDeque::new();
        d.push_back(1);
        d.push_back(2);
        d.push_back(3);
        assert_eq!(d.pop_front(), Some(1));
        assert_eq!(d.pop_back(), Some(3));
        assert_eq!(d.pop_front(), Some(2));
        assert!(d.is_empty());
    }

    #[test]
    fn test_concurrent_push_steal() {
        use std::sync::Arc;
        use std::thread;

        let d = Arc::new(StealDeque::new());
        let producer = {
            let d = d.clone();
            thread::spawn(move || {
                for i in 0..1000 {
                    d.push_back(i);
                }
            })
        };
        let thief = {
            let d = d.clone();
            thread::spawn(move || {
                let mut stolen = 0;
                while stolen < 500 {
                    if d.pop_front().is_some() {
                        stolen += 1;
                    }
                }
                stolen
            })
        };
        producer.join().unwrap();
        assert_eq!(thief.join().unwrap(), 500);
        assert_eq!(d.len(), 500);
    }
}
