//! # Sync Queue
//!
//! In-memory backlog of operations waiting for a drain.
//!
//! ## Ordering
//!
//! - `High` operations are inserted at the head, so the most recent `High`
//!   submission is served first
//! - `Normal` and `Low` operations are appended at the tail (FIFO)
//! - An operation already pulled into a batch is never reordered
//!
//! The queue does not deduplicate; the executor's active-set rejects a
//! second concurrent execution of the same operation.
//!
//! The backlog is not persisted. Operations still queued when the process
//! exits are lost.

use std::collections::VecDeque;
use tracing::debug;

use crate::operation::{Priority, SyncOperation};

#[derive(Debug, Default)]
pub struct SyncQueue {
    items: VecDeque<SyncOperation>,
}

impl SyncQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an operation according to its priority.
    pub fn enqueue(&mut self, operation: SyncOperation) {
        match operation.priority {
            Priority::High => self.items.push_front(operation),
            Priority::Normal | Priority::Low => self.items.push_back(operation),
        }
    }

    /// Removes up to `max_count` operations from the head.
    ///
    /// Returns an empty batch when the queue is empty.
    pub fn dequeue_batch(&mut self, max_count: usize) -> Vec<SyncOperation> {
        let count = max_count.min(self.items.len());
        let batch: Vec<_> = self.items.drain(..count).collect();

        if !batch.is_empty() {
            debug!(
                batch_size = batch.len(),
                remaining = self.items.len(),
                "Dequeued sync batch"
            );
        }

        batch
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::OperationId;
    use bridge_traits::records::ProfileRecord;
    use chrono::Utc;

    fn op(user_id: &str, priority: Priority) -> SyncOperation {
        SyncOperation::new(
            ProfileRecord {
                user_id: user_id.to_string(),
                name: String::new(),
                age: 30,
                weight: 70.0,
                height: 175.0,
                fitness_goals: Vec::new(),
            },
            priority,
            Utc::now(),
        )
    }

    fn ids(batch: &[SyncOperation]) -> Vec<OperationId> {
        batch.iter().map(|op| op.id).collect()
    }

    #[test]
    fn test_empty_dequeue() {
        let mut queue = SyncQueue::new();
        assert!(queue.dequeue_batch(10).is_empty());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_fifo_among_equal_priority() {
        let mut queue = SyncQueue::new();
        let ops: Vec<_> = (0..5).map(|i| op(&format!("u{i}"), Priority::Normal)).collect();
        let expected = ids(&ops);
        for op in ops {
            queue.enqueue(op);
        }

        let first = queue.dequeue_batch(2);
        let rest = queue.dequeue_batch(10);
        assert_eq!(ids(&first), expected[..2]);
        assert_eq!(ids(&rest), expected[2..]);
    }

    #[test]
    fn test_high_priority_goes_to_head() {
        let mut queue = SyncQueue::new();
        let normal = op("normal", Priority::Normal);
        let low = op("low", Priority::Low);
        let high = op("high", Priority::High);
        let (normal_id, low_id, high_id) = (normal.id, low.id, high.id);

        queue.enqueue(normal);
        queue.enqueue(low);
        queue.enqueue(high);

        assert_eq!(ids(&queue.dequeue_batch(3)), vec![high_id, normal_id, low_id]);
    }

    #[test]
    fn test_partial_batch_preserves_remaining_order() {
        let mut queue = SyncQueue::new();
        let a = op("a", Priority::Normal);
        let b = op("b", Priority::Normal);
        let c = op("c", Priority::Low);
        let expected = vec![b.id, c.id];
        queue.enqueue(a);
        queue.enqueue(b);
        queue.enqueue(c);

        assert_eq!(queue.dequeue_batch(1).len(), 1);
        assert_eq!(queue.len(), 2);
        assert_eq!(ids(&queue.dequeue_batch(5)), expected);
    }
}
