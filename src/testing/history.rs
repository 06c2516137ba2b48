//! Event history capture
//!
//! Thread-safe event logging for recording operation histories that can be
//! verified against invariants.

use super::events::{Event, OperationId, OperationResult, OperationType, Timestamp};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Thread-safe event log for capturing operation history
#[derive(Clone)]
pub struct EventLog {
    inner: Arc<RwLock<EventLogInner>>,
    next_op_id: Arc<AtomicU64>,
}

struct EventLogInner {
    events: Vec<Event>,
    pending: HashMap<OperationId, usize>, // op_id -> index in events
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(EventLogInner {
                events: Vec::new(),
                pending: HashMap::new(),
            })),
            next_op_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Record a new operation invocation
    pub fn record_invoke(&self, op_type: OperationType) -> OperationId {
        let op_id = OperationId::new(self.next_op_id.fetch_add(1, Ordering::SeqCst));
        let event = Event::invoke(op_id, op_type);

        let mut inner = self.inner.write();
        let index = inner.events.len();
        inner.events.push(event);
        inner.pending.insert(op_id, index);

        op_id
    }

    /// Record operation completion
    pub fn record_return(&self, op_id: OperationId, result: OperationResult) {
        let mut inner = self.inner.write();

        if let Some(index) = inner.pending.remove(&op_id) {
            if let Some(event) = inner.events.get_mut(index) {
                event.complete(result);
            }
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.inner.read().events.clone()
    }

    pub fn completed_events(&self) -> Vec<Event> {
        self.inner
            .read()
            .events
            .iter()
            .filter(|e| e.is_complete())
            .cloned()
            .collect()
    }

    pub fn pending_events(&self) -> Vec<Event> {
        self.inner
            .read()
            .events
            .iter()
            .filter(|e| !e.is_complete())
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().events.is_empty()
    }

    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.events.clear();
        inner.pending.clear();
    }

    /// Export to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.events())
    }

    /// Import from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let events: Vec<Event> = serde_json::from_str(json)?;
        let log = Self::new();

        let max_op_id = events.iter().map(|e| e.op_id.0).max().unwrap_or(0);
        let pending: HashMap<OperationId, usize> = events
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.is_complete())
            .map(|(idx, e)| (e.op_id, idx))
            .collect();

        {
            let mut inner = log.inner.write();
            inner.events = events;
            inner.pending = pending;
        }
        log.next_op_id.store(max_op_id + 1, Ordering::SeqCst);

        Ok(log)
    }

    /// Get events in a time range
    pub fn events_in_range(&self, start: Timestamp, end: Timestamp) -> Vec<Event> {
        self.inner
            .read()
            .events
            .iter()
            .filter(|e| e.invoke_time >= start && e.invoke_time <= end)
            .cloned()
            .collect()
    }

    /// Get events by operation type
    pub fn events_by_type(&self, filter: impl Fn(&OperationType) -> bool) -> Vec<Event> {
        self.inner
            .read()
            .events
            .iter()
            .filter(|e| filter(&e.op_type))
            .cloned()
            .collect()
    }

    pub fn index_operations(&self) -> Vec<Event> {
        self.events_by_type(|op| matches!(op, OperationType::Index { .. }))
    }

    pub fn unindex_operations(&self) -> Vec<Event> {
        self.events_by_type(|op| matches!(op, OperationType::Unindex { .. }))
    }

    pub fn sort_operations(&self) -> Vec<Event> {
        self.events_by_type(|op| matches!(op, OperationType::Sort { .. }))
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_log_basic() {
        let log = EventLog::new();

        let op_id = log.record_invoke(OperationType::Unindex { doc_id: 1 });
        assert_eq!(log.len(), 1);
        assert_eq!(log.pending_events().len(), 1);
        assert_eq!(log.completed_events().len(), 0);

        log.record_return(
            op_id,
            OperationResult::Unindexed {
                doc_id: 1,
                changed: false,
            },
        );
        assert_eq!(log.pending_events().len(), 0);
        assert_eq!(log.completed_events().len(), 1);
    }

    #[test]
    fn test_event_log_out_of_order_completion() {
        let log = EventLog::new();
        let op1 = log.record_invoke(OperationType::Lookup { doc_id: 1 });
        let op2 = log.record_invoke(OperationType::Lookup { doc_id: 2 });

        log.record_return(op2, OperationResult::Located { doc_id: 2, found: true });
        log.record_return(op1, OperationResult::Located { doc_id: 1, found: false });

        let events = log.completed_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].op_id, op1);
    }

    #[test]
    fn test_event_log_json_roundtrip_keeps_pending() {
        let log = EventLog::new();
        let done = log.record_invoke(OperationType::Unindex { doc_id: 42 });
        log.record_return(
            done,
            OperationResult::Unindexed {
                doc_id: 42,
                changed: true,
            },
        );
        let pending = log.record_invoke(OperationType::Lookup { doc_id: 42 });

        let restored = EventLog::from_json(&log.to_json().unwrap()).unwrap();
        assert_eq!(restored.len(), 2);
        assert_eq!(restored.pending_events().len(), 1);

        restored.record_return(pending, OperationResult::Located { doc_id: 42, found: false });
        assert_eq!(restored.completed_events().len(), 2);

        let next = restored.record_invoke(OperationType::Lookup { doc_id: 1 });
        assert_eq!(next, OperationId::new(3));
    }

    #[test]
    fn test_events_in_range_uses_invoke_time() {
        let log = EventLog::new();
        for doc_id in 1..=3 {
            log.record_invoke(OperationType::Lookup { doc_id });
        }
        let events = log.events();
        let (first, last) = (events[0].invoke_time, events[2].invoke_time);

        assert_eq!(log.events_in_range(first, last).len(), 3);
        assert!(log
            .events_in_range(Timestamp::from_nanos(0), Timestamp::from_nanos(1))
            .is_empty());

        let tail = log.events_in_range(events[1].invoke_time, last);
        assert!(tail.len() >= 2);
        assert!(tail.iter().all(|e| e.invoke_time >= events[1].invoke_time));
    }

    #[test]
    fn test_event_log_type_filters() {
        let log = EventLog::new();
        log.record_invoke(OperationType::Index {
            doc_id: 1,
            location: None,
        });
        log.record_invoke(OperationType::Unindex { doc_id: 2 });
        log.record_invoke(OperationType::Sort {
            center: None,
            candidates: vec![1],
            reverse: false,
        });

        assert_eq!(log.index_operations().len(), 1);
        assert_eq!(log.unindex_operations().len(), 1);
        assert_eq!(log.sort_operations().len(), 1);

        log.clear();
        assert!(log.is_empty());
    }
}
