//! # Change streams
//!
//! Every table actor publishes a [`ChangeEvent`] after each successful
//! insert, update or delete. Consumers open a [`ChangeStream`] through
//! `ResourceClient::subscribe`, narrowed by a [`ChangeFilter`] (event kind plus
//! an optional row predicate).
//!
//! Subscriptions are independent: two surfaces watching the same table each
//! get their own copy of every event. Nothing here de-duplicates them.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Row predicate shared between a filter and the actor answering list queries.
pub type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// One committed row change. `old` is absent for inserts, `new` for deletes.
#[derive(Debug, Clone)]
pub struct ChangeEvent<T> {
    pub table: &'static str,
    pub kind: ChangeKind,
    pub old: Option<T>,
    pub new: Option<T>,
    pub committed_at: DateTime<Utc>,
}

impl<T> ChangeEvent<T> {
    pub fn new(table: &'static str, kind: ChangeKind, old: Option<T>, new: Option<T>) -> Self {
        Self {
            table,
            kind,
            old,
            new,
            committed_at: Utc::now(),
        }
    }

    /// The row after the change, or the removed row for deletes.
    pub fn row(&self) -> Option<&T> {
        self.new.as_ref().or(self.old.as_ref())
    }
}

/// Which event kinds a subscriber wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventFilter {
    #[default]
    All,
    Only(ChangeKind),
}

impl EventFilter {
    pub fn accepts(&self, kind: ChangeKind) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Only(wanted) => *wanted == kind,
        }
    }
}

pub struct ChangeFilter<T> {
    event: EventFilter,
    predicate: Option<Predicate<T>>,
}

impl<T> ChangeFilter<T> {
    pub fn all() -> Self {
        Self { event: EventFilter::All, predicate: None }
    }

    pub fn only(kind: ChangeKind) -> Self {
        Self { event: EventFilter::Only(kind), predicate: None }
    }

    /// Narrow to rows matching `predicate`. Deletes are matched on the removed row.
    pub fn rows(mut self, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    pub fn matches(&self, event: &ChangeEvent<T>) -> bool {
        if !self.event.accepts(event.kind) {
            return false;
        }
        match (&self.predicate, event.row()) {
            (None, _) => true,
            (Some(keep), Some(row)) => keep(row),
            (Some(_), None) => false,
        }
    }
}

impl<T> Clone for ChangeFilter<T> {
    fn clone(&self) -> Self {
        Self {
            event: self.event,
            predicate: self.predicate.clone(),
        }
    }
}

impl<T> fmt::Debug for ChangeFilter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeFilter")
            .field("event", &self.event)
            .field("has_predicate", &self.predicate.is_some())
            .finish()
    }
}

/// Filtered view over a table's broadcast channel.
pub struct ChangeStream<T> {
    receiver: broadcast::Receiver<ChangeEvent<T>>,
    filter: ChangeFilter<T>,
}

impl<T: Clone + Send + 'static> ChangeStream<T> {
    pub fn new(receiver: broadcast::Receiver<ChangeEvent<T>>, filter: ChangeFilter<T>) -> Self {
        Self { receiver, filter }
    }

    /// A stream whose table is already gone. `next` returns `None` at once.
    pub fn closed(filter: ChangeFilter<T>) -> Self {
        let (_, receiver) = broadcast::channel(1);
        Self { receiver, filter }
    }

    /// Next matching event, or `None` once the table has gone away.
    ///
    /// A subscriber that falls behind loses the overwritten events; the gap is
    /// logged and the stream carries on with the oldest retained event.
    pub async fn next(&mut self) -> Option<ChangeEvent<T>> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.filter.matches(&event) => return Some(event),
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Change stream lagged, events dropped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

/// Owns the task feeding a subscription callback. Dropping it unsubscribes.
pub struct SubscriptionHandle {
    task: JoinHandle<()>,
}

impl SubscriptionHandle {
    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Drive `callback` with every event from `stream` on a background task.
pub fn subscribe_with<T, F>(mut stream: ChangeStream<T>, mut callback: F) -> SubscriptionHandle
where
    T: Clone + Send + 'static,
    F: FnMut(ChangeEvent<T>) + Send + 'static,
{
    let task = tokio::spawn(async move {
        while let Some(event) = stream.next().await {
            callback(event);
        }
        debug!("Change stream closed");
    });
    SubscriptionHandle { task }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: u32,
        open: bool,
    }

    fn event(kind: ChangeKind, old: Option<Row>, new: Option<Row>) -> ChangeEvent<Row> {
        ChangeEvent::new("rows", kind, old, new)
    }

    #[test]
    fn test_filter_by_kind() {
        let filter = ChangeFilter::<Row>::only(ChangeKind::Update);
        assert!(filter.matches(&event(ChangeKind::Update, None, Some(Row { id: 1, open: true }))));
        assert!(!filter.matches(&event(ChangeKind::Insert, None, Some(Row { id: 1, open: true }))));
    }

    #[test]
    fn test_predicate_matches_removed_row_on_delete() {
        let filter = ChangeFilter::<Row>::all().rows(|row| row.id == 7);
        assert!(filter.matches(&event(ChangeKind::Delete, Some(Row { id: 7, open: false }), None)));
        assert!(!filter.matches(&event(ChangeKind::Delete, Some(Row { id: 8, open: false }), None)));
    }

    #[test]
    fn test_change_kind_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&ChangeKind::Insert).unwrap(), "\"INSERT\"");
    }

    #[tokio::test]
    async fn test_stream_skips_non_matching_events() {
        let (tx, rx) = broadcast::channel(8);
        let mut stream = ChangeStream::new(rx, ChangeFilter::all().rows(|row: &Row| row.open));

        tx.send(event(ChangeKind::Insert, None, Some(Row { id: 1, open: false }))).unwrap();
        tx.send(event(ChangeKind::Insert, None, Some(Row { id: 2, open: true }))).unwrap();
        drop(tx);

        assert_eq!(stream.next().await.unwrap().new.unwrap().id, 2);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_closed_stream_ends_immediately() {
        let mut stream = ChangeStream::<Row>::closed(ChangeFilter::all());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_lagged_stream_keeps_going() {
        let (tx, rx) = broadcast::channel(2);
        let mut stream = ChangeStream::new(rx, ChangeFilter::all());

        for id in 0..5 {
            tx.send(event(ChangeKind::Insert, None, Some(Row { id, open: true }))).unwrap();
        }

        // Capacity 2: only the last two survive.
        assert_eq!(stream.next().await.unwrap().new.unwrap().id, 3);
        assert_eq!(stream.next().await.unwrap().new.unwrap().id, 4);
    }

    #[tokio::test]
    async fn test_subscribe_with_and_unsubscribe_on_drop() {
        let (tx, rx) = broadcast::channel(8);
        let (seen_tx, mut seen_rx) = mpsc::unbounded_channel();

        let handle = subscribe_with(ChangeStream::new(rx, ChangeFilter::all()), move |event: ChangeEvent<Row>| {
            let _ = seen_tx.send(event.kind);
        });

        tx.send(event(ChangeKind::Insert, None, Some(Row { id: 1, open: true }))).unwrap();
        assert_eq!(seen_rx.recv().await, Some(ChangeKind::Insert));
        assert!(handle.is_active());

        drop(handle);
        // The aborted task drops its sender, closing the channel.
        assert_eq!(seen_rx.recv().await, None);
    }
}
