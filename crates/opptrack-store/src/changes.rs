use std::fmt;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Mutex, MutexGuard};

/// Tables that publish change notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Companies,
    Opportunities,
    Attachments,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Table::Companies => write!(f, "companies"),
            Table::Opportunities => write!(f, "opportunities"),
            Table::Attachments => write!(f, "attachments"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub table: Table,
    pub kind: ChangeKind,
    pub id: String,
}

/// In-process change notifications, scoped per table.
///
/// Subscribers whose receiver has been dropped are pruned on the next publish.
#[derive(Default)]
pub struct ChangeFeed {
    subscribers: Mutex<Vec<(Table, Sender<ChangeEvent>)>>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, table: Table) -> Receiver<ChangeEvent> {
        let (tx, rx) = channel();
        self.lock().push((table, tx));
        rx
    }

    pub fn publish(&self, table: Table, kind: ChangeKind, id: &str) {
        let event = ChangeEvent {
            table,
            kind,
            id: id.to_string(),
        };
        self.lock()
            .retain(|(scope, tx)| *scope != table || tx.send(event.clone()).is_ok());
    }

    #[cfg(test)]
    fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(Table, Sender<ChangeEvent>)>> {
        // A panicking subscriber cannot leave the list half-updated.
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_are_scoped_to_table() {
        let feed = ChangeFeed::new();
        let opps = feed.subscribe(Table::Opportunities);
        let files = feed.subscribe(Table::Attachments);

        feed.publish(Table::Opportunities, ChangeKind::Update, "42");

        let event = opps.try_recv().unwrap();
        assert_eq!(event.id, "42");
        assert_eq!(event.kind, ChangeKind::Update);
        assert!(files.try_recv().is_err());
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let feed = ChangeFeed::new();
        let rx = feed.subscribe(Table::Companies);
        drop(rx);
        assert_eq!(feed.subscriber_count(), 1);

        feed.publish(Table::Companies, ChangeKind::Insert, "c1");
        assert_eq!(feed.subscriber_count(), 0);
    }
}
