use std::collections::HashMap;

/// Slot a notification is de-duplicated under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DedupKey {
    /// A homework, by name.
    Item(String),
    /// The single slot shared by all failure reports.
    Error,
}

/// Last message sent per dedup key, kept for the lifetime of the process.
///
/// A message is only worth sending when it differs from the one recorded for
/// its key. Entries are recorded after a successful send, never before.
#[derive(Debug, Default)]
pub struct NotificationCache {
    last_sent: HashMap<DedupKey, String>,
}

impl NotificationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `message` differs from what was last sent for `key`.
    pub fn is_new(&self, key: &DedupKey, message: &str) -> bool {
        self.last_sent.get(key).map(String::as_str) != Some(message)
    }

    pub fn record(&mut self, key: DedupKey, message: String) {
        self.last_sent.insert(key, message);
    }

    /// Forget the last message for `key`, so the next one is sent regardless.
    pub fn clear(&mut self, key: &DedupKey) {
        self.last_sent.remove(key);
    }

    pub fn last_sent(&self, key: &DedupKey) -> Option<&str> {
        self.last_sent.get(key).map(String::as_str)
    }
}
