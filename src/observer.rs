//! Collaborators notified by the session and the link manager.
//!
//! - `DebugLog`: append-only, timestamped record of everything that happens.
//!   Each entry is also forwarded to the `log` facade.
//! - `StatusObserver`: connection indicator (connected flag + message).

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch
pub fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

/// One debug log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugEntry {
    pub timestamp_ms: u64,
    pub message: String,
}

impl fmt::Display for DebugEntry {
    /// `[HH:MM:SS UTC] message`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seconds_of_day = (self.timestamp_ms / 1000) % 86_400;
        write!(
            f,
            "[{:02}:{:02}:{:02} UTC] {}",
            seconds_of_day / 3600,
            (seconds_of_day / 60) % 60,
            seconds_of_day % 60,
            self.message
        )
    }
}

/// Shared append-only debug log. Clones append to the same record.
#[derive(Debug, Clone, Default)]
pub struct DebugLog {
    entries: Rc<RefCell<Vec<DebugEntry>>>,
}

impl DebugLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, message: impl Into<String>) {
        let entry = DebugEntry {
            timestamp_ms: epoch_millis(),
            message: message.into(),
        };
        log::info!(target: "debug_log", "{}", entry.message);
        self.entries.borrow_mut().push(entry);
    }

    /// Snapshot of all entries, oldest first
    pub fn entries(&self) -> Vec<DebugEntry> {
        self.entries.borrow().clone()
    }

    /// The last `count` entries, oldest first
    pub fn tail(&self, count: usize) -> Vec<DebugEntry> {
        let entries = self.entries.borrow();
        let start = entries.len().saturating_sub(count);
        entries[start..].to_vec()
    }

    /// Messages only, oldest first
    pub fn messages(&self) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .map(|entry| entry.message.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

/// Connection indicator
pub trait StatusObserver {
    fn connection_changed(&mut self, connected: bool, message: &str);
}

/// Keeps the latest status; used when nothing needs to be rendered
#[derive(Debug, Clone, Default)]
pub struct LatestStatus {
    pub connected: bool,
    pub message: String,
}

impl StatusObserver for LatestStatus {
    fn connection_changed(&mut self, connected: bool, message: &str) {
        self.connected = connected;
        self.message = message.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_entries() {
        let log = DebugLog::new();
        let other = log.clone();

        log.append("first");
        other.append("second");

        assert_eq!(log.messages(), vec!["first", "second"]);
        assert_eq!(other.len(), 2);
        assert!(log.entries()[0].timestamp_ms <= log.entries()[1].timestamp_ms);
    }

    #[test]
    fn test_tail() {
        let log = DebugLog::new();
        for i in 0..5 {
            log.append(format!("line {i}"));
        }
        let tail: Vec<String> = log.tail(2).into_iter().map(|e| e.message).collect();
        assert_eq!(tail, vec!["line 3", "line 4"]);
        assert_eq!(log.tail(10).len(), 5);
    }

    #[test]
    fn test_entry_display() {
        let entry = DebugEntry {
            // 1970-01-02 01:02:03 UTC
            timestamp_ms: (86_400 + 3_723) * 1000 + 456,
            message: "hello".to_string(),
        };
        assert_eq!(entry.to_string(), "[01:02:03 UTC] hello");
    }

    #[test]
    fn test_latest_status() {
        let mut status = LatestStatus::default();
        status.connection_changed(true, "Host connected");
        assert!(status.connected);
        assert_eq!(status.message, "Host connected");
    }
}
