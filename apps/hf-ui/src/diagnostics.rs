//! In-window event log.

use std::collections::VecDeque;

use chrono::Local;

const DEFAULT_CAPACITY: usize = 500;

/// Bounded list of `[HH:MM:SS] message` lines, oldest dropped first.
pub struct DiagnosticLog {
    entries: VecDeque<String>,
    capacity: usize,
}

impl Default for DiagnosticLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl DiagnosticLog {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Timestamp `message` with local wall-clock time and append it. The
    /// message is mirrored to `tracing`.
    pub fn log(&mut self, message: impl AsRef<str>) {
        let message = message.as_ref();
        tracing::info!(target: "hf_ui::diagnostics", "{message}");
        let line = format!("[{}] {message}", Local::now().format("%H:%M:%S"));
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(line);
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_are_timestamped() {
        let mut log = DiagnosticLog::default();
        log.log("Simulation started (virtual mode)");
        let line = log.entries().next().unwrap();

        // "[HH:MM:SS] " prefix
        assert_eq!(line.len(), 11 + "Simulation started (virtual mode)".len());
        assert!(line.starts_with('['));
        assert_eq!(&line[9..11], "] ");
        assert_eq!(line.as_bytes()[3], b':');
        assert_eq!(line.as_bytes()[6], b':');
        assert!(line.ends_with("Simulation started (virtual mode)"));
    }

    #[test]
    fn oldest_entries_dropped() {
        let mut log = DiagnosticLog::with_capacity(3);
        for i in 0..5 {
            log.log(format!("event {i}"));
        }
        assert_eq!(log.len(), 3);
        let kept: Vec<&str> = log.entries().collect();
        assert!(kept[0].ends_with("event 2"));
        assert!(kept[2].ends_with("event 4"));
    }
}
