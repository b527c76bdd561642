//! Recent sample window.

use std::collections::VecDeque;

use crate::control_loop::LoopSample;
use crate::error::{SimError, SimResult};

/// FIFO record of loop samples, optionally capped.
///
/// When full, pushing a new sample evicts the oldest one.
#[derive(Clone, Debug, PartialEq)]
pub struct History {
    samples: VecDeque<LoopSample>,
    capacity: Option<usize>,
}

impl History {
    /// History holding at most `capacity` samples.
    pub fn bounded(capacity: usize) -> SimResult<Self> {
        if capacity == 0 {
            return Err(SimError::InvalidArg {
                what: "history capacity must be at least 1",
            });
        }
        Ok(Self {
            samples: VecDeque::with_capacity(capacity),
            capacity: Some(capacity),
        })
    }

    /// History without a cap.
    pub fn unbounded() -> Self {
        Self {
            samples: VecDeque::new(),
            capacity: None,
        }
    }

    /// Append a sample, returning the evicted one if the window was full.
    pub fn push(&mut self, sample: LoopSample) -> Option<LoopSample> {
        let evicted = match self.capacity {
            Some(cap) if self.samples.len() >= cap => self.samples.pop_front(),
            _ => None,
        };
        self.samples.push_back(sample);
        evicted
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &LoopSample> + '_ {
        self.samples.iter()
    }

    pub fn latest(&self) -> Option<&LoopSample> {
        self.samples.back()
    }

    pub fn oldest(&self) -> Option<&LoopSample> {
        self.samples.front()
    }

    /// Remove and return every sample, oldest first. The cap is kept.
    pub fn drain(&mut self) -> Vec<LoopSample> {
        self.samples.drain(..).collect()
    }

    /// `[time, level]` pairs for plotting.
    pub fn level_series(&self) -> Vec<[f64; 2]> {
        self.samples.iter().map(|s| [s.time, s.level]).collect()
    }

    /// `[time, control]` pairs for plotting.
    pub fn control_series(&self) -> Vec<[f64; 2]> {
        self.samples.iter().map(|s| [s.time, s.control]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(i: usize) -> LoopSample {
        LoopSample {
            time: i as f64 * 0.1,
            level: i as f64,
            control: 0.0,
        }
    }

    #[test]
    fn bounded_history_evicts_oldest_first() {
        let mut history = History::bounded(200).unwrap();
        for i in 0..250 {
            let evicted = history.push(sample(i));
            assert!(history.len() <= 200);
            if i < 200 {
                assert!(evicted.is_none());
            } else {
                assert_eq!(evicted, Some(sample(i - 200)));
            }
        }
        assert_eq!(history.len(), 200);
        assert_eq!(history.oldest(), Some(&sample(50)));
        assert_eq!(history.latest(), Some(&sample(249)));
    }

    #[test]
    fn unbounded_history_keeps_everything() {
        let mut history = History::unbounded();
        for i in 0..1_000 {
            assert!(history.push(sample(i)).is_none());
        }
        assert_eq!(history.len(), 1_000);
        assert_eq!(history.capacity(), None);
    }

    #[test]
    fn zero_capacity_rejected() {
        assert!(History::bounded(0).is_err());
    }

    #[test]
    fn series_follow_insertion_order() {
        let mut history = History::bounded(3).unwrap();
        for i in 0..5 {
            history.push(sample(i));
        }
        let levels: Vec<f64> = history.level_series().iter().map(|p| p[1]).collect();
        assert_eq!(levels, vec![2.0, 3.0, 4.0]);
        assert_eq!(history.control_series().len(), 3);
    }

    #[test]
    fn drain_empties_but_keeps_cap() {
        let mut history = History::bounded(3).unwrap();
        for i in 0..5 {
            history.push(sample(i));
        }
        assert_eq!(history.drain(), vec![sample(2), sample(3), sample(4)]);
        assert!(history.is_empty());
        assert_eq!(history.capacity(), Some(3));

        history.push(sample(9));
        assert_eq!(history.drain(), vec![sample(9)]);
    }
}
