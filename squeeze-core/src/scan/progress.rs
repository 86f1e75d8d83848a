//! Scan progress reporting

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Snapshot of a running scan, published after every completed symbol
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanProgress {
    pub completed: usize,
    pub total: usize,
    pub matched: usize,
    pub failed: usize,
}

impl ScanProgress {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    /// Completed share of the universe in [0, 1]; an empty universe is complete
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            (self.completed as f64 / self.total as f64).min(1.0)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed >= self.total
    }

    /// Watch channel seeded with an empty snapshot for `total` symbols
    pub fn channel(total: usize) -> (watch::Sender<ScanProgress>, watch::Receiver<ScanProgress>) {
        watch::channel(Self::new(total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction() {
        let mut progress = ScanProgress::new(4);
        assert_eq!(progress.fraction(), 0.0);
        progress.completed = 1;
        assert_eq!(progress.fraction(), 0.25);
        progress.completed = 4;
        assert_eq!(progress.fraction(), 1.0);
        assert!(progress.is_complete());
    }

    #[test]
    fn test_empty_universe_is_complete() {
        let progress = ScanProgress::new(0);
        assert_eq!(progress.fraction(), 1.0);
        assert!(progress.is_complete());
    }
}
