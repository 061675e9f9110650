//! Progress reporting shared by the reorganize and art-fetch phases.

/// One completion notification in a run's progress sequence.
///
/// `percent` is `floor(done * 100 / total)`, and a run with nothing to do
/// reports a single event at 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub done: usize,
    pub total: usize,
    pub percent: u8,
}

impl ProgressEvent {
    pub fn new(done: usize, total: usize) -> Self {
        let percent = if total == 0 {
            100
        } else {
            (done.min(total) * 100 / total) as u8
        };
        Self {
            done,
            total,
            percent,
        }
    }

    /// The single event emitted by a run with an empty work list.
    pub fn complete() -> Self {
        Self::new(0, 0)
    }

    pub fn is_complete(&self) -> bool {
        self.percent == 100
    }
}
