//! Size based progress estimation.

/// Percentage of `predicted` that `current` represents, floored and clamped to 100.
///
/// Returns 0 when nothing is predicted.
pub fn percent_of(current: u64, predicted: u64) -> u8 {
    if predicted == 0 {
        return 0;
    }
    let percent = (current as f64 / predicted as f64 * 100.0).floor();
    percent.clamp(0.0, 100.0) as u8
}

/// Turns a stream of observed file sizes into de-duplicated percentages.
///
/// Observed percentages never go backwards and stop at 99; only
/// [`ProgressTracker::finish`] reports 100, and only once.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    predicted: u64,
    last: u8,
    finished: bool,
}

impl ProgressTracker {
    pub fn new(predicted: u64) -> Self {
        Self {
            predicted,
            last: 0,
            finished: false,
        }
    }

    pub fn predicted(&self) -> u64 {
        self.predicted
    }

    /// Records a new file size and returns the percentage to report, if it advanced.
    pub fn observe(&mut self, current_size: u64) -> Option<u8> {
        if self.finished {
            return None;
        }
        let percent = percent_of(current_size, self.predicted).min(99);
        if percent > self.last {
            self.last = percent;
            Some(percent)
        } else {
            None
        }
    }

    /// Marks the stage complete. Returns 100 the first time, `None` afterwards.
    pub fn finish(&mut self) -> Option<u8> {
        if self.finished {
            return None;
        }
        self.finished = true;
        self.last = 100;
        Some(100)
    }
}
