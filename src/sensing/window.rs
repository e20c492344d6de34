//! Rolling average window for a noisy distance channel

/// Fixed-depth circular buffer of distance samples
///
/// Distinguishes "not yet warmed" (fewer samples than capacity) from "full";
/// the average reads as zero until the window is warmed.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    samples: Vec<u32>,
    index: usize,
    count: usize,
}

impl RollingWindow {
    /// Create a window of the given capacity (at least 1)
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: vec![0; capacity.max(1)],
            index: 0,
            count: 0,
        }
    }

    /// Push one sample, evicting the oldest once full
    pub fn push(&mut self, sample: u32) {
        self.samples[self.index] = sample;
        self.index = (self.index + 1) % self.samples.len();
        if self.count < self.samples.len() {
            self.count += 1;
        }
    }

    /// True once the window holds a full set of samples
    pub fn is_warmed(&self) -> bool {
        self.count >= self.samples.len()
    }

    /// Mean of the stored samples, or 0.0 until warmed
    pub fn average(&self) -> f32 {
        if !self.is_warmed() {
            return 0.0;
        }
        let sum: u32 = self.samples.iter().sum();
        sum as f32 / self.samples.len() as f32
    }
}
