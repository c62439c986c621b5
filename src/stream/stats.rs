use std::collections::VecDeque;

/// Fixed-capacity rolling window with an incrementally maintained mean.
///
/// While the window is filling the mean is recomputed as a plain average after
/// every push. Once full, each push updates the mean in O(1) from the value
/// entering and the value evicted. The incremental path can drift by ordinary
/// floating-point error over very long runs; that trade-off is accepted and no
/// periodic recomputation is performed.
pub struct RollingMean {
    window: VecDeque<f64>,
    capacity: usize,
    mean: f64,
}

impl RollingMean {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            mean: 0.0,
        }
    }

    /// Pushes one value and returns the updated running mean.
    pub fn observe(&mut self, value: f64) -> f64 {
        if self.window.len() == self.capacity {
            if let Some(evicted) = self.window.pop_front() {
                self.mean -= evicted / self.capacity as f64;
                self.mean += value / self.capacity as f64;
            }
            self.window.push_back(value);
        } else {
            self.window.push_back(value);
            let sum: f64 = self.window.iter().sum();
            self.mean = sum / self.window.len() as f64;
        }
        self.mean
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.window.iter()
    }
}
