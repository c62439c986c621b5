use std::collections::VecDeque;

/// Fixed-length series buffer backing the rendered time axis.
///
/// Always holds exactly its configured length: it starts prefilled with zeros
/// and every push evicts the oldest point, so a renderer sees a stable window
/// that scrolls left. This is presentation state only; resetting it must not
/// disturb the statistics kept elsewhere.
pub struct DisplaySeries {
    data: VecDeque<f64>,
}

impl DisplaySeries {
    pub fn new(len: usize) -> Self {
        let mut data = VecDeque::with_capacity(len);
        data.extend(std::iter::repeat(0.0).take(len));
        Self { data }
    }

    pub fn push(&mut self, value: f64) {
        self.data.pop_front();
        self.data.push_back(value);
    }

    /// Zeroes every point while keeping the fixed length.
    pub fn reset(&mut self) {
        for slot in self.data.iter_mut() {
            *slot = 0.0;
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.data.iter()
    }

    /// Newest point, i.e. the value pushed most recently (zero before any push).
    pub fn latest(&self) -> f64 {
        self.data.back().copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_zero_prefilled_at_fixed_length() {
        let series = DisplaySeries::new(250);
        assert_eq!(series.len(), 250);
        assert!(series.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn push_keeps_length_and_evicts_oldest() {
        let mut series = DisplaySeries::new(3);
        series.push(1.0);
        series.push(2.0);
        assert_eq!(series.len(), 3);
        let contents: Vec<f64> = series.iter().copied().collect();
        assert_eq!(contents, vec![0.0, 1.0, 2.0]);
        series.push(3.0);
        series.push(4.0);
        let contents: Vec<f64> = series.iter().copied().collect();
        assert_eq!(contents, vec![2.0, 3.0, 4.0]);
        assert_eq!(series.latest(), 4.0);
    }

    #[test]
    fn reset_zeroes_without_changing_length() {
        let mut series = DisplaySeries::new(4);
        for v in [1.0, 2.0, 3.0] {
            series.push(v);
        }
        series.reset();
        assert_eq!(series.len(), 4);
        assert!(series.iter().all(|v| *v == 0.0));
    }
}
