//! Running sufficient statistics for variance-based impurity.
//!
//! A split sweep moves samples one at a time from the right child to the
//! left child; both sides keep an [`ImpurityAccumulator`] so every candidate
//! boundary is evaluated in O(1).

use serde::{Deserialize, Serialize};

/// Count, sum and sum of squares of the responses assigned to one node side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpurityAccumulator {
    count: usize,
    sum: f64,
    sum_squares: f64,
}

impl ImpurityAccumulator {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulates every value of an iterator.
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Self {
        let mut acc = Self::new();
        for value in values {
            acc.add(value);
        }
        acc
    }

    /// Adds one response.
    #[inline]
    pub fn add(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.sum_squares += value * value;
    }

    /// Removes one response previously added.
    #[inline]
    pub fn remove(&mut self, value: f64) {
        debug_assert!(self.count > 0, "remove from an empty accumulator");
        self.count -= 1;
        if self.count == 0 {
            // Drop accumulated rounding error instead of carrying it forward.
            self.sum = 0.0;
            self.sum_squares = 0.0;
        } else {
            self.sum -= value;
            self.sum_squares -= value * value;
        }
    }

    /// Number of responses currently accumulated.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Sum of the accumulated responses.
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Whether nothing is accumulated.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Mean response, 0.0 when empty.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    /// Sum of squared deviations from the mean, clamped at zero.
    pub fn impurity(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let ss = self.sum_squares - self.sum * self.sum / self.count as f64;
        ss.max(0.0)
    }

    /// Population variance (impurity per sample).
    pub fn variance(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.impurity() / self.count as f64
        }
    }
}
