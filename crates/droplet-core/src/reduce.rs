//! Order-insensitive floating-point reductions.
//!
//! Integral diagnostics are summed over every active cell. The visiting
//! order is an engine detail (and changes whenever the mesh adapts), so the
//! sums use Neumaier's compensated algorithm to keep results reproducible to
//! within a few ulps regardless of order.

/// Running compensated sum.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NeumaierSum {
    sum: f64,
    compensation: f64,
}

impl NeumaierSum {
    /// An empty sum.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one term.
    pub fn add(&mut self, value: f64) {
        let t = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - t) + value;
        } else {
            self.compensation += (value - t) + self.sum;
        }
        self.sum = t;
    }

    /// Merge another partial sum into this one.
    pub fn merge(&mut self, other: NeumaierSum) {
        self.add(other.sum);
        self.add(other.compensation);
    }

    /// Current total.
    pub fn value(&self) -> f64 {
        self.sum + self.compensation
    }
}

impl Extend<f64> for NeumaierSum {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for v in iter {
            self.add(v);
        }
    }
}

/// Compensated sum of an iterator.
pub fn compensated_sum(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut acc = NeumaierSum::new();
    acc.extend(values);
    acc.value()
}
