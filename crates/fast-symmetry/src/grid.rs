//! Fixed-size 2D buffer over `(r_bin, theta_bin)`.

/// Owned accumulator-shaped grid, stored r-major: all θ bins of `r_bin = 0`
/// first, then `r_bin = 1`, and so on. Never resized after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoughGrid<T> {
    r_bins: usize,
    theta_bins: usize,
    data: Vec<T>,
}

impl<T: Copy + Default> HoughGrid<T> {
    pub(crate) fn new(r_bins: usize, theta_bins: usize) -> Self {
        Self {
            r_bins,
            theta_bins,
            data: vec![T::default(); r_bins * theta_bins],
        }
    }

    pub fn r_bins(&self) -> usize {
        self.r_bins
    }

    pub fn theta_bins(&self) -> usize {
        self.theta_bins
    }

    #[inline]
    fn offset(&self, r_bin: usize, theta_bin: usize) -> usize {
        debug_assert!(r_bin < self.r_bins && theta_bin < self.theta_bins);
        r_bin * self.theta_bins + theta_bin
    }

    /// Value at a bin; `None` outside the grid.
    #[inline]
    pub fn get(&self, r_bin: usize, theta_bin: usize) -> Option<T> {
        if r_bin < self.r_bins && theta_bin < self.theta_bins {
            Some(self.data[self.offset(r_bin, theta_bin)])
        } else {
            None
        }
    }

    #[inline]
    pub(crate) fn set(&mut self, r_bin: usize, theta_bin: usize, value: T) {
        let i = self.offset(r_bin, theta_bin);
        self.data[i] = value;
    }

    /// Row-major (r-major) cell values.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// θ bins of one r bin.
    pub fn r_row(&self, r_bin: usize) -> &[T] {
        let start = r_bin * self.theta_bins;
        &self.data[start..start + self.theta_bins]
    }

    pub(crate) fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    pub(crate) fn copy_from(&mut self, other: &Self) {
        debug_assert_eq!(self.data.len(), other.data.len());
        self.data.copy_from_slice(&other.data);
    }

    /// Iterate `(r_bin, theta_bin, value)` in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        let tb = self.theta_bins;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, &v)| (i / tb, i % tb, v))
    }
}

impl HoughGrid<u32> {
    #[inline]
    pub(crate) fn increment(&mut self, r_bin: usize, theta_bin: usize) {
        let i = self.offset(r_bin, theta_bin);
        self.data[i] += 1;
    }

    /// Sum of all votes.
    pub fn total(&self) -> u64 {
        self.data.iter().map(|&v| v as u64).sum()
    }

    /// Largest vote count (0 for an empty accumulator).
    pub fn max_value(&self) -> u32 {
        self.data.iter().copied().max().unwrap_or(0)
    }
}
