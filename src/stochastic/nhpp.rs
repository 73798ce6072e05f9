//! # Step-regular NHPP
//!
//! $$
//! \Lambda(t)=\int_{t_0}^{t}\lambda(s)\,ds,\qquad
//! \lambda(s)=\lambda_j\ \text{on}\ \left[t_0+j\Delta,\,t_0+(j+1)\Delta\right),\quad
//! \Delta=\frac{t_1-t_0}{n}
//! $$
//!
//! Batched samplers for non-homogeneous Poisson processes whose intensity is constant on
//! each of `n` equal-width intervals of `[t0, t1]`. Rows of every input matrix are
//! independent draws.
//!
//! - [`step_regular`]: arrivals by order statistics of the cumulative intensity.
//! - [`truncated`]: the same, conditioned on at least one event.
//! - [`thinning`]: arbitrary intensities bounded by a step-regular majorant.
pub mod inverse;
pub mod matrix;
pub mod step_regular;
pub mod thinning;
pub mod truncated;
pub mod validate;

use impl_new_derive::ImplNew;
use ndarray::Array1;
use ndarray::Array2;
use ndarray::ArrayView2;
use ndarray::Axis;
use rand::rngs::StdRng;
use rand::SeedableRng;

use self::matrix::cumulative_to_rate;
use self::matrix::rate_to_cumulative;
use crate::error::Result;
use crate::stochastic::missing;
use crate::stochastic::TOL;
use crate::traits::FloatExt;

/// Sampling options shared by the samplers.
#[derive(ImplNew, Clone, Copy, Debug, PartialEq)]
pub struct NhppOptions<T> {
  /// Tolerance for zero-width cumulative increments and the majorization check.
  pub tol: T,
  /// Keep only the first event of every draw.
  pub atmost1: bool,
}

impl<T: FloatExt> Default for NhppOptions<T> {
  fn default() -> Self {
    Self {
      tol: T::from_f64_fast(TOL),
      atmost1: false,
    }
  }
}

/// `(t1 - t0) / n_intervals` for every draw.
pub fn interval_durations<T: FloatExt>(range_t: ArrayView2<T>, n_intervals: usize) -> Array1<T> {
  let n = T::from_usize_(n_intervals);
  range_t
    .rows()
    .into_iter()
    .map(|range| (range[1] - range[0]) / n)
    .collect()
}

/// Stacks ragged rows into a rectangular matrix padded with [`missing`].
///
/// The width is the longest row, but never less than `min_width`.
pub fn pad_rows<T: FloatExt>(rows: &[Vec<T>], min_width: usize) -> Array2<T> {
  let width = rows
    .iter()
    .map(Vec::len)
    .max()
    .unwrap_or(0)
    .max(min_width);
  let mut out = Array2::from_elem((rows.len(), width), missing());
  for (mut out_row, row) in out.axis_iter_mut(Axis(0)).zip(rows) {
    for (slot, &t) in out_row.iter_mut().zip(row) {
      *slot = t;
    }
  }

  out
}

/// One independent generator per draw, derived from a single seed.
pub fn row_rngs(seed: u64, n_draws: usize) -> Vec<StdRng> {
  let mut master = StdRng::seed_from_u64(seed);
  (0..n_draws).map(|_| StdRng::from_rng(&mut master)).collect()
}

/// A validated step-regular intensity held in both rate and cumulative form.
#[derive(Clone, Debug)]
pub struct StepRegularTable<T: FloatExt> {
  /// Rate per unit time on each interval.
  pub rate: Array2<T>,
  /// Cumulative intensity at the right edge of each interval.
  pub cumulative: Array2<T>,
  pub range_t: Array2<T>,
  pub duration: Array1<T>,
}

impl<T: FloatExt> StepRegularTable<T> {
  /// Validates `values` against `range_t` and derives the missing representation.
  pub fn new(values: ArrayView2<T>, is_cumulative: bool, range_t: ArrayView2<T>) -> Result<Self> {
    validate::check_shapes(values, range_t)?;
    validate::check_range(range_t)?;
    validate::check_rates(values, is_cumulative)?;

    let duration = interval_durations(range_t, values.ncols());
    let (rate, cumulative) = if is_cumulative {
      (cumulative_to_rate(values, duration.view()), values.to_owned())
    } else {
      (values.to_owned(), rate_to_cumulative(values, duration.view()))
    };

    Ok(Self {
      rate,
      cumulative,
      range_t: range_t.to_owned(),
      duration,
    })
  }

  pub fn n_draws(&self) -> usize {
    self.rate.nrows()
  }

  pub fn n_intervals(&self) -> usize {
    self.rate.ncols()
  }

  pub fn window(&self, row: usize) -> (T, T) {
    (self.range_t[[row, 0]], self.range_t[[row, 1]])
  }

  /// Total cumulative intensity of a draw.
  pub fn total(&self, row: usize) -> T {
    self.cumulative[[row, self.n_intervals() - 1]]
  }

  pub fn totals(&self) -> Array1<T> {
    self.cumulative.column(self.n_intervals() - 1).to_owned()
  }

  /// Index of the interval containing `t`.
  ///
  /// A time sitting exactly on a breakpoint is attributed to the left interval when the
  /// right one carries no rate, so an event produced by inversion always lands in an
  /// interval with positive majorant.
  pub fn interval_of(&self, row: usize, t: T) -> usize {
    let last = self.n_intervals() - 1;
    let offset = (t - self.range_t[[row, 0]]) / self.duration[row];
    let j = offset.floor().to_usize().unwrap_or(0).min(last);
    if j > 0 && self.rate[[row, j]] <= T::zero() && offset.floor() == offset {
      j - 1
    } else {
      j
    }
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;
  use ndarray::array;

  use super::*;
  use crate::error::NhppError;
  use crate::stochastic::is_missing;

  #[test]
  fn durations_follow_each_window() {
    let range = array![[0.0, 2.0], [1.0, 4.0]];
    assert_abs_diff_eq!(interval_durations(range.view(), 4), array![0.5, 0.75]);
  }

  #[test]
  fn pad_rows_fills_with_missing() {
    let z = pad_rows(&[vec![1.0, 2.0], vec![], vec![3.0]], 0);
    assert_eq!(z.dim(), (3, 2));
    assert_eq!((z[[0, 0]], z[[0, 1]], z[[2, 0]]), (1.0, 2.0, 3.0));
    assert!(is_missing(z[[1, 0]]) && is_missing(z[[1, 1]]) && is_missing(z[[2, 1]]));

    let empty = pad_rows::<f64>(&[vec![], vec![]], 1);
    assert_eq!(empty.dim(), (2, 1));
    assert!(empty.iter().all(|&t| is_missing(t)));
  }

  #[test]
  fn table_holds_both_representations() {
    let rate = array![[1.0, 3.0], [0.0, 2.0]];
    let range = array![[0.0, 2.0], [5.0, 6.0]];
    let table = StepRegularTable::new(rate.view(), false, range.view()).unwrap();
    assert_abs_diff_eq!(table.cumulative, array![[1.0, 4.0], [0.0, 1.0]], epsilon = 1e-12);
    assert_abs_diff_eq!(table.totals(), array![4.0, 1.0], epsilon = 1e-12);

    let back = StepRegularTable::new(table.cumulative.view(), true, range.view()).unwrap();
    assert_abs_diff_eq!(back.rate, rate, epsilon = 1e-12);
  }

  #[test]
  fn interval_lookup_is_relative_to_window_start() {
    let rate = array![[1.0, 0.0, 2.0]];
    let range = array![[10.0, 13.0]];
    let table = StepRegularTable::new(rate.view(), false, range.view()).unwrap();
    assert_eq!(table.interval_of(0, 10.2), 0);
    assert_eq!(table.interval_of(0, 12.5), 2);
    assert_eq!(table.interval_of(0, 13.0), 2);
    // Right interval has no rate, so the breakpoint belongs to the left one.
    assert_eq!(table.interval_of(0, 11.0), 0);
    assert_eq!(table.interval_of(0, 12.0), 2);
  }

  #[test]
  fn table_rejects_invalid_input() {
    let err = StepRegularTable::new(array![[1.0]].view(), false, array![[0.0, 1.0, 2.0]].view());
    assert!(matches!(err, Err(NhppError::InvalidShape(_))));
  }

  #[test]
  fn default_options() {
    let options = NhppOptions::<f64>::default();
    assert_eq!(options, NhppOptions::new(TOL, false));
  }

  #[test]
  fn row_streams_are_reproducible_and_distinct() {
    use rand::Rng;

    let mut a = row_rngs(3, 4);
    let mut b = row_rngs(3, 4);
    let xa: Vec<u64> = a.iter_mut().map(|rng| rng.random()).collect();
    let xb: Vec<u64> = b.iter_mut().map(|rng| rng.random()).collect();
    assert_eq!(xa, xb);
    assert_ne!(xa[0], xa[1]);
  }
}
