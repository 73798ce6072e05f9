//! # Input validation
//!
//! $$
//! t_1>t_0,\qquad \lambda_{r,j}\ge 0,\qquad \Lambda_{r,j}\ge\Lambda_{r,j-1}
//! $$
//!
//! Checks run before any random variate is drawn, so a rejected call consumes nothing
//! from the caller's generator.
use ndarray::ArrayView1;
use ndarray::ArrayView2;

use crate::error::NhppError;
use crate::error::Result;
use crate::traits::FloatExt;

pub fn check_shapes<T: FloatExt>(values: ArrayView2<T>, range_t: ArrayView2<T>) -> Result<()> {
  if values.nrows() == 0 || values.ncols() == 0 {
    return Err(NhppError::InvalidShape(format!(
      "rate matrix must have at least one draw and one interval, got {}x{}",
      values.nrows(),
      values.ncols()
    )));
  }

  if range_t.ncols() != 2 {
    return Err(NhppError::InvalidShape(format!(
      "time range must have 2 columns (start, end), got {}",
      range_t.ncols()
    )));
  }

  if range_t.nrows() != values.nrows() {
    return Err(NhppError::InvalidShape(format!(
      "rate matrix has {} draws but time range has {}",
      values.nrows(),
      range_t.nrows()
    )));
  }

  Ok(())
}

pub fn check_range<T: FloatExt>(range_t: ArrayView2<T>) -> Result<()> {
  for (row, range) in range_t.rows().into_iter().enumerate() {
    let (start, end) = (range[0], range[1]);
    if !start.is_finite() || !end.is_finite() || end <= start {
      return Err(NhppError::NonPositiveDuration {
        row,
        start: start.to_f64_lossy(),
        end: end.to_f64_lossy(),
      });
    }
  }

  Ok(())
}

/// Entries must be finite and non-negative; cumulative rows must not decrease.
pub fn check_rates<T: FloatExt>(values: ArrayView2<T>, is_cumulative: bool) -> Result<()> {
  for ((row, col), &value) in values.indexed_iter() {
    if !value.is_finite() || value < T::zero() {
      return Err(NhppError::InvalidRate {
        row,
        col,
        value: value.to_f64_lossy(),
      });
    }

    if is_cumulative && col > 0 && value < values[[row, col - 1]] {
      return Err(NhppError::NonMonotoneCumulative { row, col });
    }
  }

  Ok(())
}

/// Every draw needs positive mass to be conditioned on at least one event.
pub fn check_positive_totals<T: FloatExt>(totals: ArrayView1<T>) -> Result<()> {
  match totals.iter().position(|&total| total <= T::zero()) {
    Some(row) => Err(NhppError::ZeroTotalIntensity { row }),
    None => Ok(()),
  }
}

#[cfg(test)]
mod tests {
  use ndarray::array;

  use super::*;

  #[test]
  fn rejects_row_mismatch() {
    let rate = array![[1.0, 2.0], [1.0, 1.0]];
    let range = array![[0.0, 1.0]];
    assert!(matches!(
      check_shapes(rate.view(), range.view()),
      Err(NhppError::InvalidShape(_))
    ));
  }

  #[test]
  fn rejects_empty_rate_matrix() {
    let rate = ndarray::Array2::<f64>::zeros((1, 0));
    let range = array![[0.0, 1.0]];
    assert!(matches!(
      check_shapes(rate.view(), range.view()),
      Err(NhppError::InvalidShape(_))
    ));
  }

  #[test]
  fn rejects_reversed_window() {
    let range = array![[0.0, 1.0], [2.0, 2.0]];
    assert_eq!(
      check_range(range.view()),
      Err(NhppError::NonPositiveDuration {
        row: 1,
        start: 2.0,
        end: 2.0
      })
    );
  }

  #[test]
  fn rejects_negative_and_nan_rates() {
    let rate = array![[1.0, -0.5]];
    assert_eq!(
      check_rates(rate.view(), false),
      Err(NhppError::InvalidRate {
        row: 0,
        col: 1,
        value: -0.5
      })
    );

    let rate = array![[f64::NAN, 1.0]];
    assert!(matches!(
      check_rates(rate.view(), false),
      Err(NhppError::InvalidRate { row: 0, col: 0, .. })
    ));
  }

  #[test]
  fn cumulative_must_not_decrease() {
    let cumulative = array![[1.0, 2.0, 2.0], [1.0, 3.0, 2.5]];
    assert_eq!(
      check_rates(cumulative.view(), true),
      Err(NhppError::NonMonotoneCumulative { row: 1, col: 2 })
    );
    // Same values are fine as plain rates.
    assert!(check_rates(cumulative.view(), false).is_ok());
  }

  #[test]
  fn zero_total_is_reported_with_its_row() {
    let totals = array![1.0, 0.0, 2.0];
    assert_eq!(
      check_positive_totals(totals.view()),
      Err(NhppError::ZeroTotalIntensity { row: 1 })
    );
  }
}
