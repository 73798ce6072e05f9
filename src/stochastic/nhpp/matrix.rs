//! # Row operations
//!
//! $$
//! \Lambda_{r,j}=\Delta_r\sum_{k\le j}\lambda_{r,k},\qquad
//! \lambda_{r,j}=\frac{\Lambda_{r,j}-\Lambda_{r,j-1}}{\Delta_r}
//! $$
//!
use ndarray::Array2;
use ndarray::ArrayView1;
use ndarray::ArrayView2;
use ndarray::Axis;

use crate::traits::FloatExt;

/// Running sum along every row.
pub fn cumsum_rows<T: FloatExt>(x: ArrayView2<T>) -> Array2<T> {
  let mut out = x.to_owned();
  out.accumulate_axis_inplace(Axis(1), |&prev, curr| *curr += prev);
  out
}

/// First difference along every row, keeping the first column as is.
pub fn diff_rows<T: FloatExt>(x: ArrayView2<T>) -> Array2<T> {
  let mut out = x.to_owned();
  for j in (1..x.ncols()).rev() {
    let (left, mut right) = out.multi_slice_mut((ndarray::s![.., j - 1], ndarray::s![.., j]));
    right -= &left;
  }

  out
}

/// Cumulative intensity at the right edge of each interval.
pub fn rate_to_cumulative<T: FloatExt>(rate: ArrayView2<T>, duration: ArrayView1<T>) -> Array2<T> {
  let mut out = cumsum_rows(rate);
  for (mut row, &d) in out.axis_iter_mut(Axis(0)).zip(duration) {
    row *= d;
  }

  out
}

/// Rate per unit time recovered from a cumulative intensity table.
pub fn cumulative_to_rate<T: FloatExt>(
  cumulative: ArrayView2<T>,
  duration: ArrayView1<T>,
) -> Array2<T> {
  let mut out = diff_rows(cumulative);
  for (mut row, &d) in out.axis_iter_mut(Axis(0)).zip(duration) {
    row /= d;
  }

  out
}
