//! # Step-regular inversion
//!
//! $$
//! \Lambda^{-1}(\tau)=t_0+\Delta\left(j+\frac{\tau-\Lambda_{j-1}}{\Lambda_j-\Lambda_{j-1}}\right),
//! \qquad j=\min\{k:\Lambda_k\ge\tau\}
//! $$
//!
use ndarray::ArrayView1;

use crate::stochastic::is_missing;
use crate::stochastic::missing;
use crate::traits::FloatExt;
use crate::traits::InversionExt;

/// Linear interpolation of the cumulative intensity within its breakpoints.
///
/// Every interval with positive mass is interpolated, however small. `tol` is part of
/// the [`InversionExt`] contract and is not needed by this exact inverse.
#[derive(Clone, Copy, Debug, Default)]
pub struct StepRegularInverse;

impl StepRegularInverse {
  pub fn new() -> Self {
    Self
  }

  /// Real time at which the cumulative intensity of one draw reaches `tau`.
  pub fn invert_one<T: FloatExt>(
    &self,
    tau: T,
    cumulative: ArrayView1<T>,
    window: (T, T),
    _tol: T,
  ) -> T {
    let breakpoints = cumulative.to_vec();
    invert_sorted(tau, &breakpoints, window)
  }
}

/// For `tau > 0` the search never lands on a zero-mass interval.
fn invert_sorted<T: FloatExt>(tau: T, breakpoints: &[T], window: (T, T)) -> T {
  if is_missing(tau) {
    return missing();
  }

  let (start, end) = window;
  let n = breakpoints.len();
  let duration = (end - start) / T::from_usize_(n);

  let j = breakpoints.partition_point(|&lambda| lambda < tau);
  if j >= n {
    return end;
  }

  let prev = if j == 0 { T::zero() } else { breakpoints[j - 1] };
  let increment = breakpoints[j] - prev;
  let fraction = if increment > T::zero() {
    ((tau - prev) / increment).max(T::zero()).min(T::one())
  } else {
    T::zero()
  };

  start + duration * (T::from_usize_(j) + fraction)
}

impl<T: FloatExt> InversionExt<T> for StepRegularInverse {
  fn invert_row(&self, targets: &[T], cumulative: ArrayView1<T>, window: (T, T), _tol: T) -> Vec<T> {
    let breakpoints = cumulative.to_vec();
    targets
      .iter()
      .map(|&tau| invert_sorted(tau, &breakpoints, window))
      .collect()
  }
}
