//! # Traits
//!
//! $$
//! \text{Trait contracts: }\mathcal{A}:\text{inputs}\to\text{samples}
//! $$
//!
use std::fmt::Debug;
use std::fmt::Display;
use std::iter::Sum;
use std::ops::AddAssign;
use std::ops::DivAssign;
use std::ops::MulAssign;
use std::ops::SubAssign;

use ndarray::Array2;
use ndarray::ArrayView1;
use ndarray::ArrayView2;
use ndarray::ScalarOperand;
use rand::Rng;
use rayon::prelude::*;

use crate::error::Result;
use crate::stochastic::missing;
use crate::stochastic::nhpp::pad_rows;

pub trait FloatExt:
  num_traits::Float
  + num_traits::FromPrimitive
  + Sum
  + Default
  + Debug
  + Display
  + Send
  + Sync
  + ScalarOperand
  + AddAssign
  + SubAssign
  + MulAssign
  + DivAssign
  + 'static
{
  fn from_usize_(n: usize) -> Self;
  fn from_f64_fast(v: f64) -> Self;
  fn to_f64_lossy(self) -> f64;
  /// Uniform on the open interval `(0, 1)`.
  fn sample_open01<R: Rng + ?Sized>(rng: &mut R) -> Self;
}

pub trait ProcessExt<T: FloatExt>: Send + Sync {
  type Output: Send;

  fn sample(&self) -> Self::Output;

  fn sample_par(&self, m: usize) -> Vec<Self::Output> {
    (0..m).into_par_iter().map(|_| self.sample()).collect()
  }
}

/// Batched evaluator of the true intensity.
///
/// Receives the full proposal matrix (missing slots are `NaN`) and must return a
/// matrix of the same shape holding `λ(t)` at every proposed time.
pub trait IntensityExt<T: FloatExt>: Send + Sync {
  fn eval(&self, times: ArrayView2<T>) -> Array2<T>;
}

impl<T, F> IntensityExt<T> for F
where
  T: FloatExt,
  F: Fn(ArrayView2<T>) -> Array2<T> + Send + Sync,
{
  fn eval(&self, times: ArrayView2<T>) -> Array2<T> {
    self(times)
  }
}

/// Candidate generator for thinning: a step-regular NHPP given its cumulative
/// intensity.
pub trait ProposalExt<T: FloatExt>: Send + Sync {
  /// Ascending event times of one draw on `window`.
  fn propose_row<R: Rng + ?Sized>(
    &self,
    cumulative: ArrayView1<T>,
    window: (T, T),
    tol: T,
    atmost1: bool,
    rng: &mut R,
  ) -> Result<Vec<T>>;

  fn propose<R: Rng + ?Sized>(
    &self,
    cumulative: ArrayView2<T>,
    range_t: ArrayView2<T>,
    tol: T,
    atmost1: bool,
    rng: &mut R,
  ) -> Result<Array2<T>> {
    let mut rows = Vec::with_capacity(cumulative.nrows());
    for (r, (row, range)) in cumulative.rows().into_iter().zip(range_t.rows()).enumerate() {
      let times = self
        .propose_row(row, (range[0], range[1]), tol, atmost1, rng)
        .map_err(|e| e.with_row(r))?;
      rows.push(times);
    }

    Ok(pad_rows(&rows, usize::from(atmost1)))
  }
}

/// Event-count generator, one count per draw.
pub trait CountExt<T: FloatExt>: Send + Sync {
  fn count<R: Rng + ?Sized>(&self, mean: T, rng: &mut R) -> Result<usize>;

  fn counts<R: Rng + ?Sized>(&self, means: ArrayView1<T>, rng: &mut R) -> Result<Vec<usize>> {
    means.iter().map(|&mean| self.count(mean, rng)).collect()
  }
}

/// Maps cumulative-intensity targets back to real time.
pub trait InversionExt<T: FloatExt>: Send + Sync {
  fn invert_row(&self, targets: &[T], cumulative: ArrayView1<T>, window: (T, T), tol: T) -> Vec<T>;

  fn invert(
    &self,
    targets: ArrayView2<T>,
    cumulative: ArrayView2<T>,
    range_t: ArrayView2<T>,
    tol: T,
  ) -> Array2<T> {
    let mut out = Array2::from_elem(targets.raw_dim(), missing());
    for (r, mut out_row) in out.rows_mut().into_iter().enumerate() {
      let row = targets.row(r).to_vec();
      let times = self.invert_row(
        &row,
        cumulative.row(r),
        (range_t[[r, 0]], range_t[[r, 1]]),
        tol,
      );
      for (slot, t) in out_row.iter_mut().zip(times) {
        *slot = t;
      }
    }

    out
  }
}
