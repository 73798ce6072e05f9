//! # Step-regular NHPP
//!
//! $$
//! N\sim\mathrm{Poisson}(\Lambda_n),\qquad
//! T_{(k)}=\Lambda^{-1}\!\left(\Lambda_n U_{(k)}\right),\quad U_k\overset{iid}{\sim}\mathcal U(0,1)
//! $$
//!
//! Conditional on the count, NHPP arrivals are the order statistics of i.i.d. draws from
//! the normalized intensity, so one Poisson count, `N` sorted uniforms and an inversion of
//! the cumulative intensity produce a whole draw.
use std::cmp::Ordering;

use ndarray::Array2;
use ndarray::ArrayView1;
use rand::Rng;
use rand_distr::Distribution;
use rand_distr::Poisson;
use rayon::prelude::*;

use super::inverse::StepRegularInverse;
use super::pad_rows;
use super::row_rngs;
use super::NhppOptions;
use super::StepRegularTable;
use crate::error::NhppError;
use crate::error::Result;
use crate::traits::FloatExt;
use crate::traits::InversionExt;
use crate::traits::ProcessExt;
use crate::traits::ProposalExt;

/// Scaled uniform order statistics `Λ_n U_(1) <= ... <= Λ_n U_(count)`.
///
/// With `atmost1` only the smallest one is returned. All `count` uniforms are still drawn
/// so a given seed consumes the same stream with and without the flag.
pub fn scaled_order_statistics<T: FloatExt, R: Rng + ?Sized>(
  count: usize,
  total: T,
  atmost1: bool,
  rng: &mut R,
) -> Vec<T> {
  let mut u: Vec<T> = (0..count).map(|_| T::sample_open01(rng)).collect();
  if atmost1 {
    return u
      .into_iter()
      .reduce(T::min)
      .map(|min| vec![min * total])
      .unwrap_or_default();
  }

  u.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
  for x in u.iter_mut() {
    *x *= total;
  }

  u
}

/// Non-truncated step-regular proposal: Poisson count, order statistics, inversion.
#[derive(Clone, Copy, Debug, Default)]
pub struct StepRegularProposal<I = StepRegularInverse> {
  pub inverse: I,
}

impl StepRegularProposal {
  pub fn new() -> Self {
    Self {
      inverse: StepRegularInverse::new(),
    }
  }
}

impl<I> StepRegularProposal<I> {
  pub fn with_inverse(inverse: I) -> Self {
    Self { inverse }
  }
}

impl<T, I> ProposalExt<T> for StepRegularProposal<I>
where
  T: FloatExt,
  I: InversionExt<T>,
{
  /// A total beyond what [`Poisson`] supports fails with [`NhppError::InvalidRate`] on
  /// the last interval.
  fn propose_row<R: Rng + ?Sized>(
    &self,
    cumulative: ArrayView1<T>,
    window: (T, T),
    tol: T,
    atmost1: bool,
    rng: &mut R,
  ) -> Result<Vec<T>> {
    let total = cumulative[cumulative.len() - 1];
    if total <= T::zero() {
      return Ok(Vec::new());
    }

    let poisson = Poisson::new(total.to_f64_lossy()).map_err(|_| NhppError::InvalidRate {
      row: 0,
      col: cumulative.len() - 1,
      value: total.to_f64_lossy(),
    })?;
    let k: f64 = poisson.sample(rng);
    let count = k as usize;
    tracing::trace!(count, "step-regular row");

    let targets = scaled_order_statistics(count, total, atmost1, rng);
    Ok(self.inverse.invert_row(&targets, cumulative, window, tol))
  }
}

/// Batched sampler of step-regular NHPPs.
///
/// `rate` is `n_draws × n_intervals`, read as a rate per unit time unless `is_cumulative`,
/// in which case every row holds the cumulative intensity at the right edge of each
/// interval. `range_t` holds one `(t0, t1)` window per draw.
pub struct StepRegularSampler<T: FloatExt> {
  pub rate: Array2<T>,
  pub is_cumulative: bool,
  pub range_t: Array2<T>,
  pub options: NhppOptions<T>,
  pub proposal: StepRegularProposal,
}

impl<T: FloatExt> StepRegularSampler<T> {
  pub fn new(
    rate: Array2<T>,
    is_cumulative: bool,
    range_t: Array2<T>,
    tol: T,
    atmost1: bool,
  ) -> Self {
    Self {
      rate,
      is_cumulative,
      range_t,
      options: NhppOptions::new(tol, atmost1),
      proposal: StepRegularProposal::new(),
    }
  }

  fn table(&self) -> Result<StepRegularTable<T>> {
    StepRegularTable::new(self.rate.view(), self.is_cumulative, self.range_t.view())
  }

  /// Event times, one row per draw, padded with `NaN`.
  ///
  /// Width is the largest count in the batch (possibly 0), or exactly 1 with `atmost1`.
  pub fn sample_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Array2<T>> {
    let table = self.table()?;
    let NhppOptions { tol, atmost1 } = self.options;
    let z = self.proposal.propose(
      table.cumulative.view(),
      table.range_t.view(),
      tol,
      atmost1,
      rng,
    )?;
    tracing::debug!(
      n_draws = table.n_draws(),
      n_intervals = table.n_intervals(),
      width = z.ncols(),
      "sampled step-regular NHPP"
    );

    Ok(z)
  }

  /// Like [`Self::sample_with`] but rows run in parallel, each on its own generator
  /// derived from `seed`.
  pub fn sample_rows_par(&self, seed: u64) -> Result<Array2<T>> {
    let table = self.table()?;
    let NhppOptions { tol, atmost1 } = self.options;
    let mut rngs = row_rngs(seed, table.n_draws());
    let rows = rngs
      .par_iter_mut()
      .enumerate()
      .map(|(r, rng)| {
        self
          .proposal
          .propose_row(table.cumulative.row(r), table.window(r), tol, atmost1, rng)
          .map_err(|e| e.with_row(r))
      })
      .collect::<Result<Vec<_>>>()?;

    Ok(pad_rows(&rows, usize::from(atmost1)))
  }
}

impl<T: FloatExt> ProcessExt<T> for StepRegularSampler<T> {
  type Output = Result<Array2<T>>;

  fn sample(&self) -> Self::Output {
    self.sample_with(&mut rand::rng())
  }
}
