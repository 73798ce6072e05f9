//! # Zero-truncated step-regular NHPP
//!
//! $$
//! N\mid N\ge1\sim\mathrm{ZTPoisson}(\Lambda_n),\qquad
//! T_{(k)}=\Lambda^{-1}\!\left(\Lambda_n U_{(k)}\right),\quad k=1,\dots,N
//! $$
//!
//! Every draw is conditioned on having at least one event, so no row of the output is
//! entirely missing.
use ndarray::Array2;
use rand::Rng;
use rayon::prelude::*;

use super::inverse::StepRegularInverse;
use super::pad_rows;
use super::row_rngs;
use super::step_regular::scaled_order_statistics;
use super::validate;
use super::NhppOptions;
use super::StepRegularTable;
use crate::distributions::zt_poisson::ZtPoissonCounts;
use crate::error::Result;
use crate::stochastic::missing;
use crate::traits::CountExt;
use crate::traits::FloatExt;
use crate::traits::InversionExt;
use crate::traits::ProcessExt;

/// Zero-truncated step-regular NHPP sampler.
///
/// Unless `is_cumulative`, `rate` is read per unit time and scaled by the interval
/// duration, so a row's total intensity is `Σ rate · (t1 - t0) / n_intervals`.
///
/// `counts` draws the per-row number of events and `inverse` maps cumulative-intensity
/// targets back to time. Both default to the exact implementations of this crate and can
/// be swapped with [`TruncatedStepRegular::with_strategies`].
pub struct TruncatedStepRegular<T: FloatExt, C = ZtPoissonCounts, I = StepRegularInverse> {
  pub rate: Array2<T>,
  pub is_cumulative: bool,
  pub range_t: Array2<T>,
  pub options: NhppOptions<T>,
  pub counts: C,
  pub inverse: I,
}

impl<T: FloatExt> TruncatedStepRegular<T> {
  pub fn new(rate: Array2<T>, is_cumulative: bool, range_t: Array2<T>, atmost1: bool) -> Self {
    Self {
      rate,
      is_cumulative,
      range_t,
      options: NhppOptions {
        atmost1,
        ..Default::default()
      },
      counts: ZtPoissonCounts,
      inverse: StepRegularInverse::new(),
    }
  }
}

impl<T, C, I> TruncatedStepRegular<T, C, I>
where
  T: FloatExt,
  C: CountExt<T>,
  I: InversionExt<T>,
{
  pub fn with_strategies<C2, I2>(self, counts: C2, inverse: I2) -> TruncatedStepRegular<T, C2, I2> {
    TruncatedStepRegular {
      rate: self.rate,
      is_cumulative: self.is_cumulative,
      range_t: self.range_t,
      options: self.options,
      counts,
      inverse,
    }
  }

  pub fn with_tol(mut self, tol: T) -> Self {
    self.options.tol = tol;
    self
  }

  fn table(&self) -> Result<StepRegularTable<T>> {
    let table = StepRegularTable::new(self.rate.view(), self.is_cumulative, self.range_t.view())?;
    validate::check_positive_totals(table.totals().view())?;
    Ok(table)
  }

  /// Event times, one row per draw, padded with `NaN`.
  ///
  /// Width is the largest sampled count, or 1 with `atmost1` (only the first event of each
  /// draw is materialized).
  pub fn sample_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Array2<T>> {
    let table = self.table()?;
    let NhppOptions { tol, atmost1 } = self.options;

    let n_events = self.counts.counts(table.totals().view(), rng)?;
    let max_events = n_events.iter().copied().max().unwrap_or(0);
    let width = if atmost1 { 1 } else { max_events };
    tracing::debug!(
      n_draws = table.n_draws(),
      n_intervals = table.n_intervals(),
      max_events,
      width,
      "sampling zero-truncated step-regular NHPP"
    );

    let mut tau = Array2::from_elem((table.n_draws(), width), missing());
    for (r, &n) in n_events.iter().enumerate() {
      let targets = scaled_order_statistics(n, table.total(r), atmost1, rng);
      for (slot, target) in tau.row_mut(r).iter_mut().zip(targets) {
        *slot = target;
      }
    }

    Ok(self.inverse.invert(
      tau.view(),
      table.cumulative.view(),
      table.range_t.view(),
      tol,
    ))
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
      .map(|(r, rng)| -> Result<Vec<T>> {
        let n = self.counts.count(table.total(r), rng).map_err(|e| e.with_row(r))?;
        let targets = scaled_order_statistics(n, table.total(r), atmost1, rng);
        Ok(
          self
            .inverse
            .invert_row(&targets, table.cumulative.row(r), table.window(r), tol),
        )
      })
      .collect::<Result<Vec<_>>>()?;

    Ok(pad_rows(&rows, usize::from(atmost1)))
  }
}

impl<T, C, I> ProcessExt<T> for TruncatedStepRegular<T, C, I>
where
  T: FloatExt,
  C: CountExt<T>,
  I: InversionExt<T>,
{
  type Output = Result<Array2<T>>;

  fn sample(&self) -> Self::Output {
    self.sample_with(&mut rand::rng())
  }
}
