//! # Thinning
//!
//! $$
//! T^\ast\sim\mathrm{NHPP}(\lambda^{\mathrm{maj}}),\qquad
//! \mathbb P\left(\text{keep }t\right)=\frac{\lambda(t)}{\lambda^{\mathrm{maj}}(t)},\qquad
//! \lambda\le\lambda^{\mathrm{maj}}
//! $$
//!
//! Candidates come from a step-regular majorant and are kept independently with
//! probability `λ(t) / λmaj(t)`. The true intensity is evaluated once, on the whole
//! proposal matrix.
use ndarray::Array2;
use ndarray::ArrayView1;
use ndarray::ArrayView2;
use rand::Rng;
use rayon::prelude::*;

use super::pad_rows;
use super::row_rngs;
use super::step_regular::StepRegularProposal;
use super::NhppOptions;
use super::StepRegularTable;
use crate::error::NhppError;
use crate::error::Result;
use crate::stochastic::is_missing;
use crate::traits::FloatExt;
use crate::traits::IntensityExt;
use crate::traits::ProcessExt;
use crate::traits::ProposalExt;

/// NHPP sampler for a general intensity bounded by a step-regular majorant.
///
/// `rate_maj` must bound `intensity` from above at every proposed time. This is checked
/// after the batched evaluation and reported as [`NhppError::MajorizationViolated`]
/// before any candidate is accepted.
pub struct ThinningSampler<T: FloatExt, F, P = StepRegularProposal> {
  pub intensity: F,
  pub rate_maj: Array2<T>,
  pub is_cumulative: bool,
  pub range_t: Array2<T>,
  pub options: NhppOptions<T>,
  pub proposal: P,
}

impl<T, F> ThinningSampler<T, F>
where
  T: FloatExt,
  F: Fn(ArrayView2<T>) -> Array2<T> + Send + Sync,
{
  pub fn new(
    intensity: F,
    rate_maj: Array2<T>,
    is_cumulative: bool,
    range_t: Array2<T>,
    tol: T,
    atmost1: bool,
  ) -> Self {
    Self {
      intensity,
      rate_maj,
      is_cumulative,
      range_t,
      options: NhppOptions::new(tol, atmost1),
      proposal: StepRegularProposal::new(),
    }
  }
}

impl<T, F, P> ThinningSampler<T, F, P>
where
  T: FloatExt,
  F: IntensityExt<T>,
  P: ProposalExt<T>,
{
  pub fn with_proposal<P2: ProposalExt<T>>(self, proposal: P2) -> ThinningSampler<T, F, P2> {
    ThinningSampler {
      intensity: self.intensity,
      rate_maj: self.rate_maj,
      is_cumulative: self.is_cumulative,
      range_t: self.range_t,
      options: self.options,
      proposal,
    }
  }

  fn table(&self) -> Result<StepRegularTable<T>> {
    StepRegularTable::new(self.rate_maj.view(), self.is_cumulative, self.range_t.view())
  }

  /// True intensity at every proposal, checked against the majorant.
  fn evaluate(&self, table: &StepRegularTable<T>, zstar: &Array2<T>) -> Result<Array2<T>> {
    let lambda_star = self.intensity.eval(zstar.view());
    if lambda_star.dim() != zstar.dim() {
      return Err(NhppError::InvalidShape(format!(
        "intensity evaluator returned {:?} for proposals of shape {:?}",
        lambda_star.dim(),
        zstar.dim()
      )));
    }

    let tol = self.options.tol;
    for ((row, col), &t) in zstar.indexed_iter() {
      if is_missing(t) {
        continue;
      }

      let value = lambda_star[[row, col]];
      if !value.is_finite() || value < T::zero() {
        return Err(NhppError::InvalidIntensity {
          row,
          col,
          value: value.to_f64_lossy(),
        });
      }

      let majorant = table.rate[[row, table.interval_of(row, t)]];
      if value > majorant * (T::one() + tol) + tol {
        return Err(NhppError::MajorizationViolated {
          row,
          col,
          time: t.to_f64_lossy(),
          intensity: value.to_f64_lossy(),
          majorant: majorant.to_f64_lossy(),
        });
      }
    }

    Ok(lambda_star)
  }

  /// Scans one draw's candidates in time order, one uniform per candidate.
  fn accept_row<R: Rng + ?Sized>(
    &self,
    table: &StepRegularTable<T>,
    row: usize,
    zstar: ArrayView1<T>,
    lambda_star: ArrayView1<T>,
    rng: &mut R,
  ) -> Vec<T> {
    let mut accepted = Vec::new();
    for (&t, &lambda) in zstar.iter().zip(lambda_star) {
      if is_missing(t) {
        break;
      }

      let majorant = table.rate[[row, table.interval_of(row, t)]];
      let u = T::sample_open01(rng);
      // Ties reject. A zero majorant gives NaN for a zero intensity, which rejects too.
      if lambda / majorant > u {
        accepted.push(t);
        if self.options.atmost1 {
          break;
        }
      }
    }

    accepted
  }

  /// Accepted event times, one row per draw, padded with `NaN`.
  ///
  /// Width is the largest accepted count in the batch, at least 1.
  pub fn sample_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Array2<T>> {
    let table = self.table()?;
    let zstar = self.proposal.propose(
      table.cumulative.view(),
      table.range_t.view(),
      self.options.tol,
      false,
      rng,
    )?;
    let lambda_star = self.evaluate(&table, &zstar)?;

    let rows: Vec<Vec<T>> = (0..table.n_draws())
      .map(|r| self.accept_row(&table, r, zstar.row(r), lambda_star.row(r), rng))
      .collect();
    let z = pad_rows(&rows, 1);
    tracing::debug!(
      n_draws = table.n_draws(),
      n_intervals = table.n_intervals(),
      proposals = zstar.ncols(),
      width = z.ncols(),
      "thinned step-regular proposals"
    );

    Ok(z)
  }

  /// Like [`Self::sample_with`] but rows run in parallel, each on its own generator
  /// derived from `seed`. The intensity is still evaluated once for the whole batch.
  pub fn sample_rows_par(&self, seed: u64) -> Result<Array2<T>> {
    let table = self.table()?;
    let tol = self.options.tol;
    let mut rngs = row_rngs(seed, table.n_draws());

    let proposals = rngs
      .par_iter_mut()
      .enumerate()
      .map(|(r, rng)| {
        self
          .proposal
          .propose_row(table.cumulative.row(r), table.window(r), tol, false, rng)
          .map_err(|e| e.with_row(r))
      })
      .collect::<Result<Vec<_>>>()?;
    let zstar = pad_rows(&proposals, 0);
    let lambda_star = self.evaluate(&table, &zstar)?;

    let rows: Vec<Vec<T>> = rngs
      .par_iter_mut()
      .enumerate()
      .map(|(r, rng)| self.accept_row(&table, r, zstar.row(r), lambda_star.row(r), rng))
      .collect();

    Ok(pad_rows(&rows, 1))
  }
}

impl<T, F, P> ProcessExt<T> for ThinningSampler<T, F, P>
where
  T: FloatExt,
  F: IntensityExt<T>,
  P: ProposalExt<T>,
{
  type Output = Result<Array2<T>>;

  fn sample(&self) -> Self::Output {
    self.sample_with(&mut rand::rng())
  }
}
