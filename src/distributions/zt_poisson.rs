//! # Zero-truncated Poisson
//!
//! $$
//! \mathbb P(N=k)=\frac{\lambda^k}{k!\,(e^{\lambda}-1)},\quad k\ge1,\qquad
//! \mathbb E[N]=\frac{\lambda}{1-e^{-\lambda}}
//! $$
//!
use rand::Rng;
use rand_distr::Distribution;
use rand_distr::Poisson;

use crate::error::NhppError;
use crate::error::Result;
use crate::traits::CountExt;
use crate::traits::FloatExt;

/// Below this mean the conditional CDF is inverted directly, above it plain Poisson draws
/// are rejected until positive (`P(N = 0) < 5e-5`).
const INVERSION_THRESHOLD: f64 = 10.0;

#[derive(Clone, Copy, Debug)]
pub struct ZeroTruncatedPoisson {
  lambda: f64,
  p0: f64,
  /// Untruncated sampler for the rejection branch.
  poisson: Option<Poisson<f64>>,
}

impl ZeroTruncatedPoisson {
  /// Fails with [`NhppError::InvalidRate`] unless `0 < lambda <= Poisson::MAX_LAMBDA`.
  pub fn new(lambda: f64) -> Result<Self> {
    let invalid = NhppError::InvalidRate {
      row: 0,
      col: 0,
      value: lambda,
    };
    if !lambda.is_finite() || lambda <= 0.0 {
      return Err(invalid);
    }

    let poisson = if lambda < INVERSION_THRESHOLD {
      None
    } else {
      Some(Poisson::new(lambda).map_err(|_| invalid)?)
    };

    Ok(Self {
      lambda,
      p0: (-lambda).exp(),
      poisson,
    })
  }

  pub fn lambda(&self) -> f64 {
    self.lambda
  }

  pub fn mean(&self) -> f64 {
    self.lambda / (1.0 - self.p0)
  }

  /// Walks the Poisson CDF from `k = 0` until it covers `u ∈ (P(0), 1)`.
  fn sample_inversion<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
    let u = self.p0 + (1.0 - self.p0) * f64::sample_open01(rng);
    let mut k = 0u64;
    let mut pmf = self.p0;
    let mut cum = pmf;
    while u > cum {
      k += 1;
      pmf *= self.lambda / k as f64;
      cum += pmf;
      if cum >= 1.0 - 1e-15 || pmf == 0.0 {
        break;
      }
    }

    k.max(1)
  }
}

impl Distribution<u64> for ZeroTruncatedPoisson {
  fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
    match &self.poisson {
      None => self.sample_inversion(rng),
      Some(poisson) => loop {
        let k: f64 = poisson.sample(rng);
        if k > 0.0 {
          return k as u64;
        }
      },
    }
  }
}

/// Per-draw zero-truncated Poisson counts with mean parameter `Λ_r`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZtPoissonCounts;

impl<T: FloatExt> CountExt<T> for ZtPoissonCounts {
  fn count<R: Rng + ?Sized>(&self, mean: T, rng: &mut R) -> Result<usize> {
    let dist = ZeroTruncatedPoisson::new(mean.to_f64_lossy())?;
    Ok(dist.sample(rng) as usize)
  }

  fn counts<R: Rng + ?Sized>(&self, means: ndarray::ArrayView1<T>, rng: &mut R) -> Result<Vec<usize>> {
    let mut out = Vec::with_capacity(means.len());
    for (row, &mean) in means.iter().enumerate() {
      if mean <= T::zero() {
        return Err(NhppError::ZeroTotalIntensity { row });
      }
      let dist = ZeroTruncatedPoisson::new(mean.to_f64_lossy()).map_err(|e| e.with_row(row))?;
      out.push(dist.sample(rng) as usize);
    }

    Ok(out)
  }
}
