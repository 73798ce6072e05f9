//! # Stochastic Process Simulation Modules
//!
//! `stochastic` hosts the point-process samplers of the crate.
//!
//! ## Modules
//!
//! | Module   | Description                                                                                  |
//! |----------|----------------------------------------------------------------------------------------------|
//! | [`nhpp`] | Non-homogeneous Poisson processes with step-regular intensities (inversion and thinning).    |
//!
//! ## Missing values
//!
//! Event-time matrices are rectangular. Draws with fewer events than the widest row are
//! right-padded with [`missing`] (`NaN`), which never collides with a valid event time.
//!
//! ## Parallelism
//!
//! `sample_par(m)` produces `m` independent batches with `rayon`. `sample_rows_par(seed)`
//! spreads the rows of a single batch over the thread pool, one seeded sub-stream per row.
pub mod nhpp;

use rand::distr::Open01;
use rand::Rng;

pub use crate::traits::FloatExt;
pub use crate::traits::ProcessExt;

/// Default numerical tolerance for the inversion and majorization checks
pub const TOL: f64 = 1e-6;

/// Sentinel stored in unused event slots.
#[inline]
pub fn missing<T: FloatExt>() -> T {
  T::nan()
}

#[inline]
pub fn is_missing<T: FloatExt>(x: T) -> bool {
  x.is_nan()
}

impl FloatExt for f64 {
  fn from_usize_(n: usize) -> Self {
    n as f64
  }

  fn from_f64_fast(v: f64) -> Self {
    v
  }

  fn to_f64_lossy(self) -> f64 {
    self
  }

  fn sample_open01<R: Rng + ?Sized>(rng: &mut R) -> Self {
    rng.sample(Open01)
  }
}

impl FloatExt for f32 {
  fn from_usize_(n: usize) -> Self {
    n as f32
  }

  fn from_f64_fast(v: f64) -> Self {
    v as f32
  }

  fn to_f64_lossy(self) -> f64 {
    self as f64
  }

  fn sample_open01<R: Rng + ?Sized>(rng: &mut R) -> Self {
    rng.sample(Open01)
  }
}
