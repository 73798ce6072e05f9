//! # stochastic-nhpp
//!
//! $$
//! N(t)\sim\mathrm{NHPP}(\lambda),\qquad \lambda(t)=\lambda_j,\; t\in\left[t_0+j\Delta,\,t_0+(j+1)\Delta\right)
//! $$
//!
//! Vectorized samplers for non-homogeneous Poisson processes whose intensity is
//! piecewise constant over a regular partition of the simulation window.
//!
//! Every sampler works on a batch of independent draws at once. Inputs are
//! `n_draws × n_intervals` rate (or cumulative intensity) matrices together with a
//! `n_draws × 2` matrix of time windows, and outputs are `n_draws × width` matrices
//! of event times right-padded with `NaN`.
//!
//! | Sampler | Description |
//! |---|---|
//! | [`stochastic::nhpp::step_regular::StepRegularSampler`] | Step-regular NHPP by order statistics. |
//! | [`stochastic::nhpp::truncated::TruncatedStepRegular`] | Step-regular NHPP conditioned on at least one event. |
//! | [`stochastic::nhpp::thinning::ThinningSampler`] | General intensity thinned from a step-regular majorant. |
//!
//! ```rust
//! use ndarray::array;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use stochastic_nhpp::stochastic::nhpp::truncated::TruncatedStepRegular;
//!
//! let sampler = TruncatedStepRegular::new(
//!   array![[1.0, 1.0], [0.5, 0.5]],
//!   false,
//!   array![[0.0, 2.0], [0.0, 2.0]],
//!   false,
//! );
//! let mut rng = StdRng::seed_from_u64(42);
//! let times = sampler.sample_with(&mut rng).unwrap();
//! ```
pub mod distributions;
pub mod error;
pub mod stochastic;
pub mod traits;

pub use error::NhppError;
pub use traits::FloatExt;
pub use traits::ProcessExt;
