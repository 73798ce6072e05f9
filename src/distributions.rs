//! # Distributions
//!
//! $$
//! \mathbb P(N=k\mid N>0)=\frac{\lambda^k e^{-\lambda}}{k!\,(1-e^{-\lambda})},\quad k\ge1
//! $$
//!
pub mod zt_poisson;
