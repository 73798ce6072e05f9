//! # Errors
//!
//! $$
//! \text{validate}:(\Lambda,\,[t_0,t_1])\to\{\mathrm{Ok}\}\cup\mathcal{E}
//! $$
//!
use thiserror::Error;

/// Errors reported by the samplers before (or instead of) producing a draw.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NhppError {
  /// Input matrices have inconsistent or empty shapes.
  #[error("invalid shape: {0}")]
  InvalidShape(String),

  /// A time window is empty, reversed or not finite.
  #[error("time window of draw {row} is not a positive interval: [{start}, {end}]")]
  NonPositiveDuration { row: usize, start: f64, end: f64 },

  /// A rate or cumulative-intensity entry is negative or not finite.
  #[error("invalid rate {value} at draw {row}, interval {col}")]
  InvalidRate { row: usize, col: usize, value: f64 },

  /// Cumulative intensity decreases within a draw.
  #[error("cumulative intensity decreases at draw {row}, interval {col}")]
  NonMonotoneCumulative { row: usize, col: usize },

  /// The conditional (zero-truncated) process is undefined without any mass.
  #[error("draw {row} has zero total intensity, cannot condition on at least one event")]
  ZeroTotalIntensity { row: usize },

  /// The intensity evaluator returned a negative or non-finite value.
  #[error("intensity evaluator returned {value} at draw {row}, proposal {col}")]
  InvalidIntensity { row: usize, col: usize, value: f64 },

  /// The true intensity exceeds the majorizing rate at a proposed time.
  #[error(
    "intensity {intensity} exceeds majorant {majorant} at t = {time} (draw {row}, proposal {col})"
  )]
  MajorizationViolated {
    row: usize,
    col: usize,
    time: f64,
    intensity: f64,
    majorant: f64,
  },
}

impl NhppError {
  /// Attributes an error raised on a single draw to draw `row`.
  pub fn with_row(self, row: usize) -> Self {
    match self {
      Self::NonPositiveDuration { start, end, .. } => Self::NonPositiveDuration { row, start, end },
      Self::InvalidRate { col, value, .. } => Self::InvalidRate { row, col, value },
      Self::NonMonotoneCumulative { col, .. } => Self::NonMonotoneCumulative { row, col },
      Self::ZeroTotalIntensity { .. } => Self::ZeroTotalIntensity { row },
      Self::InvalidIntensity { col, value, .. } => Self::InvalidIntensity { row, col, value },
      Self::MajorizationViolated {
        col,
        time,
        intensity,
        majorant,
        ..
      } => Self::MajorizationViolated {
        row,
        col,
        time,
        intensity,
        majorant,
      },
      Self::InvalidShape(msg) => Self::InvalidShape(msg),
    }
  }
}

pub type Result<T> = std::result::Result<T, NhppError>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn with_row_rewrites_the_draw_index() {
    let err = NhppError::InvalidRate {
      row: 0,
      col: 2,
      value: 1e20,
    };
    assert_eq!(
      err.with_row(4),
      NhppError::InvalidRate {
        row: 4,
        col: 2,
        value: 1e20
      }
    );

    let err = NhppError::InvalidShape("2x0".into());
    assert_eq!(err.clone().with_row(1), err);
  }
}
