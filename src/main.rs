use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;

use anyhow::bail;
use anyhow::Context;
use ndarray::array;
use ndarray::Array2;
use ndarray::ArrayView2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use stochastic_nhpp::stochastic::nhpp::step_regular::StepRegularSampler;
use stochastic_nhpp::stochastic::nhpp::thinning::ThinningSampler;
use stochastic_nhpp::stochastic::nhpp::truncated::TruncatedStepRegular;
use stochastic_nhpp::stochastic::TOL;

const SEED: u64 = 42;

/// Reads a whitespace separated matrix, one draw per line.
fn read_matrix_from_file(path: &str) -> anyhow::Result<Array2<f64>> {
  let file = File::open(path).with_context(|| format!("opening {path}"))?;
  let mut values = Vec::new();
  let mut n_rows = 0;
  let mut n_cols = None;

  for (i, line) in BufReader::new(file).lines().enumerate() {
    let line = line?;
    if line.trim().is_empty() {
      continue;
    }

    let row = line
      .split_whitespace()
      .map(str::parse::<f64>)
      .collect::<Result<Vec<_>, _>>()
      .with_context(|| format!("{path}:{}", i + 1))?;
    match n_cols {
      None => n_cols = Some(row.len()),
      Some(n) if n != row.len() => bail!("{path}:{}: expected {n} values, got {}", i + 1, row.len()),
      Some(_) => {}
    }
    values.extend(row);
    n_rows += 1;
  }

  let n_cols = n_cols.context("empty rate matrix")?;
  Ok(Array2::from_shape_vec((n_rows, n_cols), values)?)
}

fn print_draws(name: &str, z: &Array2<f64>) {
  println!("\n{name} ({} x {}):", z.nrows(), z.ncols());
  for (r, row) in z.rows().into_iter().enumerate() {
    let times: Vec<String> = row
      .iter()
      .take_while(|t| !t.is_nan())
      .map(|t| format!("{t:.4}"))
      .collect();
    println!("  draw {r}: [{}]", times.join(", "));
  }
}

fn main() -> anyhow::Result<()> {
  let rate = match std::env::args().nth(1) {
    Some(path) => read_matrix_from_file(&path)?,
    None => array![[0.5, 2.0, 4.0, 1.0], [1.0, 1.0, 1.0, 1.0], [0.0, 0.0, 0.2, 0.0]],
  };
  let range_t = Array2::from_shape_fn((rate.nrows(), 2), |(_, c)| 2.0 * c as f64);
  let mut rng = StdRng::seed_from_u64(SEED);

  let sampler = StepRegularSampler::new(rate.clone(), false, range_t.clone(), TOL, false);
  print_draws("step-regular", &sampler.sample_with(&mut rng)?);

  let sampler = TruncatedStepRegular::new(rate.clone(), false, range_t.clone(), false);
  print_draws("zero-truncated", &sampler.sample_with(&mut rng)?);

  // Intensity oscillating under its own step majorant.
  let majorant = rate.clone();
  let n_intervals = rate.ncols();
  let intensity = move |t: ArrayView2<f64>| {
    Array2::from_shape_fn(t.dim(), |(r, k)| {
      let tk = t[[r, k]];
      if tk.is_nan() {
        return 0.0;
      }
      let j = ((tk / 2.0 * n_intervals as f64).floor() as usize).min(n_intervals - 1);
      majorant[[r, j]] * (0.5 + 0.5 * (3.0 * tk).cos())
    })
  };
  let sampler = ThinningSampler::new(intensity, rate, false, range_t, TOL, false);
  print_draws("thinned", &sampler.sample_with(&mut rng)?);

  Ok(())
}
