use std::hint::black_box;
use std::time::Duration;

use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;
use ndarray::Array2;
use ndarray::ArrayView2;
use rand::SeedableRng;
use rand::rngs::StdRng;
use stochastic_nhpp::stochastic::TOL;
use stochastic_nhpp::stochastic::nhpp::step_regular::StepRegularSampler;
use stochastic_nhpp::stochastic::nhpp::thinning::ThinningSampler;
use stochastic_nhpp::stochastic::nhpp::truncated::TruncatedStepRegular;

const N_INTERVALS: usize = 48;

fn inputs(n_draws: usize) -> (Array2<f64>, Array2<f64>) {
  let rate = Array2::from_shape_fn((n_draws, N_INTERVALS), |(r, j)| {
    0.5 + ((r + j) % 7) as f64 * 0.25
  });
  let range_t = Array2::from_shape_fn((n_draws, 2), |(_, c)| c as f64 * 24.0);
  (rate, range_t)
}

fn half_of_majorant(t: ArrayView2<f64>) -> Array2<f64> {
  t.mapv(|_| 0.25)
}

fn bench_nhpp(c: &mut Criterion) {
  let mut group = c.benchmark_group("StepRegularNhpp");
  group.measurement_time(Duration::from_secs(3));
  group.warm_up_time(Duration::from_millis(500));

  for &n in &[1_000usize, 20_000usize] {
    let (rate, range_t) = inputs(n);

    let model = StepRegularSampler::new(rate.clone(), false, range_t.clone(), TOL, false);
    let mut rng = StdRng::seed_from_u64(1);
    group.bench_with_input(BenchmarkId::new("step_regular/sample_with", n), &n, |b, _| {
      b.iter(|| {
        let z = model.sample_with(&mut rng).unwrap();
        black_box(z.dim())
      });
    });
    group.bench_with_input(BenchmarkId::new("step_regular/sample_rows_par", n), &n, |b, _| {
      b.iter(|| {
        let z = model.sample_rows_par(1).unwrap();
        black_box(z.dim())
      });
    });

    let model = TruncatedStepRegular::new(rate.clone(), false, range_t.clone(), false);
    let mut rng = StdRng::seed_from_u64(2);
    group.bench_with_input(BenchmarkId::new("truncated/sample_with", n), &n, |b, _| {
      b.iter(|| {
        let z = model.sample_with(&mut rng).unwrap();
        black_box(z.dim())
      });
    });

    let model = TruncatedStepRegular::new(rate.clone(), false, range_t.clone(), true);
    group.bench_with_input(BenchmarkId::new("truncated/atmost1", n), &n, |b, _| {
      b.iter(|| {
        let z = model.sample_with(&mut rng).unwrap();
        black_box(z.dim())
      });
    });

    let model = ThinningSampler::new(half_of_majorant, rate, false, range_t, TOL, false);
    let mut rng = StdRng::seed_from_u64(3);
    group.bench_with_input(BenchmarkId::new("thinning/sample_with", n), &n, |b, _| {
      b.iter(|| {
        let z = model.sample_with(&mut rng).unwrap();
        black_box(z.dim())
      });
    });
  }

  group.finish();
}

criterion_group!(benches, bench_nhpp);
criterion_main!(benches);
