criterion::criterion_main!(benches);
criterion::criterion_group! {
    name = benches;
    config = criterion::Criterion::default()
        .without_plots()
        .sample_size(50)
        .measurement_time(std::time::Duration::from_secs(2));
    targets =
        advancing_the_lcg_stream,
        drawing_seed32_from_the_lcg,
        sampling_a_small_weight_biased_ensemble,
        sampling_a_large_weight_biased_ensemble,
}

fn advancing_the_lcg_stream(c: &mut criterion::Criterion) {
    c.bench_function("advance the LCG stream 1000 times", |b| {
        b.iter(|| {
            let mut rng = Lcg::new(1);
            let mut sum = 0.0;
            for _ in 0..1000 {
                sum += rng.next_f64();
            }
            criterion::black_box(sum)
        })
    });
}

fn drawing_seed32_from_the_lcg(c: &mut criterion::Criterion) {
    let mut rng = Lcg::new(42);
    c.bench_function("draw a 32-bit injection seed from the LCG", |b| {
        b.iter(|| criterion::black_box(rng.next_seed32()))
    });
}

fn sampling_a_small_weight_biased_ensemble(c: &mut criterion::Criterion) {
    let ensemble = build_ensemble(8);
    let mut rng = Lcg::new(7);
    c.bench_function("weight-biased sample from an 8-member ensemble", |b| {
        b.iter(|| criterion::black_box(ensemble.sample_weight_biased(&mut rng)))
    });
}

fn sampling_a_large_weight_biased_ensemble(c: &mut criterion::Criterion) {
    let ensemble = build_ensemble(4096);
    let mut rng = Lcg::new(7);
    c.bench_function("weight-biased sample from a 4096-member ensemble", |b| {
        b.iter(|| criterion::black_box(ensemble.sample_weight_biased(&mut rng)))
    });
}

fn build_ensemble(n: u64) -> Ensemble {
    let mut ensemble = Ensemble::new();
    for i in 1..=n {
        ensemble.push(i, i as f64);
    }
    ensemble
}

use ffs_core::ensemble::Ensemble;
use ffs_core::rng::Lcg;
