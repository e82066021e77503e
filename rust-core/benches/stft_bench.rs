use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stft_stats::spectrum::TransformBackend;
use stft_stats::{Representation, Representations, StftComputer, StftOptions, Waveform};

fn one_second() -> Waveform {
    let samples = (0..16000)
        .map(|n| (2.0 * std::f64::consts::PI * 440.0 * n as f64 / 16000.0).sin())
        .collect();
    Waveform::mono(samples, 16000.0)
}

fn bench_representations(c: &mut Criterion) {
    let waveform = one_second();
    let computer = StftComputer::new(StftOptions::default()).unwrap();
    let mut group = c.benchmark_group("compute");

    for repr in Representation::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(repr.name()), &repr, |b, &repr| {
            b.iter(|| computer.compute(black_box(&waveform), repr.into()).unwrap())
        });
    }
    group.bench_function("all", |b| {
        b.iter(|| computer.compute(black_box(&waveform), Representations::all()).unwrap())
    });
    group.finish();
}

fn bench_backends(c: &mut Criterion) {
    let waveform = one_second();
    let mut group = c.benchmark_group("backend");

    for backend in [TransformBackend::Realfft, TransformBackend::Rustfft] {
        let options = StftOptions {
            backend,
            ..StftOptions::default()
        };
        let computer = StftComputer::new(options).unwrap();
        group.bench_function(backend.name(), |b| {
            b.iter(|| {
                computer
                    .compute(black_box(&waveform), Representation::Spectra.into())
                    .unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_representations, bench_backends);
criterion_main!(benches);
