//! Benchmarks for data processing operations
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::collections::HashMap;
use std::time::Duration;
use streamscope::analysis::{FftAnalyzer, WindowFunction};
use streamscope::pipeline::{
    parse_line, AppearanceProfile, ChannelRegistry, DispatcherOptions, FeedDispatcher,
    ManualClock, RenderTarget, SurfaceId, Throttle, WindowBuffer,
};
use streamscope::Sample;

/// Render target that discards everything
struct NullTarget;

impl RenderTarget for NullTarget {
    fn on_sample(&mut self, sample: &Sample) {
        black_box(sample);
    }
    fn stop(&mut self) {}
    fn start(&mut self) {}
    fn apply_appearance(&mut self, _profile: &AppearanceProfile) {}
}

fn record(seq: usize, channels: usize) -> String {
    let mut line = seq.to_string();
    for ch in 0..channels {
        line.push(',');
        line.push_str(&(2048 + (seq * 7 + ch * 13) % 1000).to_string());
    }
    line
}

fn dispatcher(channels: usize, clock: ManualClock) -> FeedDispatcher {
    let registry = ChannelRegistry::new(vec![true; channels]);
    let mut surfaces: HashMap<SurfaceId, Box<dyn RenderTarget>> = registry
        .enabled_indices()
        .map(|i| (SurfaceId::for_channel(i), Box::new(NullTarget) as Box<dyn RenderTarget>))
        .collect();
    FeedDispatcher::new(registry, DispatcherOptions::default(), &mut surfaces).with_clock(clock)
}

fn bench_line_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("line_parsing");

    for channels in [1, 6, 32].iter() {
        let line = record(12345, *channels);
        group.throughput(Throughput::Bytes(line.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse_line", channels), &line, |b, line| {
            b.iter(|| black_box(parse_line(black_box(line))));
        });
    }

    group.bench_function("malformed_fields", |b| {
        let line = "7,12,abc,,NaN,inf,3.5";
        b.iter(|| black_box(parse_line(black_box(line))));
    });

    group.finish();
}

fn bench_window_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("window_buffer");

    for max_points in [1000, 10_000, 100_000].iter() {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::new("push_at_capacity", max_points),
            max_points,
            |b, &max_points| {
                let mut window = WindowBuffer::new(Duration::from_secs(3600), max_points);
                for i in 0..max_points as i64 {
                    window.push(Sample::new(i, i as f64));
                }
                let mut t = max_points as i64;
                b.iter(|| {
                    window.push(black_box(Sample::new(t, t as f64)));
                    t += 1;
                });
            },
        );
    }

    // Every push evicts by age rather than by count
    group.bench_function("push_with_retention", |b| {
        let mut window = WindowBuffer::new(Duration::from_millis(500), usize::MAX);
        let mut t = 0i64;
        b.iter(|| {
            window.push(black_box(Sample::new(t, 1.0)));
            t += 1;
        });
    });

    group.finish();
}

fn bench_throttle(c: &mut Criterion) {
    let mut group = c.benchmark_group("throttle");

    group.bench_function("coalesce_burst", |b| {
        let mut throttle = Throttle::new(Duration::from_millis(100));
        let mut t = 0i64;
        b.iter(|| {
            let now = t / 1000;
            black_box(throttle.poll(now));
            black_box(throttle.call(black_box(t), now));
            t += 1;
        });
    });

    group.finish();
}

fn bench_ingest_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest_frame");

    for lines in [1, 10, 100].iter() {
        let frame: String = (0..*lines)
            .map(|seq| record(seq, 6))
            .collect::<Vec<_>>()
            .join("\n");

        group.throughput(Throughput::Elements(*lines as u64));
        group.bench_with_input(BenchmarkId::new("six_channels", lines), &frame, |b, frame| {
            let clock = ManualClock::new(0);
            let mut dispatcher = dispatcher(6, clock.clone());
            b.iter(|| {
                clock.advance(50);
                dispatcher.ingest_frame(black_box(frame));
            });
        });
    }

    group.finish();
}

fn bench_fft(c: &mut Criterion) {
    let mut group = c.benchmark_group("fft");

    for size in [256, 1024, 4096].iter() {
        let samples: Vec<f64> = (0..*size)
            .map(|i| (i as f64 * 0.05).sin() * 1500.0 + 2048.0)
            .collect();

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("compute", size), &samples, |b, samples| {
            let mut analyzer = FftAnalyzer::new(WindowFunction::Hann);
            b.iter(|| black_box(analyzer.compute(black_box(samples), 200.0, 100.0)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_line_parsing,
    bench_window_push,
    bench_throttle,
    bench_ingest_frame,
    bench_fft,
);

criterion_main!(benches);
