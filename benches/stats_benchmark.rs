use campusfit::models::{Activity, ActivitySummary, ActivityType, TeamStats};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn synthetic_activities(count: usize) -> Vec<Activity> {
    let types = [
        ActivityType::Running,
        ActivityType::Cycling,
        ActivityType::Swimming,
        ActivityType::Walking,
        ActivityType::Weightlifting,
        ActivityType::Yoga,
        ActivityType::Other,
    ];

    (0..count)
        .map(|i| Activity {
            id: format!("activity-{}", i),
            activity_id: format!("external-{}", i),
            user_id: format!("user-{}", i % 50),
            activity_type: types[i % types.len()],
            duration_minutes: 20 + (i % 90) as u32,
            calories_burned: 100 + (i % 700) as u32,
            distance_km: if i % 3 == 0 { None } else { Some(i as f64 % 42.0) },
            notes: String::new(),
            date_logged: "2024-06-01T08:00:00Z".to_string(),
        })
        .collect()
}

fn benchmark_summary_fold(c: &mut Criterion) {
    let small = synthetic_activities(100);
    let large = synthetic_activities(10_000);

    let mut group = c.benchmark_group("activity_summary");

    group.bench_function("fold_100_activities", |b| {
        b.iter(|| ActivitySummary::from_activities(black_box(&small)))
    });

    group.bench_function("fold_10k_activities", |b| {
        b.iter(|| ActivitySummary::from_activities(black_box(&large)))
    });

    group.bench_function("team_stats_10k_activities", |b| {
        b.iter(|| TeamStats::compute(black_box("Benchmark Team"), 50, black_box(&large)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_summary_fold);
criterion_main!(benches);
