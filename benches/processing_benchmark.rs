use chrono::{Duration, NaiveDate};
use climate_features::models::AnnualSummary;
use climate_features::processors::{AnnualSummarizer, GapImputer, KnnImputer};
use climate_features::PipelineConfig;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// Annual rows with a deterministic sprinkling of gaps
fn create_annual_rows(county_count: usize, years: usize) -> Vec<AnnualSummary> {
    let mut rows = Vec::with_capacity(county_count * years);

    for county in 0..county_count {
        for offset in 0..years {
            let year = 2010 + offset as i32;
            let base = 20.0 + county as f64 * 0.3 + offset as f64 * 0.05;
            let gap = (county * 7 + offset * 3) % 5;

            rows.push(AnnualSummary::new(
                format!("County {:03}", county),
                year,
                (gap != 0).then_some(base + 8.0),
                (gap != 1).then_some(base - 6.0),
                (gap != 2).then_some(300.0 + county as f64 * 4.0),
            ));
        }
    }

    rows
}

fn create_observation_tree(root: &Path, county_count: usize, years: usize, days: usize) {
    for county in 0..county_count {
        let name = format!("County{:03}", county);
        let dir = root.join(&name);
        fs::create_dir_all(&dir).unwrap();

        for offset in 0..years {
            let year = 2010 + offset as i32;
            let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
            let mut content = String::from("date,PRCP,TMAX,TMIN,station,year\n");
            for day in 0..days {
                content.push_str(&format!(
                    "{}T00:00:00,{:.1},{:.1},{:.1},USW000{:05},{}\n",
                    start + Duration::days(day as i64),
                    (day % 4) as f64 * 0.5,
                    25.0 + (day % 10) as f64,
                    8.0 + (day % 7) as f64,
                    county,
                    year
                ));
            }
            fs::write(dir.join(format!("{}_{}.csv", name, year)), content).unwrap();
        }
    }
}

fn benchmark_knn_imputer(c: &mut Criterion) {
    let mut group = c.benchmark_group("knn_imputer");

    for columns in [30, 150] {
        let data: Vec<Vec<Option<f64>>> = (0..15)
            .map(|row| {
                (0..columns)
                    .map(|col| {
                        ((row + col) % 6 != 0).then_some((row * 3 + col) as f64 * 0.25)
                    })
                    .collect()
            })
            .collect();

        group.bench_with_input(BenchmarkId::new("fit_transform", columns), &data, |b, data| {
            let imputer = KnnImputer::new(3);
            b.iter(|| imputer.fit_transform(black_box(data)).unwrap())
        });
    }

    group.finish();
}

fn benchmark_gap_imputer(c: &mut Criterion) {
    let mut group = c.benchmark_group("gap_imputer");

    for county_count in [10, 58] {
        let rows = create_annual_rows(county_count, 15);

        group.bench_with_input(BenchmarkId::new("impute", county_count), &rows, |b, rows| {
            let imputer = GapImputer::new(3);
            b.iter(|| imputer.impute(black_box(rows)).unwrap())
        });
    }

    group.finish();
}

fn benchmark_annual_summarizer(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    create_observation_tree(temp_dir.path(), 8, 3, 365);

    let mut group = c.benchmark_group("annual_summarizer");

    for workers in [1, 4] {
        let config = PipelineConfig::default()
            .with_years(2010, 2012)
            .with_max_workers(workers);
        let summarizer = AnnualSummarizer::new(&config);

        group.bench_with_input(BenchmarkId::new("summarize", workers), &workers, |b, _| {
            b.iter(|| summarizer.summarize(black_box(temp_dir.path()), None).unwrap())
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_knn_imputer,
    benchmark_gap_imputer,
    benchmark_annual_summarizer
);
criterion_main!(benches);
