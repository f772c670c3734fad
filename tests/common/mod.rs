#![allow(dead_code)]

use std::path::PathBuf;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use housing_mlp::data::source::{FEATURE_NAMES, N_ROWS, TARGET_NAME};
use housing_mlp::data::{Dataset, DatasetSummary};
use housing_mlp::model::RegressionMetricsOutput;
use housing_mlp::session::{FlashMessage, Frontend, PlotLabels};
use housing_mlp::Progress;

/// Scratch directory private to this test process.
pub fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("housing-mlp-it-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// One raw `cal_housing.data` record: longitude, latitude, housingMedianAge,
/// totalRooms, totalBedrooms, population, households, medianIncome,
/// medianHouseValue.
fn raw_record(rng: &mut ChaCha8Rng) -> [f64; 9] {
    let longitude = rng.gen_range(-124.3..-114.3);
    let latitude: f64 = rng.gen_range(32.5..42.0);
    let age = rng.gen_range(1..=52) as f64;
    let households = rng.gen_range(50..1200) as f64;
    let rooms = households * rng.gen_range(3.0..8.0);
    let bedrooms = rooms * rng.gen_range(0.15..0.25);
    let population = households * rng.gen_range(1.5..4.5);
    let income: f64 = rng.gen_range(0.5..15.0);
    let noise: f64 = rng.gen_range(-20_000.0..20_000.0);
    let value = (45_000.0 + 32_000.0 * income - 1_500.0 * (latitude - 32.5) + noise).clamp(14_999.0, 500_001.0);
    [longitude, latitude, age, rooms, bedrooms, population, households, income, value]
}

/// Writes a synthetic full-size raw dataset file and returns its path.
pub fn write_raw_dataset(name: &str) -> PathBuf {
    let path = scratch_dir().join(name);
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(&path).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    for _ in 0..N_ROWS {
        let record = raw_record(&mut rng);
        writer.write_record(record.iter().map(|v| format!("{:.4}", v))).unwrap();
    }
    writer.flush().unwrap();
    path
}

/// A small in-memory dataset with the California housing column names.
pub fn small_dataset(n: usize) -> Dataset {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let mut features = Vec::with_capacity(n);
    let mut targets = Vec::with_capacity(n);
    for _ in 0..n {
        let [lon, lat, age, rooms, bedrooms, pop, households, income, value] = raw_record(&mut rng);
        features.push(vec![
            income,
            age,
            rooms / households,
            bedrooms / households,
            pop,
            pop / households,
            lat,
            lon,
        ]);
        targets.push(value / 100_000.0);
    }
    let names = FEATURE_NAMES.iter().map(|s| s.to_string()).collect();
    Dataset::new(names, TARGET_NAME, features, targets).unwrap()
}

/// Front end that only remembers what it was asked to show.
#[derive(Default)]
pub struct RecordingFrontend {
    pub datasets_shown: Vec<usize>,
    pub summaries: Vec<DatasetSummary>,
    pub plots: Vec<(PlotLabels, usize)>,
    pub progress: Vec<Progress>,
    pub metrics: Vec<RegressionMetricsOutput>,
    pub flashes: Vec<FlashMessage>,
}

impl RecordingFrontend {
    pub fn percents(&self) -> Vec<u8> {
        self.progress.iter().map(|p| p.percent).collect()
    }
}

impl Frontend for RecordingFrontend {
    fn show_dataset(&mut self, dataset: &Dataset) {
        self.datasets_shown.push(dataset.n_rows());
    }

    fn show_summary(&mut self, summary: &DatasetSummary) {
        self.summaries.push(summary.clone());
    }

    fn plot(&mut self, x: &[f64], y: &[f64], labels: &PlotLabels) -> housing_mlp::Result<()> {
        assert_eq!(x.len(), y.len());
        self.plots.push((labels.clone(), x.len()));
        Ok(())
    }

    fn progress(&mut self, progress: &Progress) {
        self.progress.push(progress.clone());
    }

    fn show_metrics(&mut self, metrics: &RegressionMetricsOutput) {
        self.metrics.push(metrics.clone());
    }

    fn flash(&mut self, message: &FlashMessage) {
        self.flashes.push(message.clone());
    }
}
